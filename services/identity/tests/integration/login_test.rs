use fieldnote_auth_types::token::validate_access_token;
use fieldnote_domain::provider::ProviderKind;
use fieldnote_domain::user::UserState;

use fieldnote_identity::config::AuthPolicy;
use fieldnote_identity::domain::types::{AppleClaims, DirectoryEntry, GoogleProfile};
use fieldnote_identity::error::IdentityError;
use fieldnote_identity::usecase::login::{
    AppleLoginUseCase, GoogleLoginUseCase, LdapLoginUseCase, LocalLoginUseCase,
    PasswordlessLoginUseCase,
};

use crate::helpers::{
    MockApple, MockCodeStore, MockDirectory, MockGoogle, MockProviderLinkStore, MockUserStore,
    TEST_JWT_SECRET, active_user, link, local_user, stored_code, user_with_state,
};

// ── Local ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_local_user_with_correct_password() {
    let user = local_user("ada@x.com", "s3cret");
    let links = MockProviderLinkStore::new(vec![link(&user, ProviderKind::Local)]);
    let uc = LocalLoginUseCase {
        users: MockUserStore::new(vec![user]),
        links,
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute("ada@x.com", "s3cret").await.unwrap();

    assert_eq!(out.user.email, "ada@x.com");
    let info = validate_access_token(&out.tokens.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, out.user.id);
}

#[tokio::test]
async fn should_reject_local_login_with_wrong_password() {
    let user = local_user("ada@x.com", "s3cret");
    let uc = LocalLoginUseCase {
        users: MockUserStore::new(vec![user]),
        links: MockProviderLinkStore::empty(),
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("ada@x.com", "wrong").await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_local_login_for_unknown_user() {
    let uc = LocalLoginUseCase {
        users: MockUserStore::empty(),
        links: MockProviderLinkStore::empty(),
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("nobody@x.com", "s3cret").await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_collapse_disabled_local_account_into_invalid_credentials() {
    let user = fieldnote_identity::domain::types::User {
        state: UserState::Disabled,
        ..local_user("off@x.com", "s3cret")
    };
    let uc = LocalLoginUseCase {
        users: MockUserStore::new(vec![user]),
        links: MockProviderLinkStore::empty(),
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    // local responses never reveal account state
    let result = uc.execute("off@x.com", "s3cret").await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_local_login_when_method_disabled() {
    let uc = LocalLoginUseCase {
        users: MockUserStore::empty(),
        links: MockProviderLinkStore::empty(),
        policy: AuthPolicy {
            allowed_methods: vec![ProviderKind::Google],
            ..AuthPolicy::default()
        },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("ada@x.com", "s3cret").await;
    assert!(matches!(result, Err(IdentityError::AuthMethodNotAllowed)));
}

// ── LDAP ─────────────────────────────────────────────────────────────────────

fn ldap_usecase(
    users: MockUserStore,
    directory: MockDirectory,
) -> LdapLoginUseCase<MockUserStore, MockProviderLinkStore, MockDirectory> {
    LdapLoginUseCase {
        users,
        links: MockProviderLinkStore::empty(),
        directory,
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_login_existing_active_user_via_ldap() {
    let user = active_user("dir@x.com", "Dir User");
    let directory = MockDirectory {
        entry: Some(DirectoryEntry {
            email: "Dir@X.com".to_owned(),
            display_name: Some("Dir User".to_owned()),
        }),
        unavailable: false,
    };
    let uc = ldap_usecase(MockUserStore::new(vec![user]), directory);

    // directory email is normalized before the lookup
    let out = uc.execute("diruser", "pw").await.unwrap();
    assert_eq!(out.user.email, "dir@x.com");
}

#[tokio::test]
async fn should_not_create_account_for_ldap_identity() {
    let directory = MockDirectory {
        entry: Some(DirectoryEntry {
            email: "dir@x.com".to_owned(),
            display_name: None,
        }),
        unavailable: false,
    };
    let users = MockUserStore::empty();
    let uc = ldap_usecase(users.clone(), directory);

    let result = uc.execute("diruser", "pw").await;
    assert!(matches!(result, Err(IdentityError::UserNotFound)));
    assert!(users.snapshot().is_empty());
}

#[tokio::test]
async fn should_surface_directory_outage() {
    let directory = MockDirectory {
        entry: None,
        unavailable: true,
    };
    let uc = ldap_usecase(MockUserStore::empty(), directory);

    let result = uc.execute("diruser", "pw").await;
    assert!(matches!(result, Err(IdentityError::DirectoryUnavailable)));
}

// ── Google ───────────────────────────────────────────────────────────────────

fn google_profile(verified: bool) -> GoogleProfile {
    GoogleProfile {
        email: "ada@x.com".to_owned(),
        email_verified: verified,
        given_name: Some("Ada".to_owned()),
        family_name: Some("Lovelace".to_owned()),
    }
}

#[tokio::test]
async fn should_create_user_on_first_google_login() {
    let users = MockUserStore::empty();
    let links = MockProviderLinkStore::empty();
    let uc = GoogleLoginUseCase {
        users: users.clone(),
        links: links.clone(),
        google: MockGoogle {
            profile: google_profile(true),
        },
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute("auth-code", None).await.unwrap();

    assert_eq!(out.user.state, UserState::Active);
    assert_eq!(out.user.name, "Ada");
    assert_eq!(links.snapshot().len(), 1);
    assert_eq!(links.snapshot()[0].provider, ProviderKind::Google);
}

#[tokio::test]
async fn should_reject_google_profile_with_unverified_email() {
    let users = MockUserStore::empty();
    let uc = GoogleLoginUseCase {
        users: users.clone(),
        links: MockProviderLinkStore::empty(),
        google: MockGoogle {
            profile: google_profile(false),
        },
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("auth-code", None).await;
    assert!(matches!(result, Err(IdentityError::EmailNotVerified)));
    assert!(users.snapshot().is_empty());
}

// ── Apple ────────────────────────────────────────────────────────────────────

fn apple_usecase(
    claims: AppleClaims,
) -> AppleLoginUseCase<MockUserStore, MockProviderLinkStore, MockApple> {
    AppleLoginUseCase {
        users: MockUserStore::empty(),
        links: MockProviderLinkStore::empty(),
        apple: MockApple { claims },
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_login_apple_user_with_verified_email() {
    let uc = apple_usecase(AppleClaims {
        email: "a@x.com".to_owned(),
        email_verified: Some("true".to_owned()),
    });

    let out = uc.execute("identity-token", None).await.unwrap();
    assert_eq!(out.user.name, "Apple User");
}

#[tokio::test]
async fn should_fail_hard_when_apple_omits_verification_claim() {
    let uc = apple_usecase(AppleClaims {
        email: "a@x.com".to_owned(),
        email_verified: None,
    });

    let result = uc.execute("identity-token", None).await;
    assert!(matches!(
        result,
        Err(IdentityError::MissingVerificationClaim)
    ));
}

#[tokio::test]
async fn should_distinguish_false_verification_claim_from_missing() {
    let uc = apple_usecase(AppleClaims {
        email: "a@x.com".to_owned(),
        email_verified: Some("false".to_owned()),
    });

    let result = uc.execute("identity-token", None).await;
    assert!(matches!(result, Err(IdentityError::EmailNotVerified)));
}

// ── Passwordless ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_activate_unverified_user_via_passwordless_login() {
    // scenario: invited user, never authenticated, empty name
    let user = user_with_state("a@x.com", UserState::Unverified);
    let users = MockUserStore::new(vec![user]);
    let links = MockProviderLinkStore::empty();
    let codes = MockCodeStore::new(vec![stored_code("a@x.com", "123456")]);
    let uc = PasswordlessLoginUseCase {
        users: users.clone(),
        links: links.clone(),
        codes: codes.clone(),
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute("a@x.com", "123456", None).await.unwrap();

    assert_eq!(out.user.state, UserState::Active);
    assert_eq!(out.user.name, "Passwordless User");
    assert_eq!(users.snapshot()[0].state, UserState::Active);
    assert_eq!(links.snapshot().len(), 1);
    assert_eq!(links.snapshot()[0].provider, ProviderKind::Passwordless);
    // single use: the code row is gone
    assert!(codes.code_snapshot().is_empty());
}

#[tokio::test]
async fn should_reject_wrong_passwordless_code() {
    let codes = MockCodeStore::new(vec![stored_code("a@x.com", "123456")]);
    let uc = PasswordlessLoginUseCase {
        users: MockUserStore::empty(),
        links: MockProviderLinkStore::empty(),
        codes: codes.clone(),
        policy: AuthPolicy::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("a@x.com", "000000", None).await;
    assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    // a failed attempt does not burn the code
    assert_eq!(codes.code_snapshot().len(), 1);
}
