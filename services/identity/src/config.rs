use fieldnote_domain::provider::ProviderKind;
use fieldnote_domain::user::ServerRole;

/// Identity service configuration loaded from environment variables.
#[derive(Debug)]
pub struct IdentityConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on (default 3117). Env var: `IDENTITY_PORT`.
    pub identity_port: u16,
    /// Reconciliation policy, injected into usecases at construction.
    pub policy: AuthPolicy,
    /// LDAP directory settings; absent disables the LDAP login route.
    pub ldap: Option<LdapSettings>,
    /// Google OAuth settings; absent disables the Google login route.
    pub google: Option<GoogleSettings>,
    /// Apple Sign In settings; absent disables the Apple login route.
    pub apple: Option<AppleSettings>,
}

/// Login policy evaluated by the reconciler. Loaded once at startup and
/// passed in; usecases never read configuration themselves.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// Providers accepted by this deployment.
    pub allowed_methods: Vec<ProviderKind>,
    /// Whether password login over the API is offered to users who also
    /// hold federated identities.
    pub local_api_login_enabled: bool,
    /// Federated providers whose privileged (admin+) users must always
    /// authenticate with their local password.
    pub password_required_for_privileged: Vec<ProviderKind>,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            allowed_methods: vec![
                ProviderKind::Local,
                ProviderKind::Ldap,
                ProviderKind::Google,
                ProviderKind::Apple,
                ProviderKind::Passwordless,
            ],
            local_api_login_enabled: true,
            password_required_for_privileged: vec![ProviderKind::Google, ProviderKind::Apple],
        }
    }
}

impl AuthPolicy {
    pub fn allows(&self, kind: ProviderKind) -> bool {
        self.allowed_methods.contains(&kind)
    }

    /// Whether `kind` must be refused in favour of password login for a user
    /// with the given server role.
    pub fn forces_password_for(&self, kind: ProviderKind, role: ServerRole) -> bool {
        role.is_privileged() && self.password_required_for_privileged.contains(&kind)
    }

    /// Parse a comma-separated provider list ("local,google,..."). Unknown
    /// names are rejected so a typo disables startup, not a provider.
    pub fn parse_methods(csv: &str) -> Result<Vec<ProviderKind>, String> {
        csv.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<ProviderKind>().map_err(|e| e.to_string()))
            .collect()
    }
}

/// LDAP directory connection settings. LDAPS only.
#[derive(Debug, Clone)]
pub struct LdapSettings {
    /// Directory URL, e.g. "ldaps://directory.example.com:636".
    pub server_url: String,
    /// Bind DN template with a `{username}` placeholder,
    /// e.g. "uid={username},ou=people,dc=example,dc=com".
    pub bind_dn_template: String,
    /// Attribute holding the user's email address (default "mail").
    pub mail_attribute: String,
}

#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct AppleSettings {
    /// Expected `aud` claim of Apple identity tokens (the app's client id).
    pub client_id: String,
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"),
        Err(_) => default,
    }
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        let allowed_methods = match std::env::var("AUTH_METHODS") {
            Ok(csv) => AuthPolicy::parse_methods(&csv).expect("invalid AUTH_METHODS"),
            Err(_) => AuthPolicy::default().allowed_methods,
        };
        let policy = AuthPolicy {
            allowed_methods,
            local_api_login_enabled: env_flag("LOCAL_API_LOGIN_ENABLED", true),
            ..AuthPolicy::default()
        };

        let ldap = std::env::var("LDAP_SERVER_URL").ok().map(|server_url| LdapSettings {
            server_url,
            bind_dn_template: std::env::var("LDAP_BIND_DN_TEMPLATE")
                .expect("LDAP_BIND_DN_TEMPLATE"),
            mail_attribute: std::env::var("LDAP_MAIL_ATTRIBUTE")
                .unwrap_or_else(|_| "mail".to_owned()),
        });

        let google = std::env::var("GOOGLE_CLIENT_ID").ok().map(|client_id| GoogleSettings {
            client_id,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").expect("GOOGLE_CLIENT_SECRET"),
            redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").expect("GOOGLE_REDIRECT_URI"),
        });

        let apple = std::env::var("APPLE_CLIENT_ID")
            .ok()
            .map(|client_id| AppleSettings { client_id });

        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            identity_port: std::env::var("IDENTITY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3117),
            policy,
            ldap,
            google,
            apple,
        }
    }
}
