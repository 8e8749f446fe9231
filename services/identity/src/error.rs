use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Identity service domain error variants.
///
/// Each variant maps to a stable opaque `ec5_*` code; clients localize the
/// code, never the message. Categories (credential / state-conflict /
/// configuration / infrastructure) are reflected in the HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("auth method not allowed")]
    AuthMethodNotAllowed,
    #[error("user not found")]
    UserNotFound,
    #[error("account disabled")]
    AccountDisabled,
    #[error("password login required")]
    AmbiguousProviderLocalPresent,
    #[error("provider verification required")]
    ProviderVerificationRequired,
    #[error("email verification claim missing")]
    MissingVerificationClaim,
    #[error("email not verified")]
    EmailNotVerified,
    #[error("invalid verification code")]
    InvalidVerificationCode,
    #[error("directory unavailable")]
    DirectoryUnavailable,
    #[error("email already in use")]
    EmailAlreadyExists,
    #[error("featured project requires manual handling")]
    FeaturedProjectConflict,
    #[error("account deletion failed")]
    ArchiveFailed,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IdentityError {
    /// Stable opaque code consumed by the client-side localization table.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "ec5_12",
            Self::AuthMethodNotAllowed => "ec5_55",
            Self::UserNotFound => "ec5_32",
            Self::AccountDisabled => "ec5_212",
            Self::AmbiguousProviderLocalPresent => "ec5_383",
            Self::ProviderVerificationRequired => "ec5_384",
            Self::MissingVerificationClaim => "ec5_386",
            Self::EmailNotVerified => "ec5_387",
            Self::InvalidVerificationCode => "ec5_378",
            Self::DirectoryUnavailable => "ec5_365",
            Self::EmailAlreadyExists => "ec5_375",
            Self::FeaturedProjectConflict => "ec5_392",
            Self::ArchiveFailed => "ec5_104",
            Self::InvalidToken => "ec5_219",
            Self::InvalidRefreshToken => "ec5_220",
            Self::Internal(_) => "ec5_103",
        }
    }

    /// Coarse origin of the error, surfaced in the response envelope.
    pub fn source_label(&self) -> &'static str {
        match self {
            Self::InvalidCredentials
            | Self::MissingVerificationClaim
            | Self::EmailNotVerified
            | Self::InvalidVerificationCode => "credentials",
            Self::AuthMethodNotAllowed => "configuration",
            Self::UserNotFound
            | Self::AccountDisabled
            | Self::EmailAlreadyExists
            | Self::AmbiguousProviderLocalPresent
            | Self::ProviderVerificationRequired => "account",
            Self::FeaturedProjectConflict | Self::ArchiveFailed => "deletion",
            Self::DirectoryUnavailable => "directory",
            Self::InvalidToken | Self::InvalidRefreshToken => "token",
            Self::Internal(_) => "server",
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredentials
            | Self::MissingVerificationClaim
            | Self::EmailNotVerified
            | Self::InvalidVerificationCode
            | Self::InvalidToken
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::AuthMethodNotAllowed | Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::AmbiguousProviderLocalPresent
            | Self::ProviderVerificationRequired
            | Self::EmailAlreadyExists
            | Self::FeaturedProjectConflict => StatusCode::CONFLICT,
            Self::DirectoryUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ArchiveFailed | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; logging them here
        // would be noise. Internal errors need the anyhow chain logged so the
        // root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, code = "ec5_103", "internal error");
        }
        let body = serde_json::json!({
            "errors": [{
                "code": self.code(),
                "title": self.to_string(),
                "source": self.source_label(),
            }]
        });
        (status, axum::Json(body)).into_response()
    }
}
