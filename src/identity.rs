//! Trusted identity extraction from the authenticating proxy headers.
//!
//! The upstream identity-aware proxy injects `issuer:value` pairs; the value
//! after the first colon is trusted verbatim. Requests without the headers
//! receive the fixed development identity unless the configuration requires
//! proxy headers, in which case they are rejected before any handler runs.

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use thiserror::Error;

use crate::{config::IdentityConfig, error::AppError, state::SharedState};

/// Header carrying `issuer:user-id`, set by the identity-aware proxy.
pub const USER_ID_HEADER: &str = "x-goog-authenticated-user-id";
/// Header carrying `issuer:email`, set by the identity-aware proxy.
pub const USER_EMAIL_HEADER: &str = "x-goog-authenticated-user-email";

/// Identity of the requesting user as asserted by the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque owner identifier used for all access checks.
    pub user_id: String,
    /// Email address asserted by the proxy.
    pub email: String,
    /// Display name derived from the email local part.
    pub display_name: String,
}

/// Reasons a request carries no usable identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The proxy headers are absent and development fallback is disabled.
    #[error("missing identity headers")]
    MissingHeaders,
    /// A header is present but not in the expected `issuer:value` form.
    #[error("malformed identity header `{header}`")]
    MalformedHeader {
        /// Name of the offending header.
        header: &'static str,
    },
}

impl Identity {
    /// Parse the proxy headers, falling back to the configured development
    /// identity when they are absent and the configuration allows it.
    pub fn from_headers(headers: &HeaderMap, config: &IdentityConfig) -> Result<Self, IdentityError> {
        let id = header_value(headers, USER_ID_HEADER)?;
        let email = header_value(headers, USER_EMAIL_HEADER)?;

        match (id, email) {
            (Some(id), Some(email)) => {
                let user_id = strip_issuer(id).ok_or(IdentityError::MalformedHeader {
                    header: USER_ID_HEADER,
                })?;
                let email = strip_issuer(email).ok_or(IdentityError::MalformedHeader {
                    header: USER_EMAIL_HEADER,
                })?;

                Ok(Self::from_parts(user_id, email))
            }
            _ if !config.require_proxy_headers => Ok(Self::development(config)),
            _ => Err(IdentityError::MissingHeaders),
        }
    }

    /// The fixed identity used when no proxy headers are present in
    /// development operation.
    pub fn development(config: &IdentityConfig) -> Self {
        Self::from_parts(&config.dev_user_id, &config.dev_email)
    }

    fn from_parts(user_id: &str, email: &str) -> Self {
        let display_name = email.split('@').next().unwrap_or(email);
        Self {
            user_id: user_id.to_owned(),
            email: email.to_owned(),
            display_name: display_name.to_owned(),
        }
    }
}

impl FromRequestParts<SharedState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Identity::from_headers(&parts.headers, state.config().identity())
            .map_err(|err| AppError::Unauthorized(err.to_string()))
    }
}

fn header_value<'h>(
    headers: &'h HeaderMap,
    name: &'static str,
) -> Result<Option<&'h str>, IdentityError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| IdentityError::MalformedHeader { header: name }),
    }
}

/// Extract the trusted value after the issuer prefix; empty values are
/// rejected so an owner id can never be blank.
fn strip_issuer(value: &str) -> Option<&str> {
    let (_, rest) = value.split_once(':')?;
    if rest.is_empty() { None } else { Some(rest) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(require: bool) -> IdentityConfig {
        IdentityConfig {
            require_proxy_headers: require,
            dev_user_id: "dev_user_001".into(),
            dev_email: "dev@example.com".into(),
        }
    }

    fn proxy_headers(id: &str, email: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(id).unwrap());
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_str(email).unwrap());
        headers
    }

    #[test]
    fn parses_proxy_headers() {
        let headers = proxy_headers(
            "accounts.google.com:108123456789",
            "accounts.google.com:alice@example.com",
        );
        let identity = Identity::from_headers(&headers, &config(true)).unwrap();
        assert_eq!(identity.user_id, "108123456789");
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.display_name, "alice");
    }

    #[test]
    fn missing_headers_fall_back_to_development_identity() {
        let identity = Identity::from_headers(&HeaderMap::new(), &config(false)).unwrap();
        assert_eq!(identity.user_id, "dev_user_001");
        assert_eq!(identity.email, "dev@example.com");
        assert_eq!(identity.display_name, "dev");
    }

    #[test]
    fn missing_headers_are_rejected_when_required() {
        assert_eq!(
            Identity::from_headers(&HeaderMap::new(), &config(true)),
            Err(IdentityError::MissingHeaders)
        );
    }

    #[test]
    fn partial_headers_fall_back_like_missing_ones() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_static("accounts.google.com:108123456789"),
        );
        let identity = Identity::from_headers(&headers, &config(false)).unwrap();
        assert_eq!(identity.user_id, "dev_user_001");
    }

    #[test]
    fn header_without_issuer_prefix_is_rejected() {
        let headers = proxy_headers("108123456789", "accounts.google.com:alice@example.com");
        assert_eq!(
            Identity::from_headers(&headers, &config(false)),
            Err(IdentityError::MalformedHeader {
                header: USER_ID_HEADER
            })
        );
    }

    #[test]
    fn empty_value_after_issuer_is_rejected() {
        let headers = proxy_headers(
            "accounts.google.com:",
            "accounts.google.com:alice@example.com",
        );
        assert_eq!(
            Identity::from_headers(&headers, &config(false)),
            Err(IdentityError::MalformedHeader {
                header: USER_ID_HEADER
            })
        );
    }
}
