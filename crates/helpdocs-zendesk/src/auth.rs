//! Authenticated request parameters for the Help Center API.
//!
//! Every request carries exactly one authentication method, chosen by
//! precedence: OAuth bearer token, then username/password, then
//! `{username}/token` with the API token.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use helpdocs_config::ZendeskConfig;

use crate::error::ZendeskError;

/// Authentication attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// OAuth access token sent as `Authorization: Bearer`.
    Bearer(String),
    /// HTTP basic authentication.
    Basic {
        /// Basic auth user (email, or `email/token` for API tokens).
        username: String,
        /// Password or API token.
        password: String,
    },
}

impl Auth {
    /// Select the authentication method from configuration.
    ///
    /// Empty strings count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::Config`] if no credential is configured.
    pub fn from_config(config: &ZendeskConfig) -> Result<Self, ZendeskError> {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        if let Some(token) = present(&config.oauth_token) {
            return Ok(Self::Bearer(token));
        }
        if let Some(password) = present(&config.password) {
            return Ok(Self::Basic {
                username: config.username.clone(),
                password,
            });
        }
        if let Some(token) = present(&config.token) {
            return Ok(Self::Basic {
                username: format!("{}/token", config.username),
                password: token,
            });
        }
        Err(ZendeskError::Config(
            "no oauth_token, password or token configured".to_owned(),
        ))
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Bearer(token) => format!("Bearer {token}"),
            Self::Basic { username, password } => {
                let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
        }
    }
}

/// Parameters for one physical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// Absolute request URL.
    pub url: String,
    /// Authentication to attach.
    pub auth: Auth,
}

/// Builds absolute, authenticated request parameters from relative endpoints.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    auth: Auth,
}

impl RequestBuilder {
    /// Create a builder for `base_url` (e.g. `https://acme.zendesk.com/api/v2/help_center`).
    #[must_use]
    pub fn new(base_url: &str, auth: Auth) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
        }
    }

    /// Create a builder from the `[zendesk]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::Config`] if no credential is configured.
    pub fn from_config(config: &ZendeskConfig) -> Result<Self, ZendeskError> {
        Ok(Self::new(&config.api_base_url(), Auth::from_config(config)?))
    }

    /// Build request parameters for an endpoint such as `/articles/1.json`.
    #[must_use]
    pub fn build(&self, endpoint: &str) -> RequestParams {
        RequestParams {
            url: format!("{}{endpoint}", self.base_url),
            auth: self.auth.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ZendeskConfig {
        ZendeskConfig {
            url: "https://acme.zendesk.com".to_owned(),
            username: "docs@acme.com".to_owned(),
            password: None,
            token: None,
            oauth_token: None,
            locale: "en-us".to_owned(),
        }
    }

    #[test]
    fn test_oauth_takes_precedence_over_password() {
        let config = ZendeskConfig {
            oauth_token: Some("oauth".to_owned()),
            password: Some("secret".to_owned()),
            token: Some("api".to_owned()),
            ..config()
        };
        assert_eq!(
            Auth::from_config(&config).unwrap(),
            Auth::Bearer("oauth".to_owned())
        );
    }

    #[test]
    fn test_password_takes_precedence_over_token() {
        let config = ZendeskConfig {
            password: Some("secret".to_owned()),
            token: Some("api".to_owned()),
            ..config()
        };
        assert_eq!(
            Auth::from_config(&config).unwrap(),
            Auth::Basic {
                username: "docs@acme.com".to_owned(),
                password: "secret".to_owned(),
            }
        );
    }

    #[test]
    fn test_token_uses_username_token_suffix() {
        let config = ZendeskConfig {
            token: Some("api".to_owned()),
            ..config()
        };
        assert_eq!(
            Auth::from_config(&config).unwrap(),
            Auth::Basic {
                username: "docs@acme.com/token".to_owned(),
                password: "api".to_owned(),
            }
        );
    }

    #[test]
    fn test_empty_oauth_token_falls_through() {
        let config = ZendeskConfig {
            oauth_token: Some(String::new()),
            token: Some("api".to_owned()),
            ..config()
        };
        assert!(matches!(
            Auth::from_config(&config).unwrap(),
            Auth::Basic { .. }
        ));
    }

    #[test]
    fn test_no_credentials_is_config_error() {
        let err = Auth::from_config(&config()).unwrap_err();
        assert!(matches!(err, ZendeskError::Config(_)));
    }

    #[test]
    fn test_header_values() {
        assert_eq!(Auth::Bearer("abc".to_owned()).header_value(), "Bearer abc");
        let basic = Auth::Basic {
            username: "user".to_owned(),
            password: "pass".to_owned(),
        };
        assert_eq!(basic.header_value(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_build_joins_base_url_and_endpoint() {
        let builder = RequestBuilder::new(
            "https://acme.zendesk.com/api/v2/help_center/",
            Auth::Bearer("abc".to_owned()),
        );
        let params = builder.build("/articles/42/attachments.json");
        assert_eq!(
            params.url,
            "https://acme.zendesk.com/api/v2/help_center/articles/42/attachments.json"
        );
        assert_eq!(params.auth, Auth::Bearer("abc".to_owned()));
    }

    #[test]
    fn test_from_config_uses_help_center_base() {
        let config = ZendeskConfig {
            oauth_token: Some("abc".to_owned()),
            ..config()
        };
        let params = RequestBuilder::from_config(&config)
            .unwrap()
            .build("/categories.json");
        assert_eq!(
            params.url,
            "https://acme.zendesk.com/api/v2/help_center/categories.json"
        );
    }
}
