use std::collections::HashMap;

use crate::application::Identity;
use crate::domain::UserId;
use crate::infrastructure::config::AuthSettings;

/// Bearer-token authentication seam.
///
/// The production platform validates tokens against its auth provider;
/// this service only needs the boundary: a token maps to a stable
/// `(user_id, email)` identity that ownership checks trust. Tokens are
/// provisioned in the config file.
pub struct BearerAuth {
    tokens: HashMap<String, Identity>,
}

impl BearerAuth {
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let tokens = settings
            .tokens
            .iter()
            .map(|(token, id)| {
                (
                    token.clone(),
                    Identity {
                        user_id: UserId::new(id.user_id.clone()),
                        email: id.email.clone(),
                    },
                )
            })
            .collect();
        Self { tokens }
    }

    /// Resolve an `Authorization: Bearer <token>` header value.
    pub fn identify(&self, authorization: Option<&str>) -> Option<Identity> {
        let token = authorization?.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::TokenIdentity;

    fn auth() -> BearerAuth {
        let mut settings = AuthSettings::default();
        settings.tokens.insert(
            "secret".to_string(),
            TokenIdentity {
                user_id: "u1".to_string(),
                email: "u1@example.com".to_string(),
            },
        );
        BearerAuth::from_settings(&settings)
    }

    #[test]
    fn resolves_known_bearer_tokens() {
        let auth = auth();
        let identity = auth.identify(Some("Bearer secret")).unwrap();
        assert_eq!(identity.user_id, UserId::new("u1"));
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        let auth = auth();
        assert!(auth.identify(None).is_none());
        assert!(auth.identify(Some("secret")).is_none());
        assert!(auth.identify(Some("Bearer wrong")).is_none());
    }
}
