use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace tag on every challenge value. Seeing this prefix in a stray
/// TXT record immediately identifies it as ours, which helps support
/// triage misconfigured zones.
pub const TOKEN_PREFIX: &str = "linkhub-verify-";

/// The DNS challenge value a tenant must publish to prove domain control.
///
/// Minted fresh for every connect; re-connecting the same domain replaces
/// the stored token, so a previously leaked one cannot be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn issue() -> Self {
        Self(format!("{}{}", TOKEN_PREFIX, Uuid::new_v4().as_simple()))
    }

    /// Rehydrate a token persisted by an earlier release. No format
    /// check: old tokens predate the current prefix scheme.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_prefixed_and_unique() {
        let a = VerificationToken::issue();
        let b = VerificationToken::issue();
        assert!(a.as_str().starts_with(TOKEN_PREFIX));
        assert_eq!(a.as_str().len(), TOKEN_PREFIX.len() + 32);
        assert_ne!(a, b);
    }
}
