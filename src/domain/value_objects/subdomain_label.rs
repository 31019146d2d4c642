use std::fmt;

/// The single label a user picks for a free platform subdomain
/// (`<label>.linkhub.com`). Stricter than general hostname labels:
/// 3–30 characters, alphanumeric with interior hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubdomainLabel(String);

#[derive(Debug, thiserror::Error)]
pub enum SubdomainLabelError {
    #[error(
        "Subdomain must be 3-30 characters, alphanumeric with hyphens (not at start/end): {0}"
    )]
    InvalidLabel(String),
}

impl SubdomainLabel {
    pub fn parse(input: &str) -> Result<Self, SubdomainLabelError> {
        let label = input.trim().to_lowercase();

        let bytes = label.as_bytes();
        if bytes.len() < 3 || bytes.len() > 30 {
            return Err(SubdomainLabelError::InvalidLabel(label));
        }

        let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        if !edge_ok(bytes[0]) || !edge_ok(bytes[bytes.len() - 1]) {
            return Err(SubdomainLabelError::InvalidLabel(label));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SubdomainLabelError::InvalidLabel(label));
        }

        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubdomainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_labels() {
        assert!(SubdomainLabel::parse("alice").is_ok());
        assert!(SubdomainLabel::parse("my-band-99").is_ok());
        assert_eq!(SubdomainLabel::parse("  ALICE ").unwrap().as_str(), "alice");
    }

    #[test]
    fn rejects_length_and_edge_hyphens() {
        assert!(SubdomainLabel::parse("ab").is_err());
        assert!(SubdomainLabel::parse(&"a".repeat(31)).is_err());
        assert!(SubdomainLabel::parse("-abc").is_err());
        assert!(SubdomainLabel::parse("abc-").is_err());
        assert!(SubdomainLabel::parse("a.b.c").is_err());
        assert!(SubdomainLabel::parse("ab_c").is_err());
    }
}
