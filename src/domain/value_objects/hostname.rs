use std::fmt;

/// A normalized, syntactically valid DNS hostname claimed by a tenant.
///
/// Construction is the validation boundary: any `Hostname` in the system
/// has already been lowercased, stripped of scheme/whitespace/non-ASCII,
/// and checked against label rules, so downstream code can compare and
/// persist it without re-normalizing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hostname(String);

#[derive(Debug, thiserror::Error)]
pub enum HostnameError {
    #[error("Domain must be between 4 and 253 characters, got: {0}")]
    BadLength(String),

    #[error("Each part of the domain must be 63 characters or less: {0}")]
    LabelTooLong(String),

    #[error("Invalid domain format (example: mysite.com): {0}")]
    InvalidFormat(String),

    #[error("Cannot use {1} domains as custom domains: {0}")]
    PlatformDomain(String, String),
}

impl Hostname {
    /// Normalize raw user input and validate it as a claimable hostname.
    ///
    /// Rejects the platform's own apex domain and anything under it, so a
    /// customer can never claim the platform namespace through the custom
    /// domain flow.
    pub fn parse(input: &str, platform_domain: &str) -> Result<Self, HostnameError> {
        let normalized = normalize(input);

        Self::validate_syntax(&normalized)?;

        if normalized == platform_domain
            || normalized.ends_with(&format!(".{}", platform_domain))
        {
            return Err(HostnameError::PlatformDomain(
                normalized,
                platform_domain.to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Rehydrate a hostname that was normalized at claim time.
    /// Only the syntactic rules are re-checked; the platform-domain guard
    /// does not apply to platform-allocated subdomains already on disk.
    pub fn from_stored(value: String) -> Result<Self, HostnameError> {
        Self::validate_syntax(&value)?;
        Ok(Self(value))
    }

    /// Build the platform's own `<label>.<platform>` hostname for a free
    /// subdomain claim. The label is validated separately (`SubdomainLabel`).
    pub fn platform_subdomain(label: &str, platform_domain: &str) -> Result<Self, HostnameError> {
        let hostname = format!("{}.{}", label, platform_domain);
        Self::validate_syntax(&hostname)?;
        Ok(Self(hostname))
    }

    fn validate_syntax(hostname: &str) -> Result<(), HostnameError> {
        if hostname.len() < 4 || hostname.len() > 253 {
            return Err(HostnameError::BadLength(hostname.to_string()));
        }

        let labels: Vec<&str> = hostname.split('.').collect();
        if labels.len() < 2 {
            return Err(HostnameError::InvalidFormat(hostname.to_string()));
        }

        if labels.iter().any(|l| l.len() > 63) {
            return Err(HostnameError::LabelTooLong(hostname.to_string()));
        }

        // Final label is the TLD: alphabetic, at least two characters.
        let tld = labels[labels.len() - 1];
        if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(HostnameError::InvalidFormat(hostname.to_string()));
        }

        // Every other label: [a-z0-9] with interior hyphens only.
        for label in &labels[..labels.len() - 1] {
            if !is_valid_label(label) {
                return Err(HostnameError::InvalidFormat(hostname.to_string()));
            }
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A root domain has exactly two labels (`example.com`). Root domains
    /// are routed with an A record; deeper hostnames use a CNAME.
    pub fn is_root_domain(&self) -> bool {
        self.0.split('.').count() == 2
    }

    /// True when this hostname equals `other` or sits anywhere under it.
    pub fn is_same_or_subdomain_of(&self, other: &str) -> bool {
        self.0 == other || self.0.ends_with(&format!(".{}", other))
    }
}

fn normalize(input: &str) -> String {
    let mut s = input.trim().to_lowercase();

    if let Some(rest) = s.strip_prefix("https://") {
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix("http://") {
        s = rest.to_string();
    }

    if let Some(rest) = s.strip_suffix('/') {
        s = rest.to_string();
    }

    // Drop non-ASCII (defeats homoglyph spoofing of the brand) and any
    // whitespace the user pasted in.
    s.chars()
        .filter(|c| c.is_ascii() && !c.is_whitespace())
        .collect()
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    if !edge_ok(bytes[0]) || !edge_ok(bytes[bytes.len() - 1]) {
        return false;
    }

    label
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Hostname {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORM: &str = "linkhub.com";

    #[test]
    fn accepts_ordinary_domains() {
        assert!(Hostname::parse("mysite.com", PLATFORM).is_ok());
        assert!(Hostname::parse("sub.mysite.com", PLATFORM).is_ok());
        assert!(Hostname::parse("my-site.co.uk", PLATFORM).is_ok());
    }

    #[test]
    fn normalizes_scheme_case_and_whitespace() {
        let h = Hostname::parse("  HTTPS://MySite.COM/  ", PLATFORM).unwrap();
        assert_eq!(h.as_str(), "mysite.com");
    }

    #[test]
    fn strips_non_ascii_homoglyphs() {
        // Contains a Cyrillic 'а'; stripping it must not leave a
        // passable spoof of the brand.
        assert!(Hostname::parse("linkhаub.com", PLATFORM).is_err());
    }

    #[test]
    fn rejects_bad_formats() {
        assert!(Hostname::parse("nodots", PLATFORM).is_err());
        assert!(Hostname::parse("-bad.com", PLATFORM).is_err());
        assert!(Hostname::parse("bad-.com", PLATFORM).is_err());
        assert!(Hostname::parse("my_site.com", PLATFORM).is_err());
        assert!(Hostname::parse("mysite.c", PLATFORM).is_err());
        assert!(Hostname::parse("mysite.123", PLATFORM).is_err());
        assert!(Hostname::parse("a.b", PLATFORM).is_err()); // under 4 chars
    }

    #[test]
    fn rejects_overlong_labels() {
        let label = "a".repeat(64);
        assert!(matches!(
            Hostname::parse(&format!("{}.com", label), PLATFORM),
            Err(HostnameError::LabelTooLong(_))
        ));
    }

    #[test]
    fn rejects_platform_namespace() {
        assert!(matches!(
            Hostname::parse("linkhub.com", PLATFORM),
            Err(HostnameError::PlatformDomain(..))
        ));
        assert!(matches!(
            Hostname::parse("me.linkhub.com", PLATFORM),
            Err(HostnameError::PlatformDomain(..))
        ));
    }

    #[test]
    fn root_domain_means_exactly_two_labels() {
        assert!(Hostname::parse("mysite.com", PLATFORM).unwrap().is_root_domain());
        assert!(
            !Hostname::parse("sub.mysite.com", PLATFORM)
                .unwrap()
                .is_root_domain()
        );
    }

    #[test]
    fn platform_subdomain_skips_platform_guard() {
        let h = Hostname::platform_subdomain("alice", PLATFORM).unwrap();
        assert_eq!(h.as_str(), "alice.linkhub.com");
        assert!(h.is_same_or_subdomain_of(PLATFORM));
    }
}
