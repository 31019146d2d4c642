use std::collections::BTreeSet;

/// Subdomain labels that can never be claimed as free subdomains:
/// operational names, auth/billing surfaces, brand terms, environment
/// names and generic content words that would confuse or endanger users.
const DEFAULT_RESERVED: &[&str] = &[
    // Infrastructure & DNS
    "www", "www1", "www2", "ns", "ns1", "ns2", "ns3", "ns4", "dns", "dns1", "dns2",
    "mx", "mx1", "mx2", "mx3", "mail", "mail1", "mail2", "smtp", "imap", "pop", "pop3",
    "webmail", "email", "ftp", "ftp1", "ftp2", "sftp", "ssh", "vpn", "proxy",
    // Admin & backend
    "admin", "administrator", "api", "api1", "api2", "app", "backend", "server",
    "cpanel", "whm", "panel", "plesk", "control", "manage", "manager",
    // Authentication & security
    "auth", "oauth", "login", "signup", "register", "logout", "sso", "saml",
    "account", "accounts", "user", "users", "profile", "profiles", "me",
    "password", "reset", "verify", "confirm", "secure", "security", "ssl",
    // Content & media
    "cdn", "cdn1", "cdn2", "cdn3", "static", "assets", "media", "images", "img",
    "files", "uploads", "download", "downloads", "video", "videos", "audio",
    // Business & payments
    "billing", "pay", "payment", "payments", "checkout", "stripe", "paypal",
    "invoice", "invoices", "subscription", "subscribe", "pricing", "price",
    // Brand
    "linkhub", "hub", "link", "links", "page", "pages", "smart", "smartlink",
    "smartlinks", "bio", "linktree", "about", "info", "contact",
    // Development & testing
    "test", "testing", "demo", "staging", "stage", "dev", "development",
    "prod", "production", "beta", "alpha", "preview", "sandbox", "local", "localhost",
    // Support & communication
    "help", "support", "docs", "documentation", "faq", "feedback", "tickets",
    "blog", "news", "updates", "changelog", "status", "uptime",
    // Common / reserved
    "home", "dashboard", "settings", "config", "configuration", "root", "system",
    "internal", "private", "public", "autodiscover", "autoconfig", "wpad",
    // Generic words that could cause confusion
    "music", "artist", "artists", "track", "tracks", "album", "albums", "spotify",
];

/// The reserved-name guard. Holds the curated label set plus the
/// numeric-suffix rule that catches `admin1`, `mail02`-style evasion.
///
/// Built from configuration at startup so operators can extend the list
/// without touching verification logic.
#[derive(Debug, Clone)]
pub struct ReservedNames {
    names: BTreeSet<String>,
}

impl ReservedNames {
    /// The curated default list, optionally extended with extra names
    /// from the config file.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: BTreeSet<String> =
            DEFAULT_RESERVED.iter().map(|s| s.to_string()).collect();
        names.extend(extra.into_iter().map(|s| s.into().to_lowercase()));
        Self { names }
    }

    /// True if the label is reserved, either exactly or once a trailing
    /// digit run is stripped (`cdn42` is reserved because `cdn` is).
    pub fn is_reserved(&self, label: &str) -> bool {
        let normalized = label.to_lowercase();

        if self.names.contains(&normalized) {
            return true;
        }

        let base = normalized.trim_end_matches(|c: char| c.is_ascii_digit());
        base.len() < normalized.len() && self.names.contains(base)
    }
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self::with_extra(std::iter::empty::<String>())
    }
}
