use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Redacts ClickUp credentials from text before it is logged or returned
/// in an error message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretScrubber;

struct Patterns {
    personal_token: Option<Regex>,
    bearer: Option<Regex>,
    secret_field: Option<Regex>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // ClickUp personal API tokens: pk_<user id>_<key>
        personal_token: Regex::new(r"pk_[0-9]+_[A-Za-z0-9]+").ok(),
        bearer: Regex::new(r"Bearer\s+[A-Za-z0-9\-_\.]+").ok(),
        secret_field: Regex::new(
            r#"(["']?(?:access_token|refresh_token|client_secret|token|secret|password)["']?\s*[:=]\s*)["']?[^"'\s,}&]+["']?"#,
        )
        .ok(),
    })
}

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub(&self, message: &str) -> String {
        let patterns = patterns();
        let mut scrubbed = message.to_string();

        if let Some(re) = &patterns.personal_token {
            scrubbed = re.replace_all(&scrubbed, "[API_TOKEN_REDACTED]").into_owned();
        }
        if let Some(re) = &patterns.bearer {
            scrubbed = re
                .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]")
                .into_owned();
        }
        if let Some(re) = &patterns.secret_field {
            scrubbed = re
                .replace_all(&scrubbed, |caps: &Captures| format!("{}[REDACTED]", &caps[1]))
                .into_owned();
        }
        scrubbed
    }
}
