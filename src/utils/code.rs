use std::fmt;

use serde::Serialize;

/// Strip everything outside `[A-Za-z0-9]` and upper-case the rest.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// A redemption code in normalized form.
///
/// Two raw inputs that normalize to the same string are the same code. An empty
/// normalized form is never a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    /// Normalize `raw`, returning `None` when nothing alphanumeric is left.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_code(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
