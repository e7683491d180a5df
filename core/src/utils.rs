//! Utility functions and types.

use std::fmt::Debug;

/// Redact hides sensitive values in `Debug` output.
///
/// - Empty values print as `EMPTY` so a missing field is still visible.
/// - Secrets print as `<redacted>` and reveal nothing.
/// - Identifiers (like access key ids) keep the first and last four
///   characters when they are at least 16 characters long, so different keys
///   can be told apart in logs.
pub struct Redact<'a> {
    value: &'a str,
    keep_edges: bool,
}

impl<'a> Redact<'a> {
    /// Redact a secret entirely.
    pub fn secret(value: &'a str) -> Self {
        Self {
            value,
            keep_edges: false,
        }
    }

    /// Redact an identifier, keeping its edges when it is long enough.
    pub fn identifier(value: &'a str) -> Self {
        Self {
            value,
            keep_edges: true,
        }
    }
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact::secret(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::secret(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact::secret(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.value.len();
        if length == 0 {
            return f.write_str("EMPTY");
        }
        if !self.keep_edges || length < 16 || !self.value.is_ascii() {
            return f.write_str("<redacted>");
        }

        f.write_str(&self.value[..4])?;
        f.write_str("***")?;
        f.write_str(&self.value[length - 4..])
    }
}
