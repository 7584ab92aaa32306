//! Sitemap URL entry.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::SitemapError;

/// Absolute URI shape: letters-only scheme followed by `://`.
static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+://").expect("invalid location regex"));

/// Recommended `<priority>` values.
///
/// The protocol allows any decimal in `[0.0, 1.0]`; these are the eleven
/// literals in 0.1 steps.
pub mod priority {
    pub const MAX: &str = "1.0";
    pub const P09: &str = "0.9";
    pub const P08: &str = "0.8";
    pub const P07: &str = "0.7";
    pub const P06: &str = "0.6";
    pub const P05: &str = "0.5";
    pub const P04: &str = "0.4";
    pub const P03: &str = "0.3";
    pub const P02: &str = "0.2";
    pub const P01: &str = "0.1";
    pub const MIN: &str = "0.0";

    /// All recommended values, highest first.
    pub const ALL: [&str; 11] = [MAX, P09, P08, P07, P06, P05, P04, P03, P02, P01, MIN];

    /// Check whether `value` is one of the recommended literals.
    #[must_use]
    pub fn is_recommended(value: &str) -> bool {
        ALL.contains(&value)
    }
}

/// Recommended `<changefreq>` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// All variants in protocol order.
    pub const ALL: [Self; 7] = [
        Self::Always,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Never,
    ];

    /// Protocol string for this frequency.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|freq| freq.as_str() == s)
            .ok_or_else(|| format!("unknown change frequency: {s}"))
    }
}

impl From<ChangeFrequency> for String {
    fn from(freq: ChangeFrequency) -> Self {
        freq.as_str().to_owned()
    }
}

/// A page listed in a sitemap.
///
/// Only the location is validated, and only by [`Url::new`]. Change frequency
/// and priority accept any string; the recommended values are available as
/// [`ChangeFrequency`] and [`priority`] but are not enforced. Last modification
/// is an opaque string until the sitemap is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    location: String,
    change_frequency: Option<String>,
    priority: Option<String>,
    last_modified: Option<String>,
}

impl Url {
    /// Create an entry for `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::InvalidLocation`] if `location` does not start
    /// with a letters-only scheme followed by `://`.
    pub fn new(location: impl Into<String>) -> Result<Self, SitemapError> {
        let location = location.into();
        if !LOCATION_PATTERN.is_match(&location) {
            return Err(SitemapError::InvalidLocation(location));
        }
        Ok(Self {
            location,
            change_frequency: None,
            priority: None,
            last_modified: None,
        })
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Replace the location. Unlike [`Url::new`], the value is not validated.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    #[must_use]
    pub fn change_frequency(&self) -> Option<&str> {
        self.change_frequency.as_deref()
    }

    pub fn set_change_frequency(&mut self, value: impl Into<String>) {
        self.change_frequency = Some(value.into());
    }

    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    pub fn set_priority(&mut self, value: impl Into<String>) {
        self.priority = Some(value.into());
    }

    #[must_use]
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Set the last modification hint.
    ///
    /// Any string is accepted here; it is parsed when the sitemap is rendered.
    pub fn set_last_modified(&mut self, value: impl Into<String>) {
        self.last_modified = Some(value.into());
    }

    /// Builder-style [`Url::set_change_frequency`].
    #[must_use]
    pub fn with_change_frequency(mut self, value: impl Into<String>) -> Self {
        self.set_change_frequency(value);
        self
    }

    /// Builder-style [`Url::set_priority`].
    #[must_use]
    pub fn with_priority(mut self, value: impl Into<String>) -> Self {
        self.set_priority(value);
        self
    }

    /// Builder-style [`Url::set_last_modified`].
    #[must_use]
    pub fn with_last_modified(mut self, value: impl Into<String>) -> Self {
        self.set_last_modified(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_absolute_uris() {
        for loc in [
            "https://example.com/",
            "http://example.com/a?b=c&d=e",
            "ftp://files.example.com/pub",
            "HTTPS://EXAMPLE.COM",
            "custom://anything goes here",
        ] {
            let url = Url::new(loc).unwrap();
            assert_eq!(url.location(), loc);
        }
    }

    #[test]
    fn test_new_rejects_missing_scheme() {
        for loc in [
            "",
            "example.com",
            "/relative/path",
            "//example.com",
            "https:/example.com",
            "h2tp://example.com",
            " https://example.com",
            "mailto:user@example.com",
        ] {
            let err = Url::new(loc).unwrap_err();
            assert!(err.is_invalid_input(), "{loc:?} should be rejected");
            assert!(matches!(err, SitemapError::InvalidLocation(ref l) if l == loc));
        }
    }

    #[test]
    fn test_new_has_no_optional_fields() {
        let url = Url::new("https://example.com").unwrap();
        assert_eq!(url.change_frequency(), None);
        assert_eq!(url.priority(), None);
        assert_eq!(url.last_modified(), None);
    }

    #[test]
    fn test_set_location_skips_validation() {
        let mut url = Url::new("https://example.com").unwrap();
        url.set_location("not a url");
        assert_eq!(url.location(), "not a url");
    }

    #[test]
    fn test_accessors_store_any_string() {
        let mut url = Url::new("https://example.com").unwrap();
        url.set_change_frequency("fortnightly");
        url.set_priority("7");
        url.set_last_modified("last tuesday");

        assert_eq!(url.change_frequency(), Some("fortnightly"));
        assert_eq!(url.priority(), Some("7"));
        assert_eq!(url.last_modified(), Some("last tuesday"));
    }

    #[test]
    fn test_builder_methods() {
        let url = Url::new("https://example.com")
            .unwrap()
            .with_change_frequency(ChangeFrequency::Weekly)
            .with_priority(priority::P05)
            .with_last_modified("2024-01-15");

        assert_eq!(url.change_frequency(), Some("weekly"));
        assert_eq!(url.priority(), Some("0.5"));
        assert_eq!(url.last_modified(), Some("2024-01-15"));
    }

    #[test]
    fn test_change_frequency_strings() {
        let names: Vec<&str> = ChangeFrequency::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            ["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"]
        );
        for freq in ChangeFrequency::ALL {
            assert_eq!(freq.as_str().parse::<ChangeFrequency>(), Ok(freq));
            assert_eq!(freq.to_string(), freq.as_str());
        }
        assert!("Daily".parse::<ChangeFrequency>().is_err());
    }

    #[test]
    fn test_priority_constants() {
        assert_eq!(priority::ALL.first(), Some(&"1.0"));
        assert_eq!(priority::ALL.last(), Some(&"0.0"));
        assert!(priority::is_recommended("0.3"));
        assert!(!priority::is_recommended("0.35"));
        assert!(!priority::is_recommended("1"));
    }
}
