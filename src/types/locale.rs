use std::{fmt, sync::Arc};

/// Urbanicity class of an area-type polygon, grouped from the NCES locale codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    City,       // 11–13
    Suburban,   // 21–23
    Town,       // 31–33
    Rural,      // 41–43
    Other(Arc<str>), // Anything else, as written
}

impl Locale {
    /// Group a numeric locale code by range membership.
    pub fn from_code(code: i64) -> Self {
        match code {
            11..=13 => Locale::City,
            21..=23 => Locale::Suburban,
            31..=33 => Locale::Town,
            41..=43 => Locale::Rural,
            other => Locale::Other(Arc::from(other.to_string())),
        }
    }

    /// Parse a locale code from text ("42" or "42.0"); anything else passes through verbatim.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(code) = raw.parse::<i64>() {
            return Self::from_code(code)
        }
        match raw.parse::<f64>() {
            Ok(code) if code.fract() == 0.0 && code.abs() < i64::MAX as f64 => Self::from_code(code as i64),
            _ => Locale::Other(Arc::from(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Locale::City => "City",
            Locale::Suburban => "Suburban",
            Locale::Town => "Town",
            Locale::Rural => "Rural",
            Locale::Other(code) => code,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
