use std::fmt;

use crate::protocol::START;

/// Talker + sentence type codes.
pub mod code {
    /// GPS recommended minimum navigation data.
    pub const GPRMC: &str = "GPRMC";
    /// GPS course and speed over ground.
    pub const GPVTG: &str = "GPVTG";
}

/// A sentence type this crate knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SentenceKind {
    /// `$GPRMC`
    Rmc,
    /// `$GPVTG`
    Vtg,
}

impl SentenceKind {
    /// All known kinds, in dispatch order.
    pub const ALL: [SentenceKind; 2] = [SentenceKind::Vtg, SentenceKind::Rmc];

    /// The 5-character talker + type code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Rmc => code::GPRMC,
            Self::Vtg => code::GPVTG,
        }
    }

    /// Compare an identifier field against a talker + type code.
    ///
    /// The leading `$` is optional. The rest must equal `code` exactly, so
    /// `$GPVTGCA` does not match `GPVTG`.
    pub fn matches(identifier: &str, code: &str) -> bool {
        let start = char::from(START);
        identifier.strip_prefix(start).unwrap_or(identifier) == code
    }

    /// Identify the sentence from its identifier field (field 0).
    pub fn identify(identifier: &str) -> Option<SentenceKind> {
        Self::ALL
            .into_iter()
            .find(|kind| Self::matches(identifier, kind.code()))
    }
}

impl fmt::Display for SentenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_exact() {
        assert!(SentenceKind::matches("$GPVTG", code::GPVTG));
        assert!(SentenceKind::matches("$GPRMC", code::GPRMC));
    }

    #[test]
    fn test_matches_without_dollar() {
        assert!(SentenceKind::matches("GPVTG", code::GPVTG));
    }

    #[test]
    fn test_truncated_identifier() {
        assert!(!SentenceKind::matches("$GPV", code::GPVTG));
        assert!(!SentenceKind::matches("$", code::GPVTG));
        assert!(!SentenceKind::matches("", code::GPVTG));
    }

    #[test]
    fn test_no_prefix_match() {
        assert!(!SentenceKind::matches("$GPVTGCA", code::GPVTG));
    }

    #[test]
    fn test_other_sentence() {
        assert!(!SentenceKind::matches("$GPGSV", code::GPVTG));
        assert!(!SentenceKind::matches("$GNRMC", code::GPRMC));
        assert!(!SentenceKind::matches("$gprmc", code::GPRMC));
    }

    #[test]
    fn test_identify() {
        assert_eq!(SentenceKind::identify("$GPRMC"), Some(SentenceKind::Rmc));
        assert_eq!(SentenceKind::identify("$GPVTG"), Some(SentenceKind::Vtg));
        assert_eq!(SentenceKind::identify("$GPGGA"), None);
        assert_eq!(SentenceKind::identify("$$GPRMC"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SentenceKind::Rmc), "GPRMC");
        assert_eq!(SentenceKind::Vtg.to_string(), "GPVTG");
    }
}
