use thiserror::Error;

use crate::sentence::SentenceKind;

pub type Result<T> = std::result::Result<T, NmeaError>;

#[derive(Debug, Error)]
pub enum NmeaError {
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("GPS receiver serial port not found")]
    PortNotFound,

    #[error("no line terminator within the first {0} bytes")]
    Unterminated(usize),

    #[error("field {index} exceeds {max} bytes")]
    FieldTooLong { index: usize, max: usize },

    #[error("sentence has more than {0} fields")]
    TooManyFields(usize),

    #[error("invalid byte in sentence: {0:#04x}")]
    InvalidByte(u8),

    #[error("unknown sentence identifier")]
    UnknownSentence,

    #[error("expected a {expected} sentence, got {found}")]
    UnexpectedSentence {
        expected: SentenceKind,
        found: SentenceKind,
    },

    #[error("sentence status is void (no fix)")]
    SentenceVoid,
}

impl NmeaError {
    /// Returns `true` for errors raised while splitting the line into fields.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            NmeaError::Unterminated(_)
                | NmeaError::FieldTooLong { .. }
                | NmeaError::TooManyFields(_)
                | NmeaError::InvalidByte(_)
        )
    }
}
