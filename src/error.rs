use neo6m_protocol::NmeaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Nmea(#[from] NmeaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
