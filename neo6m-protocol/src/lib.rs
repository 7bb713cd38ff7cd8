//! Decoder for the NMEA-0183 `$GPRMC` and `$GPVTG` sentences emitted by
//! NEO-6M class GPS receivers.
//!
//! ```
//! use neo6m_protocol::{decode, RmcInfo};
//!
//! let mut rmc = RmcInfo::default();
//! decode(
//!     "$GPRMC,142754.00,A,1048.17086,N,10639.46105,E,0.034,,210923,,,A*73\r\n",
//!     &mut rmc,
//! )
//! .unwrap();
//! assert_eq!(rmc.time.hour, 14);
//! assert_eq!(rmc.longitude.degrees, 106);
//! ```

pub mod decode;
pub mod error;
pub mod field;
pub mod protocol;
pub mod record;
pub mod sentence;
#[cfg(feature = "serial")]
pub mod serial;

pub use decode::{Sentence, SentenceRecord, decode, decode_any};
pub use error::{NmeaError, Result};
pub use protocol::FieldSet;
pub use record::{Coordinate, Date, Hemisphere, RmcInfo, Time, VtgInfo};
pub use sentence::SentenceKind;
