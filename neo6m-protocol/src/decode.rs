use log::{debug, trace};

use crate::error::{NmeaError, Result};
use crate::field;
use crate::protocol::FieldSet;
use crate::record::{RmcInfo, VtgInfo};
use crate::sentence::SentenceKind;

/// Status flag value for an active (valid) fix.
pub const STATUS_ACTIVE: char = 'A';

/// RMC field positions.
pub mod rmc_field {
    pub const TIME: usize = 1;
    pub const STATUS: usize = 2;
    pub const LATITUDE: usize = 3;
    pub const LAT_HEMISPHERE: usize = 4;
    pub const LONGITUDE: usize = 5;
    pub const LON_HEMISPHERE: usize = 6;
    pub const DATE: usize = 9;
}

/// VTG field positions.
pub mod vtg_field {
    pub const COURSE_TRUE: usize = 1;
    pub const SPEED_KNOTS: usize = 5;
    pub const SPEED_KPH: usize = 7;
    /// Mode indicator; carries the checksum suffix (`A*32`).
    pub const STATUS: usize = 9;
}

/// An output record filled from the fields of one sentence type.
pub trait SentenceRecord: Default {
    /// The sentence type this record is decoded from.
    const KIND: SentenceKind;

    /// Fill `self` from a tokenized sentence of type [`Self::KIND`].
    ///
    /// The record is reset to its default first. If the status field is not
    /// `A` the record stays zeroed and `NmeaError::SentenceVoid` is returned.
    /// Malformed individual fields become sentinel values and do not fail
    /// the sentence.
    fn assemble(&mut self, fields: &FieldSet) -> Result<()>;
}

fn is_active(status: &str) -> bool {
    status.starts_with(STATUS_ACTIVE)
}

impl SentenceRecord for RmcInfo {
    const KIND: SentenceKind = SentenceKind::Rmc;

    fn assemble(&mut self, fields: &FieldSet) -> Result<()> {
        *self = Self::default();

        if !is_active(fields.get(rmc_field::STATUS)) {
            debug!("RMC void, status {:?}", fields.get(rmc_field::STATUS));
            return Err(NmeaError::SentenceVoid);
        }

        self.time = field::decode_time(fields.get(rmc_field::TIME));
        self.date = field::decode_date(fields.get(rmc_field::DATE));
        self.latitude = field::decode_coordinate(
            fields.get(rmc_field::LATITUDE),
            fields.get(rmc_field::LAT_HEMISPHERE),
        );
        self.longitude = field::decode_coordinate(
            fields.get(rmc_field::LONGITUDE),
            fields.get(rmc_field::LON_HEMISPHERE),
        );
        Ok(())
    }
}

impl SentenceRecord for VtgInfo {
    const KIND: SentenceKind = SentenceKind::Vtg;

    fn assemble(&mut self, fields: &FieldSet) -> Result<()> {
        *self = Self::default();

        if !is_active(fields.get(vtg_field::STATUS)) {
            debug!("VTG void, status {:?}", fields.get(vtg_field::STATUS));
            return Err(NmeaError::SentenceVoid);
        }

        self.course = field::decode_number(fields.get(vtg_field::COURSE_TRUE));
        self.speed_knots = field::decode_number(fields.get(vtg_field::SPEED_KNOTS));
        self.speed_kph = field::decode_number(fields.get(vtg_field::SPEED_KPH));
        Ok(())
    }
}

/// Decode one NMEA line into a caller-chosen record.
///
/// The caller picks `R` to match the sentence it expects (`RmcInfo` for
/// `$GPRMC`, `VtgInfo` for `$GPVTG`).
///
/// - Tokenizer failure: `Err`, `out` untouched.
/// - Unknown identifier: `Err(UnknownSentence)`, `out` untouched.
/// - Known identifier of the other type: `Err(UnexpectedSentence)`, `out`
///   untouched.
/// - Void status: `Err(SentenceVoid)`, `out` reset to its default.
/// - Otherwise `Ok(())` with `out` fully populated.
pub fn decode<R: SentenceRecord>(line: impl AsRef<[u8]>, out: &mut R) -> Result<()> {
    let line = line.as_ref();
    trace!("decode: {:?}", String::from_utf8_lossy(line));

    let fields = FieldSet::parse(line)?;
    let found = identify(&fields)?;
    if found != R::KIND {
        return Err(NmeaError::UnexpectedSentence {
            expected: R::KIND,
            found,
        });
    }
    out.assemble(&fields)
}

fn identify(fields: &FieldSet) -> Result<SentenceKind> {
    SentenceKind::identify(fields.get(0)).ok_or_else(|| {
        debug!("unknown sentence identifier {:?}", fields.get(0));
        NmeaError::UnknownSentence
    })
}

/// A decoded sentence of either known type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Sentence {
    Rmc(RmcInfo),
    Vtg(VtgInfo),
}

impl Sentence {
    /// The sentence type.
    pub fn kind(&self) -> SentenceKind {
        match self {
            Self::Rmc(_) => SentenceKind::Rmc,
            Self::Vtg(_) => SentenceKind::Vtg,
        }
    }
}

/// Decode one NMEA line without knowing its type in advance.
///
/// Same failure rules as [`decode`]; a void sentence returns
/// `Err(SentenceVoid)`.
pub fn decode_any(line: impl AsRef<[u8]>) -> Result<Sentence> {
    let fields = FieldSet::parse(line.as_ref())?;
    match identify(&fields)? {
        SentenceKind::Rmc => {
            let mut rmc = RmcInfo::default();
            rmc.assemble(&fields)?;
            Ok(Sentence::Rmc(rmc))
        }
        SentenceKind::Vtg => {
            let mut vtg = VtgInfo::default();
            vtg.assemble(&fields)?;
            Ok(Sentence::Vtg(vtg))
        }
    }
}
