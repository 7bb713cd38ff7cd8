use log::trace;

use crate::error::{NmeaError, Result};

/// Sentence start delimiter.
pub const START: u8 = b'$';
/// Field separator.
pub const SEPARATOR: u8 = b',';
/// Line terminator.
pub const LF: u8 = b'\n';
/// Optional carriage return before the line terminator.
pub const CR: u8 = b'\r';

/// Maximum number of bytes scanned for a terminator, terminator included.
pub const MAX_LINE_LEN: usize = 100;
/// Maximum number of fields in one sentence.
pub const MAX_FIELDS: usize = 20;
/// Maximum length of a single field in bytes.
pub const MAX_FIELD_LEN: usize = 15;

/// The comma-separated fields of one NMEA sentence.
///
/// Line wire format: `$<talker><type>,<f1>,<f2>,...,<fn>[*CC]\r\n`
///
/// Storage is a fixed `MAX_FIELDS` x `MAX_FIELD_LEN` table held inline, so a
/// `FieldSet` lives on the caller's stack for the duration of one decode.
/// The checksum suffix is not split off; it stays attached to the last field.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldSet {
    table: [[u8; MAX_FIELD_LEN]; MAX_FIELDS],
    lens: [u8; MAX_FIELDS],
    count: usize,
}

impl FieldSet {
    fn empty() -> Self {
        Self {
            table: [[0; MAX_FIELD_LEN]; MAX_FIELDS],
            lens: [0; MAX_FIELDS],
            count: 1,
        }
    }

    /// Split one raw line into its fields.
    ///
    /// The line must reach `\n` (optionally preceded by `\r`) within
    /// `MAX_LINE_LEN` bytes. Anything after the terminator is ignored.
    /// Returns `Err` without a partial table when the terminator is missing,
    /// a field or the field count exceeds its cap, or a non-printable byte
    /// appears in the body.
    pub fn parse(line: &[u8]) -> Result<FieldSet> {
        let mut fields = FieldSet::empty();
        let window = &line[..line.len().min(MAX_LINE_LEN)];

        for (pos, &byte) in window.iter().enumerate() {
            match byte {
                LF => {
                    trace!("tokenized {} fields: {:?}", fields.count, fields);
                    return Ok(fields);
                }
                CR if line.get(pos + 1) == Some(&LF) => {}
                SEPARATOR => {
                    if fields.count == MAX_FIELDS {
                        return Err(NmeaError::TooManyFields(MAX_FIELDS));
                    }
                    fields.count += 1;
                }
                b' '..=b'~' => fields.push_byte(byte)?,
                other => return Err(NmeaError::InvalidByte(other)),
            }
        }

        Err(NmeaError::Unterminated(MAX_LINE_LEN))
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        let row = self.count - 1;
        let len = self.lens[row] as usize;
        if len == MAX_FIELD_LEN {
            return Err(NmeaError::FieldTooLong {
                index: row,
                max: MAX_FIELD_LEN,
            });
        }
        self.table[row][len] = byte;
        self.lens[row] += 1;
        Ok(())
    }

    /// Number of fields, including the identifier field.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Always `false`: a parsed line has at least the identifier field.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Field at `index`, or the empty string past the last field.
    pub fn get(&self, index: usize) -> &str {
        if index >= self.count {
            return "";
        }
        let bytes = &self.table[index][..self.lens[index] as usize];
        // Only printable ASCII is ever stored.
        std::str::from_utf8(bytes).unwrap_or("")
    }

    /// Iterate over the fields in source order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        (0..self.count).map(move |i| self.get(i))
    }
}

impl std::fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
