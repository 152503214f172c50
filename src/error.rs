use thiserror::Error;

use crate::types::{FieldLocation, SignalField};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdfError {
    #[error("Non-printable byte 0x{byte:02X} at offset {position} in {location}")]
    NonPrintableCharacter {
        location: FieldLocation,
        byte: u8,
        position: usize,
    },

    #[error("Value of {len} bytes does not fit the {width}-byte field {location}")]
    FieldOverflow {
        location: FieldLocation,
        width: usize,
        len: usize,
    },

    #[error("{location} does not hold an integer: {text:?}")]
    MalformedInteger { location: FieldLocation, text: String },

    #[error("{location} does not hold a number: {text:?}")]
    MalformedNumber { location: FieldLocation, text: String },

    #[error("Invalid start date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid start time: {0:?}")]
    InvalidTime(String),

    #[error("Invalid number of signals: {0}")]
    InvalidSignalCount(i64),

    #[error("Invalid number of data records: {0}")]
    InvalidRecordCount(i64),

    #[error("Channel {channel} out of range, signal count is {ns}")]
    ChannelOutOfRange { channel: usize, ns: usize },

    #[error("Header declares {declared} bytes but its layout needs {computed}")]
    HeaderSizeMismatch { declared: i64, computed: usize },

    #[error("Header needs {expected} bytes, buffer holds {found}")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("Channel {channel} needs {needed} bytes, only {remaining} remain")]
    TruncatedRecord {
        channel: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("{remaining} bytes left over after decoding a data record")]
    UnconsumedBytes { remaining: usize },

    #[error("{remaining} bytes left over after the last data record")]
    TrailingBytes { remaining: usize },

    #[error("Header declares {declared} data records, found {found}")]
    RecordCountMismatch { declared: i64, found: usize },

    #[error("Unsupported sample byte width: {0}")]
    UnsupportedByteWidth(usize),

    #[error("Sample {value} does not fit in {width} bytes")]
    SampleOutOfRange { value: i32, width: usize },

    #[error("{field} holds {found} entries, signal count is {expected}")]
    SignalArrayLength {
        field: SignalField,
        expected: usize,
        found: usize,
    },

    #[error("Data record {record} holds {found} channels, signal count is {expected}")]
    ChannelCountMismatch {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("Data record {record} channel {channel}: {found} samples, header declares {expected}")]
    SampleCountMismatch {
        record: usize,
        channel: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown version tag: {0:?}")]
    UnknownVersion(String),
}

impl EdfError {
    /// Binds an error raised by the free-standing ASCII codec to a header field
    pub(crate) fn at(self, location: FieldLocation) -> Self {
        match self {
            EdfError::NonPrintableCharacter { byte, position, .. } => {
                EdfError::NonPrintableCharacter { location, byte, position }
            }
            EdfError::FieldOverflow { width, len, .. } => {
                EdfError::FieldOverflow { location, width, len }
            }
            EdfError::MalformedInteger { text, .. } => {
                EdfError::MalformedInteger { location, text }
            }
            EdfError::MalformedNumber { text, .. } => EdfError::MalformedNumber { location, text },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, EdfError>;
