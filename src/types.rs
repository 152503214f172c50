use std::fmt;

use crate::error::{EdfError, Result};
use crate::{BDF_SAMPLE_BYTES, BDF_VERSION, EDF_SAMPLE_BYTES, EDF_VERSION};

/// Fields of the fixed 256-byte header prologue, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedField {
    Version,
    PatientId,
    RecordingId,
    StartDate,
    StartTime,
    HeaderBytes,
    Reserved,
    RecordCount,
    RecordDuration,
    SignalCount,
}

impl FixedField {
    /// All fixed fields in canonical order
    pub const ALL: [FixedField; 10] = [
        FixedField::Version,
        FixedField::PatientId,
        FixedField::RecordingId,
        FixedField::StartDate,
        FixedField::StartTime,
        FixedField::HeaderBytes,
        FixedField::Reserved,
        FixedField::RecordCount,
        FixedField::RecordDuration,
        FixedField::SignalCount,
    ];

    /// Width of the field in bytes
    pub const fn width(self) -> usize {
        match self {
            FixedField::Version => 8,
            FixedField::PatientId => 80,
            FixedField::RecordingId => 80,
            FixedField::StartDate => 8,
            FixedField::StartTime => 8,
            FixedField::HeaderBytes => 8,
            FixedField::Reserved => 44,
            FixedField::RecordCount => 8,
            FixedField::RecordDuration => 8,
            FixedField::SignalCount => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FixedField::Version => "version",
            FixedField::PatientId => "local-patient-id",
            FixedField::RecordingId => "local-recording-id",
            FixedField::StartDate => "start-date",
            FixedField::StartTime => "start-time",
            FixedField::HeaderBytes => "header-byte-count",
            FixedField::Reserved => "reserved",
            FixedField::RecordCount => "data-record-count",
            FixedField::RecordDuration => "record-duration",
            FixedField::SignalCount => "signal-count",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FixedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-channel field groups of the variable header section, in on-disk order.
///
/// Each group holds `ns` entries of [`SignalField::width`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalField {
    Label,
    TransducerType,
    PhysicalDimension,
    PhysicalMin,
    PhysicalMax,
    DigitalMin,
    DigitalMax,
    Prefilter,
    SamplesPerRecord,
    Reserved,
}

impl SignalField {
    /// All signal field groups in canonical order
    pub const ALL: [SignalField; 10] = [
        SignalField::Label,
        SignalField::TransducerType,
        SignalField::PhysicalDimension,
        SignalField::PhysicalMin,
        SignalField::PhysicalMax,
        SignalField::DigitalMin,
        SignalField::DigitalMax,
        SignalField::Prefilter,
        SignalField::SamplesPerRecord,
        SignalField::Reserved,
    ];

    /// Width of one channel's entry in bytes
    pub const fn width(self) -> usize {
        match self {
            SignalField::Label => 16,
            SignalField::TransducerType => 80,
            SignalField::PhysicalDimension => 8,
            SignalField::PhysicalMin => 8,
            SignalField::PhysicalMax => 8,
            SignalField::DigitalMin => 8,
            SignalField::DigitalMax => 8,
            SignalField::Prefilter => 80,
            SignalField::SamplesPerRecord => 8,
            SignalField::Reserved => 32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SignalField::Label => "label",
            SignalField::TransducerType => "transducer-type",
            SignalField::PhysicalDimension => "physical-dimension",
            SignalField::PhysicalMin => "physical-min",
            SignalField::PhysicalMax => "physical-max",
            SignalField::DigitalMin => "digital-min",
            SignalField::DigitalMax => "digital-max",
            SignalField::Prefilter => "prefilter",
            SignalField::SamplesPerRecord => "samples-per-record",
            SignalField::Reserved => "per-channel-reserved",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SignalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key of an offset table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Fixed(FixedField),
    Signal(SignalField),
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::Fixed(f) => f.name(),
            Field::Signal(f) => f.name(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where in the header an ASCII value lives, carried by errors for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// A free-standing value not yet bound to a header field
    Unbound,
    Fixed(FixedField),
    Signal { field: SignalField, channel: usize },
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLocation::Unbound => f.write_str("ascii field"),
            FieldLocation::Fixed(field) => f.write_str(field.name()),
            FieldLocation::Signal { field, channel } => write!(f, "{}[{}]", field.name(), channel),
        }
    }
}

/// The two on-disk variants, told apart by the version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// 16-bit European Data Format
    #[default]
    Edf,
    /// 24-bit BioSemi Data Format
    Bdf,
}

impl Format {
    /// The 8-byte version tag written at offset 0
    pub const fn tag(self) -> [u8; 8] {
        match self {
            Format::Edf => EDF_VERSION,
            Format::Bdf => BDF_VERSION,
        }
    }

    /// Detects the format from a version field, `None` for unknown tags
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        if tag == EDF_VERSION {
            Some(Format::Edf)
        } else if tag == BDF_VERSION {
            Some(Format::Bdf)
        } else {
            None
        }
    }

    /// Sample width used by channels without a width hint
    pub const fn default_width(self) -> SampleWidth {
        match self {
            Format::Edf => SampleWidth::Two,
            Format::Bdf => SampleWidth::Three,
        }
    }
}

/// Bytes per sample of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleWidth {
    /// little-endian i16
    Two,
    /// little-endian 24-bit two's complement
    Three,
}

impl SampleWidth {
    pub const fn bytes(self) -> usize {
        match self {
            SampleWidth::Two => EDF_SAMPLE_BYTES,
            SampleWidth::Three => BDF_SAMPLE_BYTES,
        }
    }

    /// Smallest value representable at this width
    pub const fn min_value(self) -> i32 {
        match self {
            SampleWidth::Two => i16::MIN as i32,
            SampleWidth::Three => -(1 << 23),
        }
    }

    /// Largest value representable at this width
    pub const fn max_value(self) -> i32 {
        match self {
            SampleWidth::Two => i16::MAX as i32,
            SampleWidth::Three => (1 << 23) - 1,
        }
    }

    pub fn from_bytes(bytes: usize) -> Result<Self> {
        match bytes {
            EDF_SAMPLE_BYTES => Ok(SampleWidth::Two),
            BDF_SAMPLE_BYTES => Ok(SampleWidth::Three),
            other => Err(EdfError::UnsupportedByteWidth(other)),
        }
    }
}

impl TryFrom<usize> for SampleWidth {
    type Error = EdfError;

    fn try_from(bytes: usize) -> Result<Self> {
        SampleWidth::from_bytes(bytes)
    }
}

/// Named assignments for every header field, consumed by [`Header::from_options`].
///
/// Empty strings and missing trailing channel entries are written as blanks
/// (space-filled). `header_bytes` is always recomputed; a blank `signal_count`
/// is inferred from the longest channel group.
///
/// ```rust
/// use edfcodec::{Format, Header, HeaderOptions};
///
/// let header = Header::from_options(HeaderOptions {
///     version: Format::Bdf,
///     signal_count: "2".to_string(),
///     record_count: "1".to_string(),
///     labels: vec!["Fp1".to_string(), "Fp2".to_string()],
///     samples_per_record: vec!["256".to_string(), "256".to_string()],
///     ..Default::default()
/// })?;
///
/// assert_eq!(header.signal_count()?, 2);
/// assert_eq!(header.header_bytes()?, 256 * 3);
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
///
/// [`Header::from_options`]: crate::Header::from_options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderOptions {
    pub version: Format,
    pub patient_id: String,
    pub recording_id: String,
    /// dd.mm.yy
    pub start_date: String,
    /// hh.mm.ss
    pub start_time: String,
    /// Ignored, always recomputed from ns
    pub header_bytes: String,
    pub reserved: String,
    /// "-1" when unknown
    pub record_count: String,
    pub record_duration: String,
    pub signal_count: String,

    pub labels: Vec<String>,
    pub transducer_types: Vec<String>,
    pub physical_dimensions: Vec<String>,
    pub physical_mins: Vec<String>,
    pub physical_maxs: Vec<String>,
    pub digital_mins: Vec<String>,
    pub digital_maxs: Vec<String>,
    pub prefilters: Vec<String>,
    pub samples_per_record: Vec<String>,
    /// Doubles as the per-channel byte-width hint ("2" or "3")
    pub signal_reserved: Vec<String>,
}

impl HeaderOptions {
    /// Value assigned to a fixed field
    pub(crate) fn fixed(&self, field: FixedField) -> &str {
        match field {
            FixedField::Version => "",
            FixedField::PatientId => &self.patient_id,
            FixedField::RecordingId => &self.recording_id,
            FixedField::StartDate => &self.start_date,
            FixedField::StartTime => &self.start_time,
            FixedField::HeaderBytes => &self.header_bytes,
            FixedField::Reserved => &self.reserved,
            FixedField::RecordCount => &self.record_count,
            FixedField::RecordDuration => &self.record_duration,
            FixedField::SignalCount => &self.signal_count,
        }
    }

    /// Values assigned to one channel group
    pub(crate) fn group(&self, field: SignalField) -> &[String] {
        match field {
            SignalField::Label => &self.labels,
            SignalField::TransducerType => &self.transducer_types,
            SignalField::PhysicalDimension => &self.physical_dimensions,
            SignalField::PhysicalMin => &self.physical_mins,
            SignalField::PhysicalMax => &self.physical_maxs,
            SignalField::DigitalMin => &self.digital_mins,
            SignalField::DigitalMax => &self.digital_maxs,
            SignalField::Prefilter => &self.prefilters,
            SignalField::SamplesPerRecord => &self.samples_per_record,
            SignalField::Reserved => &self.signal_reserved,
        }
    }

    /// Longest channel group, used when no signal count is given
    pub(crate) fn inferred_signal_count(&self) -> usize {
        SignalField::ALL
            .iter()
            .map(|&field| self.group(field).len())
            .max()
            .unwrap_or(0)
    }
}
