use chrono::{NaiveDate, NaiveTime};

use crate::error::{EdfError, Result};
use crate::layout::total_header_bytes;
use crate::record::{ChannelLayout, RecordLayout};
use crate::types::{FieldLocation, FixedField, Format, HeaderOptions, SampleWidth, SignalField};
use crate::utils::{pack, unpack_int, unpack_number, unpack_str};

/// EDF/BDF header: the fixed prologue plus ten per-channel field groups.
///
/// Fields are kept as their raw fixed-width bytes so that a decoded header
/// encodes back byte for byte. Typed accessors parse on demand; text
/// accessors trim the trailing padding.
///
/// ```rust
/// use edfcodec::{Header, HeaderOptions, SampleWidth};
///
/// let header = Header::from_options(HeaderOptions {
///     patient_id: "X X X X".to_string(),
///     start_date: "13.02.26".to_string(),
///     start_time: "17.30.00".to_string(),
///     record_count: "-1".to_string(),
///     record_duration: "0.5".to_string(),
///     labels: vec!["EEG Fpz-Cz".to_string()],
///     samples_per_record: vec!["100".to_string()],
///     ..Default::default()
/// })?;
///
/// assert_eq!(header.signal_count()?, 1);
/// assert_eq!(header.record_count()?, None);
/// assert_eq!(header.record_duration()?, 0.5);
/// assert_eq!(header.label(0).as_deref(), Some("EEG Fpz-Cz"));
/// assert_eq!(header.sample_width(0)?, SampleWidth::Two);
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    fixed: [Vec<u8>; 10],
    signals: [Vec<Vec<u8>>; 10],
}

impl Default for Header {
    fn default() -> Self {
        Self::blank()
    }
}

impl Header {
    /// A header whose fixed fields are all blank and whose channel groups are empty
    pub fn blank() -> Self {
        Self {
            fixed: std::array::from_fn(|i| vec![b' '; FixedField::ALL[i].width()]),
            signals: Default::default(),
        }
    }

    /// Builds a header from named field assignments.
    ///
    /// Validation runs once over all fields; `header-byte-count` is
    /// overwritten with the size computed for the resulting signal count.
    pub fn from_options(options: HeaderOptions) -> Result<Self> {
        let mut header = Self::blank();
        header.set_format(options.version);

        for field in FixedField::ALL {
            if matches!(
                field,
                FixedField::Version | FixedField::HeaderBytes | FixedField::SignalCount
            ) {
                continue;
            }
            header.set_fixed(field, options.fixed(field))?;
        }

        let ns = if options.signal_count.trim().is_empty() {
            options.inferred_signal_count()
        } else {
            parse_signal_count(options.signal_count.as_bytes())?
        };
        header.put_fixed(FixedField::SignalCount, &ns.to_string())?;

        for field in SignalField::ALL {
            let values = options.group(field);
            if values.is_empty() {
                continue;
            }
            if values.len() > ns {
                return Err(EdfError::SignalArrayLength {
                    field,
                    expected: ns,
                    found: values.len(),
                });
            }

            let mut entries = Vec::with_capacity(ns);
            for (channel, value) in values.iter().enumerate() {
                entries.push(
                    pack(value, field.width())
                        .map_err(|e| e.at(FieldLocation::Signal { field, channel }))?,
                );
            }
            entries.resize(ns, vec![b' '; field.width()]);
            header.signals[field.index()] = entries;
        }

        header.allocate(ns);
        header.refresh_header_bytes()?;
        Ok(header)
    }

    pub(crate) fn from_parts(fixed: [Vec<u8>; 10], signals: [Vec<Vec<u8>>; 10]) -> Self {
        Self { fixed, signals }
    }

    /// Space-fills every channel group that is still empty to `ns` entries.
    ///
    /// Groups that already hold entries are left alone, so calling this on a
    /// populated header is a no-op.
    pub fn allocate(&mut self, ns: usize) {
        for field in SignalField::ALL {
            let group = &mut self.signals[field.index()];
            if group.is_empty() {
                *group = vec![vec![b' '; field.width()]; ns];
            }
        }
    }

    /// Writes the version tag of `format`
    pub fn set_format(&mut self, format: Format) {
        self.fixed[FixedField::Version.index()] = format.tag().to_vec();
    }

    /// Assigns a fixed field.
    ///
    /// Changing the signal count recomputes `header-byte-count`. On error the
    /// header is left unchanged.
    pub fn set_fixed(&mut self, field: FixedField, value: &str) -> Result<()> {
        let packed = pack(value, field.width()).map_err(|e| e.at(FieldLocation::Fixed(field)))?;
        if field == FixedField::SignalCount {
            let ns = parse_signal_count(&packed)?;
            self.put_fixed(FixedField::HeaderBytes, &total_header_bytes(ns).to_string())?;
        }
        self.fixed[field.index()] = packed;
        Ok(())
    }

    fn put_fixed(&mut self, field: FixedField, value: &str) -> Result<()> {
        self.fixed[field.index()] =
            pack(value, field.width()).map_err(|e| e.at(FieldLocation::Fixed(field)))?;
        Ok(())
    }

    /// Assigns one channel's entry of a signal field group
    pub fn set_signal(&mut self, field: SignalField, channel: usize, value: &str) -> Result<()> {
        let ns = self.signals[field.index()].len();
        let packed = pack(value, field.width())
            .map_err(|e| e.at(FieldLocation::Signal { field, channel }))?;

        let entry = self.signals[field.index()]
            .get_mut(channel)
            .ok_or(EdfError::ChannelOutOfRange { channel, ns })?;
        *entry = packed;
        Ok(())
    }

    /// Rewrites `header-byte-count` from the current signal count
    pub(crate) fn refresh_header_bytes(&mut self) -> Result<()> {
        let ns = self.signal_count()?;
        self.put_fixed(FixedField::HeaderBytes, &total_header_bytes(ns).to_string())
    }

    /// Checks the structural invariants encoding relies on:
    /// every channel group holds ns entries of the right width and the
    /// declared header size matches the layout.
    pub fn validate(&self) -> Result<()> {
        let ns = self.signal_count()?;

        for field in SignalField::ALL {
            let group = &self.signals[field.index()];
            if group.len() != ns {
                return Err(EdfError::SignalArrayLength {
                    field,
                    expected: ns,
                    found: group.len(),
                });
            }
            if let Some((channel, entry)) = group
                .iter()
                .enumerate()
                .find(|(_, entry)| entry.len() != field.width())
            {
                return Err(EdfError::FieldOverflow {
                    location: FieldLocation::Signal { field, channel },
                    width: field.width(),
                    len: entry.len(),
                });
            }
        }

        let declared = self.header_bytes()?;
        let computed = total_header_bytes(ns);
        if declared != computed as i64 {
            return Err(EdfError::HeaderSizeMismatch { declared, computed });
        }

        Ok(())
    }

    /// Raw bytes of a fixed field
    pub fn fixed_bytes(&self, field: FixedField) -> &[u8] {
        &self.fixed[field.index()]
    }

    /// Raw entries of a channel group, one per channel
    pub fn signal_group(&self, field: SignalField) -> &[Vec<u8>] {
        &self.signals[field.index()]
    }

    /// Raw bytes of one channel's entry
    pub fn signal_bytes(&self, field: SignalField, channel: usize) -> Option<&[u8]> {
        self.signals[field.index()].get(channel).map(Vec::as_slice)
    }

    /// Text of a fixed field with trailing padding trimmed
    pub fn text(&self, field: FixedField) -> String {
        unpack_str(self.fixed_bytes(field))
    }

    /// Text of one channel's entry with trailing padding trimmed
    pub fn signal_text(&self, field: SignalField, channel: usize) -> Option<String> {
        self.signal_bytes(field, channel).map(unpack_str)
    }

    fn fixed_int(&self, field: FixedField) -> Result<i64> {
        unpack_int(self.fixed_bytes(field)).map_err(|e| e.at(FieldLocation::Fixed(field)))
    }

    fn signal_entry(&self, field: SignalField, channel: usize) -> Result<&[u8]> {
        self.signal_bytes(field, channel).ok_or(EdfError::ChannelOutOfRange {
            channel,
            ns: self.signals[field.index()].len(),
        })
    }

    fn signal_int(&self, field: SignalField, channel: usize) -> Result<i64> {
        unpack_int(self.signal_entry(field, channel)?)
            .map_err(|e| e.at(FieldLocation::Signal { field, channel }))
    }

    fn signal_number(&self, field: SignalField, channel: usize) -> Result<f64> {
        unpack_number(self.signal_entry(field, channel)?)
            .map_err(|e| e.at(FieldLocation::Signal { field, channel }))
    }

    /// Format detected from the version tag, `None` for unknown tags
    pub fn format(&self) -> Option<Format> {
        Format::from_tag(self.fixed_bytes(FixedField::Version))
    }

    /// Declared number of signals (ns)
    pub fn signal_count(&self) -> Result<usize> {
        parse_signal_count(self.fixed_bytes(FixedField::SignalCount))
    }

    /// Declared header size in bytes
    pub fn header_bytes(&self) -> Result<i64> {
        self.fixed_int(FixedField::HeaderBytes)
    }

    /// Declared number of data records, `None` when unknown (-1)
    pub fn record_count(&self) -> Result<Option<usize>> {
        match self.fixed_int(FixedField::RecordCount)? {
            -1 => Ok(None),
            n if n < 0 => Err(EdfError::InvalidRecordCount(n)),
            n => Ok(Some(n as usize)),
        }
    }

    /// Duration of one data record in seconds
    pub fn record_duration(&self) -> Result<f64> {
        unpack_number(self.fixed_bytes(FixedField::RecordDuration))
            .map_err(|e| e.at(FieldLocation::Fixed(FixedField::RecordDuration)))
    }

    /// Start date from the dd.mm.yy field.
    ///
    /// Two-digit years use the 1985 clipping rule: 85..=99 are 19xx, the rest 20xx.
    pub fn start_date(&self) -> Result<NaiveDate> {
        let text = self.text(FixedField::StartDate);
        let [day, month, year] =
            split_triplet(&text).ok_or_else(|| EdfError::InvalidDate(text.clone()))?;
        let year = if year > 84 { 1900 + year } else { 2000 + year };

        NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(EdfError::InvalidDate(text))
    }

    /// Start time from the hh.mm.ss field
    pub fn start_time(&self) -> Result<NaiveTime> {
        let text = self.text(FixedField::StartTime);
        let [hour, minute, second] =
            split_triplet(&text).ok_or_else(|| EdfError::InvalidTime(text.clone()))?;

        NaiveTime::from_hms_opt(hour, minute, second).ok_or(EdfError::InvalidTime(text))
    }

    pub fn label(&self, channel: usize) -> Option<String> {
        self.signal_text(SignalField::Label, channel)
    }

    /// Channel index of the first signal carrying `label`
    pub fn signal_index(&self, label: &str) -> Option<usize> {
        self.signal_group(SignalField::Label)
            .iter()
            .position(|entry| unpack_str(entry) == label)
    }

    /// Samples of `channel` in every data record
    pub fn samples_per_record(&self, channel: usize) -> Result<usize> {
        match self.signal_int(SignalField::SamplesPerRecord, channel)? {
            n if n < 0 => Err(EdfError::MalformedInteger {
                location: FieldLocation::Signal { field: SignalField::SamplesPerRecord, channel },
                text: n.to_string(),
            }),
            n => Ok(n as usize),
        }
    }

    /// Bytes per sample of `channel`.
    ///
    /// A per-channel reserved entry holding exactly `2` or `3` wins; any other
    /// content (blank, text, other numbers) falls back to the format default:
    /// 3 for BDF, 2 otherwise.
    pub fn sample_width(&self, channel: usize) -> Result<SampleWidth> {
        let hint = self.signal_entry(SignalField::Reserved, channel)?;
        let fallback = self.format().unwrap_or_default().default_width();

        Ok(unpack_int(hint)
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .and_then(|n| SampleWidth::from_bytes(n).ok())
            .unwrap_or(fallback))
    }

    pub fn digital_min(&self, channel: usize) -> Result<i64> {
        self.signal_int(SignalField::DigitalMin, channel)
    }

    pub fn digital_max(&self, channel: usize) -> Result<i64> {
        self.signal_int(SignalField::DigitalMax, channel)
    }

    pub fn physical_min(&self, channel: usize) -> Result<f64> {
        self.signal_number(SignalField::PhysicalMin, channel)
    }

    pub fn physical_max(&self, channel: usize) -> Result<f64> {
        self.signal_number(SignalField::PhysicalMax, channel)
    }

    /// Per-channel sample counts and widths of a data record
    pub fn record_layout(&self) -> Result<RecordLayout> {
        let ns = self.signal_count()?;
        let channels = (0..ns)
            .map(|channel| {
                Ok(ChannelLayout {
                    samples: self.samples_per_record(channel)?,
                    width: self.sample_width(channel)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordLayout::new(channels))
    }

    /// Size of one data record in bytes
    pub fn record_bytes(&self) -> Result<usize> {
        Ok(self.record_layout()?.record_bytes())
    }
}

pub(crate) fn parse_signal_count(bytes: &[u8]) -> Result<usize> {
    let ns = unpack_int(bytes).map_err(|e| e.at(FieldLocation::Fixed(FixedField::SignalCount)))?;
    usize::try_from(ns).map_err(|_| EdfError::InvalidSignalCount(ns))
}

/// Splits "aa.bb.cc" into three numbers
fn split_triplet(text: &str) -> Option<[u32; 3]> {
    let mut parts = text.split('.').map(|p| p.trim().parse::<u32>().ok());
    let triplet = [parts.next()??, parts.next()??, parts.next()??];
    if parts.next().is_some() {
        return None;
    }
    Some(triplet)
}
