use std::borrow::Cow;

use crate::error::{EdfError, Result};
use crate::sample::{decode_samples, encode_samples_into};
use crate::types::SampleWidth;

/// Sample count and width of one channel within a data record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub samples: usize,
    pub width: SampleWidth,
}

impl ChannelLayout {
    pub fn bytes(&self) -> usize {
        self.samples * self.width.bytes()
    }
}

/// Byte layout shared by every data record of a document.
///
/// Channels are stored back to back in channel order with no separators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordLayout {
    channels: Vec<ChannelLayout>,
}

impl RecordLayout {
    pub fn new(channels: Vec<ChannelLayout>) -> Self {
        Self { channels }
    }

    /// Builds a layout from parallel sample-count and width slices
    pub fn from_counts(sample_counts: &[usize], widths: &[SampleWidth]) -> Result<Self> {
        if sample_counts.len() != widths.len() {
            return Err(EdfError::ChannelCountMismatch {
                record: 0,
                expected: sample_counts.len(),
                found: widths.len(),
            });
        }

        let channels = sample_counts
            .iter()
            .zip(widths)
            .map(|(&samples, &width)| ChannelLayout { samples, width })
            .collect();

        Ok(Self { channels })
    }

    pub fn channels(&self) -> &[ChannelLayout] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Σ(samples × width) over all channels
    pub fn record_bytes(&self) -> usize {
        self.channels.iter().map(ChannelLayout::bytes).sum()
    }

    /// Checks per-channel sample arrays against the layout
    pub(crate) fn check_shape(&self, record: usize, channels: &[Vec<i32>]) -> Result<()> {
        if channels.len() != self.channels.len() {
            return Err(EdfError::ChannelCountMismatch {
                record,
                expected: self.channels.len(),
                found: channels.len(),
            });
        }

        for (channel, (samples, layout)) in channels.iter().zip(&self.channels).enumerate() {
            if samples.len() != layout.samples {
                return Err(EdfError::SampleCountMismatch {
                    record,
                    channel,
                    expected: layout.samples,
                    found: samples.len(),
                });
            }
        }

        Ok(())
    }
}

/// Splits one data record into per-channel sample arrays.
///
/// The buffer must hold exactly [`RecordLayout::record_bytes`] bytes: a short
/// buffer fails with `TruncatedRecord` naming the first channel that does not
/// fit, a long one with `UnconsumedBytes`.
pub fn decode_record(buffer: &[u8], layout: &RecordLayout) -> Result<Vec<Vec<i32>>> {
    let mut rest = buffer;
    let mut channels = Vec::with_capacity(layout.channel_count());

    for (channel, entry) in layout.channels().iter().enumerate() {
        let needed = entry.bytes();
        if rest.len() < needed {
            return Err(EdfError::TruncatedRecord {
                channel,
                needed,
                remaining: rest.len(),
            });
        }

        let (bytes, tail) = rest.split_at(needed);
        channels.push(decode_samples(bytes, entry.width, entry.samples)?);
        rest = tail;
    }

    if !rest.is_empty() {
        return Err(EdfError::UnconsumedBytes { remaining: rest.len() });
    }

    Ok(channels)
}

/// Concatenates per-channel samples into one data record
pub fn encode_record(channels: &[Vec<i32>], layout: &RecordLayout) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(layout.record_bytes());
    encode_record_into(0, channels, layout, &mut out)?;
    Ok(out)
}

pub(crate) fn encode_record_into(
    record: usize,
    channels: &[Vec<i32>],
    layout: &RecordLayout,
    out: &mut Vec<u8>,
) -> Result<()> {
    layout.check_shape(record, channels)?;

    let start = out.len();
    for (samples, entry) in channels.iter().zip(layout.channels()) {
        if let Err(e) = encode_samples_into(samples, entry.width, out) {
            out.truncate(start);
            return Err(e);
        }
    }

    Ok(())
}

/// One fixed-duration slab of samples across all channels.
///
/// A record holds decoded samples, raw record bytes, or both. Records built
/// with [`DataRecord::from_raw`] stay undecoded until [`DataRecord::materialize`]
/// is called; encoding reuses raw bytes when they are present.
///
/// `==` compares samples when both sides hold them and raw bytes otherwise,
/// so it is not transitive across representations: a materialized lazy record
/// equals both its `from_raw` and its `from_samples` form, while those two
/// compare unequal. Use [`DataRecord::same_content`] to compare records of
/// any representation under a layout.
#[derive(Debug, Clone)]
pub struct DataRecord {
    samples: Option<Vec<Vec<i32>>>,
    raw: Option<Vec<u8>>,
}

impl DataRecord {
    /// Creates a record from per-channel samples, indexed like the header channels
    pub fn from_samples(samples: Vec<Vec<i32>>) -> Self {
        Self {
            samples: Some(samples),
            raw: None,
        }
    }

    /// Creates a record from undecoded record bytes
    pub fn from_raw(raw: Vec<u8>) -> Self {
        Self {
            samples: None,
            raw: Some(raw),
        }
    }

    /// Decoded samples, `None` until materialized
    pub fn samples(&self) -> Option<&[Vec<i32>]> {
        self.samples.as_deref()
    }

    /// Samples of one channel, `None` until materialized or out of range
    pub fn channel(&self, channel: usize) -> Option<&[i32]> {
        self.samples.as_ref()?.get(channel).map(Vec::as_slice)
    }

    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    pub fn is_materialized(&self) -> bool {
        self.samples.is_some()
    }

    /// Decodes raw bytes on first use and returns the samples
    pub fn materialize(&mut self, layout: &RecordLayout) -> Result<&[Vec<i32>]> {
        if self.samples.is_none() {
            let raw = self.raw.as_deref().unwrap_or_default();
            self.samples = Some(decode_record(raw, layout)?);
        }

        Ok(self.samples.as_deref().unwrap_or_default())
    }

    /// Record bytes, borrowed when raw bytes are cached
    pub fn encode(&self, layout: &RecordLayout) -> Result<Cow<'_, [u8]>> {
        self.encode_at(0, layout)
    }

    pub(crate) fn encode_at(&self, record: usize, layout: &RecordLayout) -> Result<Cow<'_, [u8]>> {
        self.check(record, layout)?;

        match (&self.raw, &self.samples) {
            (Some(raw), _) => Ok(Cow::Borrowed(raw.as_slice())),
            (None, Some(samples)) => {
                let mut out = Vec::with_capacity(layout.record_bytes());
                encode_record_into(record, samples, layout, &mut out)?;
                Ok(Cow::Owned(out))
            }
            (None, None) => Ok(Cow::Owned(Vec::new())),
        }
    }

    /// Compares the encoded bytes of two records under `layout`
    pub fn same_content(&self, other: &Self, layout: &RecordLayout) -> Result<bool> {
        Ok(self.encode(layout)? == other.encode(layout)?)
    }

    /// Checks the record's shape against the layout without decoding raw bytes
    pub(crate) fn check(&self, record: usize, layout: &RecordLayout) -> Result<()> {
        if let Some(samples) = &self.samples {
            return layout.check_shape(record, samples);
        }

        let len = self.raw.as_ref().map_or(0, Vec::len);
        let expected = layout.record_bytes();
        if len < expected {
            return Err(EdfError::TruncatedRecord {
                channel: truncated_channel(len, layout),
                needed: expected,
                remaining: len,
            });
        }
        if len > expected {
            return Err(EdfError::UnconsumedBytes { remaining: len - expected });
        }

        Ok(())
    }
}

/// First channel that does not fit in `len` bytes
fn truncated_channel(len: usize, layout: &RecordLayout) -> usize {
    let mut end = 0;
    for (channel, entry) in layout.channels().iter().enumerate() {
        end += entry.bytes();
        if end > len {
            return channel;
        }
    }
    layout.channel_count().saturating_sub(1)
}

impl PartialEq for DataRecord {
    fn eq(&self, other: &Self) -> bool {
        match (&self.samples, &other.samples) {
            (Some(a), Some(b)) => a == b,
            _ => matches!((&self.raw, &other.raw), (Some(a), Some(b)) if a == b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_layout() -> RecordLayout {
        RecordLayout::new(vec![
            ChannelLayout { samples: 2, width: SampleWidth::Two },
            ChannelLayout { samples: 1, width: SampleWidth::Three },
            ChannelLayout { samples: 3, width: SampleWidth::Two },
        ])
    }

    #[test]
    fn test_record_bytes() {
        assert_eq!(mixed_layout().record_bytes(), 2 * 2 + 3 + 3 * 2);
        assert_eq!(RecordLayout::default().record_bytes(), 0);
    }

    #[test]
    fn test_from_counts() {
        let widths = [SampleWidth::Two, SampleWidth::Three, SampleWidth::Two];
        let layout = RecordLayout::from_counts(&[2, 1, 3], &widths).unwrap();
        assert_eq!(layout, mixed_layout());
        assert!(matches!(
            RecordLayout::from_counts(&[1, 2], &[SampleWidth::Two]),
            Err(EdfError::ChannelCountMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_decode_mixed_widths() {
        let buffer = [
            0x01, 0x00, 0xFF, 0xFF, // channel 0: 1, -1
            0x00, 0x00, 0x80, // channel 1: -8388608
            0x00, 0x80, 0xFF, 0x7F, 0x02, 0x00, // channel 2: -32768, 32767, 2
        ];

        let channels = decode_record(&buffer, &mixed_layout()).unwrap();
        assert_eq!(channels, vec![vec![1, -1], vec![-8_388_608], vec![-32768, 32767, 2]]);
    }

    #[test]
    fn test_encode_is_inverse_of_decode() {
        let channels = vec![vec![7, -7], vec![8_000_000], vec![0, 1, -2]];
        let layout = mixed_layout();
        let bytes = encode_record(&channels, &layout).unwrap();
        assert_eq!(bytes.len(), layout.record_bytes());
        assert_eq!(decode_record(&bytes, &layout).unwrap(), channels);
    }

    #[test]
    fn test_decode_short_buffer_names_channel() {
        let layout = mixed_layout();
        let buffer = vec![0u8; layout.record_bytes() - 1];
        assert!(matches!(
            decode_record(&buffer, &layout),
            Err(EdfError::TruncatedRecord { channel: 2, needed: 6, remaining: 5 })
        ));
    }

    #[test]
    fn test_decode_long_buffer() {
        let layout = mixed_layout();
        let buffer = vec![0u8; layout.record_bytes() + 2];
        assert!(matches!(
            decode_record(&buffer, &layout),
            Err(EdfError::UnconsumedBytes { remaining: 2 })
        ));
    }

    #[test]
    fn test_encode_checks_shape() {
        let layout = mixed_layout();
        assert!(matches!(
            encode_record(&[vec![1, 2], vec![3]], &layout),
            Err(EdfError::ChannelCountMismatch { expected: 3, found: 2, .. })
        ));
        assert!(matches!(
            encode_record(&[vec![1, 2], vec![3], vec![4]], &layout),
            Err(EdfError::SampleCountMismatch { channel: 2, expected: 3, found: 1, .. })
        ));
    }

    #[test]
    fn test_lazy_record_materializes_on_demand() {
        let layout = mixed_layout();
        let channels = vec![vec![1, 2], vec![-3], vec![4, 5, 6]];
        let bytes = encode_record(&channels, &layout).unwrap();

        let mut record = DataRecord::from_raw(bytes.clone());
        assert!(!record.is_materialized());
        assert_eq!(record.channel(0), None);
        assert_eq!(record.materialize(&layout).unwrap(), channels.as_slice());
        assert_eq!(record.channel(1), Some(&[-3][..]));
        assert_eq!(record.encode(&layout).unwrap().as_ref(), bytes.as_slice());
    }

    #[test]
    fn test_lazy_record_with_wrong_length() {
        let layout = mixed_layout();
        let record = DataRecord::from_raw(vec![0; 4]);
        assert!(matches!(
            record.encode(&layout),
            Err(EdfError::TruncatedRecord { channel: 1, .. })
        ));
    }

    #[test]
    fn test_record_equality() {
        let layout = mixed_layout();
        let channels = vec![vec![1, 2], vec![-3], vec![4, 5, 6]];
        let bytes = encode_record(&channels, &layout).unwrap();

        let mut lazy = DataRecord::from_raw(bytes.clone());
        assert_ne!(lazy, DataRecord::from_samples(channels.clone()));
        lazy.materialize(&layout).unwrap();
        assert_eq!(lazy, DataRecord::from_samples(channels));
        assert_eq!(lazy, DataRecord::from_raw(bytes));
        assert_ne!(DataRecord::from_samples(vec![vec![1]]), DataRecord::from_raw(vec![1, 0]));
    }

    #[test]
    fn test_same_content_across_representations() {
        let layout = mixed_layout();
        let channels = vec![vec![1, 2], vec![-3], vec![4, 5, 6]];
        let bytes = encode_record(&channels, &layout).unwrap();

        let raw = DataRecord::from_raw(bytes.clone());
        let samples = DataRecord::from_samples(channels);
        assert_ne!(raw, samples);
        assert!(raw.same_content(&samples, &layout).unwrap());
        assert!(samples.same_content(&raw, &layout).unwrap());

        let other = DataRecord::from_samples(vec![vec![1, 2], vec![-3], vec![4, 5, 7]]);
        assert!(!raw.same_content(&other, &layout).unwrap());
        assert!(matches!(
            raw.same_content(&DataRecord::from_raw(vec![0; 2]), &layout),
            Err(EdfError::TruncatedRecord { .. })
        ));
    }
}
