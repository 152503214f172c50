//! Byte offsets of every header field as a function of the signal count.
//!
//! All offsets come from one scan over an ordered list of `(field, width)`
//! pairs: the fixed prologue starts at 0, the channel groups start where the
//! prologue ends and each group spans `ns * width` bytes.

use std::ops::Range;

use crate::types::{Field, FixedField, SignalField};

/// Size of the fixed prologue
pub const FIXED_HEADER_BYTES: usize = sum_fixed_widths();

/// Header bytes contributed by each channel
pub const SIGNAL_HEADER_BYTES: usize = sum_signal_widths();

const fn sum_fixed_widths() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < FixedField::ALL.len() {
        total += FixedField::ALL[i].width();
        i += 1;
    }
    total
}

const fn sum_signal_widths() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < SignalField::ALL.len() {
        total += SignalField::ALL[i].width();
        i += 1;
    }
    total
}

/// One entry of an offset table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpan {
    pub field: Field,
    pub range: Range<usize>,
}

/// Ordered field → byte range map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    spans: Vec<FieldSpan>,
}

impl OffsetTable {
    pub fn get(&self, field: Field) -> Option<Range<usize>> {
        self.spans
            .iter()
            .find(|span| span.field == field)
            .map(|span| span.range.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpan> {
        self.spans.iter()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// End offset of the last span, `None` for an empty table
    pub fn end(&self) -> Option<usize> {
        self.spans.last().map(|span| span.range.end)
    }
}

/// Lays `(field, size)` pairs out contiguously from `start`
fn scan<I>(start: usize, sizes: I) -> OffsetTable
where
    I: IntoIterator<Item = (Field, usize)>,
{
    let spans = sizes
        .into_iter()
        .scan(start, |offset, (field, size)| {
            let range = *offset..*offset + size;
            *offset = range.end;
            Some(FieldSpan { field, range })
        })
        .collect();

    OffsetTable { spans }
}

/// Offsets of the ten fixed fields; independent of ns
pub fn fixed_offsets() -> OffsetTable {
    scan(
        0,
        FixedField::ALL
            .iter()
            .map(|&field| (Field::Fixed(field), field.width())),
    )
}

/// Offsets of the ten channel groups for `ns` signals
pub fn variable_offsets(ns: usize) -> OffsetTable {
    scan(
        FIXED_HEADER_BYTES,
        SignalField::ALL
            .iter()
            .map(|&field| (Field::Signal(field), field.width() * ns)),
    )
}

/// Total header size for `ns` signals
///
/// ```rust
/// use edfcodec::layout::total_header_bytes;
///
/// assert_eq!(total_header_bytes(0), 256);
/// assert_eq!(total_header_bytes(8), 256 + 8 * 256);
/// ```
pub fn total_header_bytes(ns: usize) -> usize {
    variable_offsets(ns).end().unwrap_or(FIXED_HEADER_BYTES)
}
