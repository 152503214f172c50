//! Encoding of headers and documents to bytes.
//!
//! Inputs are validated before any output is produced, so an error never
//! leaves a partially written buffer behind.

use log::debug;

use crate::document::Document;
use crate::error::Result;
use crate::header::Header;
use crate::layout::total_header_bytes;
use crate::types::{FixedField, SignalField};

/// Serializes a header: the ten fixed fields, then each channel group
/// flattened in channel order.
///
/// ```rust
/// use edfcodec::{encode_header, Header, HeaderOptions};
///
/// let header = Header::from_options(HeaderOptions {
///     labels: vec!["EEG".to_string()],
///     ..Default::default()
/// })?;
/// let bytes = encode_header(&header)?;
/// assert_eq!(bytes.len(), 512);
/// assert_eq!(&bytes[0..8], b"0       ");
/// assert_eq!(&bytes[256..259], b"EEG");
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
pub fn encode_header(header: &Header) -> Result<Vec<u8>> {
    header.validate()?;

    let ns = header.signal_count()?;
    let mut out = Vec::with_capacity(total_header_bytes(ns));
    write_header(header, &mut out);
    Ok(out)
}

/// Appends the header fields; `header` must already be validated
fn write_header(header: &Header, out: &mut Vec<u8>) {
    for field in FixedField::ALL {
        out.extend_from_slice(header.fixed_bytes(field));
    }
    for field in SignalField::ALL {
        for entry in header.signal_group(field) {
            out.extend_from_slice(entry);
        }
    }
}

/// Serializes a header followed by its data records, with no separators
pub fn encode_document(document: &Document) -> Result<Vec<u8>> {
    document.validate()?;

    let header = document.header();
    let layout = header.record_layout()?;
    let ns = layout.channel_count();
    let capacity = total_header_bytes(ns) + layout.record_bytes() * document.records().len();
    let mut out = Vec::with_capacity(capacity);

    write_header(header, &mut out);
    for (index, record) in document.records().iter().enumerate() {
        out.extend_from_slice(&record.encode_at(index, &layout)?);
    }

    debug!(
        "encoded document: ns={}, records={}, bytes={}",
        ns,
        document.records().len(),
        out.len()
    );
    Ok(out)
}
