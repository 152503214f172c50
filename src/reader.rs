//! Decoding of complete EDF/BDF buffers.
//!
//! The whole buffer is available up front: the fixed prologue is sliced
//! first, ns is parsed from it, and only then can the channel groups and
//! the data record size be located.

use log::{debug, trace};

use crate::document::Document;
use crate::error::{EdfError, Result};
use crate::header::{parse_signal_count, Header};
use crate::layout::{fixed_offsets, total_header_bytes, variable_offsets, FIXED_HEADER_BYTES};
use crate::record::{decode_record, DataRecord, RecordLayout};
use crate::types::{Field, FieldLocation, FixedField};
use crate::utils::check_decoded;

/// Decodes the header at the front of `buffer`.
///
/// Bytes past the header are ignored. Every field must be printable ASCII
/// (NUL padding is accepted, and so is the leading 0xFF of the BDF tag), and
/// the declared `header-byte-count` must match the size computed from ns.
///
/// ```rust
/// use edfcodec::{decode_header, doctest_utils::sample_edf};
///
/// let bytes = sample_edf()?.encode()?;
/// let header = decode_header(&bytes)?;
/// assert_eq!(header.signal_count()?, 2);
/// assert_eq!(header.label(1).as_deref(), Some("EEG Fpz-Cz"));
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
pub fn decode_header(buffer: &[u8]) -> Result<Header> {
    if buffer.len() < FIXED_HEADER_BYTES {
        return Err(EdfError::TruncatedHeader {
            expected: FIXED_HEADER_BYTES,
            found: buffer.len(),
        });
    }

    let mut fixed: [Vec<u8>; 10] = Default::default();
    for span in fixed_offsets().iter() {
        let Field::Fixed(field) = span.field else {
            continue;
        };
        let bytes = &buffer[span.range.clone()];
        // 版本号首字节允许 0xFF（BDF）
        let skip = usize::from(field == FixedField::Version);
        check_decoded(bytes, skip).map_err(|e| e.at(FieldLocation::Fixed(field)))?;
        fixed[field.index()] = bytes.to_vec();
    }

    let ns = parse_signal_count(&fixed[FixedField::SignalCount.index()])?;
    let expected = total_header_bytes(ns);
    if buffer.len() < expected {
        return Err(EdfError::TruncatedHeader {
            expected,
            found: buffer.len(),
        });
    }

    let mut signals: [Vec<Vec<u8>>; 10] = Default::default();
    for span in variable_offsets(ns).iter() {
        let Field::Signal(field) = span.field else {
            continue;
        };
        let group = &buffer[span.range.clone()];
        let mut entries = Vec::with_capacity(ns);
        for (channel, entry) in group.chunks_exact(field.width()).enumerate() {
            check_decoded(entry, 0).map_err(|e| e.at(FieldLocation::Signal { field, channel }))?;
            entries.push(entry.to_vec());
        }
        signals[field.index()] = entries;
    }

    let header = Header::from_parts(fixed, signals);
    let declared = header.header_bytes()?;
    if declared != expected as i64 {
        return Err(EdfError::HeaderSizeMismatch {
            declared,
            computed: expected,
        });
    }

    debug!("decoded header: ns={}, header_bytes={}", ns, expected);
    Ok(header)
}

/// Decodes a header followed by all of its data records.
///
/// The declared record count must be met exactly; a count of -1 reads
/// records until the buffer is exhausted.
pub fn decode_document(buffer: &[u8]) -> Result<Document> {
    read_document(buffer, |bytes, layout| {
        Ok(DataRecord::from_samples(decode_record(bytes, layout)?))
    })
}

/// Like [`decode_document`], but keeps every record as raw bytes.
///
/// Samples are decoded on demand with [`DataRecord::materialize`]; framing
/// errors are still reported up front.
pub fn decode_document_lazy(buffer: &[u8]) -> Result<Document> {
    read_document(buffer, |bytes, _| Ok(DataRecord::from_raw(bytes.to_vec())))
}

fn read_document<F>(buffer: &[u8], mut record: F) -> Result<Document>
where
    F: FnMut(&[u8], &RecordLayout) -> Result<DataRecord>,
{
    let header = decode_header(buffer)?;
    let layout = header.record_layout()?;
    let declared = header.record_count()?;
    let record_bytes = layout.record_bytes();

    let mut rest = &buffer[total_header_bytes(layout.channel_count())..];
    debug!(
        "decoding data records: declared={:?}, record_bytes={}, available={}",
        declared,
        record_bytes,
        rest.len()
    );

    // 记录长度为 0 时不消耗任何字节：剩余字节一律视为多余
    if record_bytes == 0 {
        if !rest.is_empty() {
            return Err(EdfError::TrailingBytes { remaining: rest.len() });
        }
        let records = (0..declared.unwrap_or(0))
            .map(|_| record(&[], &layout))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Document::from_parts(header, records));
    }

    let available = rest.len() / record_bytes;
    let mut records = Vec::with_capacity(declared.map_or(available, |count| count.min(available)));
    loop {
        match declared {
            Some(count) if records.len() == count => break,
            Some(count) if rest.is_empty() => {
                return Err(EdfError::RecordCountMismatch {
                    declared: count as i64,
                    found: records.len(),
                });
            }
            None if rest.is_empty() => break,
            _ => {}
        }

        let take = record_bytes.min(rest.len());
        let (bytes, tail) = rest.split_at(take);
        if take < record_bytes {
            // 最后一条记录不完整
            decode_record(bytes, &layout)?;
        }

        trace!("data record {}: {} bytes", records.len(), take);
        records.push(record(bytes, &layout)?);
        rest = tail;
    }

    if !rest.is_empty() {
        return Err(EdfError::TrailingBytes { remaining: rest.len() });
    }

    Ok(Document::from_parts(header, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Format, HeaderOptions, SignalField};
    use crate::writer::encode_header;

    fn header_bytes(ns: usize) -> Vec<u8> {
        let header = Header::from_options(HeaderOptions {
            signal_count: ns.to_string(),
            record_count: "0".to_string(),
            samples_per_record: vec!["4".to_string(); ns],
            ..Default::default()
        })
        .unwrap();
        encode_header(&header).unwrap()
    }

    #[test]
    fn test_decode_header_slices_groups() {
        let header = Header::from_options(HeaderOptions {
            labels: vec!["A".into(), "B".into(), "C".into()],
            samples_per_record: vec!["1".into(), "2".into(), "3".into()],
            ..Default::default()
        })
        .unwrap();
        let bytes = encode_header(&header).unwrap();

        let decoded = decode_header(&bytes).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.label(2).as_deref(), Some("C"));
        assert_eq!(decoded.samples_per_record(1).unwrap(), 2);
    }

    #[test]
    fn test_decode_header_short_prologue() {
        assert!(matches!(
            decode_header(&[b' '; 100]),
            Err(EdfError::TruncatedHeader { expected: 256, found: 100 })
        ));
    }

    #[test]
    fn test_decode_header_short_variable_section() {
        let bytes = header_bytes(2);
        assert!(matches!(
            decode_header(&bytes[..700]),
            Err(EdfError::TruncatedHeader { expected: 768, found: 700 })
        ));
    }

    #[test]
    fn test_decode_header_size_mismatch() {
        let mut bytes = header_bytes(1);
        bytes[184..192].copy_from_slice(b"256     ");
        assert!(matches!(
            decode_header(&bytes),
            Err(EdfError::HeaderSizeMismatch { declared: 256, computed: 512 })
        ));
    }

    #[test]
    fn test_decode_header_nul_terminated_count() {
        let mut bytes = header_bytes(1);
        bytes[252..256].copy_from_slice(b"1\0\0\0");
        let header = decode_header(&bytes).unwrap();
        assert_eq!(header.signal_count().unwrap(), 1);
        // 原样保留 NUL 填充
        assert_eq!(header.fixed_bytes(FixedField::SignalCount), b"1\0\0\0");
    }

    #[test]
    fn test_decode_header_rejects_control_bytes() {
        let mut bytes = header_bytes(2);
        // label[1] 的第 3 个字节
        bytes[256 + 16 + 2] = 0x1B;
        assert_eq!(
            decode_header(&bytes).unwrap_err(),
            EdfError::NonPrintableCharacter {
                location: FieldLocation::Signal { field: SignalField::Label, channel: 1 },
                byte: 0x1B,
                position: 2,
            }
        );

        let mut bytes = header_bytes(0);
        bytes[0] = 0xFF;
        assert!(decode_header(&bytes).is_ok());
        bytes[1] = 0xFF;
        assert!(matches!(
            decode_header(&bytes),
            Err(EdfError::NonPrintableCharacter {
                location: FieldLocation::Fixed(FixedField::Version),
                position: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_header_bdf_tag() {
        let header = Header::from_options(HeaderOptions {
            version: Format::Bdf,
            ..Default::default()
        })
        .unwrap();
        let decoded = decode_header(&encode_header(&header).unwrap()).unwrap();
        assert_eq!(decoded.format(), Some(Format::Bdf));
    }

    #[test]
    fn test_decode_document_counts_records() {
        let mut bytes = header_bytes(1);
        bytes[236..244].copy_from_slice(b"2       ");
        bytes.extend_from_slice(&[0u8; 8]);

        assert!(matches!(
            decode_document(&bytes),
            Err(EdfError::RecordCountMismatch { declared: 2, found: 1 })
        ));

        bytes.extend_from_slice(&[1u8; 8]);
        let doc = decode_document(&bytes).unwrap();
        assert_eq!(doc.records().len(), 2);
        assert_eq!(doc.records()[1].channel(0), Some(&[257, 257, 257, 257][..]));

        bytes.push(0);
        assert!(matches!(decode_document(&bytes), Err(EdfError::TrailingBytes { remaining: 1 })));
    }

    #[test]
    fn test_decode_document_unknown_count() {
        let mut bytes = header_bytes(1);
        bytes[236..244].copy_from_slice(b"-1      ");
        assert_eq!(decode_document(&bytes).unwrap().records().len(), 0);

        bytes.extend_from_slice(&[0u8; 24]);
        assert_eq!(decode_document(&bytes).unwrap().records().len(), 3);

        bytes.pop();
        assert!(matches!(
            decode_document(&bytes),
            Err(EdfError::TruncatedRecord { channel: 0, needed: 8, remaining: 7 })
        ));
    }

    #[test]
    fn test_decode_document_unknown_count_empty_records() {
        let mut bytes = header_bytes(0);
        bytes[236..244].copy_from_slice(b"-1      ");
        bytes.extend_from_slice(&[0u8; 3]);
        assert!(matches!(decode_document(&bytes), Err(EdfError::TrailingBytes { remaining: 3 })));
    }

    #[test]
    fn test_decode_document_zero_byte_records_with_known_count() {
        let header = Header::from_options(HeaderOptions {
            record_count: "3".to_string(),
            labels: vec!["Annot".to_string()],
            samples_per_record: vec!["0".to_string()],
            ..Default::default()
        })
        .unwrap();
        let mut bytes = encode_header(&header).unwrap();

        let doc = decode_document(&bytes).unwrap();
        assert_eq!(doc.records().len(), 3);
        assert!(doc.records().iter().all(|r| r.channel(0) == Some(&[][..])));
        assert_eq!(decode_document_lazy(&bytes).unwrap().records().len(), 3);

        bytes.push(0);
        assert!(matches!(decode_document(&bytes), Err(EdfError::TrailingBytes { remaining: 1 })));
    }

    #[test]
    fn test_decode_document_stray_bytes_with_huge_count() {
        let mut bytes = header_bytes(0);
        bytes[236..244].copy_from_slice(b"99999999");
        bytes.push(b'x');
        assert!(matches!(decode_document(&bytes), Err(EdfError::TrailingBytes { remaining: 1 })));
    }

    #[test]
    fn test_decode_document_lazy() {
        let mut bytes = header_bytes(1);
        bytes[236..244].copy_from_slice(b"1       ");
        bytes.extend_from_slice(&[2, 0, 3, 0, 4, 0, 5, 0]);

        let mut doc = decode_document_lazy(&bytes).unwrap();
        let layout = doc.header().record_layout().unwrap();
        let record = &mut doc.records_mut()[0];
        assert!(!record.is_materialized());
        assert_eq!(record.materialize(&layout).unwrap(), &[vec![2, 3, 4, 5]]);
        assert_eq!(doc, decode_document(&bytes).unwrap());
    }
}
