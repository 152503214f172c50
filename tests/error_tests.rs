use edfcodec::doctest_utils::sample_edf;
use edfcodec::utils::{pack, unpack_int};
use edfcodec::{
    decode_header, DataRecord, Document, EdfError, FieldLocation, FixedField, Header,
    HeaderOptions, SignalField,
};

fn sample_bytes() -> Vec<u8> {
    sample_edf().unwrap().encode().unwrap()
}

#[test]
fn test_truncated_last_sample_is_an_error() {
    let bytes = sample_bytes();
    // 去掉最后一个通道最后一个样本的最后一个字节
    let truncated = &bytes[..bytes.len() - 1];

    match Document::decode(truncated) {
        Err(EdfError::TruncatedRecord { channel, needed, remaining }) => {
            assert_eq!(channel, 1);
            assert_eq!(needed, 128 * 2);
            assert_eq!(remaining, 128 * 2 - 1);
        }
        other => panic!("expected TruncatedRecord, got {:?}", other),
    }
}

#[test]
fn test_missing_record_is_count_mismatch() {
    let bytes = sample_bytes();
    let record_bytes = (256 + 128) * 2;
    assert!(matches!(
        Document::decode(&bytes[..bytes.len() - record_bytes]),
        Err(EdfError::RecordCountMismatch { declared: 2, found: 1 })
    ));
}

#[test]
fn test_trailing_bytes_after_last_record() {
    let mut bytes = sample_bytes();
    bytes.extend_from_slice(b"xx");
    assert!(matches!(Document::decode(&bytes), Err(EdfError::TrailingBytes { remaining: 2 })));
}

#[test]
fn test_truncated_header() {
    let bytes = sample_bytes();
    assert!(matches!(
        decode_header(&bytes[..600]),
        Err(EdfError::TruncatedHeader { expected: 768, found: 600 })
    ));
    assert!(matches!(
        Document::decode(&[]),
        Err(EdfError::TruncatedHeader { expected: 256, found: 0 })
    ));
}

#[test]
fn test_declared_header_size_must_match() {
    let mut bytes = sample_bytes();
    bytes[184..192].copy_from_slice(b"1024    ");
    assert!(matches!(
        Document::decode(&bytes),
        Err(EdfError::HeaderSizeMismatch { declared: 1024, computed: 768 })
    ));
}

#[test]
fn test_non_printable_header_byte() {
    let mut bytes = sample_bytes();
    bytes[100] = 0x07;
    let err = Document::decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        EdfError::NonPrintableCharacter {
            location: FieldLocation::Fixed(FixedField::RecordingId),
            byte: 0x07,
            position: 12,
        }
    );
    assert_eq!(err.to_string(), "Non-printable byte 0x07 at offset 12 in local-recording-id");
}

#[test]
fn test_malformed_signal_count() {
    let mut bytes = sample_bytes();
    bytes[252..256].copy_from_slice(b"two ");
    assert!(matches!(
        Document::decode(&bytes),
        Err(EdfError::MalformedInteger {
            location: FieldLocation::Fixed(FixedField::SignalCount),
            ..
        })
    ));
}

#[test]
fn test_malformed_samples_per_record() {
    let mut bytes = sample_bytes();
    // samples-per-record[0] 位于 256 + 2 * 216
    let start = 256 + 2 * 216;
    bytes[start..start + 8].copy_from_slice(b"n/a     ");
    assert_eq!(
        Document::decode(&bytes).unwrap_err(),
        EdfError::MalformedInteger {
            location: FieldLocation::Signal { field: SignalField::SamplesPerRecord, channel: 0 },
            text: "n/a".to_string(),
        }
    );
}

#[test]
fn test_pack_and_unpack_int_errors() {
    let field = pack("foo", 80).unwrap();
    assert_eq!(&field[..3], b"foo");
    assert!(field[3..].iter().all(|&b| b == b' '));
    assert!(matches!(unpack_int(&field), Err(EdfError::MalformedInteger { .. })));
    assert_eq!(unpack_int(&pack("8", 4).unwrap()).unwrap(), 8);
}

#[test]
fn test_options_errors_name_the_field() {
    let err = Header::from_options(HeaderOptions {
        labels: vec!["ok".to_string(), "a label that is far too long".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert_eq!(
        err,
        EdfError::FieldOverflow {
            location: FieldLocation::Signal { field: SignalField::Label, channel: 1 },
            width: 16,
            len: 28,
        }
    );

    let err = Header::from_options(HeaderOptions {
        signal_count: "1".to_string(),
        samples_per_record: vec!["1".to_string(), "2".to_string()],
        ..Default::default()
    })
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "samples-per-record holds 2 entries, signal count is 1"
    );
}

#[test]
fn test_record_shape_errors() {
    let mut doc = sample_edf().unwrap();
    assert!(matches!(
        doc.push_record(DataRecord::from_samples(vec![vec![0; 256]])),
        Err(EdfError::ChannelCountMismatch { record: 2, expected: 2, found: 1 })
    ));
    assert!(matches!(
        doc.push_record(DataRecord::from_samples(vec![vec![0; 256], vec![0; 127]])),
        Err(EdfError::SampleCountMismatch { record: 2, channel: 1, expected: 128, found: 127 })
    ));
}

#[test]
fn test_decode_never_returns_partial_documents() {
    let bytes = sample_bytes();
    for cut in [1, 2, 255, 256, 500, 767, 768, 769] {
        assert!(Document::decode(&bytes[..bytes.len() - cut]).is_err(), "cut {}", cut);
    }
}
