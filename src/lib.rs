//! # EDF/BDF codec for Rust
//!
//! A pure Rust codec for EDF (European Data Format) and BDF (BioSemi Data
//! Format) biosignal recordings. It turns a complete byte buffer into a
//! structured [`Document`] and back, byte for byte.
//!
//! A recording is an ASCII header followed by fixed-size binary data records.
//! The header has a 256-byte fixed prologue and ten per-channel field groups
//! whose size depends on the declared number of signals (ns). Each data record
//! holds every channel's samples back to back as little-endian two's-complement
//! integers: 16-bit for EDF, 24-bit for BDF.
//!
//! ## Quick Start
//!
//! ### Decoding a buffer
//!
//! ```rust
//! use edfcodec::{Document, Result};
//!
//! fn main() -> Result<()> {
//!     # let bytes = edfcodec::doctest_utils::sample_edf()?.encode()?;
//!     // `bytes` holds an entire EDF file
//!     let doc = Document::decode(&bytes)?;
//!     let header = doc.header();
//!
//!     println!("Signals: {}", header.signal_count()?);
//!     println!("Start: {} {}", header.start_date()?, header.start_time()?);
//!
//!     for channel in 0..header.signal_count()? {
//!         let samples = doc.signal(channel)?;
//!         println!("{:?}: {} samples", header.label(channel), samples.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Building a document
//!
//! ```rust
//! use edfcodec::{DataRecord, Document, Format, HeaderOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let mut doc = Document::new(HeaderOptions {
//!         version: Format::Bdf,
//!         patient_id: "X X X X".to_string(),
//!         start_date: "13.02.26".to_string(),
//!         start_time: "09.30.00".to_string(),
//!         record_count: "0".to_string(),
//!         record_duration: "1".to_string(),
//!         labels: vec!["EEG Fp1".to_string(), "Status".to_string()],
//!         samples_per_record: vec!["4".to_string(), "1".to_string()],
//!         ..Default::default()
//!     })?;
//!
//!     doc.push_record(DataRecord::from_samples(vec![
//!         vec![-8_388_608, -1, 0, 8_388_607],
//!         vec![42],
//!     ]))?;
//!
//!     let bytes = doc.encode()?;
//!     assert_eq!(bytes.len(), 768 + 5 * 3);
//!     assert_eq!(Document::decode(&bytes)?, doc);
//!     Ok(())
//! }
//! ```
//!
//! ## Sample widths
//!
//! Every channel of an EDF file uses 2-byte samples and every channel of a
//! BDF file 3-byte samples. A channel's `per-channel-reserved` field holding
//! exactly `2` or `3` overrides that default, which allows mixed-width records:
//!
//! ```rust
//! use edfcodec::{Header, HeaderOptions, SampleWidth};
//!
//! let header = Header::from_options(HeaderOptions {
//!     labels: vec!["EEG".to_string(), "Trigger".to_string()],
//!     samples_per_record: vec!["256".to_string(), "8".to_string()],
//!     signal_reserved: vec!["".to_string(), "3".to_string()],
//!     ..Default::default()
//! })?;
//!
//! assert_eq!(header.sample_width(0)?, SampleWidth::Two);
//! assert_eq!(header.sample_width(1)?, SampleWidth::Three);
//! assert_eq!(header.record_bytes()?, 256 * 2 + 8 * 3);
//! # Ok::<(), edfcodec::EdfError>(())
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod layout;
pub mod header;
pub mod sample;
pub mod record;
pub mod reader;
pub mod writer;
pub mod document;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{EdfError, Result};
pub use types::{Field, FieldLocation, FixedField, Format, HeaderOptions, SampleWidth, SignalField};
pub use header::Header;
pub use record::{ChannelLayout, DataRecord, RecordLayout};
pub use document::Document;
pub use layout::{FIXED_HEADER_BYTES, SIGNAL_HEADER_BYTES};
pub use reader::{decode_document, decode_document_lazy, decode_header};
pub use writer::{encode_document, encode_header};

// Important constants
pub const EDF_VERSION: [u8; 8] = *b"0       ";
pub const BDF_VERSION: [u8; 8] = [0xFF, b'B', b'I', b'O', b'S', b'E', b'M', b'I'];
pub const EDF_SAMPLE_BYTES: usize = 2;
pub const BDF_SAMPLE_BYTES: usize = 3;

/// Library version
///
/// Returns the current version of the edfcodec library.
///
/// # Examples
///
/// ```rust
/// let version = edfcodec::version();
/// assert!(!version.is_empty());
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
