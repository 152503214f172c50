use log::debug;

use crate::error::{EdfError, Result};
use crate::header::Header;
use crate::layout::total_header_bytes;
use crate::reader::{decode_document, decode_document_lazy};
use crate::record::DataRecord;
use crate::types::{FixedField, Format, HeaderOptions};
use crate::utils::unpack_str;
use crate::writer::encode_document;

/// A header together with its data records.
///
/// # Examples
///
/// ```rust
/// use edfcodec::{DataRecord, Document, HeaderOptions};
///
/// let mut doc = Document::new(HeaderOptions {
///     record_count: "-1".to_string(),
///     record_duration: "1".to_string(),
///     labels: vec!["ECG".to_string()],
///     samples_per_record: vec!["4".to_string()],
///     ..Default::default()
/// })?;
///
/// doc.push_record(DataRecord::from_samples(vec![vec![0, 1, 2, 3]]))?;
/// doc.push_record(DataRecord::from_samples(vec![vec![4, 5, 6, 7]]))?;
///
/// let bytes = doc.encode()?;
/// assert_eq!(bytes.len(), doc.encoded_len()?);
///
/// let decoded = Document::decode(&bytes)?;
/// assert_eq!(decoded, doc);
/// assert_eq!(decoded.signal(0)?, vec![0, 1, 2, 3, 4, 5, 6, 7]);
/// # Ok::<(), edfcodec::EdfError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    header: Header,
    records: Vec<DataRecord>,
}

impl Document {
    /// Builds a document with no records from named header fields
    pub fn new(options: HeaderOptions) -> Result<Self> {
        Ok(Self {
            header: Header::from_options(options)?,
            records: Vec::new(),
        })
    }

    /// Assembles a document without checking it; see [`Document::validate`]
    pub fn from_parts(header: Header, records: Vec<DataRecord>) -> Self {
        Self { header, records }
    }

    /// Decodes a complete buffer
    pub fn decode(buffer: &[u8]) -> Result<Self> {
        decode_document(buffer)
    }

    /// Decodes a complete buffer, deferring sample decoding per record
    pub fn decode_lazy(buffer: &[u8]) -> Result<Self> {
        decode_document_lazy(buffer)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_document(self)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Mutable header access; re-run [`Document::validate`] after edits
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn records(&self) -> &[DataRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [DataRecord] {
        &mut self.records
    }

    pub fn into_parts(self) -> (Header, Vec<DataRecord>) {
        (self.header, self.records)
    }

    pub fn format(&self) -> Option<Format> {
        self.header.format()
    }

    /// Appends a record after checking it against the header's record layout.
    ///
    /// Unless the header declares an unknown count (-1), `data-record-count`
    /// is updated to the new number of records.
    pub fn push_record(&mut self, record: DataRecord) -> Result<()> {
        let layout = self.header.record_layout()?;
        record.check(self.records.len(), &layout)?;
        self.records.push(record);

        if self.header.record_count()?.is_some() {
            self.header
                .set_fixed(FixedField::RecordCount, &self.records.len().to_string())?;
        }
        Ok(())
    }

    /// Samples of one channel concatenated across all records.
    ///
    /// Lazily decoded records are decoded into a temporary copy. Records
    /// that do not match the header's record layout are reported, not skipped.
    pub fn signal(&self, channel: usize) -> Result<Vec<i32>> {
        let layout = self.header.record_layout()?;
        let samples = layout
            .channels()
            .get(channel)
            .ok_or(EdfError::ChannelOutOfRange {
                channel,
                ns: layout.channel_count(),
            })?
            .samples;

        let mut out = Vec::with_capacity(samples * self.records.len());
        for (index, record) in self.records.iter().enumerate() {
            record.check(index, &layout)?;
            match record.channel(channel) {
                Some(values) => out.extend_from_slice(values),
                None => {
                    let mut copy = record.clone();
                    let decoded = copy.materialize(&layout)?;
                    let values = decoded.get(channel).ok_or(EdfError::ChannelCountMismatch {
                        record: index,
                        expected: layout.channel_count(),
                        found: decoded.len(),
                    })?;
                    out.extend_from_slice(values);
                }
            }
        }
        Ok(out)
    }

    /// Size in bytes of the encoded document
    pub fn encoded_len(&self) -> Result<usize> {
        let layout = self.header.record_layout()?;
        Ok(total_header_bytes(layout.channel_count()) + layout.record_bytes() * self.records.len())
    }

    /// Checks the invariants a well-formed document holds: a known version
    /// tag, a valid header, a record count matching the header (unless it is
    /// -1), and every record shaped after the header's record layout.
    pub fn validate(&self) -> Result<()> {
        if self.header.format().is_none() {
            return Err(EdfError::UnknownVersion(unpack_str(
                self.header.fixed_bytes(FixedField::Version),
            )));
        }
        self.header.validate()?;

        if let Some(declared) = self.header.record_count()? {
            if declared != self.records.len() {
                return Err(EdfError::RecordCountMismatch {
                    declared: declared as i64,
                    found: self.records.len(),
                });
            }
        }

        let layout = self.header.record_layout()?;
        for (index, record) in self.records.iter().enumerate() {
            record.check(index, &layout)?;
        }

        debug!(
            "document valid: ns={}, records={}",
            layout.channel_count(),
            self.records.len()
        );
        Ok(())
    }
}
