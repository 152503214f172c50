// Internal helpers for documentation tests
// Builds small in-memory documents so doctests need no fixture files

use crate::{DataRecord, Document, Format, HeaderOptions, Result};

/// One second of a sine wave scaled to `amplitude` digital units
fn sine(frequency: f64, amplitude: f64, samples: usize) -> Vec<i32> {
    (0..samples)
        .map(|i| {
            let t = i as f64 / samples as f64;
            (amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()).round() as i32
        })
        .collect()
}

fn two_channel_options(version: Format) -> HeaderOptions {
    HeaderOptions {
        version,
        patient_id: "DOC001 M 01-JAN-1990 Test_Patient".to_string(),
        recording_id: "Startdate 13-FEB-2026 X X X".to_string(),
        start_date: "13.02.26".to_string(),
        start_time: "09.30.00".to_string(),
        record_count: "0".to_string(),
        record_duration: "1".to_string(),
        labels: vec!["EEG Fp1".to_string(), "EEG Fpz-Cz".to_string()],
        transducer_types: vec!["AgAgCl cup electrodes".to_string(); 2],
        physical_dimensions: vec!["uV".to_string(); 2],
        physical_mins: vec!["-200".to_string(); 2],
        physical_maxs: vec!["200".to_string(); 2],
        prefilters: vec!["HP:0.1Hz LP:70Hz".to_string(); 2],
        samples_per_record: vec!["256".to_string(), "128".to_string()],
        ..Default::default()
    }
}

fn fill(mut doc: Document, records: usize, amplitude: f64) -> Result<Document> {
    for _ in 0..records {
        doc.push_record(DataRecord::from_samples(vec![
            sine(10.0, amplitude, 256),
            sine(2.0, amplitude / 2.0, 128),
        ]))?;
    }
    Ok(doc)
}

/// A two-channel 16-bit EDF document with two one-second records
pub fn sample_edf() -> Result<Document> {
    let mut options = two_channel_options(Format::Edf);
    options.digital_mins = vec!["-32768".to_string(); 2];
    options.digital_maxs = vec!["32767".to_string(); 2];
    fill(Document::new(options)?, 2, 16_000.0)
}

/// The same recording as [`sample_edf`] at BDF's 24-bit width
pub fn sample_bdf() -> Result<Document> {
    let mut options = two_channel_options(Format::Bdf);
    options.digital_mins = vec!["-8388608".to_string(); 2];
    options.digital_maxs = vec!["8388607".to_string(); 2];
    fill(Document::new(options)?, 2, 4_000_000.0)
}
