//! Text reading with UTF-8 fast path and detection fallback.
//!
//! Source trees are mostly UTF-8; everything else is decoded via chardetng
//! detection with replacement characters rather than rejected outright.

use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const SAMPLE_SIZE: usize = 8192;

/// Read a file as text, preserving content exactly when it is valid UTF-8.
///
/// Non-UTF-8 files go through encoding detection and are decoded with
/// replacement for invalid sequences.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    if let Ok(content) = std::str::from_utf8(&bytes) {
        return Ok(content.to_string());
    }

    let encoding = detect_encoding(&bytes);
    let (decoded, _, _) = encoding.decode(&bytes);
    Ok(decoded.into_owned())
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];

    // BOMs first, they are unambiguous.
    if sample.starts_with(&[0xef, 0xbb, 0xbf]) {
        return encoding_rs::UTF_8;
    }
    if sample.starts_with(&[0xff, 0xfe]) {
        return encoding_rs::UTF_16LE;
    }
    if sample.starts_with(&[0xfe, 0xff]) {
        return encoding_rs::UTF_16BE;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    detector.guess(None, true)
}

/// Sample the first bytes of a file and report whether they look binary.
///
/// Null bytes are a strong indicator; otherwise a low ratio of printable
/// ASCII (below 70%) marks the sample as binary.
pub fn is_binary_sample(path: &Path) -> Result<bool> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut sample = vec![0u8; SAMPLE_SIZE];
    let bytes_read = file.read(&mut sample)?;
    sample.truncate(bytes_read);

    if sample.is_empty() {
        return Ok(false);
    }
    if sample.contains(&0) {
        return Ok(true);
    }

    let printable = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == b'\t' || b == b'\n' || b == b'\r')
        .count();
    Ok((printable as f64 / sample.len() as f64) < 0.70)
}
