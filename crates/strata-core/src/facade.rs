//! # Facade
//!
//! `VideoConverter` turns a file name and a target format into a converted
//! result through one call. The codec lookup, bitrate reading and audio fixing
//! steps stay private to this module.

use crate::types::Render;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compression codec picked for the destination format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Codec {
    Mpeg4,
    Ogg,
}

impl Codec {
    /// `"mp4"` selects MPEG-4, every other format selects Ogg.
    #[must_use]
    pub fn for_format(format: &str) -> Self {
        if format == "mp4" { Self::Mpeg4 } else { Self::Ogg }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mpeg4 => write!(f, "mpeg4"),
            Self::Ogg => write!(f, "ogg"),
        }
    }
}

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub source: String,
    pub format: String,
    pub codec: Codec,
    /// Subsystem steps in the order they ran.
    pub steps: Vec<String>,
}

// =============================================================================
// SUBSYSTEM
// =============================================================================

fn extract_source(filename: &str, log: &mut Render) -> String {
    log.push(format!("extract codec from {filename}"));
    filename.to_string()
}

fn read_bitrate(source: &str, log: &mut Render) -> String {
    log.push(format!("read {source}"));
    source.to_string()
}

fn convert_buffer(buffer: String, codec: Codec, log: &mut Render) -> String {
    log.push(format!("convert to {codec}"));
    buffer
}

fn fix_audio(buffer: String, log: &mut Render) -> String {
    log.push("fix audio".to_string());
    buffer
}

// =============================================================================
// FACADE
// =============================================================================

/// Single entry point over the conversion subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct VideoConverter;

impl VideoConverter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Convert `filename` into `format`.
    pub fn convert(&self, filename: &str, format: &str) -> Conversion {
        let mut log = Render::new();
        let codec = Codec::for_format(format);

        let source = extract_source(filename, &mut log);
        let buffer = read_bitrate(&source, &mut log);
        let converted = convert_buffer(buffer, codec, &mut log);
        let source = fix_audio(converted, &mut log);

        tracing::debug!(%source, format, %codec, "video converted");

        Conversion {
            source,
            format: format.to_string(),
            codec,
            steps: log.into_lines(),
        }
    }
}
