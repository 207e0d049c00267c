//! Stored node values.
//!
//! Values are kept as UTF-8 bytes, optionally deflate-compressed. Hashing and
//! index notification always work on the decoded text.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{CoreError, CoreResult};

/// The value payload of a text, comment, processing-instruction or attribute node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    bytes: Vec<u8>,
    compressed: bool,
}

impl Value {
    /// Store `text` uncompressed.
    pub fn plain(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            compressed: false,
        }
    }

    /// Store `text`, deflating it when `compress` is set.
    pub fn encode(text: &str, compress: bool) -> CoreResult<Self> {
        if !compress {
            return Ok(Self::plain(text));
        }
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| CoreError::codec(e.to_string()))?;
        let bytes = encoder
            .finish()
            .map_err(|e| CoreError::codec(e.to_string()))?;
        Ok(Self {
            bytes,
            compressed: true,
        })
    }

    /// Decode the logical text.
    pub fn text(&self) -> CoreResult<String> {
        let raw = if self.compressed {
            let mut decoded = Vec::new();
            DeflateDecoder::new(self.bytes.as_slice())
                .read_to_end(&mut decoded)
                .map_err(|e| CoreError::codec(e.to_string()))?;
            decoded
        } else {
            self.bytes.clone()
        };
        String::from_utf8(raw).map_err(|e| CoreError::codec(e.to_string()))
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Stored byte length (after compression, if any).
    pub fn stored_len(&self) -> usize {
        self.bytes.len()
    }
}
