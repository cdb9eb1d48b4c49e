mod parser;
mod properties;
mod writer;

use std::fmt;
use std::str::FromStr;

pub use parser::*;
pub use properties::*;
pub use writer::*;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file
    #[error("Failed to read or write PLY file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a binary vertex
    #[error("Failed to serialize PLY vertex: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failed to deserialize a binary vertex
    #[error("Failed to deserialize PLY vertex: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// The header is malformed
    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    /// A vertex line of an ascii payload is malformed
    #[error("Invalid PLY vertex at line {line}: {reason}")]
    InvalidVertex {
        /// 1-based index of the vertex in the payload.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Unsupported PLY property
    #[error("Unsupported PLY property: {0}")]
    UnsupportedProperty(String),
}

/// Encoding of the payload following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Numbers in their ascii representation, one vertex per line.
    #[default]
    Ascii,
    /// Packed records, little endian.
    BinaryLittleEndian,
    /// Packed records, big endian.
    BinaryBigEndian,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Encoding::Ascii => "ascii",
            Encoding::BinaryLittleEndian => "binary_little_endian",
            Encoding::BinaryBigEndian => "binary_big_endian",
        })
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Encoding::Ascii),
            "binary_little_endian" => Ok(Encoding::BinaryLittleEndian),
            "binary_big_endian" => Ok(Encoding::BinaryBigEndian),
            _ => Err(format!(
                "Unsupported PLY format: {s}. Valid arguments: ascii, binary_little_endian or binary_big_endian"
            )),
        }
    }
}
