use std::{fmt, io};

#[derive(Debug)]
pub enum AvcConfigError {
    /// Fewer than 8 bytes, or a length field ran past the end of the buffer.
    Truncated,
    /// Byte 0 of the record wasn't `0x01`.
    InvalidSignature(u8),
    /// This core only supports exactly one SPS/PPS; the record claimed a
    /// different count.
    UnsupportedParameterSetCount { field: &'static str, count: u8 },
}

impl From<io::Error> for AvcConfigError {
    fn from(_: io::Error) -> Self {
        Self::Truncated
    }
}

impl fmt::Display for AvcConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated avc decoder configuration record"),
            Self::InvalidSignature(byte) => {
                write!(f, "invalid avc configuration record signature: {:#04x}", byte)
            }
            Self::UnsupportedParameterSetCount { field, count } => {
                write!(f, "expected exactly one {field}, found {count}")
            }
        }
    }
}

impl std::error::Error for AvcConfigError {}
