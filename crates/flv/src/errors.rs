use std::{fmt, io};

#[derive(Debug)]
pub enum FlvError {
    /// Fewer bytes remained than a header or tag header needs.
    Truncated,
    /// The first 3 bytes of the file weren't ASCII `FLV`.
    InvalidSignature,
    /// Fewer than `11 + data_size + 4` bytes remained for the next tag;
    /// the scan stops here rather than reading past the buffer.
    IncompleteTag,
    /// The 4-byte back-pointer trailing a tag didn't equal `11 + data_size`.
    InconsistentBackpointer { expected: u32, found: u32 },
    Io(io::Error),
}

impl From<io::Error> for FlvError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl fmt::Display for FlvError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated flv data"),
            Self::InvalidSignature => write!(f, "invalid flv file signature"),
            Self::IncompleteTag => write!(f, "incomplete trailing tag"),
            Self::InconsistentBackpointer { expected, found } => write!(
                f,
                "inconsistent tag back-pointer: expected {expected}, found {found}"
            ),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for FlvError {}
