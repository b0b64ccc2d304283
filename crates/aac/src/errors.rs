use std::{fmt, io};

#[derive(Debug)]
pub enum AacConfigError {
    /// Ran out of bits before the chosen decode path (baseline, explicit
    /// frequency, extended AOT, or both) could be completed.
    Truncated,
    /// An ADTS frame's 12-bit sync word wasn't `0xFFF`.
    InvalidSyncWord,
}

impl From<io::Error> for AacConfigError {
    fn from(_: io::Error) -> Self {
        Self::Truncated
    }
}

impl fmt::Display for AacConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated AudioSpecificConfig"),
            Self::InvalidSyncWord => write!(f, "invalid adts sync word"),
        }
    }
}

impl std::error::Error for AacConfigError {}
