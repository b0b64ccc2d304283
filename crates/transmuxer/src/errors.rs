use std::{fmt, io};

#[derive(Debug)]
pub enum TransmuxError {
    /// A video NALU arrived before any AVC sequence header had been seen.
    NoVideoSequenceHeader,
    /// An audio frame arrived before any `AudioSpecificConfig` had been seen.
    NoAudioSequenceHeader,
    /// The cached `nalu_length_size` wasn't one of `{1, 2, 4}`, or the
    /// length-prefixed NALU stream ran past the end of its tag payload.
    MalformedNalus,
    Flv(flv::FlvError),
    Io(io::Error),
}

impl From<flv::FlvError> for TransmuxError {
    fn from(err: flv::FlvError) -> Self {
        Self::Flv(err)
    }
}

impl From<io::Error> for TransmuxError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for TransmuxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoVideoSequenceHeader => write!(f, "video nalu before avc sequence header"),
            Self::NoAudioSequenceHeader => write!(f, "audio frame before aac sequence header"),
            Self::MalformedNalus => write!(f, "malformed length-prefixed nalu stream"),
            Self::Flv(err) => write!(f, "flv error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for TransmuxError {}
