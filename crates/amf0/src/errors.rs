use std::{fmt, io, str};

use super::define::{Amf0Marker, Amf0Value};

#[derive(Debug)]
pub enum Amf0ReadError {
    /// The input ended before the current value could be fully read.
    Truncated,
    /// A one-byte marker that doesn't correspond to a known `Amf0Marker`,
    /// or a reserved/AMF3-only marker this decoder won't parse.
    UnexpectedMarker(u8),
    /// An `Object`/`EcmaArray` property list didn't end with the
    /// `ObjectEnd` sentinel where one was required.
    ExpectedObjectEnd,
    /// The stream switched to AMF3 (marker `0x11`) and subsequent data was
    /// encountered; AMF3 decoding is out of scope.
    UnsupportedAmf3,
    StringParseError(str::Utf8Error),
}

impl From<io::Error> for Amf0ReadError {
    fn from(_: io::Error) -> Self {
        Self::Truncated
    }
}

impl From<str::Utf8Error> for Amf0ReadError {
    fn from(error: str::Utf8Error) -> Self {
        Self::StringParseError(error)
    }
}

#[derive(Debug)]
pub enum Amf0WriteError {
    /// A string's UTF-8 byte length exceeds the 16-bit length field (or,
    /// for `LongString`, the 32-bit length field).
    LengthOverflow,
    /// A reserved or parser-sentinel variant with no encode-side wire form.
    Unsupported(Amf0Value),
    IO(io::Error),
}

impl From<io::Error> for Amf0WriteError {
    fn from(error: io::Error) -> Self {
        Self::IO(error)
    }
}

impl fmt::Display for Amf0ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated amf0 value"),
            Self::UnexpectedMarker(marker) => {
                write!(f, "unexpected marker: {:#04x}", marker)
            }
            Self::ExpectedObjectEnd => write!(f, "expected object end marker"),
            Self::UnsupportedAmf3 => write!(f, "amf3 is not supported"),
            Self::StringParseError(err) => write!(f, "string parse error: {}", err),
        }
    }
}

impl fmt::Display for Amf0WriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::LengthOverflow => write!(f, "string too long to encode"),
            Self::Unsupported(value) => write!(f, "unsupported value: {:?}", value),
            Self::IO(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for Amf0ReadError {}
impl std::error::Error for Amf0WriteError {}

/// Maps a raw marker byte into the `UnexpectedMarker` variant, used both
/// for unknown bytes and for markers that are valid AMF0 but unsupported here.
pub(crate) fn unexpected(marker: Amf0Marker) -> Amf0ReadError {
    Amf0ReadError::UnexpectedMarker(marker as u8)
}
