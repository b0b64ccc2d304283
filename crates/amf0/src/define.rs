use num_derive::FromPrimitive;

/// AMF0 marker types.
/// Defined in amf0_spec_121207.pdf section 2.1
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    Number = 0x00,
    Boolean = 0x01,
    String = 0x02,
    Object = 0x03,
    MovieClip = 0x04, // reserved, not supported
    Null = 0x05,
    Undefined = 0x06,
    Reference = 0x07,
    EcmaArray = 0x08,
    ObjectEnd = 0x09,
    StrictArray = 0x0a,
    Date = 0x0b,
    LongString = 0x0c,
    Unsupported = 0x0d,
    RecordSet = 0x0e, // reserved, not supported
    XmlDocument = 0x0f,
    TypedObject = 0x10,
    SwitchAmf3 = 0x11,
}

/// An ordered sequence of key/value pairs.
///
/// AMF0 objects and ECMA arrays are encoded as a flat stream of
/// `<key><value>` pairs, not a set with unique keys: re-encoding must
/// reproduce the original order, and a key that appears twice on the wire
/// (malformed or not) must round-trip as two entries rather than silently
/// collapsing. A `HashMap` can't express either property, so this is a
/// plain `Vec` wrapped with map-like convenience accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Amf0Object(pub Vec<(String, Amf0Value)>);

impl Amf0Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Amf0Value) {
        self.0.push((key.into(), value));
    }

    /// Returns the value for the first matching key, if any.
    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Amf0Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Amf0Value)> for Amf0Object {
    fn from_iter<T: IntoIterator<Item = (String, Amf0Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Amf0Value {
    /// Number Type defined section 2.2
    Number(f64),
    /// Boolean Type defined section 2.3
    Boolean(bool),
    /// String Type defined section 2.4
    String(String),
    /// Object Type defined section 2.5
    Object(Amf0Object),
    /// Null Type defined section 2.7
    Null,
    /// Undefined Type defined section 2.8
    Undefined,
    /// ECMA Array Type defined section 2.10
    EcmaArray(Amf0Object),
    /// Strict Array Type defined section 2.12
    StrictArray(Vec<Amf0Value>),
    /// LongString Type defined section 2.14
    LongString(String),
    /// Reserved, never produced by the decoder's public API: a parser
    /// sentinel marking the end of an `Object`/`EcmaArray` property list.
    ObjectEnd,
    /// Reserved marker types this core declares unsupported. Kept as
    /// variants so a caller matching exhaustively on `Amf0Value` can see
    /// them named, even though the decoder never constructs them.
    MovieClip,
    Reference,
    Date,
    Unsupported,
    RecordSet,
    XmlDocument,
    TypedObject,
}
