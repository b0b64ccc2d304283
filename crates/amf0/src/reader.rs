use std::io::{Cursor, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use num_traits::FromPrimitive;

use super::define::{Amf0Marker, Amf0Object, Amf0Value};
use super::errors::{unexpected, Amf0ReadError};

pub struct Amf0Reader {
    cursor: Cursor<Bytes>,
    /// 0 while decoding AMF0, 3 once a `SwitchAmf3` marker has been seen.
    version: u8,
}

impl Amf0Reader {
    pub fn new(buff: Bytes) -> Self {
        Self {
            cursor: Cursor::new(buff),
            version: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.cursor.get_ref().len() == self.cursor.position() as usize
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, Amf0ReadError> {
        let pos = self.cursor.position() as usize;
        if pos + len > self.cursor.get_ref().len() {
            return Err(Amf0ReadError::Truncated);
        }
        self.cursor.seek(SeekFrom::Current(len as i64))?;
        Ok(self.cursor.get_ref().slice(pos..pos + len))
    }

    /// Decodes every value remaining in the stream, in order.
    pub fn read_all(&mut self) -> Result<Vec<Amf0Value>, Amf0ReadError> {
        let mut results = vec![];

        while !self.is_empty() {
            match self.read_any()? {
                Amf0Value::ObjectEnd => break,
                value => results.push(value),
            }
        }

        Ok(results)
    }

    pub fn read_any(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        if self.version == 3 {
            return Err(Amf0ReadError::UnsupportedAmf3);
        }

        if self.is_empty() {
            return Ok(Amf0Value::ObjectEnd);
        }

        let marker = self.cursor.read_u8()?;
        let marker = Amf0Marker::from_u8(marker).ok_or(Amf0ReadError::UnexpectedMarker(marker))?;

        match marker {
            Amf0Marker::Number => self.read_number(),
            Amf0Marker::Boolean => self.read_bool(),
            Amf0Marker::String => self.read_string(),
            Amf0Marker::Object => self.read_object(),
            Amf0Marker::Null => Ok(Amf0Value::Null),
            Amf0Marker::Undefined => Ok(Amf0Value::Undefined),
            Amf0Marker::EcmaArray => self.read_ecma_array(),
            Amf0Marker::StrictArray => self.read_strict_array(),
            Amf0Marker::LongString => self.read_long_string(),
            Amf0Marker::SwitchAmf3 => {
                self.version = 3;
                Err(Amf0ReadError::UnsupportedAmf3)
            }
            Amf0Marker::ObjectEnd => Ok(Amf0Value::ObjectEnd),
            other => Err(unexpected(other)),
        }
    }

    pub fn read_number(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        let number = self.cursor.read_f64::<BigEndian>()?;
        Ok(Amf0Value::Number(number))
    }

    pub fn read_bool(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        let value = self.cursor.read_u8()?;
        Ok(Amf0Value::Boolean(value == 1))
    }

    fn read_raw_string(&mut self) -> Result<String, Amf0ReadError> {
        let len = self.cursor.read_u16::<BigEndian>()?;
        let bytes = self.read_bytes(len as usize)?;
        Ok(std::str::from_utf8(&bytes)?.to_string())
    }

    pub fn read_string(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        Ok(Amf0Value::String(self.read_raw_string()?))
    }

    pub fn read_long_string(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        let len = self.cursor.read_u32::<BigEndian>()?;
        let bytes = self.read_bytes(len as usize)?;
        Ok(Amf0Value::LongString(std::str::from_utf8(&bytes)?.to_string()))
    }

    fn read_property_list(&mut self) -> Result<Amf0Object, Amf0ReadError> {
        let mut properties = Amf0Object::new();

        loop {
            let key_len = self.cursor.read_u16::<BigEndian>()?;
            if key_len == 0 {
                let marker = self.cursor.read_u8()?;
                if marker != Amf0Marker::ObjectEnd as u8 {
                    return Err(Amf0ReadError::ExpectedObjectEnd);
                }
                break;
            }

            let key_bytes = self.read_bytes(key_len as usize)?;
            let key = std::str::from_utf8(&key_bytes)?.to_string();
            let value = self.read_any()?;
            properties.push(key, value);
        }

        Ok(properties)
    }

    pub fn read_object(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        Ok(Amf0Value::Object(self.read_property_list()?))
    }

    pub fn read_ecma_array(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        // The 32-bit entry count is advisory; we don't rely on it, we
        // terminate on the empty-key sentinel like Object does.
        let _count = self.cursor.read_u32::<BigEndian>()?;
        Ok(Amf0Value::EcmaArray(self.read_property_list()?))
    }

    pub fn read_strict_array(&mut self) -> Result<Amf0Value, Amf0ReadError> {
        let count = self.cursor.read_u32::<BigEndian>()?;
        let mut values = Vec::with_capacity(count as usize);
        for _ in 0..count {
            values.push(self.read_any()?);
        }
        Ok(Amf0Value::StrictArray(values))
    }
}
