use std::io::{self, SeekFrom};

use byteorder::ReadBytesExt;
use bytes::{Buf, Bytes};

/// Reads individual bits out of an underlying byte source, MSB first.
///
/// Used by the AAC `AudioSpecificConfig` decoder and the AVC SPS parser,
/// both of which cross byte boundaries at arbitrary bit offsets.
pub struct BitReader<T: io::Read = io::Cursor<Bytes>> {
    data: T,
    bit_pos: usize,
    current_byte: u8,
}

impl<T: Into<Bytes>> From<T> for BitReader<io::Cursor<Bytes>> {
    fn from(bytes: T) -> Self {
        Self::new(io::Cursor::new(bytes.into()))
    }
}

impl<T: io::Read> BitReader<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            bit_pos: 0,
            current_byte: 0,
        }
    }

    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.is_aligned() {
            self.current_byte = self.data.read_u8()?;
        }

        let bit = (self.current_byte >> (7 - self.bit_pos)) & 1;

        self.bit_pos += 1;
        self.bit_pos %= 8;

        Ok(bit == 1)
    }

    /// Reads `count` bits (up to 64) MSB first into the low bits of a `u64`.
    pub fn read_bits(&mut self, count: u8) -> io::Result<u64> {
        let mut bits = 0;
        for _ in 0..count {
            let bit = self.read_bit()?;
            bits <<= 1;
            bits |= bit as u64;
        }

        Ok(bits)
    }

    pub fn into_inner(self) -> T {
        self.data
    }

    pub fn get_ref(&self) -> &T {
        &self.data
    }

    pub fn is_aligned(&self) -> bool {
        self.bit_pos == 0
    }

    pub fn align(&mut self) -> io::Result<()> {
        let amount_to_read = 8 - self.bit_pos;
        if amount_to_read != 8 {
            self.read_bits(amount_to_read as u8)?;
        }
        Ok(())
    }
}

impl<T: AsRef<[u8]>> BitReader<io::Cursor<T>> {
    pub fn is_empty(&self) -> bool {
        self.data.position() as usize == self.data.get_ref().as_ref().len()
    }

    pub fn remaining_bits(&self) -> usize {
        let remaining = self.data.remaining();

        if self.is_aligned() {
            remaining * 8
        } else {
            remaining * 8 + 8 - self.bit_pos
        }
    }
}

impl<T: io::Seek + io::Read> io::Seek for BitReader<T> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Start(pos) => {
                self.data.seek(SeekFrom::Start(pos / 8))?;
                self.bit_pos = (pos % 8) as usize;
            }
            SeekFrom::Current(_) | SeekFrom::End(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "only SeekFrom::Start is supported for bit cursors",
                ));
            }
        }

        self.data.stream_position()
    }
}
