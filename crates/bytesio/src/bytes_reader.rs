use std::io;

use bytes::Bytes;

/// Extension methods for reading length-delimited slices out of a
/// `io::Cursor<Bytes>` without copying.
pub trait BytesCursor {
    fn get_remaining(&self) -> Bytes;
    fn read_slice(&mut self, size: usize) -> io::Result<Bytes>;
}

impl BytesCursor for io::Cursor<Bytes> {
    fn get_remaining(&self) -> Bytes {
        let position = self.position() as usize;
        self.get_ref().slice(position..)
    }

    fn read_slice(&mut self, size: usize) -> io::Result<Bytes> {
        let position = self.position() as usize;
        if position + size > self.get_ref().len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "not enough bytes",
            ));
        }

        let slice = self.get_ref().slice(position..position + size);
        self.set_position((position + size) as u64);

        Ok(slice)
    }
}

/// True once the cursor has consumed every byte of the underlying buffer.
pub fn is_empty(cursor: &io::Cursor<Bytes>) -> bool {
    cursor.position() as usize == cursor.get_ref().len()
}
