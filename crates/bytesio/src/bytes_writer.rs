use std::io;

use bytes::Bytes;

/// A plain growable byte sink implementing `io::Write`, used as the target
/// for every codec's `mux`/`write`/`encode` side.
#[derive(Default)]
pub struct BytesWriter {
    bytes: Vec<u8>,
}

impl BytesWriter {
    pub fn dispose(self) -> Bytes {
        self.bytes.into()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl io::Write for BytesWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
