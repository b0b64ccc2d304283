use std::io::{Cursor, Write};

use bytes::Bytes;

use crate::bit_reader::BitReader;
use crate::bit_writer::BitWriter;
use crate::bytes_reader::BytesCursor;
use crate::bytes_writer::BytesWriter;

#[test]
fn bit_reader_reads_msb_first() {
    let mut reader = BitReader::from(Bytes::from_static(&[0b1010_1100]));
    assert!(reader.read_bit().unwrap());
    assert!(!reader.read_bit().unwrap());
    assert!(reader.read_bit().unwrap());
    assert!(!reader.read_bit().unwrap());
    assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
}

#[test]
fn bit_reader_crosses_byte_boundary() {
    let mut reader = BitReader::from(Bytes::from_static(&[0b0001_0010, 0b0001_0000]));
    reader.read_bits(5).unwrap();
    assert_eq!(reader.read_bits(4).unwrap(), 0b1000);
}

#[test]
fn bit_writer_round_trips_through_bit_reader() {
    let mut writer = BitWriter::default();
    writer.write_bits(0b10110, 5).unwrap();
    writer.write_bits(0b1001, 4).unwrap();
    writer.align().unwrap();

    let bytes = Bytes::from(writer.into_inner());
    let mut reader = BitReader::from(bytes);
    assert_eq!(reader.read_bits(5).unwrap(), 0b10110);
    assert_eq!(reader.read_bits(4).unwrap(), 0b1001);
}

#[test]
fn bytes_writer_accumulates_writes() {
    let mut writer = BytesWriter::default();
    writer.write_all(&[1, 2, 3]).unwrap();
    writer.write_all(&[4, 5]).unwrap();
    assert_eq!(writer.dispose(), Bytes::from_static(&[1, 2, 3, 4, 5]));
}

#[test]
fn bytes_cursor_read_slice_advances_position() {
    let mut cursor = Cursor::new(Bytes::from_static(&[1, 2, 3, 4, 5]));
    let slice = cursor.read_slice(3).unwrap();
    assert_eq!(slice, Bytes::from_static(&[1, 2, 3]));
    assert_eq!(cursor.get_remaining(), Bytes::from_static(&[4, 5]));
}

#[test]
fn bytes_cursor_read_slice_rejects_overrun() {
    let mut cursor = Cursor::new(Bytes::from_static(&[1, 2, 3]));
    assert!(cursor.read_slice(4).is_err());
}
