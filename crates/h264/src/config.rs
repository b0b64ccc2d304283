use std::io::{self, Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use bytesio::bytes_reader::BytesCursor;
use bytesio::bytes_writer::BytesWriter;

use crate::errors::AvcConfigError;

/// `AVCDecoderConfigurationRecord`, ISO/IEC 14496-15 section 5.3.2.1.
///
/// This core assumes exactly one SPS and one PPS, rejecting any other
/// count rather than generalizing to sequences of parameter sets.
#[derive(Debug, Clone, PartialEq)]
pub struct AvcDecoderConfigurationRecord {
    pub profile_indication: u8,
    pub profile_compatibility: u8,
    pub level_indication: u8,
    pub nalu_length_size: u8,
    pub sps: Bytes,
    pub pps: Bytes,
}

impl AvcDecoderConfigurationRecord {
    /// Parses a sequence-header payload into its configuration record.
    pub fn demux(reader: &mut Cursor<Bytes>) -> Result<Self, AvcConfigError> {
        if reader.get_ref().len() < 8 {
            return Err(AvcConfigError::Truncated);
        }

        let version = reader.read_u8()?;
        if version != 0x01 {
            return Err(AvcConfigError::InvalidSignature(version));
        }

        let profile_indication = reader.read_u8()?;
        let profile_compatibility = reader.read_u8()?;
        let level_indication = reader.read_u8()?;

        let nalu_length_size = (reader.read_u8()? & 0b0000_0011) + 1;

        let num_sps = reader.read_u8()? & 0b0001_1111;
        if num_sps != 1 {
            return Err(AvcConfigError::UnsupportedParameterSetCount {
                field: "sps",
                count: num_sps,
            });
        }
        let sps_len = reader.read_u16::<BigEndian>()?;
        let sps = reader.read_slice(sps_len as usize)?;

        let num_pps = reader.read_u8()?;
        if num_pps != 1 {
            return Err(AvcConfigError::UnsupportedParameterSetCount {
                field: "pps",
                count: num_pps,
            });
        }
        let pps_len = reader.read_u16::<BigEndian>()?;
        let pps = reader.read_slice(pps_len as usize)?;

        // Trailing high-profile extension bytes, if any, are ignored.

        Ok(Self {
            profile_indication,
            profile_compatibility,
            level_indication,
            nalu_length_size,
            sps,
            pps,
        })
    }

    /// Serializes the record. Bytes 0..6 are
    /// `[0x01, sps[1], sps[2], sps[3], 0xFF, 0xE1]`, derived straight from
    /// the stored SPS bytes rather than from separately cached profile
    /// fields — `0xFF` fixes `length_size_minus_one = 0b11` (4-byte NALU
    /// lengths) and `0xE1` packs the 3 reserved high bits plus
    /// `num_sps = 1`.
    pub fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        writer.write_u8(0x01)?;
        writer.write_u8(self.sps.get(1).copied().unwrap_or(0))?;
        writer.write_u8(self.sps.get(2).copied().unwrap_or(0))?;
        writer.write_u8(self.sps.get(3).copied().unwrap_or(0))?;
        writer.write_u8(0xff)?;
        writer.write_u8(0xe1)?;

        writer.write_u16::<BigEndian>(self.sps.len() as u16)?;
        writer.write_all(&self.sps)?;

        writer.write_u8(0x01)?;
        writer.write_u16::<BigEndian>(self.pps.len() as u16)?;
        writer.write_all(&self.pps)?;

        Ok(())
    }
}

/// Splits a length-prefixed NALU stream (AVCC) into individual NALUs using
/// the given length-field width. `nalu_length_size` values outside
/// `{1, 2, 4}` make the stream unparseable — callers should treat that as
/// a malformed file.
pub fn split_nalus(data: &Bytes, nalu_length_size: u8) -> Result<Vec<Bytes>, AvcConfigError> {
    if !matches!(nalu_length_size, 1 | 2 | 4) {
        return Err(AvcConfigError::UnsupportedParameterSetCount {
            field: "nalu_length_size",
            count: nalu_length_size,
        });
    }

    let mut cursor = Cursor::new(data.clone());
    let mut nalus = Vec::new();

    while cursor.position() < cursor.get_ref().len() as u64 {
        let len = match nalu_length_size {
            1 => cursor.read_u8().map(|v| v as u32)?,
            2 => cursor.read_u16::<BigEndian>().map(|v| v as u32)?,
            4 => cursor.read_u32::<BigEndian>()?,
            _ => unreachable!(),
        };

        nalus.push(cursor.read_slice(len as usize)?);
    }

    Ok(nalus)
}

/// Re-packages NALUs into a length-prefixed AVCC byte stream, the inverse
/// of [`split_nalus`]. Used by the mux path when turning Annex-B input back
/// into an FLV video tag payload.
pub fn join_nalus(nalus: &[Bytes], nalu_length_size: u8, writer: &mut BytesWriter) -> io::Result<()> {
    for nalu in nalus {
        match nalu_length_size {
            1 => writer.write_u8(nalu.len() as u8)?,
            2 => writer.write_u16::<BigEndian>(nalu.len() as u16)?,
            4 => writer.write_u32::<BigEndian>(nalu.len() as u32)?,
            _ => unreachable!("nalu_length_size is validated to be 1, 2, or 4"),
        }
        writer.write_all(nalu)?;
    }
    Ok(())
}

/// Splits an Annex-B byte stream (NALUs prefixed by `00 00 01` or
/// `00 00 00 01` start codes) into individual NALUs with the start codes
/// stripped. Used by the mux path to turn a `.h264` file back into the
/// length-prefixed NALUs an AVC video tag payload carries.
pub fn nalus_from_annex_b(data: &Bytes) -> Vec<Bytes> {
    // (offset where the start code begins, offset right after it where the NALU begins)
    let mut markers = Vec::new();
    let mut i = 0;
    while i + 3 <= data.len() {
        if data[i] == 0 && data[i + 1] == 0 {
            if i + 4 <= data.len() && data[i + 2] == 0 && data[i + 3] == 1 {
                markers.push((i, i + 4));
                i += 4;
                continue;
            }
            if data[i + 2] == 1 {
                markers.push((i, i + 3));
                i += 3;
                continue;
            }
        }
        i += 1;
    }

    let mut nalus = Vec::with_capacity(markers.len());
    for (index, &(_, start)) in markers.iter().enumerate() {
        let end = markers.get(index + 1).map(|&(code_start, _)| code_start).unwrap_or(data.len());
        nalus.push(data.slice(start..end));
    }
    nalus
}
