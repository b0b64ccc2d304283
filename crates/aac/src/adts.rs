use std::io;

use bytes::Bytes;
use bytesio::bit_reader::BitReader;
use bytesio::bit_writer::BitWriter;

use crate::config::SAMPLE_RATE_TABLE;
use crate::errors::AacConfigError;

/// One ADTS frame split out of a `.aac` file: the decoded sample rate and
/// channel count from its header, and the raw access unit body (header
/// stripped).
#[derive(Debug, Clone, PartialEq)]
pub struct AdtsFrame {
    pub sample_rate_hz: u32,
    pub channels: u8,
    pub body: Bytes,
}

/// Parses one ADTS header plus its access unit body off the front of
/// `data`, returning the frame and the remaining unconsumed bytes. This is
/// the inverse of [`build_adts_header`], used by the mux path to recover
/// `(sample_rate, channels)` from a plain `.aac` input file.
pub fn parse_adts_frame(data: Bytes) -> Result<(AdtsFrame, Bytes), AacConfigError> {
    if data.len() < 7 {
        return Err(AacConfigError::Truncated);
    }

    let mut reader = BitReader::from(data.clone());

    let sync_word = reader.read_bits(12)?;
    if sync_word != 0xFFF {
        return Err(AacConfigError::InvalidSyncWord);
    }

    reader.read_bits(1)?; // id
    reader.read_bits(2)?; // layer
    reader.read_bits(1)?; // protection_absent
    reader.read_bits(2)?; // profile_minus_one

    let sampling_frequency_index = reader.read_bits(4)? as u8;
    // Reserved (13, 14) and escape (15, no explicit rate follows in ADTS)
    // indices all decode to rate 0 rather than erroring.
    let sample_rate_hz = SAMPLE_RATE_TABLE
        .get(sampling_frequency_index as usize)
        .copied()
        .unwrap_or(0);

    reader.read_bits(1)?; // private_bit
    let channel_configuration = reader.read_bits(3)? as u8;
    let channels = if channel_configuration == 7 { 8 } else { channel_configuration };

    reader.read_bits(1)?; // original_copy
    reader.read_bits(1)?; // home
    reader.read_bits(1)?; // copyright_identification_bit
    reader.read_bits(1)?; // copyright_identification_start

    let aac_frame_length = reader.read_bits(13)? as usize;
    if aac_frame_length < 7 || data.len() < aac_frame_length {
        return Err(AacConfigError::Truncated);
    }

    let body = data.slice(7..aac_frame_length);
    let rest = data.slice(aac_frame_length..);

    Ok((
        AdtsFrame {
            sample_rate_hz,
            channels,
            body,
        },
        rest,
    ))
}

/// Builds a 7-byte ADTS header for one AAC access unit.
///
/// `channels == 8` is encoded as `channel_configuration = 7`, the literal
/// value the MPEG spec assigns to 8-channel audio (some implementations
/// miscompute this as a shift that always yields zero; that is a bug, not
/// a format variant, so it is not reproduced here).
pub fn build_adts_header(sample_rate_hz: u32, channels: u8, frame_body_size: usize) -> io::Result<[u8; 7]> {
    let sampling_frequency_index = SAMPLE_RATE_TABLE
        .iter()
        .position(|&rate| rate == sample_rate_hz)
        .map(|index| index as u8)
        .unwrap_or(15);

    let channel_configuration = if channels == 8 { 7 } else { channels };

    let aac_frame_length = 7 + frame_body_size as u64;

    let mut writer = BitWriter::default();
    writer.write_bits(0xFFF, 12)?; // sync_word
    writer.write_bits(0, 1)?; // id: MPEG-4
    writer.write_bits(0, 2)?; // layer
    writer.write_bits(1, 1)?; // protection_absent
    writer.write_bits(1, 2)?; // profile_minus_one: AAC-LC
    writer.write_bits(sampling_frequency_index as u64, 4)?;
    writer.write_bits(0, 1)?; // private_bit
    writer.write_bits(channel_configuration as u64, 3)?;
    writer.write_bits(0, 1)?; // original_copy
    writer.write_bits(0, 1)?; // home
    writer.write_bits(0, 1)?; // copyright_identification_bit
    writer.write_bits(0, 1)?; // copyright_identification_start
    writer.write_bits(aac_frame_length, 13)?;
    writer.write_bits(0x7FF, 11)?; // adts_buffer_fullness: VBR
    writer.write_bits(0, 2)?; // number_of_raw_data_blocks_in_frame

    let bytes = writer.into_inner();
    let mut header = [0u8; 7];
    header.copy_from_slice(&bytes);
    Ok(header)
}

/// Writes the ADTS header followed by the raw access unit body.
pub fn write_adts_frame<W: io::Write>(
    writer: &mut W,
    sample_rate_hz: u32,
    channels: u8,
    body: &[u8],
) -> io::Result<()> {
    let header = build_adts_header(sample_rate_hz, channels, body.len())?;
    writer.write_all(&header)?;
    writer.write_all(body)?;
    Ok(())
}
