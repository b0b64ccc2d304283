use bytes::Bytes;
use bytesio::bit_reader::BitReader;
use bytesio::bit_writer::BitWriter;

use crate::errors::AacConfigError;

/// The 13-entry MPEG-4 sampling frequency table, indexed by
/// `sampling_frequency_index` (values 13 and 14 are reserved, 15 is the
/// explicit-frequency escape).
pub const SAMPLE_RATE_TABLE: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// `AudioSpecificConfig`, ISO/IEC 14496-3 section 1.6.
///
/// `channels` is already the decoded channel count: a raw
/// `channel_configuration` of 7 is remapped to 8 per the MPEG spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpecificConfig {
    pub audio_object_type: u16,
    pub sampling_frequency: u32,
    pub channels: u8,
}

impl AudioSpecificConfig {
    pub fn parse(data: Bytes) -> Result<Self, AacConfigError> {
        let mut reader = BitReader::from(data);

        let mut audio_object_type = reader.read_bits(5)? as u16;
        if audio_object_type == 31 {
            audio_object_type = 32 + reader.read_bits(6)? as u16;
        }

        let freq_index = reader.read_bits(4)? as u8;
        let sampling_frequency = match freq_index {
            0..=12 => SAMPLE_RATE_TABLE[freq_index as usize],
            13 | 14 => 0, // reserved: the table leaves these entries 0
            _ => reader.read_bits(24)? as u32,
        };

        let channel_configuration = reader.read_bits(4)? as u8;
        let channels = if channel_configuration == 7 {
            8
        } else {
            channel_configuration
        };

        Ok(Self {
            audio_object_type,
            sampling_frequency,
            channels,
        })
    }

    /// Encodes this config back into its 2-6 byte wire form, the inverse of
    /// [`AudioSpecificConfig::parse`]. Used by the mux path, which re-derives
    /// a sequence header from a sample rate and channel count instead of
    /// holding on to the original bytes.
    pub fn build(&self) -> Bytes {
        let mut writer = BitWriter::default();

        if self.audio_object_type >= 32 {
            writer.write_bits(31, 5).ok();
            writer.write_bits((self.audio_object_type - 32) as u64, 6).ok();
        } else {
            writer.write_bits(self.audio_object_type as u64, 5).ok();
        }

        match SAMPLE_RATE_TABLE.iter().position(|&rate| rate == self.sampling_frequency) {
            Some(index) => {
                writer.write_bits(index as u64, 4).ok();
            }
            None => {
                writer.write_bits(15, 4).ok();
                writer.write_bits(self.sampling_frequency as u64, 24).ok();
            }
        }

        let channel_configuration = if self.channels == 8 { 7 } else { self.channels };
        writer.write_bits(channel_configuration as u64, 4).ok();
        writer.align().ok();

        Bytes::from(writer.into_inner())
    }
}
