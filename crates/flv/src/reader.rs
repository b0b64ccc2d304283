use std::io::{Cursor, Read};

use amf0::{Amf0Reader, Amf0Value};
use aac::AudioSpecificConfig;
use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use bytesio::bytes_reader::BytesCursor;
use h264::AvcDecoderConfigurationRecord;
use num_traits::FromPrimitive;

use crate::define::{
    AacPacket, AacPacketType, AvcPacket, AvcPacketType, Flv, FlvHeader, FlvTag, FlvTagAudioData,
    FlvTagData, FlvTagType, FlvTagVideoData, SoundRate, SoundSize, SoundType, VideoFrameType,
};
use crate::errors::FlvError;

impl FlvHeader {
    pub fn demux(reader: &mut Cursor<Bytes>) -> Result<Self, FlvError> {
        let mut signature = [0u8; 3];
        reader
            .read_exact(&mut signature)
            .map_err(|_| FlvError::Truncated)?;
        if &signature != b"FLV" {
            return Err(FlvError::InvalidSignature);
        }

        let version = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let has_audio = flags & 0b0000_0001 != 0;
        let has_video = flags & 0b0000_0100 != 0;

        let data_offset = reader.read_u32::<BigEndian>()?;
        let consumed = reader.position() as u32;
        let extra = if data_offset > consumed {
            reader.read_slice((data_offset - consumed) as usize)?
        } else {
            Bytes::new()
        };

        Ok(Self {
            version,
            has_audio,
            has_video,
            data_offset,
            extra,
        })
    }
}

impl Flv {
    /// Parses an entire FLV file into memory. Stops (without error) if the
    /// final trailing tag is incomplete; propagates any back-pointer
    /// mismatch, matching `FlvTagScanner`'s per-tag contract.
    pub fn demux(reader: &mut Cursor<Bytes>) -> Result<Self, FlvError> {
        let header = FlvHeader::demux(reader)?;
        let mut tags = Vec::new();

        for tag in FlvTagScanner::new(reader)? {
            match tag {
                Ok(tag) => tags.push(tag),
                Err(FlvError::IncompleteTag) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(Flv { header, tags })
    }
}

/// Walks the tag stream following the FLV header one tag at a time,
/// verifying each trailing back-pointer as it goes.
///
/// Construct with a cursor positioned immediately after the 9-byte file
/// header; the initial `u32be 0` previous-tag-size is consumed by `new`.
pub struct FlvTagScanner<'a> {
    reader: &'a mut Cursor<Bytes>,
    done: bool,
}

impl<'a> FlvTagScanner<'a> {
    pub fn new(reader: &'a mut Cursor<Bytes>) -> Result<Self, FlvError> {
        reader.read_u32::<BigEndian>().map_err(|_| FlvError::Truncated)?;
        Ok(Self { reader, done: false })
    }

    fn remaining(&self) -> usize {
        self.reader.get_remaining().len()
    }

    fn read_tag(&mut self) -> Result<FlvTag, FlvError> {
        if self.remaining() < 11 {
            return Err(FlvError::IncompleteTag);
        }

        let tag_type = self.reader.read_u8()?;
        let data_size = self.reader.read_u24::<BigEndian>()?;
        let timestamp =
            (self.reader.read_u24::<BigEndian>()? | ((self.reader.read_u8()? as u32) << 24)) as i32;
        let stream_id = self.reader.read_u24::<BigEndian>()?;

        if self.remaining() < data_size as usize + 4 {
            return Err(FlvError::IncompleteTag);
        }

        let body = self.reader.read_slice(data_size as usize)?;
        let data = FlvTagData::demux(tag_type, body);

        let back_pointer = self.reader.read_u32::<BigEndian>()?;
        let expected = 11 + data_size;
        if back_pointer != expected {
            return Err(FlvError::InconsistentBackpointer {
                expected,
                found: back_pointer,
            });
        }

        Ok(FlvTag {
            timestamp,
            stream_id,
            data,
        })
    }
}

impl<'a> Iterator for FlvTagScanner<'a> {
    type Item = Result<FlvTag, FlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining() == 0 {
            return None;
        }

        match self.read_tag() {
            Ok(tag) => Some(Ok(tag)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl FlvTagData {
    /// Dispatches a tag body by its wire `tag_type`. Never fails: a codec
    /// that this core doesn't understand, or a payload it can't parse,
    /// degrades to `Unknown` with a logged warning rather than aborting
    /// the whole scan, matching the per-tag error isolation the framing
    /// design calls for.
    fn demux(tag_type: u8, data: Bytes) -> Self {
        match FlvTagType::from_u8(tag_type) {
            Some(FlvTagType::Audio) => Self::demux_audio(data),
            Some(FlvTagType::Video) => Self::demux_video(data),
            Some(FlvTagType::ScriptData) => Self::demux_script(data),
            None => Self::Unknown { tag_type, data },
        }
    }

    fn demux_audio(data: Bytes) -> Self {
        let mut reader = Cursor::new(data);
        let flags = match reader.read_u8() {
            Ok(flags) => flags,
            Err(_) => {
                return Self::Unknown {
                    tag_type: FlvTagType::Audio as u8,
                    data: reader.get_remaining(),
                }
            }
        };

        let sound_format = (flags & 0b1111_0000) >> 4;
        let sound_rate = SoundRate::from_u8((flags & 0b0000_1100) >> 2).unwrap_or(SoundRate::Hz44000);
        let sound_size = SoundSize::from_u8((flags & 0b0000_0010) >> 1).unwrap_or(SoundSize::Bit16);
        let sound_type = SoundType::from_u8(flags & 0b0000_0001).unwrap_or(SoundType::Stereo);

        let data = FlvTagAudioData::demux(sound_format, &mut reader);

        Self::Audio {
            sound_rate,
            sound_size,
            sound_type,
            data,
        }
    }

    fn demux_video(data: Bytes) -> Self {
        let mut reader = Cursor::new(data);
        let flags = match reader.read_u8() {
            Ok(flags) => flags,
            Err(_) => {
                return Self::Unknown {
                    tag_type: FlvTagType::Video as u8,
                    data: reader.get_remaining(),
                }
            }
        };

        let frame_type = flags >> 4;
        let codec_id = flags & 0b0000_1111;

        let Some(frame_type) = VideoFrameType::from_u8(frame_type) else {
            return Self::Unknown {
                tag_type: FlvTagType::Video as u8,
                data: reader.get_remaining(),
            };
        };

        Self::Video {
            frame_type,
            data: FlvTagVideoData::demux(codec_id, &mut reader),
        }
    }

    fn demux_script(data: Bytes) -> Self {
        match Amf0Reader::new(data.clone()).read_all() {
            Ok(mut values) if !values.is_empty() => {
                let name = match values.remove(0) {
                    Amf0Value::String(name) => name,
                    _ => {
                        tracing::warn!("script tag's first value wasn't a name string");
                        return Self::Unknown {
                            tag_type: FlvTagType::ScriptData as u8,
                            data,
                        };
                    }
                };
                Self::Script { name, values }
            }
            Ok(_) => Self::Unknown {
                tag_type: FlvTagType::ScriptData as u8,
                data,
            },
            Err(err) => {
                tracing::warn!(%err, "discarding malformed script tag");
                Self::Unknown {
                    tag_type: FlvTagType::ScriptData as u8,
                    data,
                }
            }
        }
    }
}

impl FlvTagAudioData {
    fn demux(sound_format: u8, reader: &mut Cursor<Bytes>) -> Self {
        const AAC_SOUND_FORMAT: u8 = 10;

        if sound_format != AAC_SOUND_FORMAT {
            return Self::Unknown {
                sound_format,
                data: reader.get_remaining(),
            };
        }

        let aac_packet_type = match reader.read_u8() {
            Ok(value) => value,
            Err(_) => {
                return Self::Unknown {
                    sound_format,
                    data: reader.get_remaining(),
                }
            }
        };

        Self::Aac(AacPacket::demux(aac_packet_type, reader))
    }
}

impl AacPacket {
    fn demux(aac_packet_type: u8, reader: &mut Cursor<Bytes>) -> Self {
        match AacPacketType::from_u8(aac_packet_type) {
            Some(AacPacketType::SeqHdr) => Self::SequenceHeader(reader.get_remaining()),
            Some(AacPacketType::Raw) => Self::Raw(reader.get_remaining()),
            None => Self::Unknown {
                aac_packet_type,
                data: reader.get_remaining(),
            },
        }
    }
}

impl FlvTagVideoData {
    fn demux(codec_id: u8, reader: &mut Cursor<Bytes>) -> Self {
        const AVC_CODEC_ID: u8 = 7;

        if codec_id != AVC_CODEC_ID {
            return Self::Unknown {
                codec_id,
                data: reader.get_remaining(),
            };
        }

        Self::Avc(AvcPacket::demux(reader))
    }
}

impl AvcPacket {
    fn demux(reader: &mut Cursor<Bytes>) -> Self {
        let result: std::io::Result<(u8, i32)> = (|| {
            let avc_packet_type = reader.read_u8()?;
            let raw = reader.read_u24::<BigEndian>()?;
            // sign-extend the 24-bit composition time offset
            let composition_time = ((raw << 8) as i32) >> 8;
            Ok((avc_packet_type, composition_time))
        })();

        let (avc_packet_type, composition_time) = match result {
            Ok(value) => value,
            Err(_) => {
                return Self::Unknown {
                    avc_packet_type: 0,
                    composition_time: 0,
                    data: Bytes::new(),
                }
            }
        };

        match AvcPacketType::from_u8(avc_packet_type) {
            Some(AvcPacketType::SeqHdr) => match AvcDecoderConfigurationRecord::demux(reader) {
                Ok(config) => Self::SequenceHeader(config),
                Err(err) => {
                    tracing::warn!(%err, "discarding malformed avc sequence header");
                    Self::Unknown {
                        avc_packet_type,
                        composition_time,
                        data: reader.get_remaining(),
                    }
                }
            },
            Some(AvcPacketType::Nalu) => Self::Nalu {
                composition_time,
                data: reader.get_remaining(),
            },
            Some(AvcPacketType::EndOfSequence) => Self::EndOfSequence,
            None => Self::Unknown {
                avc_packet_type,
                composition_time,
                data: reader.get_remaining(),
            },
        }
    }
}

/// Parses an AAC sequence header payload, logging and returning `None` on
/// failure rather than aborting the surrounding demux pass.
pub fn parse_audio_specific_config(data: Bytes) -> Option<AudioSpecificConfig> {
    match AudioSpecificConfig::parse(data) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(%err, "discarding malformed AudioSpecificConfig");
            None
        }
    }
}
