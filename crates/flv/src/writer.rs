use std::io::{self, Write};

use amf0::{Amf0Value, Amf0Writer};
use byteorder::{BigEndian, WriteBytesExt};
use bytesio::bytes_writer::BytesWriter;

use crate::define::{
    AacPacket, AvcPacket, FlvHeader, FlvTag, FlvTagAudioData, FlvTagData, FlvTagType,
    FlvTagVideoData,
};

impl FlvHeader {
    pub fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        writer.write_all(b"FLV")?;
        writer.write_u8(self.version)?;

        let mut flags = 0u8;
        if self.has_audio {
            flags |= 0b0000_0001;
        }
        if self.has_video {
            flags |= 0b0000_0100;
        }
        writer.write_u8(flags)?;

        writer.write_u32::<BigEndian>(self.data_offset)?;
        writer.write_all(&self.extra)?;
        Ok(())
    }
}

/// Writes the full file: header, initial zero back-pointer, then every tag
/// with its own trailing back-pointer.
pub fn mux_flv(header: &FlvHeader, tags: &[FlvTag], writer: &mut BytesWriter) -> io::Result<()> {
    header.mux(writer)?;
    writer.write_u32::<BigEndian>(0)?;
    for tag in tags {
        tag.mux(writer)?;
    }
    Ok(())
}

impl FlvTag {
    /// Writes the 11-byte tag header, the encoded payload, and the trailing
    /// 4-byte back-pointer (`11 + data_size`).
    pub fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        let mut body = BytesWriter::default();
        self.data.mux(&mut body)?;
        let body = body.dispose();

        writer.write_u8(self.data.tag_type())?;
        writer.write_u24::<BigEndian>(body.len() as u32)?;
        writer.write_u24::<BigEndian>((self.timestamp as u32) & 0x00FF_FFFF)?;
        writer.write_u8(((self.timestamp as u32) >> 24) as u8)?;
        writer.write_u24::<BigEndian>(self.stream_id)?;
        writer.write_all(&body)?;
        writer.write_u32::<BigEndian>(11 + body.len() as u32)?;
        Ok(())
    }
}

impl FlvTagData {
    fn tag_type(&self) -> u8 {
        match self {
            Self::Audio { .. } => FlvTagType::Audio as u8,
            Self::Video { .. } => FlvTagType::Video as u8,
            Self::Script { .. } => FlvTagType::ScriptData as u8,
            Self::Unknown { tag_type, .. } => *tag_type,
        }
    }

    fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        match self {
            Self::Audio {
                sound_rate,
                sound_size,
                sound_type,
                data,
            } => {
                let flags = (10u8 << 4) | ((*sound_rate as u8) << 2) | ((*sound_size as u8) << 1) | (*sound_type as u8);
                writer.write_u8(flags)?;
                data.mux(writer)
            }
            Self::Video { frame_type, data } => {
                let codec_id = match data {
                    FlvTagVideoData::Avc(_) => 7,
                    FlvTagVideoData::Unknown { codec_id, .. } => *codec_id,
                };
                writer.write_u8(((*frame_type as u8) << 4) | codec_id)?;
                data.mux(writer)
            }
            Self::Script { name, values } => {
                Amf0Writer::write_string(writer, name)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
                for value in values {
                    write_amf0_value(writer, value)?;
                }
                Ok(())
            }
            Self::Unknown { data, .. } => writer.write_all(data),
        }
    }
}

fn write_amf0_value(writer: &mut BytesWriter, value: &Amf0Value) -> io::Result<()> {
    Amf0Writer::write_any(writer, value).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}

impl FlvTagAudioData {
    fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        match self {
            Self::Aac(packet) => packet.mux(writer),
            Self::Unknown { data, .. } => writer.write_all(data),
        }
    }
}

impl AacPacket {
    fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        match self {
            Self::SequenceHeader(data) => {
                writer.write_u8(0)?;
                writer.write_all(data)
            }
            Self::Raw(data) => {
                writer.write_u8(1)?;
                writer.write_all(data)
            }
            Self::Unknown { aac_packet_type, data } => {
                writer.write_u8(*aac_packet_type)?;
                writer.write_all(data)
            }
        }
    }
}

impl FlvTagVideoData {
    fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        match self {
            Self::Avc(packet) => packet.mux(writer),
            Self::Unknown { data, .. } => writer.write_all(data),
        }
    }
}

impl AvcPacket {
    fn mux(&self, writer: &mut BytesWriter) -> io::Result<()> {
        match self {
            Self::SequenceHeader(config) => {
                writer.write_u8(0)?;
                writer.write_u24::<BigEndian>(0)?;
                config.mux(writer)
            }
            Self::Nalu { composition_time, data } => {
                writer.write_u8(1)?;
                writer.write_u24::<BigEndian>((*composition_time as u32) & 0x00FF_FFFF)?;
                writer.write_all(data)
            }
            Self::EndOfSequence => {
                writer.write_u8(2)?;
                writer.write_u24::<BigEndian>(0)
            }
            Self::Unknown {
                avc_packet_type,
                composition_time,
                data,
            } => {
                writer.write_u8(*avc_packet_type)?;
                writer.write_u24::<BigEndian>((*composition_time as u32) & 0x00FF_FFFF)?;
                writer.write_all(data)
            }
        }
    }
}
