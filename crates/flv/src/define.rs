use amf0::Amf0Value;
use bytes::Bytes;
use h264::AvcDecoderConfigurationRecord;
use num_derive::FromPrimitive;

/// A parsed FLV file: the 9-byte header and every tag that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Flv {
    pub header: FlvHeader,
    pub tags: Vec<FlvTag>,
}

/// The 9-byte FLV file header plus any trailing extension bytes the
/// `data_offset` field declares (normally none; `extra` is empty).
#[derive(Debug, Clone, PartialEq)]
pub struct FlvHeader {
    pub version: u8,
    pub has_audio: bool,
    pub has_video: bool,
    pub data_offset: u32,
    pub extra: Bytes,
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub enum FlvTagType {
    Audio = 8,
    Video = 9,
    ScriptData = 18,
}

/// One FLV tag: a composed timestamp, the (always-zero) stream id, and its
/// decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FlvTag {
    pub timestamp: i32,
    pub stream_id: u32,
    pub data: FlvTagData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlvTagData {
    Audio {
        sound_rate: SoundRate,
        sound_size: SoundSize,
        sound_type: SoundType,
        data: FlvTagAudioData,
    },
    Video {
        frame_type: VideoFrameType,
        data: FlvTagVideoData,
    },
    Script {
        name: String,
        values: Vec<Amf0Value>,
    },
    /// A tag whose type, codec, or sound format this core doesn't decode.
    /// The raw body is kept so a best-effort re-mux doesn't lose it.
    Unknown { tag_type: u8, data: Bytes },
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub enum SoundRate {
    Hz5500 = 0x0,
    Hz11000 = 0x1,
    Hz22000 = 0x2,
    Hz44000 = 0x3,
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub enum SoundSize {
    Bit8 = 0x0,
    Bit16 = 0x1,
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub enum SoundType {
    Mono = 0x0,
    Stereo = 0x1,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlvTagAudioData {
    Aac(AacPacket),
    Unknown { sound_format: u8, data: Bytes },
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum AacPacketType {
    SeqHdr = 0x0,
    Raw = 0x1,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AacPacket {
    SequenceHeader(Bytes),
    Raw(Bytes),
    Unknown { aac_packet_type: u8, data: Bytes },
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub enum VideoFrameType {
    Key = 1,
    Inter = 2,
    DisposableInter = 3,
    GeneratedKey = 4,
    Command = 5,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlvTagVideoData {
    Avc(AvcPacket),
    Unknown { codec_id: u8, data: Bytes },
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum AvcPacketType {
    SeqHdr = 0x0,
    Nalu = 0x1,
    EndOfSequence = 0x2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AvcPacket {
    SequenceHeader(AvcDecoderConfigurationRecord),
    Nalu { composition_time: i32, data: Bytes },
    EndOfSequence,
    Unknown {
        avc_packet_type: u8,
        composition_time: i32,
        data: Bytes,
    },
}
