mod define;
mod errors;
mod reader;
mod writer;

pub use define::{
    AacPacket, AvcPacket, Flv, FlvHeader, FlvTag, FlvTagAudioData, FlvTagData, FlvTagType,
    FlvTagVideoData, SoundRate, SoundSize, SoundType, VideoFrameType,
};
pub use errors::FlvError;
pub use reader::{parse_audio_specific_config, FlvTagScanner};
pub use writer::mux_flv;

#[cfg(test)]
mod tests;
