mod define;
mod demux;
mod errors;
mod mux;

pub use define::{EsFrame, EsSink, MediaType};
pub use demux::Demuxer;
pub use errors::TransmuxError;
pub use mux::{mux, mux_audio, mux_video, split_adts_stream, AudioSample, VideoSample};
