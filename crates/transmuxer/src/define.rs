use amf0::Amf0Value;
use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Video,
    Audio,
}

/// One unit of elementary-stream output: either an Annex-B byte run (one or
/// more start-code-prefixed NALUs from a single video tag) or an
/// ADTS-framed AAC access unit.
#[derive(Debug, Clone, PartialEq)]
pub struct EsFrame {
    pub media_type: MediaType,
    pub timestamp: i32,
    pub data: Bytes,
}

/// Receives the demuxer's output. A single pass delivers video frames,
/// audio frames, and decoded `onMetaData` script values, in tag order.
///
/// The CLI's demux command implements this by appending to two open files;
/// other callers (tests, an in-memory sink) can implement it without
/// touching the disk.
pub trait EsSink {
    fn on_video(&mut self, frame: EsFrame);
    fn on_audio(&mut self, frame: EsFrame);
    fn on_script(&mut self, name: String, values: Vec<Amf0Value>);

    /// Called on an AVC end-of-sequence packet (`avc_packet_type == 2`).
    /// Default no-op; a sink can opt in to treat end-of-sequence as a flush
    /// signal instead of ignoring it.
    fn on_video_flush(&mut self) {}
}
