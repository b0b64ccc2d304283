use std::io::Cursor;

use bytes::{Bytes, BytesMut};
use flv::{
    AacPacket, AvcPacket, FlvHeader, FlvTagAudioData, FlvTagData, FlvTagScanner, FlvTagVideoData,
    VideoFrameType,
};
use h264::AvcDecoderConfigurationRecord;

use crate::define::{EsFrame, EsSink, MediaType};
use crate::errors::TransmuxError;

const START_CODE_4: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
const START_CODE_3: [u8; 3] = [0x00, 0x00, 0x01];

/// Walks an FLV tag stream and drives a [`EsSink`] with Annex-B video and
/// ADTS-framed audio. Holds exactly the per-session state this requires: one
/// cached AVC configuration, one cached `(sample_rate, channels)` pair for
/// AAC.
#[derive(Default)]
pub struct Demuxer {
    avc_config: Option<AvcDecoderConfigurationRecord>,
    audio_rate_channels: Option<(u32, u8)>,
}

impl Demuxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the FLV header, then walks every tag, delivering ES frames to
    /// `sink`. An incomplete trailing tag stops the scan without error,
    /// matching [`flv::Flv::demux`]; any other framing error aborts the
    /// whole scan.
    pub fn demux(&mut self, reader: &mut Cursor<Bytes>, sink: &mut dyn EsSink) -> Result<(), TransmuxError> {
        FlvHeader::demux(reader)?;

        for tag in FlvTagScanner::new(reader)? {
            match tag {
                Ok(tag) => self.handle_tag(tag.timestamp, tag.data, sink),
                Err(flv::FlvError::IncompleteTag) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    fn handle_tag(&mut self, timestamp: i32, data: FlvTagData, sink: &mut dyn EsSink) {
        match data {
            FlvTagData::Script { name, values } => sink.on_script(name, values),
            FlvTagData::Video { frame_type, data } => self.handle_video(timestamp, frame_type, data, sink),
            FlvTagData::Audio { data, .. } => self.handle_audio(timestamp, data, sink),
            FlvTagData::Unknown { .. } => {}
        }
    }

    fn handle_video(&mut self, timestamp: i32, frame_type: VideoFrameType, data: FlvTagVideoData, sink: &mut dyn EsSink) {
        let FlvTagVideoData::Avc(packet) = data else {
            return;
        };

        match packet {
            AvcPacket::SequenceHeader(config) => {
                self.avc_config = Some(config);
            }
            AvcPacket::Nalu { data, .. } => {
                if let Err(err) = self.emit_video_nalus(timestamp, frame_type, data, sink) {
                    tracing::warn!(%err, "discarding unparseable video nalu payload");
                }
            }
            AvcPacket::EndOfSequence => sink.on_video_flush(),
            AvcPacket::Unknown { .. } => {}
        }
    }

    fn emit_video_nalus(
        &self,
        timestamp: i32,
        frame_type: VideoFrameType,
        data: Bytes,
        sink: &mut dyn EsSink,
    ) -> Result<(), TransmuxError> {
        let config = self.avc_config.as_ref().ok_or(TransmuxError::NoVideoSequenceHeader)?;
        let nalus = h264::split_nalus(&data, config.nalu_length_size).map_err(|_| TransmuxError::MalformedNalus)?;

        let is_key_frame = frame_type == VideoFrameType::Key;
        let mut out = BytesMut::new();

        for nalu in nalus {
            let nal_unit_type = nalu.first().map(|byte| byte & 0x1F).unwrap_or(0);
            // IDR NALU (type 5): reinject SPS/PPS ahead of it so the output
            // stream is independently decodable from this point. Non-key
            // frames never reinject, even if (malformed input) one carries
            // an IDR.
            if is_key_frame && nal_unit_type == 5 {
                out.extend_from_slice(&START_CODE_4);
                out.extend_from_slice(&config.sps);
                out.extend_from_slice(&START_CODE_4);
                out.extend_from_slice(&config.pps);
                out.extend_from_slice(&START_CODE_3);
            } else {
                out.extend_from_slice(&START_CODE_4);
            }
            out.extend_from_slice(&nalu);
        }

        sink.on_video(EsFrame {
            media_type: MediaType::Video,
            timestamp,
            data: out.freeze(),
        });
        Ok(())
    }

    fn handle_audio(&mut self, timestamp: i32, data: FlvTagAudioData, sink: &mut dyn EsSink) {
        let FlvTagAudioData::Aac(packet) = data else {
            return;
        };

        match packet {
            AacPacket::SequenceHeader(config_data) => {
                if let Some(config) = flv::parse_audio_specific_config(config_data) {
                    self.audio_rate_channels = Some((config.sampling_frequency, config.channels));
                }
            }
            AacPacket::Raw(body) => {
                let Some((sample_rate, channels)) = self.audio_rate_channels else {
                    tracing::warn!("discarding aac frame before sequence header");
                    return;
                };

                let mut out = BytesMut::with_capacity(7 + body.len());
                match aac::build_adts_header(sample_rate, channels, body.len()) {
                    Ok(header) => {
                        out.extend_from_slice(&header);
                        out.extend_from_slice(&body);
                        sink.on_audio(EsFrame {
                            media_type: MediaType::Audio,
                            timestamp,
                            data: out.freeze(),
                        });
                    }
                    Err(err) => tracing::warn!(%err, "failed to build adts header"),
                }
            }
            AacPacket::Unknown { .. } => {}
        }
    }
}
