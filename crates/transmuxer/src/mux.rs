use bytes::{Buf, Bytes};
use bytesio::bytes_writer::BytesWriter;
use flv::{
    AacPacket, AvcPacket, FlvHeader, FlvTag, FlvTagAudioData, FlvTagData, FlvTagVideoData, SoundRate,
    SoundSize, SoundType, VideoFrameType,
};
use h264::AvcDecoderConfigurationRecord;

use crate::errors::TransmuxError;

/// One timestamped Annex-B access unit handed to [`mux_video`].
pub struct VideoSample {
    pub timestamp: i32,
    pub is_key_frame: bool,
    pub annex_b: Bytes,
}

/// One timestamped raw AAC access unit (no ADTS header) handed to
/// [`mux_audio`], alongside the sample rate/channel count its sequence
/// header should advertise.
pub struct AudioSample {
    pub timestamp: i32,
    pub sample_rate_hz: u32,
    pub channels: u8,
    pub body: Bytes,
}

/// Builds the full FLV byte stream from a sequence of video and audio
/// samples. This is the structural inverse of [`crate::Demuxer::demux`]:
/// where the demuxer reinjects SPS/PPS ahead of IDR NALUs and strips start
/// codes, `mux` re-derives a single `AVCDecoderConfigurationRecord` from
/// the first SPS/PPS pair it observes and re-splits Annex-B into
/// length-prefixed NALUs with a 4-byte length field.
pub fn mux(video: &[VideoSample], audio: &[AudioSample], writer: &mut BytesWriter) -> Result<(), TransmuxError> {
    let header = FlvHeader {
        version: 1,
        has_audio: !audio.is_empty(),
        has_video: !video.is_empty(),
        data_offset: 9,
        extra: Bytes::new(),
    };

    let mut tags = Vec::with_capacity(video.len() + audio.len() + 2);
    tags.extend(mux_video(video)?);
    tags.extend(mux_audio(audio)?);
    tags.sort_by_key(|tag| tag.timestamp);

    flv::mux_flv(&header, &tags, writer)?;
    Ok(())
}

/// Turns Annex-B video samples into FLV video tags: one AVC sequence
/// header tag derived from the first SPS/PPS pair found, followed by one
/// NALU tag per sample with SPS/PPS NALUs filtered back out (they were
/// reinjected by the demuxer and would otherwise duplicate the sequence
/// header's copies).
pub fn mux_video(samples: &[VideoSample]) -> Result<Vec<FlvTag>, TransmuxError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let mut config: Option<AvcDecoderConfigurationRecord> = None;
    let mut tags = Vec::with_capacity(samples.len() + 1);

    for sample in samples {
        let nalus = h264::nalus_from_annex_b(&sample.annex_b);
        let mut media_nalus = Vec::with_capacity(nalus.len());

        for nalu in nalus {
            let nal_unit_type = nalu.first().map(|byte| byte & 0x1F).unwrap_or(0);
            match nal_unit_type {
                7 if config.is_none() => {
                    config = Some(AvcDecoderConfigurationRecord {
                        profile_indication: nalu.get(1).copied().unwrap_or(0),
                        profile_compatibility: nalu.get(2).copied().unwrap_or(0),
                        level_indication: nalu.get(3).copied().unwrap_or(0),
                        nalu_length_size: 4,
                        sps: nalu.clone(),
                        pps: Bytes::new(),
                    });
                }
                8 if matches!(&config, Some(c) if c.pps.is_empty()) => {
                    if let Some(config) = config.as_mut() {
                        config.pps = nalu.clone();
                    }
                }
                7 | 8 => {} // later parameter sets are dropped: exactly one of each is kept
                _ => media_nalus.push(nalu),
            }
        }

        let Some(config) = config.as_ref() else {
            return Err(TransmuxError::NoVideoSequenceHeader);
        };

        if tags.is_empty() {
            let mut body = BytesWriter::default();
            config.mux(&mut body)?;
            tags.push(FlvTag {
                timestamp: sample.timestamp,
                stream_id: 0,
                data: FlvTagData::Video {
                    frame_type: VideoFrameType::Key,
                    data: FlvTagVideoData::Avc(AvcPacket::SequenceHeader(config.clone())),
                },
            });
        }

        let mut payload = BytesWriter::default();
        h264::join_nalus(&media_nalus, 4, &mut payload)?;

        tags.push(FlvTag {
            timestamp: sample.timestamp,
            stream_id: 0,
            data: FlvTagData::Video {
                frame_type: if sample.is_key_frame { VideoFrameType::Key } else { VideoFrameType::Inter },
                data: FlvTagVideoData::Avc(AvcPacket::Nalu {
                    composition_time: 0,
                    data: payload.dispose(),
                }),
            },
        });
    }

    Ok(tags)
}

/// Turns raw AAC access units into FLV audio tags: one sequence header tag
/// derived from the first sample's `(sample_rate, channels)`, followed by
/// one raw-frame tag per sample.
pub fn mux_audio(samples: &[AudioSample]) -> Result<Vec<FlvTag>, TransmuxError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let first = &samples[0];
    let config = aac::AudioSpecificConfig {
        audio_object_type: 2, // AAC-LC, matching the FLV-mandated profile
        sampling_frequency: first.sample_rate_hz,
        channels: first.channels,
    };

    let mut tags = Vec::with_capacity(samples.len() + 1);
    tags.push(FlvTag {
        timestamp: first.timestamp,
        stream_id: 0,
        data: FlvTagData::Audio {
            sound_rate: SoundRate::Hz44000,
            sound_size: SoundSize::Bit16,
            sound_type: SoundType::Stereo,
            data: FlvTagAudioData::Aac(AacPacket::SequenceHeader(config.build())),
        },
    });

    for sample in samples {
        tags.push(FlvTag {
            timestamp: sample.timestamp,
            stream_id: 0,
            data: FlvTagData::Audio {
                sound_rate: SoundRate::Hz44000,
                sound_size: SoundSize::Bit16,
                sound_type: SoundType::Stereo,
                data: FlvTagAudioData::Aac(AacPacket::Raw(sample.body.clone())),
            },
        });
    }

    Ok(tags)
}

/// Parses a `.aac` file (back-to-back ADTS frames) into the raw access
/// units [`mux_audio`] needs, deriving each one's timestamp from a fixed
/// frame duration isn't attempted here: callers (the CLI) assign
/// timestamps from wall-clock frame index since ADTS carries none.
pub fn split_adts_stream(mut data: Bytes) -> Result<Vec<(u32, u8, Bytes)>, TransmuxError> {
    let mut frames = Vec::new();
    while data.has_remaining() {
        let (frame, rest) = aac::parse_adts_frame(data).map_err(|_| TransmuxError::NoAudioSequenceHeader)?;
        frames.push((frame.sample_rate_hz, frame.channels, frame.body));
        data = rest;
    }
    Ok(frames)
}
