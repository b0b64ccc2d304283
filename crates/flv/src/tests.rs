use std::io::Cursor;

use amf0::Amf0Value;
use bytes::Bytes;
use bytesio::bytes_writer::BytesWriter;

use crate::define::{
    AacPacket, AvcPacket, Flv, FlvHeader, FlvTag, FlvTagAudioData, FlvTagData, FlvTagVideoData,
    SoundRate, SoundSize, SoundType, VideoFrameType,
};
use crate::errors::FlvError;
use crate::reader::FlvTagScanner;
use crate::writer::mux_flv;

fn header(has_audio: bool, has_video: bool) -> FlvHeader {
    FlvHeader {
        version: 1,
        has_audio,
        has_video,
        data_offset: 9,
        extra: Bytes::new(),
    }
}

#[test]
fn header_matches_spec_golden_bytes() {
    let mut writer = BytesWriter::default();
    header(true, true).mux(&mut writer).unwrap();
    assert_eq!(
        writer.dispose().as_ref(),
        &[0x46, 0x4C, 0x56, 0x01, 0x05, 0x00, 0x00, 0x00, 0x09][..]
    );
}

#[test]
fn header_round_trips() {
    let original = header(true, false);
    let mut writer = BytesWriter::default();
    original.mux(&mut writer).unwrap();

    let parsed = FlvHeader::demux(&mut Cursor::new(writer.dispose())).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn rejects_bad_signature() {
    let err = FlvHeader::demux(&mut Cursor::new(Bytes::from_static(b"XLV\x01\x05\x00\x00\x00\x09")))
        .unwrap_err();
    assert!(matches!(err, FlvError::InvalidSignature));
}

fn build_file(tags: &[FlvTag]) -> Bytes {
    let mut writer = BytesWriter::default();
    mux_flv(&header(true, true), tags, &mut writer).unwrap();
    writer.dispose()
}

#[test]
fn script_tag_round_trips() {
    let tag = FlvTag {
        timestamp: 0,
        stream_id: 0,
        data: FlvTagData::Script {
            name: "onMetaData".to_string(),
            values: vec![Amf0Value::Number(30.0)],
        },
    };

    let file = build_file(&[tag]);
    let mut cursor = Cursor::new(file);
    let parsed = Flv::demux(&mut cursor).unwrap();

    assert_eq!(parsed.tags.len(), 1);
    match &parsed.tags[0].data {
        FlvTagData::Script { name, values } => {
            assert_eq!(name, "onMetaData");
            assert_eq!(values, &vec![Amf0Value::Number(30.0)]);
        }
        other => panic!("unexpected tag data: {other:?}"),
    }
}

#[test]
fn audio_aac_raw_round_trips() {
    let tag = FlvTag {
        timestamp: 42,
        stream_id: 0,
        data: FlvTagData::Audio {
            sound_rate: SoundRate::Hz44000,
            sound_size: SoundSize::Bit16,
            sound_type: SoundType::Stereo,
            data: FlvTagAudioData::Aac(AacPacket::Raw(Bytes::from_static(b"\x01\x02\x03"))),
        },
    };

    let file = build_file(&[tag]);
    let parsed = Flv::demux(&mut Cursor::new(file)).unwrap();

    assert_eq!(parsed.tags[0].timestamp, 42);
    match &parsed.tags[0].data {
        FlvTagData::Audio { data: FlvTagAudioData::Aac(AacPacket::Raw(body)), .. } => {
            assert_eq!(body.as_ref(), b"\x01\x02\x03");
        }
        other => panic!("unexpected tag data: {other:?}"),
    }
}

#[test]
fn video_avc_nalu_round_trips() {
    let tag = FlvTag {
        timestamp: 100,
        stream_id: 0,
        data: FlvTagData::Video {
            frame_type: VideoFrameType::Key,
            data: FlvTagVideoData::Avc(AvcPacket::Nalu {
                composition_time: -5,
                data: Bytes::from_static(b"\x00\x00\x00\x04\x65\x88\x84\x00"),
            }),
        },
    };

    let file = build_file(&[tag]);
    let parsed = Flv::demux(&mut Cursor::new(file)).unwrap();

    match &parsed.tags[0].data {
        FlvTagData::Video {
            frame_type: VideoFrameType::Key,
            data: FlvTagVideoData::Avc(AvcPacket::Nalu { composition_time, data }),
        } => {
            assert_eq!(*composition_time, -5);
            assert_eq!(data.as_ref(), b"\x00\x00\x00\x04\x65\x88\x84\x00");
        }
        other => panic!("unexpected tag data: {other:?}"),
    }
}

#[test]
fn unknown_tag_type_round_trips_its_raw_body() {
    let tag = FlvTag {
        timestamp: 0,
        stream_id: 0,
        data: FlvTagData::Unknown {
            tag_type: 42,
            data: Bytes::from_static(b"mystery"),
        },
    };

    let file = build_file(&[tag]);
    let parsed = Flv::demux(&mut Cursor::new(file)).unwrap();

    match &parsed.tags[0].data {
        FlvTagData::Unknown { tag_type, data } => {
            assert_eq!(*tag_type, 42);
            assert_eq!(data.as_ref(), b"mystery");
        }
        other => panic!("unexpected tag data: {other:?}"),
    }
}

#[test]
fn every_tag_back_pointer_equals_eleven_plus_data_size() {
    let tags = vec![
        FlvTag {
            timestamp: 0,
            stream_id: 0,
            data: FlvTagData::Unknown {
                tag_type: 18,
                data: Bytes::from_static(b"abc"),
            },
        },
        FlvTag {
            timestamp: 1,
            stream_id: 0,
            data: FlvTagData::Unknown {
                tag_type: 18,
                data: Bytes::from_static(b"de"),
            },
        },
    ];

    let file = build_file(&tags);
    // header(9) + initial back-pointer(4) + tag1(11+3) + backpointer(4) + tag2(11+2) + backpointer(4)
    let tag1_back_pointer_offset = 9 + 4 + 11 + 3;
    let back_pointer = u32::from_be_bytes(file[tag1_back_pointer_offset..tag1_back_pointer_offset + 4].try_into().unwrap());
    assert_eq!(back_pointer, 11 + 3);
}

#[test]
fn scanner_reports_inconsistent_backpointer() {
    let tags = vec![FlvTag {
        timestamp: 0,
        stream_id: 0,
        data: FlvTagData::Unknown {
            tag_type: 18,
            data: Bytes::from_static(b"abc"),
        },
    }];
    let mut file = build_file(&tags).to_vec();
    let last = file.len() - 1;
    file[last] ^= 0xFF; // corrupt the back-pointer's low byte

    let err = Flv::demux(&mut Cursor::new(Bytes::from(file))).unwrap_err();
    assert!(matches!(err, FlvError::InconsistentBackpointer { .. }));
}

#[test]
fn scanner_stops_on_incomplete_trailing_tag() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0u8; 4]); // initial back-pointer
    bytes.push(18); // tag type
    bytes.extend_from_slice(&[0, 0, 50]); // data_size = 50, far larger than available
    bytes.extend_from_slice(&[0, 0, 0, 0]); // timestamp
    bytes.extend_from_slice(&[0, 0, 0]); // stream_id
    bytes.extend_from_slice(b"short"); // truncated body

    let mut cursor = Cursor::new(Bytes::from(bytes));
    let mut scanner = FlvTagScanner::new(&mut cursor).unwrap();
    let err = scanner.next().unwrap().unwrap_err();
    assert!(matches!(err, FlvError::IncompleteTag));
    assert!(scanner.next().is_none());
}
