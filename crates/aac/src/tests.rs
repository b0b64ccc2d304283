use bytes::Bytes;

use crate::{build_adts_header, parse_adts_frame, AacConfigError, AudioSpecificConfig};

#[test]
fn decodes_spec_example() {
    let config = AudioSpecificConfig::parse(Bytes::from_static(&[0x12, 0x10])).unwrap();
    assert_eq!(config.audio_object_type, 2);
    assert_eq!(config.sampling_frequency, 44100);
    assert_eq!(config.channels, 2);
}

#[test]
fn remaps_channel_seven_to_eight_channels() {
    // aot=2 (00010), freq_index=3/48000 (0011), channel_configuration=7 (0111)
    let config = AudioSpecificConfig::parse(Bytes::from_static(&[0b00010001, 0b10111000])).unwrap();
    assert_eq!(config.channels, 8);
}

#[test]
fn extended_audio_object_type_reads_six_more_bits() {
    // aot escape: 11111 (31) then extra=1 (000001) -> audio_object_type = 33
    // freq_index=0x6 (24000), channel_configuration=1
    let mut bits = String::new();
    bits.push_str("11111"); // aot escape
    bits.push_str("000001"); // extra = 1
    bits.push_str("0110"); // freq_index = 6 -> 24000
    bits.push_str("0001"); // channels = 1
    while bits.len() % 8 != 0 {
        bits.push('0');
    }
    let bytes: Vec<u8> = bits
        .as_bytes()
        .chunks(8)
        .map(|chunk| u8::from_str_radix(std::str::from_utf8(chunk).unwrap(), 2).unwrap())
        .collect();

    let config = AudioSpecificConfig::parse(Bytes::from(bytes)).unwrap();
    assert_eq!(config.audio_object_type, 33);
    assert_eq!(config.sampling_frequency, 24000);
    assert_eq!(config.channels, 1);
}

#[test]
fn explicit_frequency_escape_reads_24_bits() {
    let mut bits = String::new();
    bits.push_str("00010"); // aot = 2
    bits.push_str("1111"); // freq_index = 15 (escape)
    bits.push_str(&format!("{:024b}", 12345u32)); // explicit sample rate
    bits.push_str("0010"); // channels = 2
    while bits.len() % 8 != 0 {
        bits.push('0');
    }
    let bytes: Vec<u8> = bits
        .as_bytes()
        .chunks(8)
        .map(|chunk| u8::from_str_radix(std::str::from_utf8(chunk).unwrap(), 2).unwrap())
        .collect();

    let config = AudioSpecificConfig::parse(Bytes::from(bytes)).unwrap();
    assert_eq!(config.sampling_frequency, 12345);
}

#[test]
fn reserved_sampling_frequency_index_decodes_as_rate_zero() {
    // aot=2 (00010), freq_index=13 (1101) -> bits: 00010 1101 ...
    let config = AudioSpecificConfig::parse(Bytes::from_static(&[0b00010110, 0b10000000])).unwrap();
    assert_eq!(config.sampling_frequency, 0);
}

#[test]
fn rejects_truncated_input() {
    let err = AudioSpecificConfig::parse(Bytes::from_static(&[0x12])).unwrap_err();
    assert!(matches!(err, AacConfigError::Truncated));
}

#[test]
fn adts_header_matches_spec_golden_bytes() {
    // 48 kHz stereo; the body size consistent with this exact golden
    // header is 89 bytes (aac_frame_length = 7 + 89 = 96).
    let header = build_adts_header(48000, 2, 89).unwrap();
    assert_eq!(header, [0xFF, 0xF1, 0x4C, 0x80, 0x0C, 0x1F, 0xFC]);
}

#[test]
fn adts_frame_length_is_header_plus_body() {
    let header = build_adts_header(44100, 2, 380).unwrap();
    let frame_length = (((header[3] & 0x03) as u16) << 11) | ((header[4] as u16) << 3) | ((header[5] >> 5) as u16);
    assert_eq!(frame_length, 7 + 380);
}

#[test]
fn adts_eight_channels_encodes_as_seven() {
    let header = build_adts_header(44100, 8, 0).unwrap();
    let channel_configuration = ((header[2] & 0x01) << 2) | (header[3] >> 6);
    assert_eq!(channel_configuration, 7);
}

#[test]
fn adts_unknown_sample_rate_uses_escape_index() {
    let header = build_adts_header(192000, 2, 0).unwrap();
    let sampling_frequency_index = (header[2] >> 2) & 0x0F;
    assert_eq!(sampling_frequency_index, 15);
}

#[test]
fn audio_specific_config_build_round_trips_through_parse() {
    let config = AudioSpecificConfig {
        audio_object_type: 2,
        sampling_frequency: 44100,
        channels: 2,
    };
    let bytes = config.build();
    let parsed = AudioSpecificConfig::parse(bytes).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn audio_specific_config_build_round_trips_eight_channels() {
    let config = AudioSpecificConfig {
        audio_object_type: 2,
        sampling_frequency: 48000,
        channels: 8,
    };
    let parsed = AudioSpecificConfig::parse(config.build()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn adts_frame_parses_header_and_splits_body() {
    let header = build_adts_header(44100, 2, 3).unwrap();
    let mut data = header.to_vec();
    data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    data.extend_from_slice(b"next-frame-bytes");

    let (frame, rest) = parse_adts_frame(Bytes::from(data)).unwrap();
    assert_eq!(frame.sample_rate_hz, 44100);
    assert_eq!(frame.channels, 2);
    assert_eq!(frame.body.as_ref(), &[0xAA, 0xBB, 0xCC]);
    assert_eq!(rest.as_ref(), b"next-frame-bytes");
}

#[test]
fn adts_frame_rejects_bad_sync_word() {
    let err = parse_adts_frame(Bytes::from_static(&[0x00; 7])).unwrap_err();
    assert!(matches!(err, AacConfigError::InvalidSyncWord));
}
