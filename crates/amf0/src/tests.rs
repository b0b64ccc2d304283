use bytesio::bytes_writer::BytesWriter;

use crate::{Amf0Object, Amf0Reader, Amf0Value, Amf0Writer};

#[test]
fn number_round_trips_and_matches_spec_bytes() {
    let mut writer = BytesWriter::default();
    Amf0Writer::write_number(&mut writer, 3.14).unwrap();
    let bytes = writer.dispose();

    assert_eq!(
        bytes.as_ref(),
        &[0x00, 0x40, 0x09, 0x1e, 0xb8, 0x51, 0xeb, 0x85, 0x1f]
    );

    let value = Amf0Reader::new(bytes).read_any().unwrap();
    assert_eq!(value, Amf0Value::Number(3.14));
}

#[test]
fn object_round_trips_and_matches_spec_bytes() {
    let mut object = Amf0Object::new();
    object.push("a", Amf0Value::Boolean(true));
    object.push("b", Amf0Value::String("x".to_string()));

    let mut writer = BytesWriter::default();
    Amf0Writer::write_object(&mut writer, &object).unwrap();
    let bytes = writer.dispose();

    assert_eq!(
        bytes.as_ref(),
        &[
            0x03, 0x00, 0x01, b'a', 0x01, 0x01, 0x00, 0x01, b'b', 0x02, 0x00, 0x01, b'x', 0x00,
            0x00, 0x09
        ]
    );

    let value = Amf0Reader::new(bytes).read_any().unwrap();
    assert_eq!(value, Amf0Value::Object(object));
}

#[test]
fn object_with_mismatched_terminator_is_rejected() {
    // Zero-length key followed by a byte other than the ObjectEnd marker
    // (0x09): the zero-length key ends the property list, but the
    // terminator itself is malformed.
    let bytes = vec![0x03, 0x00, 0x00, 0x05];

    let err = Amf0Reader::new(bytes.into()).read_any().unwrap_err();
    assert!(matches!(err, crate::Amf0ReadError::ExpectedObjectEnd));
}

#[test]
fn object_preserves_duplicate_keys_and_order() {
    let mut object = Amf0Object::new();
    object.push("k", Amf0Value::Number(1.0));
    object.push("k", Amf0Value::Number(2.0));

    let mut writer = BytesWriter::default();
    Amf0Writer::write_object(&mut writer, &object).unwrap();

    let decoded = Amf0Reader::new(writer.dispose()).read_any().unwrap();
    match decoded {
        Amf0Value::Object(obj) => {
            assert_eq!(obj.0, vec![
                ("k".to_string(), Amf0Value::Number(1.0)),
                ("k".to_string(), Amf0Value::Number(2.0)),
            ]);
        }
        _ => panic!("expected object"),
    }
}

#[test]
fn empty_string_encodes_as_null() {
    let mut writer = BytesWriter::default();
    Amf0Writer::write_string(&mut writer, "").unwrap();
    assert_eq!(writer.dispose().as_ref(), &[0x05]);
}

#[test]
fn string_too_long_is_rejected() {
    let long = "a".repeat(u16::MAX as usize + 1);
    let mut writer = BytesWriter::default();
    assert!(matches!(
        Amf0Writer::write_string(&mut writer, &long),
        Err(crate::Amf0WriteError::LengthOverflow)
    ));
}

#[test]
fn ecma_array_ignores_advisory_count_on_decode() {
    // Count field lies (says 5) but only one property is present before
    // the empty-key sentinel; the decoder must not trust it.
    let mut bytes = vec![0x08, 0x00, 0x00, 0x00, 0x05];
    bytes.extend_from_slice(&[0x00, 0x01, b'x']); // key "x"
    bytes.push(0x05); // Null marker
    bytes.extend_from_slice(&[0x00, 0x00, 0x09]); // sentinel

    let value = Amf0Reader::new(bytes.into()).read_any().unwrap();
    match value {
        Amf0Value::EcmaArray(obj) => {
            assert_eq!(obj.len(), 1);
            assert_eq!(obj.get("x"), Some(&Amf0Value::Null));
        }
        _ => panic!("expected ecma array"),
    }
}

#[test]
fn strict_array_has_no_trailing_sentinel() {
    let values = vec![Amf0Value::Number(1.0), Amf0Value::Boolean(false)];
    let mut writer = BytesWriter::default();
    Amf0Writer::write_strict_array(&mut writer, &values).unwrap();
    let bytes = writer.dispose();

    let decoded = Amf0Reader::new(bytes).read_any().unwrap();
    assert_eq!(decoded, Amf0Value::StrictArray(values));
}

#[test]
fn switch_to_amf3_is_reported_as_unsupported() {
    let bytes = vec![0x11, 0x00];
    let mut reader = Amf0Reader::new(bytes.into());
    assert!(matches!(
        reader.read_any(),
        Err(crate::Amf0ReadError::UnsupportedAmf3)
    ));
}

#[test]
fn unknown_marker_is_reported() {
    let bytes = vec![0xff];
    let mut reader = Amf0Reader::new(bytes.into());
    assert!(matches!(
        reader.read_any(),
        Err(crate::Amf0ReadError::UnexpectedMarker(0xff))
    ));
}

#[test]
fn read_all_decodes_back_to_back_values() {
    let mut writer = BytesWriter::default();
    Amf0Writer::write_string(&mut writer, "onMetaData").unwrap();
    Amf0Writer::write_number(&mut writer, 42.0).unwrap();
    let bytes = writer.dispose();

    let values = Amf0Reader::new(bytes).read_all().unwrap();
    assert_eq!(
        values,
        vec![
            Amf0Value::String("onMetaData".to_string()),
            Amf0Value::Number(42.0)
        ]
    );
}
