//! Parameter codec integration tests

use bytes::BytesMut;
use trellis_core::codec::{self, Value, ValueKind};

#[test]
fn concatenated_encodings_decode_in_order() {
    // A typical set-gain style parameter list: target index + level
    let values = [Value::Uint16(3), Value::Float32(-6.5)];

    let mut buf = BytesMut::new();
    for value in &values {
        codec::encode_into(value, &mut buf).unwrap();
    }
    let blob = buf.freeze();
    assert_eq!(blob.len(), 2 + 4);

    let mut cursor = blob.as_ref();
    assert_eq!(
        codec::decode(ValueKind::Uint16, &mut cursor).unwrap(),
        Value::Uint16(3)
    );
    assert_eq!(
        codec::decode(ValueKind::Float32, &mut cursor).unwrap(),
        Value::Float32(-6.5)
    );
    assert!(cursor.is_empty());
}

#[test]
fn string_encoding_counts_bytes_not_chars() {
    let encoded = codec::encode(&Value::String("åäö".to_string())).unwrap();
    // 3 two-byte UTF-8 characters
    assert_eq!(&encoded[..2], &[0x00, 0x06]);
    assert_eq!(encoded.len(), 8);
}

#[test]
fn oversized_blob_is_rejected() {
    let blob = Value::Blob(vec![0u8; 70_000]);
    assert!(codec::encode(&blob).is_err());
}

#[test]
fn trailing_garbage_is_left_in_buffer() {
    let mut blob = codec::encode(&Value::Uint8(9)).unwrap().to_vec();
    blob.extend_from_slice(&[0xff, 0xff]);

    let mut cursor = blob.as_slice();
    let decoded = codec::decode(ValueKind::Uint8, &mut cursor).unwrap();
    assert_eq!(decoded, Value::Uint8(9));
    assert_eq!(cursor.len(), 2);
}
