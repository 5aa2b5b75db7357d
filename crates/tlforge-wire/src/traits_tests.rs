use crate::test_utils::{AffectedHistory, sample};
use crate::{DecodeError, Deserializable, Deserializer, Serializable, deserialize_boxed};

#[test]
fn boxed_constructor_bytes() {
    let bytes = sample().to_bytes().unwrap();

    assert_eq!(
        bytes,
        [
            0xD1, 0x69, 0x5C, 0xB4, 0x0A, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x64, 0x00,
            0x00, 0x00,
        ]
    );
    assert_eq!(sample().serialized_size(), 16);
    assert_eq!(AffectedHistory::from_bytes(&bytes).unwrap(), sample());
}

#[test]
fn boxed_constructor_rejects_other_tag() {
    let mut input: &[u8] = &[0x37, 0x97, 0x79, 0xBC, 0, 0, 0, 0];
    let mut d = Deserializer::new(&mut input);

    let err = deserialize_boxed::<AffectedHistory>(&mut d).unwrap_err();

    assert!(matches!(
        err,
        DecodeError::UnexpectedConstructor { tag: 0xBC799737 }
    ));
    assert_eq!(d.consumed(), 4);
}

#[test]
fn int_vector_bytes() {
    let bytes = vec![1i32, 2, 3].to_bytes().unwrap();

    assert_eq!(
        bytes,
        [
            0x15, 0xC4, 0xB5, 0x1C, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00,
            0x00, 0x00, 0x03, 0x00, 0x00, 0x00,
        ]
    );
    assert_eq!(Vec::<i32>::from_bytes(&bytes).unwrap(), [1, 2, 3]);
}

#[test]
fn bytes_are_not_a_vector() {
    let raw: Vec<u8> = vec![1, 2, 3];
    let bytes = raw.to_bytes().unwrap();

    assert_eq!(bytes, [3, 1, 2, 3]);
    assert_eq!(Vec::<u8>::from_bytes(&bytes).unwrap(), raw);
}

#[test]
fn nested_vectors_report_exact_size() {
    let value = vec![
        vec!["a".to_string(), "hello".to_string()],
        vec![],
        vec!["x".repeat(260)],
    ];

    let bytes = value.to_bytes().unwrap();

    assert_eq!(bytes.len(), value.serialized_size());
    assert_eq!(Vec::<Vec<String>>::from_bytes(&bytes).unwrap(), value);
}

#[test]
fn vector_of_objects() {
    let value = vec![sample(), AffectedHistory { pts: 1, pts_count: 0, offset: -5 }];

    let bytes = value.to_bytes().unwrap();

    assert_eq!(bytes.len(), 8 + 2 * 16);
    assert_eq!(Vec::<AffectedHistory>::from_bytes(&bytes).unwrap(), value);
}

#[test]
fn scalar_sizes() {
    assert_eq!(7i32.serialized_size(), 4);
    assert_eq!(7i64.serialized_size(), 8);
    assert_eq!(1.0f64.serialized_size(), 8);
    assert_eq!(true.serialized_size(), 4);
    assert_eq!(bool::from_bytes(&false.to_bytes().unwrap()).unwrap(), false);
}
