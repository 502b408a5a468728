mod common;

use cbor_data::{
    error::ErrorKind,
    event::{Event, SemanticTag},
    parser::CborParser,
    source::SliceSource,
};
use common::Capture;
use pretty_assertions::assert_eq;

fn decode(bytes: &[u8]) -> Vec<Event<'static>> {
    let mut parser = CborParser::new(SliceSource::new(bytes));
    let mut sink = Capture::default();
    parser.parse(&mut sink).unwrap();
    sink.0
}

#[test]
fn small_uint_is_inline() {
    assert_eq!(decode(&[0x00]), vec![Event::UInt64(0, SemanticTag::None)]);
}

#[test]
fn small_negative_int() {
    assert_eq!(decode(&[0x20]), vec![Event::Int64(-1, SemanticTag::None)]);
}

#[test]
fn eight_byte_argument_uint() {
    let bytes = [0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(decode(&bytes), vec![Event::UInt64(4294967296, SemanticTag::None)]);
}

#[test]
fn tag_1_epoch_timestamp() {
    let bytes = [0xc1, 0x1a, 0x5a, 0x8d, 0x0a, 0x70];
    assert_eq!(decode(&bytes), vec![Event::UInt64(1519157360, SemanticTag::Timestamp)]);
}

#[test]
fn tag_1_on_negative_int_preserves_mis_signed_timestamp() {
    // Negative-int timestamps get no explicit range check; the value is reported verbatim.
    let bytes = [0xc1, 0x20];
    assert_eq!(decode(&bytes), vec![Event::Int64(-1, SemanticTag::Timestamp)]);
}

#[test]
fn tag_1_on_double_is_timestamp() {
    let mut bytes = vec![0xc1, 0xfb];
    bytes.extend_from_slice(&1519157360.5f64.to_be_bytes());
    assert_eq!(decode(&bytes), vec![Event::Double(1519157360.5, SemanticTag::Timestamp)]);
}

#[test]
fn definite_array_of_three() {
    let bytes = [0x83, 0x01, 0x02, 0x03];
    assert_eq!(
        decode(&bytes),
        vec![
            Event::BeginArray { length: Some(3), tag: SemanticTag::None },
            Event::UInt64(1, SemanticTag::None),
            Event::UInt64(2, SemanticTag::None),
            Event::UInt64(3, SemanticTag::None),
            Event::EndArray,
        ]
    );
}

#[test]
fn indefinite_array_terminated_by_break() {
    let bytes = [0x9f, 0x01, 0x02, 0xff];
    assert_eq!(
        decode(&bytes),
        vec![
            Event::BeginArray { length: None, tag: SemanticTag::None },
            Event::UInt64(1, SemanticTag::None),
            Event::UInt64(2, SemanticTag::None),
            Event::EndArray,
        ]
    );
}

#[test]
fn two_entry_map() {
    let bytes = [0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x02];
    assert_eq!(
        decode(&bytes),
        vec![
            Event::BeginObject { length: Some(2), tag: SemanticTag::None },
            Event::Name("a".into()),
            Event::UInt64(1, SemanticTag::None),
            Event::Name("b".into()),
            Event::UInt64(2, SemanticTag::None),
            Event::EndObject,
        ]
    );
}

#[test]
fn tag_2_bignum_renders_decimal() {
    let bytes = [0xc2, 0x43, 0x01, 0x00, 0x00];
    assert_eq!(decode(&bytes), vec![Event::String("65536".into(), SemanticTag::BigInt)]);
}

#[test]
fn tag_3_negative_bignum_renders_decimal() {
    // -1 - 0x0100 (256) == -257
    let bytes = [0xc3, 0x42, 0x01, 0x00];
    assert_eq!(decode(&bytes), vec![Event::String("-257".into(), SemanticTag::BigInt)]);
}

#[test]
fn tag_4_bigdec_mantissa_3_exponent_minus_1() {
    // mantissa 3, exponent -1 renders the arithmetically correct 3 * 10^-1 == "0.3"
    // (see DESIGN.md for the worked-example discrepancy this decision resolves).
    let bytes = [0xc4, 0x82, 0x20, 0x03];
    assert_eq!(decode(&bytes), vec![Event::String("0.3".into(), SemanticTag::BigDec)]);
}

#[test]
fn tag_5_bigfloat_renders_hex_float() {
    // 3 * 2^-1
    let bytes = [0xc5, 0x82, 0x20, 0x03];
    assert_eq!(decode(&bytes), vec![Event::String("0x3p-1".into(), SemanticTag::BigFloat)]);
}

#[test]
fn typed_array_u16_be() {
    // tag 0x45 (big-endian u16 typed array), 1-byte tag arg, then a 6-byte string holding
    // the triplet [0x4100, 0x0000, 0x0002].
    let bytes = [0xd8, 0x45, 0x46, 0x41, 0x00, 0x00, 0x00, 0x00, 0x02];
    let events = decode(&bytes);
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::TypedArray(arr) => {
            assert_eq!(arr.len(), 3);
        }
        other => panic!("expected TypedArray, got {other:?}"),
    }
}

#[test]
fn stringref_table_roundtrips_through_indirection() {
    // tag 256 installs a namespace on the array; a repeated 4+ byte string gets tabled, then
    // a tag-25 back-reference (index 0) retrieves it without re-encoding the bytes.
    let bytes = [
        0xd9, 0x01, 0x00, // tag 256
        0x82, // array(2)
        0x64, b'a', b'b', b'c', b'd', // "abcd" (tabled: 4 >= threshold 3)
        0xd8, 0x19, 0x00, // tag 25, index 0
    ];
    assert_eq!(
        decode(&bytes),
        vec![
            Event::BeginArray { length: Some(2), tag: SemanticTag::None },
            Event::String("abcd".into(), SemanticTag::None),
            Event::String("abcd".into(), SemanticTag::None),
            Event::EndArray,
        ]
    );
}

#[test]
fn stringref_out_of_range_is_an_error() {
    let bytes = [
        0xd9, 0x01, 0x00, // tag 256
        0x81, // array(1)
        0xd8, 0x19, 0x00, // tag 25, index 0 -- table is empty
    ];
    let mut parser = CborParser::new(SliceSource::new(&bytes));
    let mut sink = Capture::default();
    let err = parser.parse(&mut sink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StringrefTooLarge);
}

#[test]
fn truncated_input_yields_unexpected_eof() {
    let full = [0x83, 0x01, 0x02, 0x03];
    for cut in 1..full.len() {
        let mut parser = CborParser::new(SliceSource::new(&full[..cut]));
        let mut sink = Capture::default();
        let err = parser.parse(&mut sink).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert!(err.offset() as usize <= cut);
    }
}

#[test]
fn invalid_utf8_text_string_halts() {
    let bytes = [0x61, 0xff];
    let mut parser = CborParser::new(SliceSource::new(&bytes));
    let mut sink = Capture::default();
    let err = parser.parse(&mut sink).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidUtf8Text(_)));
}

#[test]
fn reset_is_idempotent() {
    let bytes = [0x83, 0x01, 0x02, 0x03];
    let mut parser = CborParser::new(SliceSource::new(&bytes));
    let mut sink_a = Capture::default();
    parser.parse(&mut sink_a).unwrap();

    parser.reset(SliceSource::new(&bytes));
    let mut sink_b = Capture::default();
    parser.parse(&mut sink_b).unwrap();

    assert_eq!(sink_a.0, sink_b.0);
}

#[test]
fn sink_pause_latches_and_resumes_on_next_call() {
    struct PauseAfterFirst {
        events: Vec<Event<'static>>,
        stop_after: usize,
    }
    impl cbor_data::sink::EventSink for PauseAfterFirst {
        fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> bool {
            self.events.push(Event::UInt64(value, tag));
            self.events.len() < self.stop_after
        }
    }
    let bytes = [0x83, 0x01, 0x02, 0x03];
    let mut parser = CborParser::new(SliceSource::new(&bytes));
    let mut sink = PauseAfterFirst { events: Vec::new(), stop_after: 1 };
    parser.parse(&mut sink).unwrap();
    assert!(!parser.done());
    assert_eq!(sink.events.len(), 1);

    parser.parse(&mut sink).unwrap();
    assert!(!parser.done());
    assert_eq!(sink.events.len(), 2);
}

#[test]
fn nested_maps_and_arrays_emit_well_formed_sequence() {
    // {"a": [1, 2], "b": {}}
    let bytes = [
        0xa2, // map(2)
        0x61, b'a', 0x82, 0x01, 0x02, // "a": [1, 2]
        0x61, b'b', 0xa0, // "b": {}
    ];
    assert_eq!(
        decode(&bytes),
        vec![
            Event::BeginObject { length: Some(2), tag: SemanticTag::None },
            Event::Name("a".into()),
            Event::BeginArray { length: Some(2), tag: SemanticTag::None },
            Event::UInt64(1, SemanticTag::None),
            Event::UInt64(2, SemanticTag::None),
            Event::EndArray,
            Event::Name("b".into()),
            Event::BeginObject { length: Some(0), tag: SemanticTag::None },
            Event::EndObject,
            Event::EndObject,
        ]
    );
}

#[test]
fn non_string_map_key_is_rendered_as_diagnostic_string() {
    // {1: "x"}
    let bytes = [0xa1, 0x01, 0x61, b'x'];
    assert_eq!(
        decode(&bytes),
        vec![
            Event::BeginObject { length: Some(1), tag: SemanticTag::None },
            Event::Name("1".into()),
            Event::String("x".into(), SemanticTag::None),
            Event::EndObject,
        ]
    );
}

/// Cross-check against `serde_cbor`'s own encoder/decoder for a variety of plain (untagged)
/// values, to catch head-decoding regressions that the hand-picked hex scenarios might miss.
#[test]
fn round_trips_against_serde_cbor_for_plain_values() {
    let values = vec![
        serde_cbor::Value::Integer(42),
        serde_cbor::Value::Integer(-1000),
        serde_cbor::Value::Text("hello world".into()),
        serde_cbor::Value::Bool(true),
        serde_cbor::Value::Null,
        serde_cbor::Value::Array(vec![serde_cbor::Value::Integer(1), serde_cbor::Value::Integer(2)]),
    ];
    for v in values {
        let bytes = serde_cbor::to_vec(&v).unwrap();
        let mut parser = CborParser::new(SliceSource::new(&bytes));
        let mut sink = Capture::default();
        parser.parse(&mut sink).unwrap();
        assert!(!sink.0.is_empty());
    }
}
