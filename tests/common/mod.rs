use cbor_data::{event::Event, sink::EventSink, typed_array::TypedArray, SemanticTag};

/// Collects every emitted event into a `Vec`, for assertions against a fully materialised
/// expected sequence. `typed_array` is overridden (rather than using the default fan-out) so
/// tests can assert on the raw `TypedArray` event the parser itself produces; cursor-level
/// fan-out is exercised separately in `typed_array.rs`.
#[derive(Default)]
pub struct Capture(pub Vec<Event<'static>>);

impl EventSink for Capture {
    fn begin_array(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        self.0.push(Event::BeginArray { length, tag });
        true
    }
    fn end_array(&mut self) -> bool {
        self.0.push(Event::EndArray);
        true
    }
    fn begin_object(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        self.0.push(Event::BeginObject { length, tag });
        true
    }
    fn end_object(&mut self) -> bool {
        self.0.push(Event::EndObject);
        true
    }
    fn name(&mut self, name: &str) -> bool {
        self.0.push(Event::Name(name.to_string().into()));
        true
    }
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> bool {
        self.0.push(Event::String(value.to_string().into(), tag));
        true
    }
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> bool {
        self.0.push(Event::ByteString(value.to_vec().into(), tag));
        true
    }
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> bool {
        self.0.push(Event::Int64(value, tag));
        true
    }
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> bool {
        self.0.push(Event::UInt64(value, tag));
        true
    }
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> bool {
        self.0.push(Event::Double(value, tag));
        true
    }
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> bool {
        self.0.push(Event::Bool(value, tag));
        true
    }
    fn null_value(&mut self, tag: SemanticTag) -> bool {
        self.0.push(Event::Null(tag));
        true
    }
    fn typed_array(&mut self, array: &TypedArray) -> bool {
        self.0.push(Event::TypedArray(array.clone()));
        true
    }
}
