//! The pull cursor: wraps a [`CborParser`] so a caller can fetch one event at a time instead
//! of implementing an [`EventSink`].
//!
//! Internally this drives the parser with a sink that always requests "pause" after exactly
//! one event, then stores that event so [`Cursor::current`] can inspect it and [`Cursor::next`]
//! can advance past it. A `TypedArray` event is never surfaced directly: the cursor fans it out
//! into `BeginArray` + one numeric event per element + `EndArray`, matching what a push-mode
//! sink sees via [`EventSink::typed_array`]'s default expansion.

use crate::{
    error::ParseError,
    event::{Event, SemanticTag},
    parser::{dispatch_event, CborParser},
    sink::EventSink,
    source::ByteSource,
    typed_array::TypedArray,
};

/// Captures exactly one event per `parse` call by always returning `false`.
#[derive(Default)]
struct Capture {
    event: Option<Event<'static>>,
}

impl EventSink for Capture {
    fn begin_array(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        self.event = Some(Event::BeginArray { length, tag });
        false
    }
    fn end_array(&mut self) -> bool {
        self.event = Some(Event::EndArray);
        false
    }
    fn begin_object(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        self.event = Some(Event::BeginObject { length, tag });
        false
    }
    fn end_object(&mut self) -> bool {
        self.event = Some(Event::EndObject);
        false
    }
    fn name(&mut self, name: &str) -> bool {
        self.event = Some(Event::Name(name.to_string().into()));
        false
    }
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> bool {
        self.event = Some(Event::String(value.to_string().into(), tag));
        false
    }
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> bool {
        self.event = Some(Event::ByteString(value.to_vec().into(), tag));
        false
    }
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> bool {
        self.event = Some(Event::Int64(value, tag));
        false
    }
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> bool {
        self.event = Some(Event::UInt64(value, tag));
        false
    }
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> bool {
        self.event = Some(Event::Double(value, tag));
        false
    }
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> bool {
        self.event = Some(Event::Bool(value, tag));
        false
    }
    fn null_value(&mut self, tag: SemanticTag) -> bool {
        self.event = Some(Event::Null(tag));
        false
    }
    fn typed_array(&mut self, array: &TypedArray) -> bool {
        self.event = Some(Event::TypedArray(array.clone()));
        false
    }
}

/// Tracks fan-out progress through a materialised typed-array buffer.
struct TypedArrayCursor {
    array: TypedArray,
    index: usize,
}

impl TypedArrayCursor {
    fn next_element(&mut self) -> Option<Event<'static>> {
        macro_rules! elem {
            ($arr:expr, $ctor:expr) => {{
                let v = *$arr.get(self.index)?;
                self.index += 1;
                Some($ctor(v))
            }};
        }
        match &self.array {
            TypedArray::U8(a) => elem!(a, |v: u8| Event::UInt64(v as u64, SemanticTag::None)),
            TypedArray::U16(a) => elem!(a, |v: u16| Event::UInt64(v as u64, SemanticTag::None)),
            TypedArray::U32(a) => elem!(a, |v: u32| Event::UInt64(v as u64, SemanticTag::None)),
            TypedArray::U64(a) => elem!(a, |v: u64| Event::UInt64(v, SemanticTag::None)),
            TypedArray::I8(a) => elem!(a, |v: i8| Event::Int64(v as i64, SemanticTag::None)),
            TypedArray::I16(a) => elem!(a, |v: i16| Event::Int64(v as i64, SemanticTag::None)),
            TypedArray::I32(a) => elem!(a, |v: i32| Event::Int64(v as i64, SemanticTag::None)),
            TypedArray::I64(a) => elem!(a, |v: i64| Event::Int64(v, SemanticTag::None)),
            TypedArray::F32(a) => elem!(a, |v: f32| Event::Double(v as f64, SemanticTag::None)),
            TypedArray::F64(a) => elem!(a, |v: f64| Event::Double(v, SemanticTag::None)),
        }
    }

    fn is_exhausted(&self) -> bool {
        self.index >= self.array.len()
    }
}

/// A pull-mode view over a [`CborParser`]: fetch one event at a time with [`Cursor::next`]
/// instead of implementing [`EventSink`].
pub struct Cursor<S> {
    parser: CborParser<S>,
    capture: Capture,
    current: Option<Event<'static>>,
    fanout: Option<TypedArrayCursor>,
    filter: Option<Box<dyn FnMut(&Event<'_>) -> bool>>,
}

impl<S: ByteSource> Cursor<S> {
    pub fn new(parser: CborParser<S>) -> Self {
        Self {
            parser,
            capture: Capture::default(),
            current: None,
            fanout: None,
            filter: None,
        }
    }

    /// Install a predicate: events for which it returns `false` are skipped rather than
    /// surfaced from [`Cursor::next`].
    pub fn with_filter(mut self, filter: impl FnMut(&Event<'_>) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn done(&self) -> bool {
        self.fanout.is_none() && self.current.is_none() && self.parser.done()
    }

    /// The most recently fetched event, or `None` before the first call to `next()` / after
    /// the document has been fully consumed.
    pub fn current(&self) -> Option<&Event<'_>> {
        self.current.as_ref()
    }

    /// The source byte position at which the cursor currently sits.
    pub fn column(&self) -> u64 {
        self.parser.position()
    }

    /// Always `0`: neither CBOR nor MessagePack is line-oriented.
    pub fn line(&self) -> u64 {
        0
    }

    /// Advance to the next event passing the filter (or the next typed-array element
    /// boundary), storing it so [`Cursor::current`] can retrieve it. Returns `Ok(None)` once
    /// the document is fully consumed.
    pub fn next(&mut self) -> Result<Option<&Event<'_>>, ParseError> {
        loop {
            if let Some(fanout) = &mut self.fanout {
                let event = match fanout.next_element() {
                    Some(e) => e,
                    None => {
                        self.fanout = None;
                        Event::EndArray
                    }
                };
                self.current = Some(event);
            } else {
                self.capture.event = None;
                self.parser.parse(&mut self.capture)?;
                match self.capture.event.take() {
                    None => {
                        self.current = None;
                        return Ok(None);
                    }
                    Some(Event::TypedArray(array)) => {
                        let length = Some(array.len() as u64);
                        self.fanout = Some(TypedArrayCursor { array, index: 0 });
                        self.current = Some(Event::BeginArray { length, tag: SemanticTag::None });
                    }
                    Some(event) => self.current = Some(event),
                }
            }
            let passes = match &mut self.filter {
                Some(f) => f(self.current.as_ref().expect("just set")),
                None => true,
            };
            if passes {
                return Ok(self.current.as_ref());
            }
        }
    }

    /// Replay the currently stored event to `sink`, then drive the parser directly (push
    /// mode, bypassing capture) until the sink requests a pause or the document ends.
    pub fn read_to(&mut self, sink: &mut impl EventSink) -> Result<(), ParseError> {
        if let Some(event) = &self.current {
            if !dispatch_event(sink, event) {
                return Ok(());
            }
        }
        if let Some(fanout) = &mut self.fanout {
            while let Some(event) = fanout.next_element() {
                if !dispatch_event(sink, &event) {
                    return Ok(());
                }
            }
            self.fanout = None;
            if !sink.end_array() {
                return Ok(());
            }
        }
        self.parser.parse(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn pulls_scalar_events_one_at_a_time() {
        let mut cur = Cursor::new(CborParser::new(SliceSource::new(&[0x83, 0x01, 0x02, 0x03])));
        assert_eq!(
            cur.next().unwrap(),
            Some(&Event::BeginArray { length: Some(3), tag: SemanticTag::None })
        );
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(1, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(2, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(3, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::EndArray));
        assert_eq!(cur.next().unwrap(), None);
        assert!(cur.done());
    }

    #[test]
    fn fans_out_typed_array_element_by_element() {
        // tag 0x45 (big-endian u16 typed array), then a 6-byte string holding the triplet
        // [0x4100, 0x0000, 0x0002].
        let bytes = [0xd8, 0x45, 0x46, 0x41, 0x00, 0x00, 0x00, 0x00, 0x02];
        let mut cur = Cursor::new(CborParser::new(SliceSource::new(&bytes)));
        assert_eq!(
            cur.next().unwrap(),
            Some(&Event::BeginArray { length: Some(3), tag: SemanticTag::None })
        );
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(0x4100, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(0x0000, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(0x0002, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::EndArray));
        assert_eq!(cur.next().unwrap(), None);
    }

    #[test]
    fn filter_skips_uninteresting_events() {
        let mut cur = Cursor::new(CborParser::new(SliceSource::new(&[0x83, 0x01, 0x02, 0x03])))
            .with_filter(|e| matches!(e, Event::UInt64(..)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(1, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(2, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), Some(&Event::UInt64(3, SemanticTag::None)));
        assert_eq!(cur.next().unwrap(), None);
    }
}
