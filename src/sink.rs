//! The downstream event-sink contract: one method per event kind, each returning `true` to
//! continue or `false` to request the parser pause after the current event.
//!
//! A capability passed in by the caller, with every method defaulted so a sink only
//! overrides the events it cares about.

use crate::{event::SemanticTag, typed_array::TypedArray};

#[allow(unused_variables)]
pub trait EventSink {
    fn begin_array(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        true
    }
    fn end_array(&mut self) -> bool {
        true
    }
    fn begin_object(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        true
    }
    fn end_object(&mut self) -> bool {
        true
    }
    fn name(&mut self, name: &str) -> bool {
        true
    }
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> bool {
        true
    }
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> bool {
        true
    }
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> bool {
        true
    }
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> bool {
        true
    }
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> bool {
        true
    }
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> bool {
        true
    }
    fn null_value(&mut self, tag: SemanticTag) -> bool {
        true
    }
    /// Receives the materialised buffer for a typed-array tag (`0x40..=0x57`); the default
    /// implementation expands it into `begin_array`/per-element/`end_array` itself so a
    /// sink that does not care about typed arrays still sees a well-formed event stream.
    fn typed_array(&mut self, array: &TypedArray) -> bool {
        if !self.begin_array(Some(array.len() as u64), SemanticTag::None) {
            return false;
        }
        let cont = match array {
            TypedArray::U8(a) => a.iter().all(|&v| self.uint64_value(v as u64, SemanticTag::None)),
            TypedArray::U16(a) => a.iter().all(|&v| self.uint64_value(v as u64, SemanticTag::None)),
            TypedArray::U32(a) => a.iter().all(|&v| self.uint64_value(v as u64, SemanticTag::None)),
            TypedArray::U64(a) => a.iter().all(|&v| self.uint64_value(v, SemanticTag::None)),
            TypedArray::I8(a) => a.iter().all(|&v| self.int64_value(v as i64, SemanticTag::None)),
            TypedArray::I16(a) => a.iter().all(|&v| self.int64_value(v as i64, SemanticTag::None)),
            TypedArray::I32(a) => a.iter().all(|&v| self.int64_value(v as i64, SemanticTag::None)),
            TypedArray::I64(a) => a.iter().all(|&v| self.int64_value(v, SemanticTag::None)),
            TypedArray::F32(a) => a.iter().all(|&v| self.double_value(v as f64, SemanticTag::None)),
            TypedArray::F64(a) => a.iter().all(|&v| self.double_value(v, SemanticTag::None)),
        };
        if !cont {
            return false;
        }
        self.end_array()
    }
    /// A MessagePack `ext` family value (fixext1/2/4/8/16, ext8/16/32): an application-defined
    /// type byte plus its payload. MessagePack's ext-type byte has no `SemanticTag` counterpart
    /// (it is outside CBOR's tag vocabulary), so it is reported through this side channel
    /// rather than inventing new `SemanticTag` variants. The default forwards to
    /// `byte_string_value` untagged, so a sink that does not care about ext types still sees a
    /// well-formed byte string event.
    fn ext_value(&mut self, type_id: i8, value: &[u8]) -> bool {
        let _ = type_id;
        self.byte_string_value(value, SemanticTag::None)
    }
    fn flush(&mut self) {}
}
