//! Streaming decoders for CBOR (RFC 8949 plus the typed-array and stringref extensions) and
//! MessagePack: both translate a byte stream into an ordered sequence of semantic
//! [`Event`](event::Event)s consumable by a downstream [`EventSink`](sink::EventSink).
//!
//! The CBOR decoder ([`parser::CborParser`]) is the fully-engineered core: it resolves tag
//! semantics (bignum, decimal fraction, bigfloat, typed arrays, stringref), tracks nested
//! container state across arbitrarily deep documents, and is driven either directly (push, via
//! [`parser::CborParser::parse`]) or through [`cursor::Cursor`] (pull, one event at a time).
//! [`msgpack::MsgPackParser`] is a smaller parallel instance of the same
//! source/parser/sink shape, without CBOR's tag vocabulary.
//!
//! ```
//! use cbor_data::{event::SemanticTag, parser::CborParser, sink::EventSink, source::SliceSource};
//!
//! struct Count(usize);
//! impl EventSink for Count {
//!     fn uint64_value(&mut self, _value: u64, _tag: SemanticTag) -> bool {
//!         self.0 += 1;
//!         true
//!     }
//! }
//!
//! let mut parser = CborParser::new(SliceSource::new(&[0x83, 0x01, 0x02, 0x03]));
//! let mut sink = Count(0);
//! parser.parse(&mut sink).unwrap();
//! assert_eq!(sink.0, 3);
//! ```

pub mod bignum;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod event;
pub mod msgpack;
pub mod parser;
pub mod reader;
pub mod sink;
pub mod source;
pub mod stringref;
pub mod typed_array;

pub use cursor::Cursor;
pub use error::{ErrorKind, ParseError};
pub use event::{Event, SemanticTag};
pub use parser::{CborParser, ParserOptions};
pub use sink::EventSink;
pub use source::{ByteSource, ReaderSource, SliceSource};
pub use typed_array::TypedArray;
