//! A streaming MessagePack decoder: the same Source → Parser → Sink pattern as
//! [`crate::parser::CborParser`], without CBOR's tag vocabulary, stringref table, or
//! typed-array extensions. Ported from the format-byte-range table of
//! `examples/original_source/include/jsoncons_ext/msgpack/msgpack_reader.hpp`, reshaped into
//! the crate's explicit-stack driven-step style rather than that header's recursive descent.
//!
//! MessagePack has no indefinite-length containers and no map/name recursion concerns beyond
//! CBOR's: every array/map header carries its element count up front, so the container stack
//! only needs `Array`/`MapKey`/`MapValue` modes (no `Indefinite*` counterparts, no stringref
//! table slot).

use crate::{
    error::{ErrorKind, ParseError},
    event::SemanticTag,
    reader::read_bytes,
    sink::EventSink,
    source::ByteSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Root,
    BeforeDone,
    Array,
    MapKey,
    MapValue,
}

struct Frame {
    mode: Mode,
    length: u64,
    index: u64,
}

/// Drives a [`ByteSource`] through the MessagePack item grammar, calling an [`EventSink`] for
/// every emitted event. Mirrors [`crate::parser::CborParser`]'s public shape (`parse`, `done`,
/// `reset`, `position`) so the two decoders are interchangeable from a caller's perspective.
pub struct MsgPackParser<S> {
    source: S,
    stack: Vec<Frame>,
    done: bool,
    error: Option<ParseError>,
}

impl<S: ByteSource> MsgPackParser<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            stack: vec![Frame { mode: Mode::Root, length: 0, index: 0 }],
            done: false,
            error: None,
        }
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn position(&self) -> u64 {
        self.source.position()
    }

    pub fn reset(&mut self, source: S) {
        self.source = source;
        self.stack = vec![Frame { mode: Mode::Root, length: 0, index: 0 }];
        self.done = false;
        self.error = None;
    }

    pub fn parse(&mut self, sink: &mut impl EventSink) -> Result<(), ParseError> {
        if let Some(e) = &self.error {
            return Err(e.clone());
        }
        loop {
            if self.done {
                return Ok(());
            }
            match self.step(sink) {
                Ok(true) => continue,
                Ok(false) => return Ok(()),
                Err(e) => {
                    self.error = Some(e.clone());
                    return Err(e);
                }
            }
        }
    }

    fn step(&mut self, sink: &mut impl EventSink) -> Result<bool, ParseError> {
        let mode = self.stack.last().expect("stack never empties before done").mode;
        match mode {
            Mode::Root => {
                self.stack.last_mut().unwrap().mode = Mode::BeforeDone;
                self.read_item(sink)
            }
            Mode::BeforeDone => {
                self.stack.clear();
                self.done = true;
                sink.flush();
                Ok(true)
            }
            Mode::Array => {
                let frame = self.stack.last().unwrap();
                if frame.index < frame.length {
                    self.stack.last_mut().unwrap().index += 1;
                    self.read_item(sink)
                } else {
                    self.stack.pop();
                    Ok(sink.end_array())
                }
            }
            Mode::MapKey => {
                let frame = self.stack.last().unwrap();
                if frame.index < frame.length {
                    self.stack.last_mut().unwrap().index += 1;
                    let cont = self.read_name(sink)?;
                    self.stack.last_mut().unwrap().mode = Mode::MapValue;
                    Ok(cont)
                } else {
                    self.stack.pop();
                    Ok(sink.end_object())
                }
            }
            Mode::MapValue => {
                self.stack.last_mut().unwrap().mode = Mode::MapKey;
                self.read_item(sink)
            }
        }
    }

    fn eof(&self) -> ParseError {
        ParseError::new(self.source.position(), ErrorKind::UnexpectedEof)
    }

    fn read_byte(&mut self) -> Result<u8, ParseError> {
        self.source.get().ok_or_else(|| self.eof())
    }

    fn read_u16(&mut self) -> Result<u16, ParseError> {
        let mut buf = [0u8; 2];
        if !self.source.read(&mut buf) {
            return Err(self.eof());
        }
        Ok(u16::from_be_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32, ParseError> {
        let mut buf = [0u8; 4];
        if !self.source.read(&mut buf) {
            return Err(self.eof());
        }
        Ok(u32::from_be_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64, ParseError> {
        let mut buf = [0u8; 8];
        if !self.source.read(&mut buf) {
            return Err(self.eof());
        }
        Ok(u64::from_be_bytes(buf))
    }

    /// `read_item`: dispatch one format byte into exactly one sink call, or push a new
    /// container frame for array/map headers.
    fn read_item(&mut self, sink: &mut impl EventSink) -> Result<bool, ParseError> {
        let b = self.read_byte()?;
        match b {
            0x00..=0x7f => Ok(sink.uint64_value(b as u64, SemanticTag::None)),
            0xe0..=0xff => Ok(sink.int64_value(b as i8 as i64, SemanticTag::None)),
            0x80..=0x8f => {
                self.begin_map((b & 0x0f) as u64);
                Ok(sink.begin_object(Some((b & 0x0f) as u64), SemanticTag::None))
            }
            0x90..=0x9f => {
                self.begin_array((b & 0x0f) as u64);
                Ok(sink.begin_array(Some((b & 0x0f) as u64), SemanticTag::None))
            }
            0xa0..=0xbf => {
                let len = (b & 0x1f) as usize;
                self.read_str(sink, len)
            }
            0xc0 => Ok(sink.null_value(SemanticTag::None)),
            0xc1 => Err(ParseError::new(self.source.position(), ErrorKind::InvalidInfo)),
            0xc2 => Ok(sink.bool_value(false, SemanticTag::None)),
            0xc3 => Ok(sink.bool_value(true, SemanticTag::None)),
            0xc4 => {
                let len = self.read_byte()? as usize;
                self.read_bin(sink, len)
            }
            0xc5 => {
                let len = self.read_u16()? as usize;
                self.read_bin(sink, len)
            }
            0xc6 => {
                let len = self.read_u32()? as usize;
                self.read_bin(sink, len)
            }
            0xc7 => {
                let len = self.read_byte()? as usize;
                self.read_ext(sink, len)
            }
            0xc8 => {
                let len = self.read_u16()? as usize;
                self.read_ext(sink, len)
            }
            0xc9 => {
                let len = self.read_u32()? as usize;
                self.read_ext(sink, len)
            }
            0xca => {
                let v = f32::from_be_bytes(self.read_u32()?.to_be_bytes());
                Ok(sink.double_value(v as f64, SemanticTag::None))
            }
            0xcb => {
                let v = f64::from_be_bytes(self.read_u64()?.to_be_bytes());
                Ok(sink.double_value(v, SemanticTag::None))
            }
            0xcc => Ok(sink.uint64_value(self.read_byte()? as u64, SemanticTag::None)),
            0xcd => Ok(sink.uint64_value(self.read_u16()? as u64, SemanticTag::None)),
            0xce => Ok(sink.uint64_value(self.read_u32()? as u64, SemanticTag::None)),
            0xcf => Ok(sink.uint64_value(self.read_u64()?, SemanticTag::None)),
            0xd0 => Ok(sink.int64_value(self.read_byte()? as i8 as i64, SemanticTag::None)),
            0xd1 => Ok(sink.int64_value(self.read_u16()? as i16 as i64, SemanticTag::None)),
            0xd2 => Ok(sink.int64_value(self.read_u32()? as i32 as i64, SemanticTag::None)),
            0xd3 => Ok(sink.int64_value(self.read_u64()? as i64, SemanticTag::None)),
            0xd4 => self.read_ext(sink, 1),
            0xd5 => self.read_ext(sink, 2),
            0xd6 => self.read_ext(sink, 4),
            0xd7 => self.read_ext(sink, 8),
            0xd8 => self.read_ext(sink, 16),
            0xd9 => {
                let len = self.read_byte()? as usize;
                self.read_str(sink, len)
            }
            0xda => {
                let len = self.read_u16()? as usize;
                self.read_str(sink, len)
            }
            0xdb => {
                let len = self.read_u32()? as usize;
                self.read_str(sink, len)
            }
            0xdc => {
                let len = self.read_u16()? as u64;
                self.begin_array(len);
                Ok(sink.begin_array(Some(len), SemanticTag::None))
            }
            0xdd => {
                let len = self.read_u32()? as u64;
                self.begin_array(len);
                Ok(sink.begin_array(Some(len), SemanticTag::None))
            }
            0xde => {
                let len = self.read_u16()? as u64;
                self.begin_map(len);
                Ok(sink.begin_object(Some(len), SemanticTag::None))
            }
            0xdf => {
                let len = self.read_u32()? as u64;
                self.begin_map(len);
                Ok(sink.begin_object(Some(len), SemanticTag::None))
            }
        }
    }

    fn read_str(&mut self, sink: &mut impl EventSink, len: usize) -> Result<bool, ParseError> {
        let bytes = read_bytes(&mut self.source, len)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ParseError::new(self.source.position(), ErrorKind::InvalidUtf8Text(e.utf8_error())))?;
        Ok(sink.string_value(&text, SemanticTag::None))
    }

    fn read_bin(&mut self, sink: &mut impl EventSink, len: usize) -> Result<bool, ParseError> {
        let bytes = read_bytes(&mut self.source, len)?;
        Ok(sink.byte_string_value(&bytes, SemanticTag::None))
    }

    fn read_ext(&mut self, sink: &mut impl EventSink, len: usize) -> Result<bool, ParseError> {
        let type_id = self.read_byte()? as i8;
        let bytes = read_bytes(&mut self.source, len)?;
        Ok(sink.ext_value(type_id, &bytes))
    }

    /// Map keys in MessagePack are plain values just like array elements (no bignum/tag
    /// recursion concerns); a non-string key is still reported through `name` after being
    /// rendered, matching the CBOR parser's recursion-safety-for-names treatment.
    fn read_name(&mut self, sink: &mut impl EventSink) -> Result<bool, ParseError> {
        let b = match self.source.peek() {
            Some(b) => b,
            None => return Err(self.eof()),
        };
        let is_str = matches!(b, 0xa0..=0xbf | 0xd9 | 0xda | 0xdb);
        if is_str {
            self.read_byte()?;
            let len = match b {
                0xa0..=0xbf => (b & 0x1f) as usize,
                0xd9 => self.read_byte()? as usize,
                0xda => self.read_u16()? as usize,
                0xdb => self.read_u32()? as usize,
                _ => unreachable!(),
            };
            let bytes = read_bytes(&mut self.source, len)?;
            let text = String::from_utf8(bytes)
                .map_err(|e| ParseError::new(self.source.position(), ErrorKind::InvalidUtf8Text(e.utf8_error())))?;
            Ok(sink.name(&text))
        } else {
            let rendered = self.read_value_as_diagnostic_string()?;
            Ok(sink.name(&rendered))
        }
    }

    fn read_value_as_diagnostic_string(&mut self) -> Result<String, ParseError> {
        let b = self.read_byte()?;
        Ok(match b {
            0x00..=0x7f => b.to_string(),
            0xe0..=0xff => (b as i8 as i64).to_string(),
            0xc0 => "null".to_string(),
            0xc2 => "false".to_string(),
            0xc3 => "true".to_string(),
            0xcc => self.read_byte()?.to_string(),
            0xcd => self.read_u16()?.to_string(),
            0xce => self.read_u32()?.to_string(),
            0xcf => self.read_u64()?.to_string(),
            0xd0 => (self.read_byte()? as i8 as i64).to_string(),
            0xd1 => (self.read_u16()? as i16 as i64).to_string(),
            0xd2 => (self.read_u32()? as i32 as i64).to_string(),
            0xd3 => (self.read_u64()? as i64).to_string(),
            0xa0..=0xbf => {
                let len = (b & 0x1f) as usize;
                let bytes = read_bytes(&mut self.source, len)?;
                format!("{:?}", String::from_utf8_lossy(&bytes))
            }
            _ => return Err(ParseError::new(self.source.position(), ErrorKind::InvalidInfo)),
        })
    }

    fn begin_array(&mut self, length: u64) {
        self.stack.push(Frame { mode: Mode::Array, length, index: 0 });
    }

    fn begin_map(&mut self, length: u64) {
        self.stack.push(Frame { mode: Mode::MapKey, length, index: 0 });
    }
}
