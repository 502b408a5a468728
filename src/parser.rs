//! The Item Parser: a driven state machine over a stack of container frames, turning a
//! [`ByteSource`] into calls on an [`EventSink`].
//!
//! This is the heart of the crate; everything else (the cursor adapter, the CLI, the test
//! suite) sits on top of [`CborParser::parse`]. Container recursion is replaced by an
//! explicit frame stack so a single call to `parse` can suspend at any event boundary
//! instead of recursing through the whole document.

use crate::{
    bignum::Magnitude,
    constants::*,
    error::{ErrorKind, ParseError},
    event::SemanticTag,
    reader::{peek_head, read_bytes, read_float_arg, read_head, read_uint_arg},
    sink::EventSink,
    source::ByteSource,
    stringref::{StringRefKind, StringRefTable},
    typed_array,
};

/// Tunable limits threaded through [`CborParser::with_options`].
///
/// A fluent builder for tuning how defensively a document is parsed.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    max_depth: usize,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self { max_depth: 512 }
    }

    /// Reject documents that nest arrays/maps deeper than `depth` with `number_too_large`,
    /// rather than growing the container stack without bound on adversarial input.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Root,
    BeforeDone,
    Array,
    IndefiniteArray,
    MapKey,
    MapValue,
    IndefiniteMapKey,
    IndefiniteMapValue,
}

struct Frame {
    mode: Mode,
    length: u64,
    index: u64,
    stringref: Option<StringRefTable>,
}

/// Drives a [`ByteSource`] through the CBOR item grammar, calling an [`EventSink`] for every
/// emitted event.
pub struct CborParser<S> {
    source: S,
    stack: Vec<Frame>,
    tags: Vec<u64>,
    done: bool,
    error: Option<ParseError>,
    options: ParserOptions,
}

impl<S: ByteSource> CborParser<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            stack: vec![Frame {
                mode: Mode::Root,
                length: 0,
                index: 0,
                stringref: None,
            }],
            tags: Vec::new(),
            done: false,
            error: None,
            options,
        }
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn position(&self) -> u64 {
        self.source.position()
    }

    /// Re-arm the parser after a sink-requested pause; a no-op if it wasn't paused.
    pub fn restart(&mut self) {}

    /// Discard all parser state and resume decoding a fresh source from scratch.
    pub fn reset(&mut self, source: S) {
        self.source = source;
        self.stack = vec![Frame {
            mode: Mode::Root,
            length: 0,
            index: 0,
            stringref: None,
        }];
        self.tags.clear();
        self.done = false;
        self.error = None;
    }

    /// Advance until the sink returns `false` (pause), the document is fully parsed, or an
    /// error is latched. Once an error is latched, every subsequent call returns the same
    /// error without touching the source again.
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
                    #[cfg(feature = "trace")]
                    tracing::debug!(offset = e.offset(), kind = ?e.kind(), "parse error latched");
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
                    #[cfg(feature = "trace")]
                    tracing::trace!(depth = self.stack.len(), "pop array frame");
                    Ok(sink.end_array())
                }
            }
            Mode::IndefiniteArray => {
                if self.peek_is_break()? {
                    self.source.get();
                    self.stack.pop();
                    #[cfg(feature = "trace")]
                    tracing::trace!(depth = self.stack.len(), "pop array frame");
                    Ok(sink.end_array())
                } else {
                    self.read_item(sink)
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
                    #[cfg(feature = "trace")]
                    tracing::trace!(depth = self.stack.len(), "pop map frame");
                    Ok(sink.end_object())
                }
            }
            Mode::MapValue => {
                self.stack.last_mut().unwrap().mode = Mode::MapKey;
                self.read_item(sink)
            }
            Mode::IndefiniteMapKey => {
                if self.peek_is_break()? {
                    self.source.get();
                    self.stack.pop();
                    #[cfg(feature = "trace")]
                    tracing::trace!(depth = self.stack.len(), "pop map frame");
                    Ok(sink.end_object())
                } else {
                    let cont = self.read_name(sink)?;
                    self.stack.last_mut().unwrap().mode = Mode::IndefiniteMapValue;
                    Ok(cont)
                }
            }
            Mode::IndefiniteMapValue => {
                self.stack.last_mut().unwrap().mode = Mode::IndefiniteMapKey;
                self.read_item(sink)
            }
        }
    }

    fn peek_is_break(&mut self) -> Result<bool, ParseError> {
        match self.source.peek() {
            Some(STOP_BYTE) => Ok(true),
            Some(_) => Ok(false),
            None => Err(ParseError::new(self.source.position(), ErrorKind::UnexpectedEof)),
        }
    }

    fn read_tags(&mut self) -> Result<(), ParseError> {
        loop {
            let (major, ai) = peek_head(&mut self.source)?;
            if major != MAJOR_TAG {
                return Ok(());
            }
            read_head(&mut self.source)?;
            let tag = read_uint_arg(&mut self.source, ai)?;
            self.tags.push(tag);
        }
    }

    /// Map the innermost pending tag (the "back of the accumulator") to a [`SemanticTag`] for
    /// a uint/int/double item, then clear the accumulator.
    fn take_scalar_tag(&mut self) -> SemanticTag {
        let tag = match self.tags.last() {
            Some(&TAG_EPOCH) => SemanticTag::Timestamp,
            _ => SemanticTag::None,
        };
        self.tags.clear();
        tag
    }

    fn take_text_tag(&mut self) -> SemanticTag {
        let tag = match self.tags.last() {
            Some(&TAG_ISO8601) => SemanticTag::DateTime,
            Some(&TAG_URI) => SemanticTag::Uri,
            Some(&TAG_BASE64URL) => SemanticTag::Base64Url,
            Some(&TAG_BASE64) => SemanticTag::Base64,
            _ => SemanticTag::None,
        };
        self.tags.clear();
        tag
    }

    /// `read_item`: consume leading tags, then dispatch on the next major type. Used in every
    /// "value position" mode (root, array element, map value).
    fn read_item(&mut self, sink: &mut impl EventSink) -> Result<bool, ParseError> {
        self.read_tags()?;
        let (major, ai) = peek_head(&mut self.source)?;
        match major {
            MAJOR_POS => {
                read_head(&mut self.source)?;
                let arg = read_uint_arg(&mut self.source, ai)?;
                if self.tags.last() == Some(&TAG_STRINGREF) {
                    if let Some(table) = self.stack.last().unwrap().stringref.clone() {
                        self.tags.clear();
                        return self.emit_stringref(sink, &table, arg);
                    }
                }
                let tag = self.take_scalar_tag();
                Ok(sink.uint64_value(arg, tag))
            }
            MAJOR_NEG => {
                read_head(&mut self.source)?;
                let arg = read_uint_arg(&mut self.source, ai)?;
                let tag = self.take_scalar_tag();
                let value = -1i128 - arg as i128;
                let value = i64::try_from(value)
                    .map_err(|_| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))?;
                Ok(sink.int64_value(value, tag))
            }
            MAJOR_BYTES => {
                read_head(&mut self.source)?;
                let (bytes, indefinite) = self.read_bytes_body(ai)?;
                self.maybe_insert_stringref(StringRefKind::Bytes, &bytes, indefinite);
                self.handle_byte_string(sink, bytes)
            }
            MAJOR_STR => {
                read_head(&mut self.source)?;
                let (text, indefinite) = self.read_text_body(ai)?;
                self.maybe_insert_stringref(StringRefKind::Text, text.as_bytes(), indefinite);
                let tag = self.take_text_tag();
                Ok(sink.string_value(&text, tag))
            }
            MAJOR_ARRAY => {
                if self.tags.last() == Some(&TAG_BIGDECIMAL) {
                    self.tags.clear();
                    return self.emit_decimal_fraction(sink, ai, false);
                }
                if self.tags.last() == Some(&TAG_BIGFLOAT) {
                    self.tags.clear();
                    return self.emit_decimal_fraction(sink, ai, true);
                }
                read_head(&mut self.source)?;
                let length = self.begin_array(ai)?;
                Ok(sink.begin_array(length, SemanticTag::None))
            }
            MAJOR_DICT => {
                read_head(&mut self.source)?;
                let length = self.begin_map(ai)?;
                Ok(sink.begin_object(length, SemanticTag::None))
            }
            MAJOR_TAG => unreachable!("tags are consumed by read_tags"),
            MAJOR_LIT => {
                read_head(&mut self.source)?;
                match ai {
                    LIT_FALSE => {
                        self.tags.clear();
                        Ok(sink.bool_value(false, SemanticTag::None))
                    }
                    LIT_TRUE => {
                        self.tags.clear();
                        Ok(sink.bool_value(true, SemanticTag::None))
                    }
                    LIT_NULL => {
                        self.tags.clear();
                        Ok(sink.null_value(SemanticTag::None))
                    }
                    LIT_UNDEFINED => {
                        self.tags.clear();
                        Ok(sink.null_value(SemanticTag::Undefined))
                    }
                    LIT_FLOAT16 | LIT_FLOAT32 | LIT_FLOAT64 => {
                        let v = read_float_arg(&mut self.source, ai)?;
                        let tag = self.take_scalar_tag();
                        Ok(sink.double_value(v, tag))
                    }
                    _ => Err(ParseError::new(self.source.position(), ErrorKind::InvalidInfo)),
                }
            }
            _ => unreachable!("major type is 3 bits"),
        }
    }

    fn emit_stringref(
        &mut self,
        sink: &mut impl EventSink,
        table: &StringRefTable,
        index: u64,
    ) -> Result<bool, ParseError> {
        let idx = usize::try_from(index)
            .map_err(|_| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))?;
        let entry = table
            .get(idx)
            .ok_or_else(|| ParseError::new(self.source.position(), ErrorKind::StringrefTooLarge))?;
        match entry.kind {
            StringRefKind::Text => {
                let text = std::str::from_utf8(&entry.value)
                    .map_err(|e| ParseError::new(self.source.position(), ErrorKind::InvalidUtf8Text(e)))?;
                Ok(sink.string_value(text, SemanticTag::None))
            }
            StringRefKind::Bytes => Ok(sink.byte_string_value(&entry.value, SemanticTag::None)),
        }
    }

    fn maybe_insert_stringref(&mut self, kind: StringRefKind, bytes: &[u8], indefinite: bool) {
        if indefinite {
            return;
        }
        if let Some(table) = &self.stack.last().unwrap().stringref {
            table.maybe_insert(kind, bytes);
        }
    }

    fn read_bytes_body(&mut self, ai: u8) -> Result<(Vec<u8>, bool), ParseError> {
        if ai == INDEFINITE_SIZE {
            let mut buf = Vec::new();
            loop {
                if self.peek_is_break()? {
                    self.source.get();
                    break;
                }
                let (major, ai2) = read_head(&mut self.source)?;
                if major != MAJOR_BYTES || ai2 == INDEFINITE_SIZE {
                    return Err(ParseError::new(self.source.position(), ErrorKind::InvalidStringFragment));
                }
                let len = read_uint_arg(&mut self.source, ai2)?;
                let len = usize::try_from(len)
                    .map_err(|_| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))?;
                buf.extend(read_bytes(&mut self.source, len)?);
            }
            Ok((buf, true))
        } else {
            let len = read_uint_arg(&mut self.source, ai)?;
            let len = usize::try_from(len)
                .map_err(|_| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))?;
            Ok((read_bytes(&mut self.source, len)?, false))
        }
    }

    fn read_text_body(&mut self, ai: u8) -> Result<(String, bool), ParseError> {
        if ai == INDEFINITE_SIZE {
            let mut text = String::new();
            loop {
                if self.peek_is_break()? {
                    self.source.get();
                    break;
                }
                let (major, ai2) = read_head(&mut self.source)?;
                if major != MAJOR_STR || ai2 == INDEFINITE_SIZE {
                    return Err(ParseError::new(self.source.position(), ErrorKind::InvalidStringFragment));
                }
                let len = read_uint_arg(&mut self.source, ai2)?;
                let len = usize::try_from(len)
                    .map_err(|_| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))?;
                let bytes = read_bytes(&mut self.source, len)?;
                let chunk = std::str::from_utf8(&bytes)
                    .map_err(|e| ParseError::new(self.source.position(), ErrorKind::InvalidUtf8Text(e)))?;
                text.push_str(chunk);
            }
            Ok((text, true))
        } else {
            let len = read_uint_arg(&mut self.source, ai)?;
            let len = usize::try_from(len)
                .map_err(|_| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))?;
            let bytes = read_bytes(&mut self.source, len)?;
            let text = String::from_utf8(bytes)
                .map_err(|e| ParseError::new(self.source.position(), ErrorKind::InvalidUtf8Text(e.utf8_error())))?;
            Ok((text, false))
        }
    }

    fn handle_byte_string(&mut self, sink: &mut impl EventSink, bytes: Vec<u8>) -> Result<bool, ParseError> {
        let pos = self.source.position();
        match self.tags.last().copied() {
            Some(TAG_BIGNUM_POS) => {
                self.tags.clear();
                let s = Magnitude::from_be_bytes(&bytes).to_decimal_digits();
                Ok(sink.string_value(&s, SemanticTag::BigInt))
            }
            Some(TAG_BIGNUM_NEG) => {
                self.tags.clear();
                let s = format!("-{}", Magnitude::from_be_bytes(&bytes).increment().to_decimal_digits());
                Ok(sink.string_value(&s, SemanticTag::BigInt))
            }
            Some(TAG_BASE64URL_BYTES) => {
                self.tags.clear();
                Ok(sink.byte_string_value(&bytes, SemanticTag::Base64Url))
            }
            Some(TAG_BASE64_BYTES) => {
                self.tags.clear();
                Ok(sink.byte_string_value(&bytes, SemanticTag::Base64))
            }
            Some(TAG_BASE16_BYTES) => {
                self.tags.clear();
                Ok(sink.byte_string_value(&bytes, SemanticTag::Base16))
            }
            Some(tag) if typed_array::is_typed_array_tag(tag) => {
                self.tags.clear();
                let array = typed_array::decode(tag, &bytes, pos)?;
                Ok(sink.typed_array(&array))
            }
            _ => {
                self.tags.clear();
                Ok(sink.byte_string_value(&bytes, SemanticTag::None))
            }
        }
    }

    /// Push a new array frame, returning the declared length (`None` if indefinite) for the
    /// caller to hand to `sink.begin_array`.
    fn begin_array(&mut self, ai: u8) -> Result<Option<u64>, ParseError> {
        self.check_depth()?;
        let stringref = self.child_stringref_table();
        #[cfg(feature = "trace")]
        tracing::trace!(depth = self.stack.len(), "push array frame");
        if ai == INDEFINITE_SIZE {
            self.stack.push(Frame {
                mode: Mode::IndefiniteArray,
                length: 0,
                index: 0,
                stringref,
            });
            Ok(None)
        } else {
            let length = read_uint_arg(&mut self.source, ai)?;
            self.stack.push(Frame {
                mode: Mode::Array,
                length,
                index: 0,
                stringref,
            });
            Ok(Some(length))
        }
    }

    /// Push a new map frame, returning the declared pair count (`None` if indefinite).
    fn begin_map(&mut self, ai: u8) -> Result<Option<u64>, ParseError> {
        self.check_depth()?;
        let stringref = self.child_stringref_table();
        #[cfg(feature = "trace")]
        tracing::trace!(depth = self.stack.len(), "push map frame");
        if ai == INDEFINITE_SIZE {
            self.stack.push(Frame {
                mode: Mode::IndefiniteMapKey,
                length: 0,
                index: 0,
                stringref,
            });
            Ok(None)
        } else {
            let length = read_uint_arg(&mut self.source, ai)?;
            self.stack.push(Frame {
                mode: Mode::MapKey,
                length,
                index: 0,
                stringref,
            });
            Ok(Some(length))
        }
    }

    fn check_depth(&self) -> Result<(), ParseError> {
        if self.stack.len() >= self.options.max_depth {
            return Err(ParseError::new(self.source.position(), ErrorKind::NumberTooLarge));
        }
        Ok(())
    }

    /// Resolve the stringref table the about-to-be-pushed container frame should carry:
    /// a fresh table if `tag 256` is pending, otherwise the parent's handle (if any).
    fn child_stringref_table(&mut self) -> Option<StringRefTable> {
        let installs_namespace = self.tags.iter().any(|&t| t == TAG_STRINGREF_NAMESPACE);
        self.tags.clear();
        if installs_namespace {
            Some(StringRefTable::new())
        } else {
            self.stack.last().unwrap().stringref.clone()
        }
    }

    /// Read a signed integer component (plain int, or tag-2/3-wrapped bignum byte string) for
    /// a bigdec/bigfloat two-element array.
    fn read_decimal_component(&mut self, err_kind: ErrorKind) -> Result<i128, ParseError> {
        self.read_tags()?;
        let (major, ai) = peek_head(&mut self.source)?;
        match major {
            MAJOR_POS => {
                read_head(&mut self.source)?;
                let v = read_uint_arg(&mut self.source, ai)?;
                self.tags.clear();
                Ok(v as i128)
            }
            MAJOR_NEG => {
                read_head(&mut self.source)?;
                let v = read_uint_arg(&mut self.source, ai)?;
                self.tags.clear();
                Ok(-1i128 - v as i128)
            }
            MAJOR_BYTES if matches!(self.tags.last(), Some(&TAG_BIGNUM_POS) | Some(&TAG_BIGNUM_NEG)) => {
                let negative = self.tags.last() == Some(&TAG_BIGNUM_NEG);
                self.tags.clear();
                read_head(&mut self.source)?;
                let (bytes, _) = self.read_bytes_body(ai)?;
                let magnitude = Magnitude::from_be_bytes(&bytes);
                let magnitude = if negative { magnitude.increment() } else { magnitude };
                magnitude
                    .to_i128(negative)
                    .ok_or_else(|| ParseError::new(self.source.position(), ErrorKind::NumberTooLarge))
            }
            _ => Err(ParseError::new(self.source.position(), err_kind)),
        }
    }

    fn emit_decimal_fraction(&mut self, sink: &mut impl EventSink, ai: u8, is_bigfloat: bool) -> Result<bool, ParseError> {
        let err_kind = if is_bigfloat {
            ErrorKind::InvalidBigfloat
        } else {
            ErrorKind::InvalidDecimal
        };
        read_head(&mut self.source)?;
        if ai != 2 {
            return Err(ParseError::new(self.source.position(), err_kind));
        }
        let exponent = self.read_decimal_component(err_kind.clone())?;
        let mantissa = self.read_decimal_component(err_kind)?;
        let negative = mantissa < 0;
        let magnitude = Magnitude::from_be_bytes(&mantissa.unsigned_abs().to_be_bytes());
        let rendered = if is_bigfloat {
            crate::bignum::bigfloat_to_hex_string(&magnitude, exponent, negative)
        } else {
            crate::bignum::decimal_fraction_to_string(&magnitude, exponent, negative)
        };
        let tag = if is_bigfloat { SemanticTag::BigFloat } else { SemanticTag::BigDec };
        Ok(sink.string_value(&rendered, tag))
    }

    /// `read_name`: the map-key position. A plain text key becomes a `Name` event directly;
    /// any other value is rendered to a diagnostic-notation string first ("recursion safety
    /// for names"), since `Event::Name` only carries text.
    fn read_name(&mut self, sink: &mut impl EventSink) -> Result<bool, ParseError> {
        self.read_tags()?;
        let (major, _ai) = peek_head(&mut self.source)?;
        if major == MAJOR_STR {
            self.tags.clear();
            let (_, ai) = read_head(&mut self.source)?;
            let (text, indefinite) = self.read_text_body(ai)?;
            self.maybe_insert_stringref(StringRefKind::Text, text.as_bytes(), indefinite);
            Ok(sink.name(&text))
        } else {
            let rendered = self.read_value_as_diagnostic_string()?;
            Ok(sink.name(&rendered))
        }
    }

    /// Render one full (possibly tagged, possibly nested) CBOR item as an RFC 8949 §8
    /// diagnostic-notation string, without emitting any sink events. Used only for the rare
    /// non-string map key.
    fn read_value_as_diagnostic_string(&mut self) -> Result<String, ParseError> {
        self.read_tags()?;
        let tags = std::mem::take(&mut self.tags);
        let (major, ai) = peek_head(&mut self.source)?;
        let body = match major {
            MAJOR_POS => {
                read_head(&mut self.source)?;
                read_uint_arg(&mut self.source, ai)?.to_string()
            }
            MAJOR_NEG => {
                read_head(&mut self.source)?;
                let v = read_uint_arg(&mut self.source, ai)?;
                (-1i128 - v as i128).to_string()
            }
            MAJOR_BYTES => {
                read_head(&mut self.source)?;
                let (bytes, _) = self.read_bytes_body(ai)?;
                let mut s = String::with_capacity(2 + bytes.len() * 2);
                s.push_str("h'");
                for b in &bytes {
                    s.push_str(&format!("{:02x}", b));
                }
                s.push('\'');
                s
            }
            MAJOR_STR => {
                read_head(&mut self.source)?;
                let (text, _) = self.read_text_body(ai)?;
                format!("{:?}", text)
            }
            MAJOR_ARRAY => {
                read_head(&mut self.source)?;
                let mut items = Vec::new();
                if ai == INDEFINITE_SIZE {
                    while !self.peek_is_break()? {
                        items.push(self.read_value_as_diagnostic_string()?);
                    }
                    self.source.get();
                } else {
                    let len = read_uint_arg(&mut self.source, ai)?;
                    for _ in 0..len {
                        items.push(self.read_value_as_diagnostic_string()?);
                    }
                }
                format!("[{}]", items.join(", "))
            }
            MAJOR_DICT => {
                read_head(&mut self.source)?;
                let mut pairs = Vec::new();
                if ai == INDEFINITE_SIZE {
                    while !self.peek_is_break()? {
                        let k = self.read_value_as_diagnostic_string()?;
                        let v = self.read_value_as_diagnostic_string()?;
                        pairs.push(format!("{}: {}", k, v));
                    }
                    self.source.get();
                } else {
                    let len = read_uint_arg(&mut self.source, ai)?;
                    for _ in 0..len {
                        let k = self.read_value_as_diagnostic_string()?;
                        let v = self.read_value_as_diagnostic_string()?;
                        pairs.push(format!("{}: {}", k, v));
                    }
                }
                format!("{{{}}}", pairs.join(", "))
            }
            MAJOR_LIT => {
                read_head(&mut self.source)?;
                match ai {
                    LIT_FALSE => "false".to_string(),
                    LIT_TRUE => "true".to_string(),
                    LIT_NULL => "null".to_string(),
                    LIT_UNDEFINED => "undefined".to_string(),
                    LIT_FLOAT16 | LIT_FLOAT32 | LIT_FLOAT64 => {
                        read_float_arg(&mut self.source, ai)?.to_string()
                    }
                    _ => return Err(ParseError::new(self.source.position(), ErrorKind::InvalidInfo)),
                }
            }
            MAJOR_TAG => unreachable!("read_tags already drained leading tags"),
            _ => unreachable!("major type is 3 bits"),
        };
        let mut out = String::new();
        for t in &tags {
            out.push_str(&t.to_string());
            out.push('(');
        }
        out.push_str(&body);
        for _ in &tags {
            out.push(')');
        }
        Ok(out)
    }
}

/// Dispatch a captured event to a sink, for the cursor's `read_to`.
pub(crate) fn dispatch_event(sink: &mut impl EventSink, event: &crate::event::Event<'_>) -> bool {
    use crate::event::Event::*;
    match event {
        BeginArray { length, tag } => sink.begin_array(*length, *tag),
        EndArray => sink.end_array(),
        BeginObject { length, tag } => sink.begin_object(*length, *tag),
        EndObject => sink.end_object(),
        Name(n) => sink.name(n),
        String(s, tag) => sink.string_value(s, *tag),
        ByteString(b, tag) => sink.byte_string_value(b, *tag),
        Int64(v, tag) => sink.int64_value(*v, *tag),
        UInt64(v, tag) => sink.uint64_value(*v, *tag),
        Double(v, tag) => sink.double_value(*v, *tag),
        Bool(v, tag) => sink.bool_value(*v, *tag),
        Null(tag) => sink.null_value(*tag),
        TypedArray(a) => sink.typed_array(a),
    }
}
