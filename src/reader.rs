//! Head decoding and fixed-width primitive reads, driven by a [`ByteSource`].

use crate::{
    error::{ErrorKind, ParseError},
    source::ByteSource,
};
use half::f16;

/// `(major type 0..7, additional information 0..31)`.
pub type Head = (u8, u8);

fn eof(src: &impl ByteSource) -> ParseError {
    ParseError::new(src.position(), ErrorKind::UnexpectedEof)
}

/// Consume one head byte, splitting it into major type and additional information.
pub fn read_head<S: ByteSource>(src: &mut S) -> Result<Head, ParseError> {
    let b = src.get().ok_or_else(|| eof(src))?;
    Ok((b >> 5, b & 0x1f))
}

/// Look at the next head byte without consuming it.
pub fn peek_head<S: ByteSource>(src: &mut S) -> Result<Head, ParseError> {
    let b = src.peek().ok_or_else(|| eof(src))?;
    Ok((b >> 5, b & 0x1f))
}

/// Read the argument that follows a head byte with the given additional information,
/// `ai` 0..23 is the argument itself, 24/25/26/27 read 1/2/4/8 further
/// big-endian bytes, 28..30 is `InvalidInfo`, 31 is indefinite (the caller handles that).
pub fn read_uint_arg<S: ByteSource>(src: &mut S, ai: u8) -> Result<u64, ParseError> {
    match ai {
        0..=23 => Ok(ai as u64),
        24 => read_n_bytes::<1, S>(src),
        25 => read_n_bytes::<2, S>(src),
        26 => read_n_bytes::<4, S>(src),
        27 => read_n_bytes::<8, S>(src),
        _ => Err(ParseError::new(src.position(), ErrorKind::InvalidInfo)),
    }
}

fn read_n_bytes<const N: usize, S: ByteSource>(src: &mut S) -> Result<u64, ParseError> {
    let mut buf = [0u8; 8];
    if !src.read(&mut buf[8 - N..]) {
        return Err(eof(src));
    }
    Ok(u64::from_be_bytes(buf))
}

/// Read a IEEE-754 float argument: `ai` 25 is half precision (widened to `f64`), 26 is
/// `f32`, 27 is `f64`. Any other `ai` is a caller bug (major type 7 floats only use these).
pub fn read_float_arg<S: ByteSource>(src: &mut S, ai: u8) -> Result<f64, ParseError> {
    match ai {
        25 => {
            let mut buf = [0u8; 2];
            if !src.read(&mut buf) {
                return Err(eof(src));
            }
            Ok(f16::from_be_bytes(buf).to_f64())
        }
        26 => {
            let mut buf = [0u8; 4];
            if !src.read(&mut buf) {
                return Err(eof(src));
            }
            Ok(f32::from_be_bytes(buf) as f64)
        }
        27 => {
            let mut buf = [0u8; 8];
            if !src.read(&mut buf) {
                return Err(eof(src));
            }
            Ok(f64::from_be_bytes(buf))
        }
        _ => Err(ParseError::new(src.position(), ErrorKind::InvalidInfo)),
    }
}

/// Read `len` raw bytes (the content of a definite-length byte/text string chunk).
pub fn read_bytes<S: ByteSource>(src: &mut S, len: usize) -> Result<Vec<u8>, ParseError> {
    let mut buf = vec![0u8; len];
    if !src.read(&mut buf) {
        return Err(eof(src));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn reads_inline_small_uint_head() {
        let mut s = SliceSource::new(&[0x05]);
        let (major, ai) = read_head(&mut s).unwrap();
        assert_eq!((major, ai), (0, 5));
    }

    #[test]
    fn reads_1_2_4_8_byte_arguments() {
        let mut s = SliceSource::new(&[0xff]);
        assert_eq!(read_uint_arg(&mut s, 24).unwrap(), 0xff);

        let mut s = SliceSource::new(&[0x01, 0x00]);
        assert_eq!(read_uint_arg(&mut s, 25).unwrap(), 256);

        let mut s = SliceSource::new(&[0, 0, 0, 1]);
        assert_eq!(read_uint_arg(&mut s, 26).unwrap(), 1);

        let mut s = SliceSource::new(&[0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(read_uint_arg(&mut s, 27).unwrap(), 4294967296);
    }

    #[test]
    fn truncated_argument_is_unexpected_eof() {
        let mut s = SliceSource::new(&[0x01]);
        let err = read_uint_arg(&mut s, 25).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn reserved_additional_info_is_invalid() {
        let mut s = SliceSource::new(&[]);
        let err = read_uint_arg(&mut s, 28).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInfo);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut s = SliceSource::new(&[0x20]);
        assert_eq!(peek_head(&mut s).unwrap(), (1, 0));
        assert_eq!(read_head(&mut s).unwrap(), (1, 0));
    }
}
