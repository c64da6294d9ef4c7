//! Line-based codec for tokio.
//!
//! Frames newline-terminated lines in both directions. Oversized lines and
//! invalid UTF-8 are reported as [`Line`] items instead of errors, because a
//! decoder error ends a `FramedRead` stream and both cases are recoverable.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Default maximum line length in bytes, terminator excluded.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// One decoded inbound line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    /// A complete line with its `\n` or `\r\n` terminator removed.
    Text(String),
    /// A line over the limit was discarded up to its newline.
    TooLong {
        /// The limit that was exceeded.
        limit: usize,
    },
    /// A line that was not valid UTF-8.
    InvalidUtf8 {
        /// Lossy rendering of the line, for diagnostics.
        lossy: String,
    },
}

/// Line-based codec that handles newline-terminated messages.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping bytes until the end of an oversized line
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom line limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// The configured line limit.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn finish(&self, raw: &[u8]) -> Line {
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

        if raw.len() > self.max_len {
            return Line::TooLong {
                limit: self.max_len,
            };
        }

        match std::str::from_utf8(raw) {
            Ok(text) => Line::Text(text.to_string()),
            Err(_) => Line::InvalidUtf8 {
                lossy: String::from_utf8_lossy(raw).into_owned(),
            },
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = Line;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Line>> {
        let newline = src[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        match newline {
            Some(end) if self.discarding => {
                src.advance(end + 1);
                self.next_index = 0;
                self.discarding = false;
                Ok(Some(Line::TooLong {
                    limit: self.max_len,
                }))
            }
            Some(end) => {
                let line = src.split_to(end + 1);
                self.next_index = 0;
                Ok(Some(self.finish(&line)))
            }
            None if self.discarding => {
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
            None => {
                // One extra byte leaves room for a trailing '\r'.
                if src.len() > self.max_len + 1 {
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                } else {
                    self.next_index = src.len();
                }
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Line>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        self.next_index = 0;
        if self.discarding {
            self.discarding = false;
            src.clear();
            return Ok(Some(Line::TooLong {
                limit: self.max_len,
            }));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let line = src.split_to(src.len());
        Ok(Some(self.finish(&line)))
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: T, dst: &mut BytesMut) -> error::Result<()> {
        let msg = msg.as_ref();
        dst.reserve(msg.len() + 1);
        dst.put_slice(msg.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("/NICK alice\r\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some(Line::Text("/NICK alice".to_string())));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("/BC hel");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"lo\n/LIST\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::Text("/BC hello".to_string()))
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::Text("/LIST".to_string()))
        );
    }

    #[test]
    fn oversized_line_is_skipped_not_fatal() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b" still going\n/LIST\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::TooLong { limit: 10 })
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::Text("/LIST".to_string()))
        );
    }

    #[test]
    fn complete_oversized_line_in_one_read() {
        let mut codec = LineCodec::with_max_len(4);
        let mut buf = BytesMut::from("12345\nok\n");

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::TooLong { limit: 4 })
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::Text("ok".to_string()))
        );
    }

    #[test]
    fn limit_excludes_terminator() {
        let mut codec = LineCodec::with_max_len(4);
        let mut buf = BytesMut::from("abcd\r\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Line::Text("abcd".to_string()))
        );
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"/BC \xff\xfe\n"[..]);

        match codec.decode(&mut buf).unwrap() {
            Some(Line::InvalidUtf8 { lossy }) => assert!(lossy.starts_with("/BC ")),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn eof_flushes_unterminated_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("/LIST");

        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(Line::Text("/LIST".to_string()))
        );
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn encode_appends_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("Name is taken!", &mut buf).unwrap();
        assert_eq!(&buf[..], b"Name is taken!\n");
    }
}
