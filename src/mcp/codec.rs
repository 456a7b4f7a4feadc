//! Newline-delimited JSON framing for the MCP stdio transport.
//!
//! Each message is one line of compact JSON. A line that is not valid JSON
//! is yielded as an item-level error so the server can answer it with a
//! parse error and keep reading; only oversized input fails the stream.

use bytes::{BufMut, BytesMut};
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder};

/// Default line cap (16 MB)
const DEFAULT_MAX_LENGTH: usize = 16 * 1024 * 1024;

#[derive(Debug)]
pub struct NdJsonCodec<T> {
    _phantom: PhantomData<T>,
    max_length: usize,
}

impl<T> NdJsonCodec<T> {
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_LENGTH)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            _phantom: PhantomData,
            max_length,
        }
    }

    fn too_large(&self, len: usize) -> std::io::Error {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Message too large: {} > {}", len, self.max_length),
        )
    }
}

impl<T> Default for NdJsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NdJsonCodec<T> {
    fn clone(&self) -> Self {
        Self::with_max_length(self.max_length)
    }
}

impl<T: DeserializeOwned> Decoder for NdJsonCodec<T> {
    type Item = Result<T, serde_json::Error>;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        loop {
            let Some(pos) = src.iter().position(|&b| b == b'\n') else {
                if src.len() > self.max_length {
                    return Err(self.too_large(src.len()));
                }
                return Ok(None);
            };
            if pos > self.max_length {
                return Err(self.too_large(pos));
            }

            let line = src.split_to(pos + 1);
            let line = line.trim_ascii();
            if line.is_empty() {
                continue;
            }
            return Ok(Some(serde_json::from_slice(line)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> std::result::Result<Option<Self::Item>, Self::Error> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        // Final line without a trailing newline
        let rest = src.split();
        let line = rest.trim_ascii();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(line)))
    }
}

impl<T: Serialize> Encoder<T> for NdJsonCodec<T> {
    type Error = std::io::Error;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> std::result::Result<(), Self::Error> {
        // Compact serialization never contains a raw newline
        let json = serde_json::to_vec(&item)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, format!("JSON error: {}", e)))?;

        if json.len() > self.max_length {
            return Err(self.too_large(json.len()));
        }

        dst.reserve(json.len() + 1);
        dst.put_slice(&json);
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_decode_single_line() {
        let mut codec = NdJsonCodec::<Value>::new();
        let mut buf = BytesMut::from(&b"{\"id\":1}\n"[..]);
        let item = codec.decode(&mut buf).unwrap().unwrap().unwrap();
        assert_eq!(item, json!({"id": 1}));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_then_complete() {
        let mut codec = NdJsonCodec::<Value>::new();
        let mut buf = BytesMut::from(&b"{\"id\":"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"2}\r\n");
        let item = codec.decode(&mut buf).unwrap().unwrap().unwrap();
        assert_eq!(item["id"], 2);
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let mut codec = NdJsonCodec::<Value>::new();
        let mut buf = BytesMut::from(&b"\n  \n[1]\n"[..]);
        let item = codec.decode(&mut buf).unwrap().unwrap().unwrap();
        assert_eq!(item, json!([1]));
    }

    #[test]
    fn test_decode_malformed_line_is_item_error() {
        let mut codec = NdJsonCodec::<Value>::new();
        let mut buf = BytesMut::from(&b"{not json}\n{\"ok\":true}\n"[..]);
        assert!(codec.decode(&mut buf).unwrap().unwrap().is_err());
        let next = codec.decode(&mut buf).unwrap().unwrap().unwrap();
        assert_eq!(next["ok"], true);
    }

    #[test]
    fn test_decode_eof_without_newline() {
        let mut codec = NdJsonCodec::<Value>::new();
        let mut buf = BytesMut::from(&b"{\"last\":1}"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        let item = codec.decode_eof(&mut buf).unwrap().unwrap().unwrap();
        assert_eq!(item["last"], 1);
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_decode_oversized_fails() {
        let mut codec = NdJsonCodec::<Value>::with_max_length(8);
        let mut buf = BytesMut::from(&b"\"0123456789abcdef\""[..]);
        assert!(codec.decode(&mut buf).is_err());
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = NdJsonCodec::<Value>::new();
        let mut buf = BytesMut::new();
        codec.encode(json!({"text": "a\nb"}), &mut buf).unwrap();
        assert_eq!(&buf[..], b"{\"text\":\"a\\nb\"}\n");
    }
}
