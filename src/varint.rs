// Copyright (c) 2026 goobj-reader Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Variable-length integers as the object format stores them: 7 payload bits
//! per byte, least significant group first, high bit set on every byte but
//! the last, and the result zigzag-mapped to a signed value.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Append the varint encoding of `value` to `out`.
pub fn encode_varint(value: i64, out: &mut Vec<u8>) {
    let mut raw = zigzag_encode(value);
    while raw >= 0x80 {
        out.push((raw as u8 & 0x7f) | 0x80);
        raw >>= 7;
    }
    out.push(raw as u8);
}

/// Append a length-prefixed string.
pub fn encode_string(value: &str, out: &mut Vec<u8>) {
    encode_varint(value.len() as i64, out);
    out.extend_from_slice(value.as_bytes());
}

impl<R: Read> ByteCursor<R> {
    pub fn read_uvarint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_byte()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift >= u64::BITS {
                return Err(self.poison(DecodeError::VarintOverflow));
            }
        }
    }

    pub fn read_varint(&mut self) -> Result<i64> {
        self.read_uvarint().map(zigzag_decode)
    }

    /// Reads a varint and rejects negative values, for fields that size a
    /// buffer.
    pub fn read_length(&mut self, what: &'static str) -> Result<usize> {
        let value = self.read_varint()?;
        usize::try_from(value).map_err(|_| self.poison(DecodeError::NegativeLength { what, value }))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_length("string")?;
        let bytes = self.read_block(len)?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: i64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_varint(value, &mut out);
        out
    }

    #[test]
    fn zigzag_round_trip_including_extrema() {
        for v in [0, 1, -1, 63, -64, 64, -65, i64::MAX, i64::MIN, i64::MAX - 1, i64::MIN + 1] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v, "value {v}");
        }
    }

    #[test]
    fn zigzag_maps_small_magnitudes_to_small_codes() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
    }

    #[test]
    fn read_varint_known_encodings() {
        for (input, expected) in [
            (&b"\x00"[..], 0i64),
            (&b"\x01"[..], -1),
            (&b"\x02"[..], 1),
            (&b"\x80\x01"[..], 64),
            (&b"\x81\x01"[..], -65),
        ] {
            let mut cursor = ByteCursor::new(input);
            assert_eq!(cursor.read_varint(), Ok(expected));
            assert_eq!(cursor.bytes_consumed(), input.len() as u64);
        }
    }

    #[test]
    fn varint_stream_round_trip_consumes_exactly_its_bytes() {
        for v in [0, 5, -5, 300, -300, 1 << 40, i64::MAX, i64::MIN] {
            let mut bytes = encoded(v);
            let len = bytes.len() as u64;
            bytes.push(0xaa);
            let mut cursor = ByteCursor::new(&bytes[..]);
            assert_eq!(cursor.read_varint(), Ok(v));
            assert_eq!(cursor.bytes_consumed(), len);
            assert_eq!(cursor.read_byte(), Ok(0xaa));
        }
    }

    #[test]
    fn varint_on_empty_input_is_truncation() {
        let mut cursor = ByteCursor::new(&b""[..]);
        assert_eq!(
            cursor.read_varint(),
            Err(DecodeError::TruncatedInput { consumed: 0 })
        );
    }

    #[test]
    fn endless_continuation_overflows() {
        let input = [0xffu8; 11];
        let mut cursor = ByteCursor::new(&input[..]);
        assert_eq!(cursor.read_varint(), Err(DecodeError::VarintOverflow));
        assert!(cursor.is_poisoned());
    }

    #[test]
    fn read_string_known_encodings() {
        for (input, expected) in [(&b"\x00"[..], ""), (&b"\x02a"[..], "a"), (&b"\x04ab"[..], "ab")] {
            let mut cursor = ByteCursor::new(input);
            assert_eq!(cursor.read_string().as_deref(), Ok(expected));
            assert_eq!(cursor.bytes_consumed(), expected.len() as u64 + 1);
        }
    }

    #[test]
    fn string_shorter_than_declared_fails() {
        let mut cursor = ByteCursor::new(&b"\x02"[..]);
        assert!(matches!(
            cursor.read_string(),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn negative_string_length_is_rejected() {
        let mut cursor = ByteCursor::new(&b"\x01"[..]);
        assert_eq!(
            cursor.read_string(),
            Err(DecodeError::NegativeLength {
                what: "string",
                value: -1
            })
        );
    }

    #[test]
    fn encode_string_prefixes_length() {
        let mut out = Vec::new();
        encode_string("ab", &mut out);
        assert_eq!(out, b"\x04ab");
    }
}
