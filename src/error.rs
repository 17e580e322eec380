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

use std::fmt;
use std::io;

use thiserror::Error;

/// The two marker-delimited tables of an object file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    References,
    Symbols,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::References => f.write_str("reference table"),
            Table::Symbols => f.write_str("symbol table"),
        }
    }
}

/// Everything that can stop a decode session. All of them are fatal: the
/// session that produced one hands the same value back on every later call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input after {consumed} bytes")]
    TruncatedInput { consumed: u64 },
    #[error("header magic not found")]
    MagicNotFound,
    #[error("unexpected version: {0}")]
    UnsupportedVersion(u8),
    #[error("invalid footer: {0:02x?}")]
    InvalidFooter(Vec<u8>),
    #[error("sanity check failed in {table}: unexpected marker {byte:#x}")]
    MalformedSection { table: Table, byte: u8 },
    #[error("varint does not fit in 64 bits")]
    VarintOverflow,
    #[error("negative {what} length: {value}")]
    NegativeLength { what: &'static str, value: i64 },
    #[error("i/o error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },
}

impl DecodeError {
    /// Map a stream error, treating end-of-stream as truncation.
    pub fn from_io(err: &io::Error, consumed: u64) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => DecodeError::TruncatedInput { consumed },
            kind => DecodeError::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_maps_to_truncation() {
        let err = io::Error::new(io::ErrorKind::UnexpectedEof, "short");
        assert_eq!(
            DecodeError::from_io(&err, 12),
            DecodeError::TruncatedInput { consumed: 12 }
        );
    }

    #[test]
    fn other_io_errors_keep_their_kind() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        match DecodeError::from_io(&err, 0) {
            DecodeError::Io { kind, message } => {
                assert_eq!(kind, io::ErrorKind::PermissionDenied);
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_section_message_names_the_table() {
        let err = DecodeError::MalformedSection {
            table: Table::Symbols,
            byte: 0x7,
        };
        assert_eq!(
            err.to_string(),
            "sanity check failed in symbol table: unexpected marker 0x7"
        );
    }
}
