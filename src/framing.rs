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

//! Container framing: the header magic, version byte, dependency list and
//! footer magic that surround the two tables.

use std::io::Read;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};

pub const HEADER_MAGIC: &[u8; 8] = b"\x00\x00go19ld";
pub const FOOTER_MAGIC: &[u8; 7] = b"\xffgo19ld";
pub const SUPPORTED_VERSION: u8 = 1;

/// Slide an 8-byte window over the stream until it holds the header magic.
/// On success the cursor sits right after the first occurrence.
pub fn skip_header<R: Read>(cursor: &mut ByteCursor<R>) -> Result<()> {
    // only a truncation hit during this scan becomes MagicNotFound
    cursor.ensure_usable()?;
    let mut window = [0u8; HEADER_MAGIC.len()];
    cursor.fill(&mut window).map_err(|e| not_found(cursor, e))?;
    while &window != HEADER_MAGIC {
        let byte = cursor.read_byte().map_err(|e| not_found(cursor, e))?;
        window.rotate_left(1);
        window[HEADER_MAGIC.len() - 1] = byte;
    }
    Ok(())
}

// Running out of input while scanning means there was no header at all.
fn not_found<R: Read>(cursor: &mut ByteCursor<R>, err: DecodeError) -> DecodeError {
    match err {
        DecodeError::TruncatedInput { .. } => cursor.reclassify(DecodeError::MagicNotFound),
        other => other,
    }
}

pub fn check_version<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u8> {
    let version = cursor.read_byte()?;
    if version != SUPPORTED_VERSION {
        return Err(cursor.poison(DecodeError::UnsupportedVersion(version)));
    }
    Ok(version)
}

/// The dependency list is opaque to us; it ends at the first zero byte.
pub fn skip_dependencies<R: Read>(cursor: &mut ByteCursor<R>) -> Result<u64> {
    let mut skipped = 0;
    while cursor.read_byte()? != 0 {
        skipped += 1;
    }
    Ok(skipped)
}

pub fn check_footer<R: Read>(cursor: &mut ByteCursor<R>) -> Result<()> {
    let mut footer = [0u8; FOOTER_MAGIC.len()];
    cursor.fill(&mut footer)?;
    if &footer != FOOTER_MAGIC {
        return Err(cursor.poison(DecodeError::InvalidFooter(footer.to_vec())));
    }
    Ok(())
}
