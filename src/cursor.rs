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

/// Byte-level reader shared by every stage of a decode session.
use std::io::{self, Read};

use crate::error::{DecodeError, Result};

/// Wraps a byte stream and counts what has been consumed from it.
///
/// The first failure is stored and returned again by every later call, and
/// once that happens the underlying stream is never touched again.
pub struct ByteCursor<R> {
    inner: R,
    consumed: u64,
    failure: Option<DecodeError>,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            consumed: 0,
            failure: None,
        }
    }

    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    #[cfg(test)]
    pub(crate) fn is_poisoned(&self) -> bool {
        self.failure.is_some()
    }

    /// Fails with the stored error if an earlier operation failed.
    pub fn ensure_usable(&self) -> Result<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Record `err` as the session failure. If a failure was already
    /// recorded, that one wins and is returned instead.
    pub fn poison(&mut self, err: DecodeError) -> DecodeError {
        self.failure.get_or_insert(err).clone()
    }

    /// Replace the recorded failure with a more specific one.
    pub(crate) fn reclassify(&mut self, err: DecodeError) -> DecodeError {
        self.failure = Some(err.clone());
        err
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.fill(&mut byte)?;
        Ok(byte[0])
    }

    /// Read exactly `buf.len()` bytes, retrying short reads.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_usable()?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    let err = DecodeError::TruncatedInput {
                        consumed: self.consumed,
                    };
                    return Err(self.poison(err));
                }
                Ok(n) => {
                    filled += n;
                    self.consumed += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    let err = DecodeError::from_io(&e, self.consumed);
                    return Err(self.poison(err));
                }
            }
        }
        Ok(())
    }

    /// Read a block of exactly `len` bytes.
    ///
    /// The buffer grows with what the stream actually delivers, so a bogus
    /// length in a corrupt file costs no more memory than the file holds.
    pub fn read_block(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure_usable()?;
        let mut block = Vec::new();
        let read = (&mut self.inner).take(len as u64).read_to_end(&mut block);
        self.consumed += block.len() as u64;
        if let Err(e) = read {
            let err = DecodeError::from_io(&e, self.consumed);
            return Err(self.poison(err));
        }
        if block.len() < len {
            let err = DecodeError::TruncatedInput {
                consumed: self.consumed,
            };
            return Err(self.poison(err));
        }
        Ok(block)
    }
}
