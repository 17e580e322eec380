// Crate root: declare modules and control visibility
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod framing;
pub mod logging;
pub mod objfile;
pub mod print;
pub mod reloc;
pub mod serializer;
pub mod symbols;
pub mod varint;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use memmap2::Mmap;

// Re-export commonly used API from the library for binaries/tests
pub use decoder::Decoder;
pub use error::{DecodeError, Result};
pub use objfile::DecodedFile;
pub use reloc::{Relocation, RelocationType};
pub use symbols::{DataAddr, ExtendedFields, Local, Symbol, SymbolKind, SymbolReference};

/// Decode a complete object file from `reader`.
pub fn parse<R: Read>(reader: R) -> Result<DecodedFile> {
    Decoder::new(BufReader::new(reader)).decode()
}

/// Open, map and decode the object file at `path`.
pub fn parse_path(path: impl AsRef<Path>) -> Result<DecodedFile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DecodeError::from_io(&e, 0))?;
    let len = file
        .metadata()
        .map_err(|e| DecodeError::from_io(&e, 0))?
        .len();
    if len == 0 {
        return Decoder::new(io::empty()).decode();
    }
    // SAFETY: the map is read-only and dropped before returning; the file is
    // not expected to be truncated by another process while we read it.
    let map = unsafe { Mmap::map(&file) }.map_err(|e| DecodeError::from_io(&e, 0))?;
    log::debug!("mapped {} ({} bytes)", path.display(), map.len());
    Decoder::new(&map[..]).decode()
}
