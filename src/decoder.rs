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

//! Single-pass decoder for the object container.
//!
//! A [`Decoder`] walks the stream strictly front to back:
//! header, version, dependencies, reference table, data segment, symbol
//! table, footer. Symbol records never store where their bytes live in the
//! data segment; the decoder hands out offsets in the order blocks are
//! declared, so every stage must run in that order on one session.

use std::io::Read;

use log::{debug, trace};

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result, Table};
use crate::framing;
use crate::objfile::DecodedFile;
use crate::reloc::{Relocation, RelocationType};
use crate::symbols::{DataAddr, ExtendedFields, Local, Symbol, SymbolKind, SymbolReference};

const RECORD_START: u8 = 0xfe;
const RECORD_END: u8 = 0xff;

// symbol flags
const FLAG_DUP_OK: i64 = 1 << 0;
const FLAG_LOCAL: i64 = 1 << 1;
const FLAG_TYPELINK: i64 = 1 << 2;

// function flags
const FUNC_LEAF: i64 = 1 << 0;
const FUNC_C_FUNC: i64 = 1 << 1;
const FUNC_TYPE_METHOD: i64 = 1 << 2;
const FUNC_SHARED: i64 = 1 << 3;

/// Hands out consecutive regions of the data segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataOffsets {
    next: i64,
}

impl DataOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next `size` bytes.
    pub fn assign(&mut self, size: i64) -> DataAddr {
        let addr = DataAddr {
            size,
            offset: self.next,
        };
        self.next = self.next.wrapping_add(size);
        addr
    }

    pub fn next_offset(&self) -> i64 {
        self.next
    }
}

/// One decode session over one input. After any failure every stage
/// returns that same failure without reading further.
pub struct Decoder<R> {
    cursor: ByteCursor<R>,
    offsets: DataOffsets,
    references: Vec<SymbolReference>,
    symbols: Vec<Symbol>,
    data: Vec<u8>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: ByteCursor::new(reader),
            offsets: DataOffsets::new(),
            references: vec![SymbolReference::default()],
            symbols: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn bytes_consumed(&self) -> u64 {
        self.cursor.bytes_consumed()
    }

    #[cfg(test)]
    pub(crate) fn references(&self) -> &[SymbolReference] {
        &self.references
    }

    #[cfg(test)]
    pub(crate) fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    #[cfg(test)]
    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    #[cfg(test)]
    pub(crate) fn next_data_offset(&self) -> i64 {
        self.offsets.next_offset()
    }

    /// Run the whole pipeline and package the result.
    pub fn decode(mut self) -> Result<DecodedFile> {
        self.skip_header()?;
        self.check_version()?;
        self.skip_dependencies()?;
        self.read_references()?;
        self.read_data_segment()?;
        self.read_symbols()?;
        self.check_footer()?;
        self.finish()
    }

    /// Package what has been decoded. A session that failed at any stage
    /// yields its stored failure instead of a partial file.
    pub fn finish(self) -> Result<DecodedFile> {
        self.cursor.ensure_usable()?;
        Ok(DecodedFile::new(self.symbols, self.references, self.data))
    }

    fn stage<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.cursor.ensure_usable()?;
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => Err(self.cursor.poison(err)),
        }
    }

    pub fn skip_header(&mut self) -> Result<()> {
        self.stage(|d| framing::skip_header(&mut d.cursor))?;
        debug!("header magic ends at byte {}", self.bytes_consumed());
        Ok(())
    }

    pub fn check_version(&mut self) -> Result<()> {
        let version = self.stage(|d| framing::check_version(&mut d.cursor))?;
        debug!("object file version {}", version);
        Ok(())
    }

    pub fn skip_dependencies(&mut self) -> Result<()> {
        let skipped = self.stage(|d| framing::skip_dependencies(&mut d.cursor))?;
        debug!("skipped {} bytes of dependency names", skipped);
        Ok(())
    }

    pub fn check_footer(&mut self) -> Result<()> {
        self.stage(|d| framing::check_footer(&mut d.cursor))?;
        debug!("footer ok, {} bytes consumed", self.bytes_consumed());
        Ok(())
    }

    pub fn read_references(&mut self) -> Result<()> {
        self.stage(|d| {
            while d.next_record(Table::References)? {
                d.read_reference()?;
            }
            debug!("read {} symbol references", d.references.len() - 1);
            Ok(())
        })
    }

    /// Read one reference record body (the part after its marker byte).
    pub(crate) fn read_reference(&mut self) -> Result<()> {
        self.stage(|d| {
            let name = d.cursor.read_string()?;
            let version = d.cursor.read_varint()?;
            trace!("reference {}: {} v{}", d.references.len(), name, version);
            d.references.push(SymbolReference { name, version });
            Ok(())
        })
    }

    pub fn read_data_segment(&mut self) -> Result<()> {
        self.stage(|d| {
            let len = d.cursor.read_length("data segment")?;
            // relocations, pc-data, automatics, func-data, files: sizing
            // hints for the producer, nothing to act on here
            let mut hints = [0i64; 5];
            for hint in hints.iter_mut() {
                *hint = d.cursor.read_varint()?;
            }
            debug!("data segment: {} bytes, sizing hints {:?}", len, hints);
            d.data = d.cursor.read_block(len)?;
            Ok(())
        })
    }

    pub fn read_symbols(&mut self) -> Result<()> {
        self.stage(|d| {
            while d.next_record(Table::Symbols)? {
                d.read_symbol()?;
            }
            debug!(
                "read {} symbols covering {} data bytes",
                d.symbols.len(),
                d.offsets.next_offset()
            );
            Ok(())
        })
    }

    /// Read one symbol record body (the part after its marker byte).
    pub(crate) fn read_symbol(&mut self) -> Result<()> {
        self.stage(|d| {
            let symbol = d.decode_symbol()?;
            trace!(
                "symbol {} {} size={:#x} data={:?} relocs={}",
                symbol.id_index,
                symbol.kind,
                symbol.size,
                symbol.data_addr,
                symbol.relocations.len()
            );
            d.symbols.push(symbol);
            Ok(())
        })
    }

    fn next_record(&mut self, table: Table) -> Result<bool> {
        match self.cursor.read_byte()? {
            RECORD_START => Ok(true),
            RECORD_END => Ok(false),
            byte => Err(DecodeError::MalformedSection { table, byte }),
        }
    }

    fn varint(&mut self) -> Result<i64> {
        self.cursor.read_varint()
    }

    fn varints(&mut self, count: i64) -> Result<Vec<i64>> {
        (0..count).map(|_| self.varint()).collect()
    }

    fn data_addr(&mut self) -> Result<DataAddr> {
        let size = self.varint()?;
        Ok(self.offsets.assign(size))
    }

    fn decode_symbol(&mut self) -> Result<Symbol> {
        let kind = SymbolKind::from(self.cursor.read_byte()?);
        let id_index = self.varint()?;
        let flags = self.varint()?;
        let size = self.varint()?;
        let go_type_index = self.varint()?;
        let data_addr = self.data_addr()?;

        let reloc_count = self.varint()?;
        let relocations = (0..reloc_count)
            .map(|_| self.decode_relocation())
            .collect::<Result<Vec<_>>>()?;

        let extended = if kind.is_text() {
            Some(self.decode_extended()?)
        } else {
            None
        };

        Ok(Symbol {
            id_index,
            kind,
            size,
            dup_ok: flags & FLAG_DUP_OK != 0,
            local: flags & FLAG_LOCAL != 0,
            typelink: flags & FLAG_TYPELINK != 0,
            go_type_index,
            data_addr,
            relocations,
            extended,
        })
    }

    fn decode_relocation(&mut self) -> Result<Relocation> {
        let offset = self.varint()?;
        let size = self.varint()?;
        let kind = RelocationType::from(self.varint()?);
        let add = self.varint()?;
        let id_index = self.varint()?;
        Ok(Relocation {
            offset,
            size,
            kind,
            add,
            id_index,
        })
    }

    fn decode_local(&mut self) -> Result<Local> {
        let symbol_index = self.varint()?;
        let offset = self.varint()?;
        let var_type = self.varint()?;
        let go_type_index = self.varint()?;
        Ok(Local {
            symbol_index,
            offset,
            var_type,
            go_type_index,
        })
    }

    fn decode_extended(&mut self) -> Result<ExtendedFields> {
        let args = self.varint()?;
        let frame = self.varint()?;
        let flags = self.varint()?;
        let no_split = self.varint()? != 0;

        let local_count = self.varint()?;
        let locals = (0..local_count)
            .map(|_| self.decode_local())
            .collect::<Result<Vec<_>>>()?;

        // the order of these four is fixed by the format
        let stack_map = self.data_addr()?;
        let file_table = self.data_addr()?;
        let line_table = self.data_addr()?;
        let inline_table = self.data_addr()?;

        let aux_count = self.varint()?;
        let aux_tables = (0..aux_count)
            .map(|_| self.data_addr())
            .collect::<Result<Vec<_>>>()?;

        let func_data_count = self.varint()?;
        let func_data_refs = self.varints(func_data_count)?;
        let func_data_offsets = self.varints(func_data_count)?;

        let file_count = self.varint()?;
        let file_indices = self.varints(file_count)?;

        // inline tree nodes: parent, file, line, func. Not kept.
        let inline_nodes = self.varint()?;
        for _ in 0..inline_nodes {
            for _ in 0..4 {
                self.varint()?;
            }
        }

        Ok(ExtendedFields {
            args,
            frame,
            leaf: flags & FUNC_LEAF != 0,
            c_func: flags & FUNC_C_FUNC != 0,
            type_method: flags & FUNC_TYPE_METHOD != 0,
            shared_func: flags & FUNC_SHARED != 0,
            no_split,
            locals,
            stack_map,
            file_table,
            line_table,
            inline_table,
            aux_tables,
            func_data_refs,
            func_data_offsets,
            file_indices,
        })
    }
}
