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

use std::collections::HashMap;

use crate::symbols::{Symbol, SymbolReference};

/// Everything decoded from one object file.
///
/// Indices stored in symbols and relocations are not validated against the
/// reference table, so lookups here return `Option` or fall back to the
/// empty reference.
pub struct DecodedFile {
    symbols: Vec<Symbol>,
    /// Index 0 is always the empty reference.
    references: Vec<SymbolReference>,
    data: Vec<u8>,
    /// First symbol defined for each reference index
    by_id: HashMap<i64, usize>,
}

impl DecodedFile {
    pub fn new(symbols: Vec<Symbol>, references: Vec<SymbolReference>, data: Vec<u8>) -> Self {
        let mut by_id = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            by_id.entry(symbol.id_index).or_insert(i);
        }
        Self {
            symbols,
            references,
            data,
            by_id,
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn references(&self) -> &[SymbolReference] {
        &self.references
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn reference(&self, index: i64) -> Option<&SymbolReference> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.references.get(i))
    }

    /// Name behind a reference index, empty when out of range.
    pub fn name_of(&self, index: i64) -> &str {
        self.reference(index).map(|r| r.name.as_str()).unwrap_or("")
    }

    /// The first symbol whose `id_index` is `index`.
    pub fn symbol_by_id(&self, index: i64) -> Option<&Symbol> {
        self.by_id.get(&index).map(|&i| &self.symbols[i])
    }

    /// Bytes of the symbol's own data block.
    pub fn symbol_data(&self, symbol: &Symbol) -> Option<&[u8]> {
        self.data.get(symbol.data_addr.range()?)
    }

    pub fn text_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.kind.is_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{DataAddr, SymbolKind};

    fn symbol(id_index: i64, kind: SymbolKind, data_addr: DataAddr) -> Symbol {
        Symbol {
            id_index,
            kind,
            size: data_addr.size,
            dup_ok: false,
            local: false,
            typelink: false,
            go_type_index: 0,
            data_addr,
            relocations: Vec::new(),
            extended: None,
        }
    }

    fn sample() -> DecodedFile {
        let references = vec![
            SymbolReference::default(),
            SymbolReference {
                name: "main.a".to_string(),
                version: 0,
            },
            SymbolReference {
                name: "main.f".to_string(),
                version: 1,
            },
        ];
        let symbols = vec![
            symbol(1, SymbolKind::RoData, DataAddr { size: 2, offset: 0 }),
            symbol(2, SymbolKind::Text, DataAddr { size: 3, offset: 2 }),
            symbol(1, SymbolKind::Data, DataAddr { size: 0, offset: 5 }),
        ];
        DecodedFile::new(symbols, references, b"hifoo".to_vec())
    }

    #[test]
    fn reference_lookup_is_bounds_checked() {
        let file = sample();
        assert_eq!(file.name_of(2), "main.f");
        assert_eq!(file.name_of(0), "");
        assert_eq!(file.name_of(3), "");
        assert_eq!(file.name_of(-1), "");
        assert!(file.reference(9).is_none());
    }

    #[test]
    fn symbol_by_id_returns_first_definition() {
        let file = sample();
        assert_eq!(file.symbol_by_id(1).map(|s| s.kind), Some(SymbolKind::RoData));
        assert!(file.symbol_by_id(7).is_none());
    }

    #[test]
    fn symbol_data_slices_the_segment() {
        let file = sample();
        assert_eq!(file.symbol_data(&file.symbols()[1]), Some(&b"foo"[..]));
        let outside = symbol(1, SymbolKind::Data, DataAddr { size: 4, offset: 4 });
        assert_eq!(file.symbol_data(&outside), None);
    }

    #[test]
    fn text_symbols_only() {
        let file = sample();
        let names: Vec<_> = file.text_symbols().map(|s| file.name_of(s.id_index)).collect();
        assert_eq!(names, vec!["main.f"]);
    }
}
