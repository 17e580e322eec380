use serde_json::json;
use serde_json::Value;

use crate::objfile::DecodedFile;
use crate::print::ReportOptions;

/// Serialize a `DecodedFile` into a JSON document.
/// Format:
/// {
///   "references": [ {"name": .., "version": ..}, ... ],
///   "symbols": [ { "name": .., "id_index": .., "kind": "STEXT", ..., "extended": {..} }, ... ],
///   "data_len": <bytes in the data segment>
/// }
///
/// The filter in `opts` applies to symbols only; the reference table is
/// always complete so indices stay meaningful.
pub fn serialize_decoded(file: &DecodedFile, opts: &ReportOptions) -> serde_json::Result<Value> {
    let mut symbols: Vec<Value> = Vec::with_capacity(file.symbols().len());
    for symbol in file.symbols() {
        let name = file.name_of(symbol.id_index);
        if let Some(re) = &opts.filter {
            if !re.is_match(name) {
                continue;
            }
        }
        let mut value = serde_json::to_value(symbol)?;
        if let Value::Object(map) = &mut value {
            map.insert("name".to_string(), json!(name));
        }
        symbols.push(value);
    }

    Ok(json!({
        "references": serde_json::to_value(file.references())?,
        "symbols": Value::Array(symbols),
        "data_len": file.data().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reloc::{Relocation, RelocationType};
    use crate::symbols::{DataAddr, ExtendedFields, Symbol, SymbolKind, SymbolReference};
    use regex::Regex;

    fn sample() -> DecodedFile {
        let references = vec![
            SymbolReference::default(),
            SymbolReference {
                name: "main.main".into(),
                version: 0,
            },
            SymbolReference {
                name: "main.msg".into(),
                version: 1,
            },
        ];
        let text = Symbol {
            id_index: 1,
            kind: SymbolKind::Text,
            size: 4,
            dup_ok: false,
            local: false,
            typelink: false,
            go_type_index: 0,
            data_addr: DataAddr { size: 4, offset: 0 },
            relocations: vec![Relocation {
                offset: 0,
                size: 4,
                kind: RelocationType::Call,
                add: 0,
                id_index: 2,
            }],
            extended: Some(ExtendedFields {
                frame: 24,
                stack_map: DataAddr { size: 2, offset: 6 },
                ..Default::default()
            }),
        };
        let data = Symbol {
            id_index: 2,
            kind: SymbolKind::RoData,
            size: 2,
            dup_ok: true,
            local: true,
            typelink: false,
            go_type_index: 0,
            data_addr: DataAddr { size: 2, offset: 4 },
            relocations: Vec::new(),
            extended: None,
        };
        DecodedFile::new(vec![text, data], references, vec![0; 8])
    }

    #[test]
    fn serialize_basic() {
        let v = serialize_decoded(&sample(), &ReportOptions::default()).unwrap();
        assert_eq!(v["data_len"], 8);
        assert_eq!(v["references"][2]["name"], "main.msg");
        let symbols = v["symbols"].as_array().expect("symbols array");
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0]["name"], "main.main");
        assert_eq!(symbols[0]["kind"], "STEXT");
        assert_eq!(symbols[0]["relocations"][0]["type"], "R_CALL");
        assert_eq!(symbols[0]["extended"]["frame"], 24);
        assert_eq!(symbols[0]["extended"]["stack_map"]["offset"], 6);
        assert_eq!(symbols[1]["dup_ok"], true);
        assert!(symbols[1].get("extended").is_none());
    }

    #[test]
    fn filter_drops_symbols_but_keeps_references() {
        let opts = ReportOptions {
            relocations: false,
            filter: Some(Regex::new("msg$").unwrap()),
        };
        let v = serialize_decoded(&sample(), &opts).unwrap();
        assert_eq!(v["symbols"].as_array().unwrap().len(), 1);
        assert_eq!(v["references"].as_array().unwrap().len(), 3);
    }
}
