//! Text tables for a decoded object file.
//!
//! Every table has the same layout: one leading space, then each cell
//! followed by enough spaces to reach the widest entry of its column plus
//! one. Widths count bytes, not characters, so output lines up with what
//! other tools for this format print.

use std::io::{self, Write};

use regex::Regex;

use crate::objfile::DecodedFile;
use crate::symbols::{Symbol, SymbolReference};

pub const SYMBOL_HEADERS: [&str; 9] = [
    "Offset",
    "Size",
    "Type",
    "DupOK",
    "Local",
    "MakeTypeLink",
    "Name",
    "Version",
    "GoType",
];
pub const FUNC_DATA_HEADERS: [&str; 2] = ["Name", "FuncData"];
pub const RELOCATION_HEADERS: [&str; 5] = ["Symbol", "Offset", "Size", "Type", "SymbolName+Add"];

/// What to render besides the symbol and function data tables.
#[derive(Debug, Default, Clone)]
pub struct ReportOptions {
    pub relocations: bool,
    /// Only symbols whose name matches are listed.
    pub filter: Option<Regex>,
}

impl ReportOptions {
    fn includes(&self, name: &str) -> bool {
        self.filter.as_ref().map_or(true, |re| re.is_match(name))
    }
}

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn max_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(value.len()),
                    None => widths.push(value.len()),
                }
            }
        }
        widths
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let widths = self.max_widths();
        write_row(w, &self.headers, &widths)?;
        for row in &self.rows {
            write_row(w, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row<W: Write>(w: &mut W, row: &[String], widths: &[usize]) -> io::Result<()> {
    w.write_all(b" ")?;
    for (value, width) in row.iter().zip(widths) {
        write!(w, "{}{:pad$}", value, "", pad = width - value.len() + 1)?;
    }
    w.write_all(b"\n")
}

/// `0x`-prefixed lowercase hex, with a leading minus for negative values.
pub fn hex(value: i64) -> String {
    if value < 0 {
        format!("-{:#x}", value.unsigned_abs())
    } else {
        format!("{:#x}", value)
    }
}

fn reference_or_empty(file: &DecodedFile, index: i64) -> SymbolReference {
    file.reference(index).cloned().unwrap_or_default()
}

pub fn symbol_table(file: &DecodedFile, opts: &ReportOptions) -> Table {
    let mut table = Table::new(&SYMBOL_HEADERS);
    for symbol in file.symbols() {
        let reference = reference_or_empty(file, symbol.id_index);
        if !opts.includes(&reference.name) {
            continue;
        }
        table.add_row(vec![
            hex(symbol.data_addr.offset),
            hex(symbol.size),
            symbol.kind.to_string(),
            symbol.dup_ok.to_string(),
            symbol.local.to_string(),
            symbol.typelink.to_string(),
            reference.name,
            reference.version.to_string(),
            file.name_of(symbol.go_type_index).to_string(),
        ]);
    }
    table
}

/// `"<i> - <name> (<offset> - <size>)"` for each function data entry, where
/// offset and size locate the symbol defining that entry.
fn func_data_summary(file: &DecodedFile, symbol: &Symbol) -> String {
    let Some(ext) = &symbol.extended else {
        return String::new();
    };
    ext.func_data_refs
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            let addr = file
                .symbol_by_id(index)
                .map(|s| s.data_addr)
                .unwrap_or_default();
            format!(
                "{} - {} ({} - {})",
                i,
                file.name_of(index),
                hex(addr.offset),
                addr.size
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn func_data_table(file: &DecodedFile, opts: &ReportOptions) -> Table {
    let mut table = Table::new(&FUNC_DATA_HEADERS);
    for symbol in file.text_symbols() {
        let name = file.name_of(symbol.id_index);
        if !opts.includes(name) {
            continue;
        }
        table.add_row(vec![name.to_string(), func_data_summary(file, symbol)]);
    }
    table
}

pub fn relocation_table(file: &DecodedFile, opts: &ReportOptions) -> Table {
    let mut table = Table::new(&RELOCATION_HEADERS);
    for symbol in file.symbols() {
        let owner = file.name_of(symbol.id_index);
        if !opts.includes(owner) {
            continue;
        }
        for reloc in &symbol.relocations {
            table.add_row(vec![
                owner.to_string(),
                hex(reloc.offset),
                hex(reloc.size),
                reloc.kind.to_string(),
                format!("{}+{}", file.name_of(reloc.id_index), reloc.add),
            ]);
        }
    }
    table
}

/// Render the full text report.
pub fn write_report<W: Write>(file: &DecodedFile, opts: &ReportOptions, w: &mut W) -> io::Result<()> {
    writeln!(w, "The list of defined symbols:")?;
    symbol_table(file, opts).write_to(w)?;

    writeln!(w)?;
    writeln!(w, "The optional fields of STEXT-typed symbols:")?;
    func_data_table(file, opts).write_to(w)?;

    if opts.relocations {
        writeln!(w)?;
        writeln!(w, "The list of relocations:")?;
        relocation_table(file, opts).write_to(w)?;
    }
    Ok(())
}
