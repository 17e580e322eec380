use serde::{Serialize, Serializer};
use std::fmt;

use crate::reloc::Relocation;

/// Storage class of a symbol, as numbered by the go1.10 toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// The otherwise invalid zero value.
    Invalid,
    /// Executable instructions.
    Text,
    /// Read only static data.
    RoData,
    /// Static data without pointers.
    NoPtrData,
    Data,
    /// Zero-initialized data.
    Bss,
    NoPtrBss,
    /// Zero-initialized thread-local data.
    TlsBss,
    DwarfInfo,
    DwarfRange,
    DwarfLoc,
    Unknown(u8),
}

impl From<u8> for SymbolKind {
    fn from(raw: u8) -> Self {
        match raw {
            0 => SymbolKind::Invalid,
            1 => SymbolKind::Text,
            2 => SymbolKind::RoData,
            3 => SymbolKind::NoPtrData,
            4 => SymbolKind::Data,
            5 => SymbolKind::Bss,
            6 => SymbolKind::NoPtrBss,
            7 => SymbolKind::TlsBss,
            8 => SymbolKind::DwarfInfo,
            9 => SymbolKind::DwarfRange,
            10 => SymbolKind::DwarfLoc,
            other => SymbolKind::Unknown(other),
        }
    }
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Invalid => "INVALID",
            SymbolKind::Text => "STEXT",
            SymbolKind::RoData => "SRODATA",
            SymbolKind::NoPtrData => "SNOPTRDATA",
            SymbolKind::Data => "SDATA",
            SymbolKind::Bss => "SBSS",
            SymbolKind::NoPtrBss => "SNOPTRBSS",
            SymbolKind::TlsBss => "STLSBSS",
            SymbolKind::DwarfInfo => "SDWARFINFO",
            SymbolKind::DwarfRange => "SDWARFRANGE",
            SymbolKind::DwarfLoc => "SDWARFLOC",
            SymbolKind::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn is_text(&self) -> bool {
        *self == SymbolKind::Text
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SymbolKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A name and version pair that symbol records point at by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolReference {
    pub name: String,
    pub version: i64,
}

/// Location of a block inside the shared data segment. Never stored in the
/// file; offsets are handed out in encoding order while decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataAddr {
    pub size: i64,
    pub offset: i64,
}

impl DataAddr {
    /// Byte range of this block, if it is representable.
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(self.offset).ok()?;
        let len = usize::try_from(self.size).ok()?;
        Some(start..start.checked_add(len)?)
    }
}

/// A local variable, argument or result of a function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Local {
    pub symbol_index: i64,
    pub offset: i64,
    pub var_type: i64,
    pub go_type_index: i64,
}

/// Extra metadata carried only by executable symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtendedFields {
    pub args: i64,
    pub frame: i64,
    pub leaf: bool,
    pub c_func: bool,
    pub type_method: bool,
    pub shared_func: bool,
    pub no_split: bool,
    pub locals: Vec<Local>,
    // pc-value tables
    pub stack_map: DataAddr,
    pub file_table: DataAddr,
    pub line_table: DataAddr,
    pub inline_table: DataAddr,
    pub aux_tables: Vec<DataAddr>,
    pub func_data_refs: Vec<i64>,
    pub func_data_offsets: Vec<i64>,
    pub file_indices: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub id_index: i64,
    pub kind: SymbolKind,
    pub size: i64,
    pub dup_ok: bool,
    pub local: bool,
    pub typelink: bool,
    pub go_type_index: i64,
    pub data_addr: DataAddr,
    pub relocations: Vec<Relocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedFields>,
}
