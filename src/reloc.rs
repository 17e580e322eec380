use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! relocation_types {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// How a relocation patches its target, as numbered by the go1.10
        /// toolchain. Codes outside the table decode to `Unknown`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RelocationType {
            $($variant,)*
            Unknown(i64),
        }

        impl From<i64> for RelocationType {
            fn from(code: i64) -> Self {
                match code {
                    $($code => RelocationType::$variant,)*
                    other => RelocationType::Unknown(other),
                }
            }
        }

        impl RelocationType {
            pub fn code(&self) -> i64 {
                match self {
                    $(RelocationType::$variant => $code,)*
                    RelocationType::Unknown(code) => *code,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(RelocationType::$variant => $name,)*
                    RelocationType::Unknown(_) => "Unknown",
                }
            }
        }
    };
}

relocation_types! {
    Addr = 1 => "R_ADDR",
    AddrPower = 2 => "R_ADDRPOWER",
    AddrArm64 = 3 => "R_ADDRARM64",
    AddrMips = 4 => "R_ADDRMIPS",
    AddrOff = 5 => "R_ADDROFF",
    WeakAddrOff = 6 => "R_WEAKADDROFF",
    Size = 7 => "R_SIZE",
    Call = 8 => "R_CALL",
    CallArm = 9 => "R_CALLARM",
    CallArm64 = 10 => "R_CALLARM64",
    CallInd = 11 => "R_CALLIND",
    CallPower = 12 => "R_CALLPOWER",
    CallMips = 13 => "R_CALLMIPS",
    Const = 14 => "R_CONST",
    PcRel = 15 => "R_PCREL",
    TlsLe = 16 => "R_TLS_LE",
    TlsIe = 17 => "R_TLS_IE",
    GotOff = 18 => "R_GOTOFF",
    Plt0 = 19 => "R_PLT0",
    Plt1 = 20 => "R_PLT1",
    Plt2 = 21 => "R_PLT2",
    UseField = 22 => "R_USEFIELD",
    UseType = 23 => "R_USETYPE",
    MethodOff = 24 => "R_METHODOFF",
    PowerToc = 25 => "R_POWER_TOC",
    GotPcRel = 26 => "R_GOTPCREL",
    JmpMips = 27 => "R_JMPMIPS",
    DwarfSecRef = 28 => "R_DWARFSECREF",
    DwarfFileRef = 29 => "R_DWARFFILEREF",
    Arm64TlsLe = 30 => "R_ARM64_TLS_LE",
    Arm64TlsIe = 31 => "R_ARM64_TLS_IE",
    Arm64GotPcRel = 32 => "R_ARM64_GOTPCREL",
    PowerTlsLe = 33 => "R_POWER_TLS_LE",
    PowerTlsIe = 34 => "R_POWER_TLS_IE",
    PowerTls = 35 => "R_POWER_TLS",
    AddrPowerDs = 36 => "R_ADDRPOWER_DS",
    AddrPowerGot = 37 => "R_ADDRPOWER_GOT",
    AddrPowerPcRel = 38 => "R_ADDRPOWER_PCREL",
    AddrPowerTocRel = 39 => "R_ADDRPOWER_TOCREL",
    AddrPowerTocRelDs = 40 => "R_ADDRPOWER_TOCREL_DS",
    PcRelDbl = 41 => "R_PCRELDBL",
    AddrMipsU = 42 => "R_ADDRMIPSU",
    AddrMipsTls = 43 => "R_ADDRMIPSTLS",
    AddrCuOff = 44 => "R_ADDRCUOFF",
}

impl fmt::Display for RelocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RelocationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A patch to apply to `size` bytes at `offset` within the owning symbol's
/// data, resolved against the symbol referenced by `id_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relocation {
    pub offset: i64,
    pub size: i64,
    #[serde(rename = "type")]
    pub kind: RelocationType,
    pub add: i64,
    pub id_index: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_both_ways() {
        for code in 1..=44 {
            let kind = RelocationType::from(code);
            assert!(!matches!(kind, RelocationType::Unknown(_)), "code {code}");
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn names() {
        assert_eq!(RelocationType::from(8).to_string(), "R_CALL");
        assert_eq!(RelocationType::from(29).to_string(), "R_DWARFFILEREF");
        assert_eq!(RelocationType::from(44).to_string(), "R_ADDRCUOFF");
    }

    #[test]
    fn out_of_table_codes_are_unknown() {
        assert_eq!(RelocationType::from(0), RelocationType::Unknown(0));
        assert_eq!(RelocationType::from(45).to_string(), "Unknown");
        assert_eq!(RelocationType::from(-3).code(), -3);
    }
}
