//! Table-driven reflected CRC-32.

use ::crc::{Algorithm, Crc, CRC_32_ISCSI, CRC_32_ISO_HDLC};

/// Checksum function used to test candidates against the target.
pub trait Checksum: Sync {
    fn checksum(&self, data: &[u8]) -> u32;
}

/// The polynomial table a run hashes with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    #[default]
    Ieee,
    Castagnoli,
    Koopman,
}

/// CRC-32K, reflected, as Koopman published it. Not in the catalogue.
const CRC_32_KOOPMAN: Algorithm<u32> = Algorithm {
    width: 32,
    poly: 0x741b_8cd7,
    init: 0xffff_ffff,
    refin: true,
    refout: true,
    xorout: 0xffff_ffff,
    check: 0x2d3d_d0ae,
    residue: 0x0843_323b,
};

static IEEE: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
static CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);
static KOOPMAN: Crc<u32> = Crc::<u32>::new(&CRC_32_KOOPMAN);

impl Variant {
    /// Maps the interactive table selector onto a variant, anything unknown is IEEE.
    pub fn from_selector(selector: i64) -> Self {
        match selector {
            2 => Variant::Castagnoli,
            3 => Variant::Koopman,
            _ => Variant::Ieee,
        }
    }

    pub fn selector(self) -> i64 {
        match self {
            Variant::Ieee => 1,
            Variant::Castagnoli => 2,
            Variant::Koopman => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Ieee => "IEEE",
            Variant::Castagnoli => "Castagnoli",
            Variant::Koopman => "Koopman",
        }
    }

    fn crc(self) -> &'static Crc<u32> {
        match self {
            Variant::Ieee => &IEEE,
            Variant::Castagnoli => &CASTAGNOLI,
            Variant::Koopman => &KOOPMAN,
        }
    }
}

impl Checksum for Variant {
    fn checksum(&self, data: &[u8]) -> u32 {
        self.crc().checksum(data)
    }
}
