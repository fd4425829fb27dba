use crate::memory::address;
use gbmem_proc_macros::{EnumDisplay, StrSerialize};
use serde::Serialize;
use std::fmt::Formatter;
use thiserror::Error;

pub const UNREADABLE_TITLE: &str = "Unreadable title";

const ROM_SIZES_KB: [u32; 9] = [32, 64, 128, 256, 512, 1024, 2048, 4096, 8192];
const RAM_SIZES_KB: [u32; 6] = [0, 2, 8, 32, 128, 64];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("cartridge image is {len} bytes, too short to contain a header ending at 0x0150")]
    TooShort { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay, StrSerialize)]
pub enum CartridgeType {
    #[display("ROM Only")]
    RomOnly,
    #[display("MBC1")]
    Mbc1,
    #[display("MBC1 + RAM")]
    Mbc1Ram,
    #[display("MBC1 + RAM + Battery")]
    Mbc1RamBattery,
    #[display("MBC2")]
    Mbc2,
    #[display("MBC2 + Battery")]
    Mbc2Battery,
    #[display("ROM + RAM")]
    RomRam,
    #[display("ROM + RAM + Battery")]
    RomRamBattery,
    #[display("MMM01")]
    Mmm01,
    #[display("MMM01 + RAM")]
    Mmm01Ram,
    #[display("MMM01 + RAM + Battery")]
    Mmm01RamBattery,
    #[display("MBC3 + Timer + Battery")]
    Mbc3TimerBattery,
    #[display("MBC3 + Timer + RAM + Battery")]
    Mbc3TimerRamBattery,
    #[display("MBC3")]
    Mbc3,
    #[display("MBC3 + RAM")]
    Mbc3Ram,
    #[display("MBC3 + RAM + Battery")]
    Mbc3RamBattery,
    #[display("MBC5")]
    Mbc5,
    #[display("MBC5 + RAM")]
    Mbc5Ram,
    #[display("MBC5 + RAM + Battery")]
    Mbc5RamBattery,
    #[display("MBC5 + Rumble")]
    Mbc5Rumble,
    #[display("MBC5 + Rumble + RAM")]
    Mbc5RumbleRam,
    #[display("MBC5 + Rumble + RAM + Battery")]
    Mbc5RumbleRamBattery,
    #[display("MBC6")]
    Mbc6,
    #[display("MBC7 + Sensor + Rumble + RAM + Battery")]
    Mbc7SensorRumbleRamBattery,
    Unknown,
}

impl CartridgeType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => Self::RomOnly,
            0x01 => Self::Mbc1,
            0x02 => Self::Mbc1Ram,
            0x03 => Self::Mbc1RamBattery,
            0x05 => Self::Mbc2,
            0x06 => Self::Mbc2Battery,
            0x08 => Self::RomRam,
            0x09 => Self::RomRamBattery,
            0x0B => Self::Mmm01,
            0x0C => Self::Mmm01Ram,
            0x0D => Self::Mmm01RamBattery,
            0x0F => Self::Mbc3TimerBattery,
            0x10 => Self::Mbc3TimerRamBattery,
            0x11 => Self::Mbc3,
            0x12 => Self::Mbc3Ram,
            0x13 => Self::Mbc3RamBattery,
            0x19 => Self::Mbc5,
            0x1A => Self::Mbc5Ram,
            0x1B => Self::Mbc5RamBattery,
            0x1C => Self::Mbc5Rumble,
            0x1D => Self::Mbc5RumbleRam,
            0x1E => Self::Mbc5RumbleRamBattery,
            0x20 => Self::Mbc6,
            0x22 => Self::Mbc7SensorRumbleRamBattery,
            _ => Self::Unknown,
        }
    }
}

/// A size declared in the header, looked up from its index byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrSerialize)]
pub enum DeclaredSize {
    Kb(u32),
    // Index byte did not match any table entry
    Unknown(u8),
}

impl DeclaredSize {
    fn lookup(table: &[u32], index: u8) -> Self {
        match table.get(usize::from(index)) {
            Some(&kb) => Self::Kb(kb),
            None => Self::Unknown(index),
        }
    }

    pub fn kb(self) -> Option<u32> {
        match self {
            Self::Kb(kb) => Some(kb),
            Self::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for DeclaredSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kb(kb) => write!(f, "{kb} KB"),
            Self::Unknown(_) => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFacts {
    pub title: String,
    pub cartridge_type: CartridgeType,
    pub cartridge_type_code: u8,
    pub rom_size: DeclaredSize,
    pub ram_size: DeclaredSize,
    pub header_checksum: u8,
    pub computed_checksum: u8,
}

impl HeaderFacts {
    /// Decode the header fields of a cartridge image. Only fails if the image is too short to
    /// contain a full header; undecodable content falls back to placeholder values.
    pub fn decode(buffer: &[u8]) -> Result<Self, HeaderError> {
        if buffer.len() < address::HEADER_END {
            return Err(HeaderError::TooShort { len: buffer.len() });
        }

        let cartridge_type_code = buffer[address::CARTRIDGE_TYPE];

        Ok(Self {
            title: decode_title(&buffer[address::TITLE_START..address::TITLE_END]),
            cartridge_type: CartridgeType::from_code(cartridge_type_code),
            cartridge_type_code,
            rom_size: DeclaredSize::lookup(&ROM_SIZES_KB, buffer[address::ROM_SIZE]),
            ram_size: DeclaredSize::lookup(&RAM_SIZES_KB, buffer[address::RAM_SIZE]),
            header_checksum: buffer[address::HEADER_CHECKSUM],
            computed_checksum: compute_header_checksum(buffer),
        })
    }

    pub fn checksum_valid(&self) -> bool {
        self.header_checksum == self.computed_checksum
    }
}

impl std::fmt::Display for HeaderFacts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "title={}, cartridge_type={} ({:#04X}), rom_size={}, ram_size={}, checksum_valid={}",
            self.title,
            self.cartridge_type,
            self.cartridge_type_code,
            self.rom_size,
            self.ram_size,
            self.checksum_valid()
        )
    }
}

fn decode_title(title_bytes: &[u8]) -> String {
    if !title_bytes.is_ascii() {
        return UNREADABLE_TITLE.into();
    }

    let title: String = title_bytes.iter().copied().map(char::from).collect();
    title.trim_matches('\0').into()
}

fn compute_header_checksum(buffer: &[u8]) -> u8 {
    buffer[address::TITLE_START..=address::HEADER_CHECKSUM_COVERAGE_END]
        .iter()
        .fold(0_u8, |checksum, &byte| checksum.wrapping_sub(byte).wrapping_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with(fields: &[(usize, u8)]) -> Vec<u8> {
        let mut buffer = vec![0; 0x8000];
        for &(offset, value) in fields {
            buffer[offset] = value;
        }
        buffer
    }

    fn set_title(buffer: &mut [u8], title: &[u8]) {
        buffer[address::TITLE_START..address::TITLE_START + title.len()].copy_from_slice(title);
    }

    #[test]
    fn cartridge_type_lookup() {
        let header = HeaderFacts::decode(&header_with(&[(0x0147, 0x01)])).unwrap();
        assert_eq!(CartridgeType::Mbc1, header.cartridge_type);
        assert_eq!("MBC1", header.cartridge_type.to_string());

        let header = HeaderFacts::decode(&header_with(&[(0x0147, 0x13)])).unwrap();
        assert_eq!("MBC3 + RAM + Battery", header.cartridge_type.to_string());

        let header = HeaderFacts::decode(&header_with(&[(0x0147, 0x00)])).unwrap();
        assert_eq!("ROM Only", header.cartridge_type.to_string());

        for code in [0x04, 0x21, 0xFC, 0xFF] {
            let header = HeaderFacts::decode(&header_with(&[(0x0147, code)])).unwrap();
            assert_eq!(CartridgeType::Unknown, header.cartridge_type);
            assert_eq!(code, header.cartridge_type_code);
            assert_eq!("Unknown", header.cartridge_type.to_string());
        }
    }

    #[test]
    fn size_lookup() {
        let header = HeaderFacts::decode(&header_with(&[(0x0148, 0x02), (0x0149, 0x03)])).unwrap();
        assert_eq!(DeclaredSize::Kb(128), header.rom_size);
        assert_eq!(Some(128), header.rom_size.kb());
        assert_eq!(DeclaredSize::Kb(32), header.ram_size);

        let header = HeaderFacts::decode(&header_with(&[(0x0148, 0x08), (0x0149, 0x05)])).unwrap();
        assert_eq!(DeclaredSize::Kb(8192), header.rom_size);
        assert_eq!(DeclaredSize::Kb(64), header.ram_size);

        let header = HeaderFacts::decode(&header_with(&[(0x0148, 0x09), (0x0149, 0x06)])).unwrap();
        assert_eq!(DeclaredSize::Unknown(0x09), header.rom_size);
        assert_eq!(DeclaredSize::Unknown(0x06), header.ram_size);
        assert_eq!(None, header.ram_size.kb());
        assert_eq!("Unknown", header.rom_size.to_string());
    }

    #[test]
    fn title_decoding() {
        let mut buffer = header_with(&[]);
        set_title(&mut buffer, b"TETRIS");
        assert_eq!("TETRIS", HeaderFacts::decode(&buffer).unwrap().title);

        // Full-width titles have no terminator
        set_title(&mut buffer, b"ABCDEFGHIJKLMNOP");
        assert_eq!("ABCDEFGHIJKLMNOP", HeaderFacts::decode(&buffer).unwrap().title);

        // Interior NULs are kept, only the ends are stripped
        let mut buffer = header_with(&[]);
        set_title(&mut buffer, b"\0AB\0CD");
        assert_eq!("AB\0CD", HeaderFacts::decode(&buffer).unwrap().title);

        let mut buffer = header_with(&[]);
        set_title(&mut buffer, b"POKEMON\x80");
        assert_eq!(UNREADABLE_TITLE, HeaderFacts::decode(&buffer).unwrap().title);
    }

    #[test]
    fn header_checksum() {
        let mut buffer = header_with(&[(0x0147, 0x03), (0x0148, 0x04), (0x0149, 0x02)]);
        set_title(&mut buffer, b"CHECKSUM");

        let expected = buffer[0x0134..=0x014C]
            .iter()
            .fold(0_u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1));
        buffer[0x014D] = expected;

        let header = HeaderFacts::decode(&buffer).unwrap();
        assert_eq!(expected, header.computed_checksum);
        assert!(header.checksum_valid());

        buffer[0x014D] = expected.wrapping_add(1);
        assert!(!HeaderFacts::decode(&buffer).unwrap().checksum_valid());
    }

    #[test]
    fn all_zero_header_checksum() {
        // 25 bytes of zero: 0 - 25 * 1
        let header = HeaderFacts::decode(&header_with(&[])).unwrap();
        assert_eq!(0_u8.wrapping_sub(25), header.computed_checksum);
    }

    #[test]
    fn short_buffer() {
        assert_eq!(
            Err(HeaderError::TooShort { len: 0x014F }),
            HeaderFacts::decode(&[0; 0x014F])
        );
        assert!(HeaderFacts::decode(&[0; 0x0150]).is_ok());
    }

    #[test]
    fn serializes_labels() {
        let header = HeaderFacts::decode(&header_with(&[(0x0147, 0x1B), (0x0148, 0x05)])).unwrap();
        let serialized = toml::to_string(&header).unwrap();

        assert!(serialized.contains("cartridge_type = \"MBC5 + RAM + Battery\""), "{serialized}");
        assert!(serialized.contains("rom_size = \"1024 KB\""), "{serialized}");
        assert!(serialized.contains("ram_size = \"0 KB\""), "{serialized}");
    }
}
