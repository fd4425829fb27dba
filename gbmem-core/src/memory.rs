pub(crate) mod address;
mod region;

use std::fmt::Formatter;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

pub use region::{
    AddressRange, LayoutError, MemoryLayout, MemoryRegion, Permission, RegionKind,
};

#[derive(Error, Debug)]
pub enum CartridgeLoadError {
    #[error("error reading cartridge data: {source}")]
    FileRead {
        #[from]
        source: io::Error,
    },
}

/// Raw cartridge image as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    raw_data: Vec<u8>,
}

impl Cartridge {
    pub fn new(raw_data: Vec<u8>) -> Self {
        Self { raw_data }
    }

    pub fn from_file<P>(file_path: P) -> Result<Self, CartridgeLoadError>
    where
        P: AsRef<Path>,
    {
        let raw_data = fs::read(file_path.as_ref())?;

        log::debug!(
            "Read {} bytes of cartridge data from '{}'",
            raw_data.len(),
            file_path.as_ref().display()
        );

        Ok(Self { raw_data })
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("ROM does not fit in memory: capacity is {capacity} bytes ({capacity:#X}), ROM is {actual} bytes")]
    RomTooLarge { capacity: usize, actual: usize },
    #[error("memory address out of range: {address:#06X} (address space size is {size:#X})")]
    OutOfRange { address: u32, size: u32 },
    #[error("attempted write to read-only {region} at address {address:#06X}")]
    ReadOnlyViolation { address: u32, region: RegionKind },
}

/// Where an accepted write landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Region(RegionKind),
    // In bounds but not covered by any region
    Unmapped,
}

/// Flat, single-bank byte-addressable memory with a fixed region table. Storage is zero-filled on
/// construction and never resized.
pub struct AddressSpace {
    storage: Box<[u8]>,
    layout: MemoryLayout,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::with_layout(MemoryLayout::default())
    }

    pub fn with_layout(layout: MemoryLayout) -> Self {
        let storage = vec![0; layout.size() as usize].into_boxed_slice();
        Self { storage, layout }
    }

    pub fn size(&self) -> u32 {
        self.layout.size()
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Copy a ROM image into memory starting at address 0. Bytes past the end of the image keep
    /// whatever value they held before. Returns the number of bytes copied.
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<usize, MemoryError> {
        let capacity = self.storage.len();
        if rom_data.len() > capacity {
            return Err(MemoryError::RomTooLarge {
                capacity,
                actual: rom_data.len(),
            });
        }

        self.storage[..rom_data.len()].copy_from_slice(rom_data);

        log::info!("ROM loaded into memory: {} bytes", rom_data.len());

        Ok(rom_data.len())
    }

    pub fn read_byte(&self, address: u32) -> Result<u8, MemoryError> {
        self.storage
            .get(address as usize)
            .copied()
            .ok_or(MemoryError::OutOfRange {
                address,
                size: self.size(),
            })
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<WriteOutcome, MemoryError> {
        let size = self.size();
        if address >= size {
            return Err(MemoryError::OutOfRange { address, size });
        }

        let outcome = match self.layout.region_at(address) {
            Some(&MemoryRegion {
                kind,
                permission: Permission::LoggedWrite,
                ..
            }) => {
                log::debug!("Writing to {kind} (address {address:#06X})");
                WriteOutcome::Region(kind)
            }
            Some(&MemoryRegion {
                kind,
                permission: Permission::ReadOnly,
                ..
            }) => {
                return Err(MemoryError::ReadOnlyViolation {
                    address,
                    region: kind,
                });
            }
            None => WriteOutcome::Unmapped,
        };

        self.storage[address as usize] = value;

        Ok(outcome)
    }

    pub fn region_at(&self, address: u32) -> Option<&MemoryRegion> {
        self.layout.region_at(address)
    }

    /// Whether any byte in the ROM region is non-zero. This is a heuristic; a ROM image that is
    /// entirely zero reads as not loaded.
    pub fn rom_loaded(&self) -> bool {
        let Some(rom) = self.layout.region(RegionKind::Rom) else {
            return false;
        };

        let start = rom.range.start as usize;
        let end = rom.range.end_inclusive as usize;
        self.storage[start..=end].iter().any(|&byte| byte != 0)
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_region_size(size: u32) -> String {
    if size % 1024 == 0 {
        format!("{} KB", size / 1024)
    } else {
        format!("{size} bytes")
    }
}

impl std::fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<AddressSpace: {} bytes", self.storage.len())?;
        for region in self.layout.regions() {
            write!(
                f,
                ", {}: {} ({}, {})",
                region.kind,
                region.range,
                fmt_region_size(region.range.size()),
                region.permission
            )?;
        }
        write!(f, ", ROM loaded: {}>", self.rom_loaded())
    }
}

// Storage is far too large to print
impl std::fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
