use crate::memory::address;
use gbmem_proc_macros::{EnumDisplay, EnumFromStr};
use std::fmt::Formatter;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumDisplay, EnumFromStr)]
pub enum RegionKind {
    #[display("ROM")]
    Rom,
    #[display("VRAM")]
    Vram,
    #[display("WRAM")]
    Wram,
    #[display("SRAM")]
    Sram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum Permission {
    #[display("read-only")]
    ReadOnly,
    #[display("writable, logged")]
    LoggedWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u32,
    pub end_inclusive: u32,
}

impl AddressRange {
    pub const fn new(start: u32, end_inclusive: u32) -> Self {
        Self {
            start,
            end_inclusive,
        }
    }

    pub fn contains(self, address: u32) -> bool {
        (self.start..=self.end_inclusive).contains(&address)
    }

    /// Number of addresses in the range. Ranges are never empty.
    pub fn size(self) -> u32 {
        self.end_inclusive - self.start + 1
    }

    pub fn overlaps(self, other: Self) -> bool {
        self.start <= other.end_inclusive && other.start <= self.end_inclusive
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:06X}-0x{:06X}", self.start, self.end_inclusive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub kind: RegionKind,
    pub range: AddressRange,
    pub permission: Permission,
}

impl MemoryRegion {
    pub const fn new(kind: RegionKind, range: AddressRange, permission: Permission) -> Self {
        Self {
            kind,
            range,
            permission,
        }
    }
}

// Order is lookup priority: the writable windows shadow the ROM range that spans the whole space
const REFERENCE_REGIONS: [MemoryRegion; 4] = [
    MemoryRegion::new(
        RegionKind::Vram,
        AddressRange::new(address::VRAM_START, address::VRAM_END),
        Permission::LoggedWrite,
    ),
    MemoryRegion::new(
        RegionKind::Wram,
        AddressRange::new(address::WORKING_RAM_START, address::WORKING_RAM_END),
        Permission::LoggedWrite,
    ),
    MemoryRegion::new(
        RegionKind::Sram,
        AddressRange::new(address::EXTERNAL_RAM_START, address::EXTERNAL_RAM_END),
        Permission::LoggedWrite,
    ),
    MemoryRegion::new(
        RegionKind::Rom,
        AddressRange::new(address::ROM_START, address::ROM_END),
        Permission::ReadOnly,
    ),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("address space must contain at least one byte")]
    EmptyAddressSpace,
    #[error("{region} range {range} is inverted")]
    InvertedRange { region: RegionKind, range: AddressRange },
    #[error("{region} range {range} does not fit in an address space of {size:#X} bytes")]
    RegionOutOfBounds {
        region: RegionKind,
        range: AddressRange,
        size: u32,
    },
    #[error("writable regions {first} and {second} overlap")]
    OverlappingRegions {
        first: RegionKind,
        second: RegionKind,
    },
}

/// The total size of an address space plus its region table, in lookup priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLayout {
    size: u32,
    regions: Vec<MemoryRegion>,
}

impl MemoryLayout {
    /// Build a custom layout. Every region must lie inside `[0, size)` and writable regions may not
    /// overlap each other. Read-only regions may sit underneath writable ones; the earlier entry
    /// wins on lookup.
    pub fn new(size: u32, regions: Vec<MemoryRegion>) -> Result<Self, LayoutError> {
        if size == 0 {
            return Err(LayoutError::EmptyAddressSpace);
        }

        for region in &regions {
            if region.range.start > region.range.end_inclusive {
                return Err(LayoutError::InvertedRange {
                    region: region.kind,
                    range: region.range,
                });
            }

            if region.range.end_inclusive >= size {
                return Err(LayoutError::RegionOutOfBounds {
                    region: region.kind,
                    range: region.range,
                    size,
                });
            }
        }

        let writable: Vec<_> = regions
            .iter()
            .filter(|region| region.permission == Permission::LoggedWrite)
            .collect();
        for (i, first) in writable.iter().enumerate() {
            if let Some(second) = writable[i + 1..]
                .iter()
                .find(|second| first.range.overlaps(second.range))
            {
                return Err(LayoutError::OverlappingRegions {
                    first: first.kind,
                    second: second.kind,
                });
            }
        }

        Ok(Self { size, regions })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// First region (in priority order) whose range contains the address.
    pub fn region_at(&self, address: u32) -> Option<&MemoryRegion> {
        self.regions
            .iter()
            .find(|region| region.range.contains(address))
    }

    pub fn region(&self, kind: RegionKind) -> Option<&MemoryRegion> {
        self.regions.iter().find(|region| region.kind == kind)
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self {
            size: address::ADDRESS_SPACE_SIZE,
            regions: REFERENCE_REGIONS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(kind: RegionKind, start: u32, end_inclusive: u32, permission: Permission) -> MemoryRegion {
        MemoryRegion::new(kind, AddressRange::new(start, end_inclusive), permission)
    }

    #[test]
    fn reference_layout_is_valid() {
        let reference = MemoryLayout::default();
        let validated = MemoryLayout::new(reference.size(), reference.regions().to_vec());
        assert_eq!(Ok(reference), validated);
    }

    #[test]
    fn lookup_priority() {
        let layout = MemoryLayout::default();

        assert_eq!(Some(RegionKind::Vram), layout.region_at(0x8000).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Vram), layout.region_at(0x9FFF).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Sram), layout.region_at(0xA000).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Sram), layout.region_at(0xBFFF).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Wram), layout.region_at(0xC000).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Wram), layout.region_at(0xDFFF).map(|r| r.kind));

        // Everything else is covered by ROM
        assert_eq!(Some(RegionKind::Rom), layout.region_at(0x0000).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Rom), layout.region_at(0x7FFF).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Rom), layout.region_at(0xE000).map(|r| r.kind));
        assert_eq!(Some(RegionKind::Rom), layout.region_at(0x1FFFFF).map(|r| r.kind));

        assert_eq!(None, layout.region_at(0x200000));
    }

    #[test]
    fn rejects_out_of_bounds_region() {
        let result = MemoryLayout::new(
            0x1000,
            vec![region(RegionKind::Vram, 0x0800, 0x1000, Permission::LoggedWrite)],
        );

        assert_eq!(
            Err(LayoutError::RegionOutOfBounds {
                region: RegionKind::Vram,
                range: AddressRange::new(0x0800, 0x1000),
                size: 0x1000,
            }),
            result
        );
    }

    #[test]
    fn rejects_overlapping_writable_regions() {
        let result = MemoryLayout::new(
            0x1000,
            vec![
                region(RegionKind::Vram, 0x0000, 0x07FF, Permission::LoggedWrite),
                region(RegionKind::Wram, 0x0400, 0x0BFF, Permission::LoggedWrite),
            ],
        );

        assert_eq!(
            Err(LayoutError::OverlappingRegions {
                first: RegionKind::Vram,
                second: RegionKind::Wram,
            }),
            result
        );
    }

    #[test]
    fn rejects_degenerate_layouts() {
        assert_eq!(Err(LayoutError::EmptyAddressSpace), MemoryLayout::new(0, vec![]));

        let inverted = region(RegionKind::Rom, 0x0200, 0x0100, Permission::ReadOnly);
        assert_eq!(
            Err(LayoutError::InvertedRange {
                region: RegionKind::Rom,
                range: inverted.range,
            }),
            MemoryLayout::new(0x1000, vec![inverted])
        );
    }

    #[test]
    fn region_labels() {
        assert_eq!("VRAM", RegionKind::Vram.to_string());
        assert_eq!("read-only", Permission::ReadOnly.to_string());
        assert_eq!(Ok(RegionKind::Sram), "sram".parse::<RegionKind>());
        assert_eq!(
            "0x008000-0x009FFF",
            AddressRange::new(0x8000, 0x9FFF).to_string()
        );
    }
}
