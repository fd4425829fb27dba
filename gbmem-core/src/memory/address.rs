//
// Cartridge header addresses
//

pub const HEADER_START: usize = 0x0100;
// Exclusive
pub const HEADER_END: usize = 0x0150;

pub const TITLE_START: usize = 0x0134;
// Exclusive
pub const TITLE_END: usize = 0x0144;

pub const CARTRIDGE_TYPE: usize = 0x0147;
pub const ROM_SIZE: usize = 0x0148;
pub const RAM_SIZE: usize = 0x0149;

// Checksum covers TITLE_START..=HEADER_CHECKSUM_COVERAGE_END
pub const HEADER_CHECKSUM_COVERAGE_END: usize = 0x014C;
pub const HEADER_CHECKSUM: usize = 0x014D;

//
// Address space boundaries
//

pub const ADDRESS_SPACE_SIZE: u32 = 0x200000;

pub const ROM_START: u32 = 0x000000;
pub const ROM_END: u32 = 0x1FFFFF;

pub const VRAM_START: u32 = 0x8000;
pub const VRAM_END: u32 = 0x9FFF;

pub const EXTERNAL_RAM_START: u32 = 0xA000;
pub const EXTERNAL_RAM_END: u32 = 0xBFFF;

pub const WORKING_RAM_START: u32 = 0xC000;
pub const WORKING_RAM_END: u32 = 0xDFFF;

//
// Image offsets used by the audio dump. Nothing verifies that audio data actually lives here.
//

pub const AUDIO_WINDOW_START: usize = 0xA000;
// Exclusive
pub const AUDIO_WINDOW_END: usize = 0xBFFF;
