mod config;
mod header;
mod memory;
mod report;
mod startup;

use std::path::PathBuf;
use thiserror::Error;

pub use config::{
    ArtifactKind, AudioWindow, RunConfig, DEFAULT_AUDIO_FILE_NAME, DEFAULT_HEX_DUMP_FILE_NAME,
    DEFAULT_OUTPUT_DIR, DEFAULT_REPORT_FILE_NAME,
};
pub use header::{CartridgeType, DeclaredSize, HeaderError, HeaderFacts, UNREADABLE_TITLE};
pub use memory::address::ADDRESS_SPACE_SIZE;
pub use memory::{
    AddressRange, AddressSpace, Cartridge, CartridgeLoadError, LayoutError, MemoryError,
    MemoryLayout, MemoryRegion, Permission, RegionKind, WriteOutcome,
};
pub use report::{render_artifact, ArtifactWriteError, AudioDump, FullReport, HexDump};
pub use startup::StartupError;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{source}")]
    Startup {
        #[from]
        source: StartupError,
    },
    #[error("{source}")]
    ArtifactWrite {
        #[from]
        source: ArtifactWriteError,
    },
    #[error("error loading cartridge into memory: {source}")]
    Memory {
        #[from]
        source: MemoryError,
    },
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub header: HeaderFacts,
    pub artifact_paths: Vec<PathBuf>,
    // None if loading into memory was disabled
    pub bytes_loaded: Option<usize>,
}

/// Decode the cartridge at `run_config.gb_file_path`, optionally load the image into a fresh
/// address space, and write the selected artifacts.
///
/// The image is loaded before any artifact is written, so an image that does not fit in the address
/// space fails without leaving files behind. The header's declared ROM/RAM sizes are reported but
/// do not affect the address space layout.
pub fn run(run_config: &RunConfig) -> Result<RunSummary, RunError> {
    let startup::SessionState { cartridge, header } = startup::init_session_state(run_config)?;

    let bytes_loaded = if run_config.load_into_memory {
        let mut address_space = AddressSpace::new();
        let bytes_loaded = address_space.load_rom(cartridge.raw_data())?;

        log::debug!("{address_space}");

        Some(bytes_loaded)
    } else {
        None
    };

    let artifact_paths = report::write_artifacts(cartridge.raw_data(), &header, run_config)?;

    Ok(RunSummary {
        header,
        artifact_paths,
        bytes_loaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, process};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gbmem-run-{name}-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_image(dir: &std::path::Path, len: usize) -> String {
        let mut data = vec![0; len];
        data[0x0134..0x0138].copy_from_slice(b"RUN!");
        data[0x0147] = 0x03;
        data[0x0148] = 0x01;
        data[0x0149] = 0x02;

        let path = dir.join("game.gb");
        fs::write(&path, data).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn end_to_end() {
        let dir = scratch_dir("ok");
        let mut run_config = RunConfig::new(write_image(&dir, 0x10000));
        run_config.output_dir = dir.join("out").to_string_lossy().into_owned();

        let summary = run(&run_config).unwrap();

        assert_eq!("RUN!", summary.header.title);
        assert_eq!(CartridgeType::Mbc1RamBattery, summary.header.cartridge_type);
        assert_eq!(DeclaredSize::Kb(64), summary.header.rom_size);
        assert_eq!(DeclaredSize::Kb(8), summary.header.ram_size);
        assert_eq!(Some(0x10000), summary.bytes_loaded);
        assert_eq!(3, summary.artifact_paths.len());
        assert!(summary.artifact_paths.iter().all(|path| path.is_file()));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn oversized_rom() {
        let dir = scratch_dir("oversized");
        let mut run_config = RunConfig::new(write_image(&dir, ADDRESS_SPACE_SIZE as usize + 1));
        run_config.output_dir = dir.to_string_lossy().into_owned();
        run_config.artifacts = vec![ArtifactKind::Audio];

        let result = run(&run_config);
        assert!(
            matches!(
                result,
                Err(RunError::Memory {
                    source: MemoryError::RomTooLarge {
                        capacity: 0x200000,
                        actual: 0x200001
                    }
                })
            ),
            "{result:?}"
        );
        assert!(!dir.join("audio.txt").exists());

        run_config.load_into_memory = false;
        let summary = run(&run_config).unwrap();
        assert_eq!(None, summary.bytes_loaded);
        assert_eq!(vec![dir.join("audio.txt")], summary.artifact_paths);
        assert!(dir.join("audio.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file() {
        let run_config = RunConfig::new("/nonexistent/gbmem/missing.gb".into());

        let result = run(&run_config);
        assert!(
            matches!(
                result,
                Err(RunError::Startup {
                    source: StartupError::FileRead { .. }
                })
            ),
            "{result:?}"
        );
    }

    #[test]
    fn truncated_header() {
        let dir = scratch_dir("truncated");
        let path = dir.join("short.gb");
        fs::write(&path, [0_u8; 0x100]).unwrap();

        let run_config = RunConfig::new(path.to_string_lossy().into_owned());
        let result = run(&run_config);
        assert!(
            matches!(
                result,
                Err(RunError::Startup {
                    source: StartupError::Header {
                        source: HeaderError::TooShort { len: 0x100 },
                        ..
                    }
                })
            ),
            "{result:?}"
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
