use crate::config::RunConfig;
use crate::header::{HeaderError, HeaderFacts};
use crate::memory::{Cartridge, CartridgeLoadError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("error loading cartridge from {file_path}: {source}")]
    FileRead {
        file_path: String,
        #[source]
        source: CartridgeLoadError,
    },
    #[error("error decoding cartridge header from {file_path}: {source}")]
    Header {
        file_path: String,
        #[source]
        source: HeaderError,
    },
}

pub struct SessionState {
    pub cartridge: Cartridge,
    pub header: HeaderFacts,
}

pub fn init_session_state(run_config: &RunConfig) -> Result<SessionState, StartupError> {
    let cartridge = match Cartridge::from_file(&run_config.gb_file_path) {
        Ok(cartridge) => cartridge,
        Err(err) => {
            return Err(StartupError::FileRead {
                file_path: run_config.gb_file_path.clone(),
                source: err,
            })
        }
    };

    let header = match HeaderFacts::decode(cartridge.raw_data()) {
        Ok(header) => header,
        Err(err) => {
            return Err(StartupError::Header {
                file_path: run_config.gb_file_path.clone(),
                source: err,
            })
        }
    };

    log::info!("Game title: {}", header.title);
    log::info!(
        "Cartridge type: {} ({:#04X})",
        header.cartridge_type,
        header.cartridge_type_code
    );
    log::info!("Declared ROM size: {}", header.rom_size);
    log::info!("Declared RAM size: {}", header.ram_size);

    if !header.checksum_valid() {
        log::warn!(
            "Header checksum mismatch: header says {:#04X}, computed {:#04X}",
            header.header_checksum,
            header.computed_checksum
        );
    }

    Ok(SessionState { cartridge, header })
}
