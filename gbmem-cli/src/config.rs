use anyhow::Context;
use gbmem_core::{ArtifactKind, AudioWindow, RunConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_artifacts")]
    pub artifacts: Vec<ArtifactKind>,

    #[serde(default = "default_report_file_name")]
    pub report_file_name: String,

    #[serde(default = "default_hex_dump_file_name")]
    pub hex_dump_file_name: String,

    #[serde(default = "default_audio_file_name")]
    pub audio_file_name: String,

    #[serde(default = "default_audio_window_start")]
    pub audio_window_start: usize,

    #[serde(default = "default_audio_window_end")]
    pub audio_window_end: usize,

    #[serde(default = "default_load_into_memory")]
    pub load_into_memory: bool,
}

fn default_output_dir() -> String {
    gbmem_core::DEFAULT_OUTPUT_DIR.into()
}

fn default_artifacts() -> Vec<ArtifactKind> {
    ArtifactKind::ALL.to_vec()
}

fn default_report_file_name() -> String {
    gbmem_core::DEFAULT_REPORT_FILE_NAME.into()
}

fn default_hex_dump_file_name() -> String {
    gbmem_core::DEFAULT_HEX_DUMP_FILE_NAME.into()
}

fn default_audio_file_name() -> String {
    gbmem_core::DEFAULT_AUDIO_FILE_NAME.into()
}

fn default_audio_window_start() -> usize {
    AudioWindow::default().start
}

fn default_audio_window_end() -> usize {
    AudioWindow::default().end
}

fn default_load_into_memory() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            artifacts: default_artifacts(),
            report_file_name: default_report_file_name(),
            hex_dump_file_name: default_hex_dump_file_name(),
            audio_file_name: default_audio_file_name(),
            audio_window_start: default_audio_window_start(),
            audio_window_end: default_audio_window_end(),
            load_into_memory: default_load_into_memory(),
        }
    }
}

impl CliConfig {
    pub fn from_toml_file<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path> + std::fmt::Debug,
    {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("error reading TOML config file from '{path:?}'"))?;
        let config: Self = toml::from_str(&config_str)
            .with_context(|| format!("error parsing config from TOML file at '{path:?}'"))?;

        if config.audio_window_start > config.audio_window_end {
            anyhow::bail!(
                "invalid audio window in '{path:?}': start {:#X} is past end {:#X}",
                config.audio_window_start,
                config.audio_window_end
            );
        }

        Ok(config)
    }

    pub fn into_run_config(self, gb_file_path: String) -> RunConfig {
        RunConfig {
            gb_file_path,
            output_dir: self.output_dir,
            artifacts: self.artifacts,
            report_file_name: self.report_file_name,
            hex_dump_file_name: self.hex_dump_file_name,
            audio_file_name: self.audio_file_name,
            audio_window: AudioWindow {
                start: self.audio_window_start,
                end: self.audio_window_end,
            },
            load_into_memory: self.load_into_memory,
        }
    }
}
