use crate::memory::address;
use gbmem_proc_macros::{EnumDisplay, EnumFromStr, StrDeserialize, StrSerialize};
use std::fmt::Formatter;

pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_REPORT_FILE_NAME: &str = "game.txt";
pub const DEFAULT_HEX_DUMP_FILE_NAME: &str = "game_hex.txt";
pub const DEFAULT_AUDIO_FILE_NAME: &str = "audio.txt";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumDisplay,
    EnumFromStr,
    StrSerialize,
    StrDeserialize,
)]
pub enum ArtifactKind {
    #[display("report")]
    Report,
    #[display("hexdump")]
    HexDump,
    #[display("audio")]
    Audio,
}

impl ArtifactKind {
    pub const ALL: [Self; 3] = [Self::Report, Self::HexDump, Self::Audio];
}

/// Half-open byte range of the cartridge image written to the audio dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioWindow {
    pub start: usize,
    pub end: usize,
}

impl Default for AudioWindow {
    fn default() -> Self {
        Self {
            start: address::AUDIO_WINDOW_START,
            end: address::AUDIO_WINDOW_END,
        }
    }
}

impl std::fmt::Display for AudioWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04X}..0x{:04X}", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub gb_file_path: String,
    pub output_dir: String,
    pub artifacts: Vec<ArtifactKind>,
    pub report_file_name: String,
    pub hex_dump_file_name: String,
    pub audio_file_name: String,
    pub audio_window: AudioWindow,
    pub load_into_memory: bool,
}

impl RunConfig {
    /// Config that writes every artifact to the current directory and loads the image into memory.
    pub fn new(gb_file_path: String) -> Self {
        Self {
            gb_file_path,
            output_dir: DEFAULT_OUTPUT_DIR.into(),
            artifacts: ArtifactKind::ALL.to_vec(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.into(),
            hex_dump_file_name: DEFAULT_HEX_DUMP_FILE_NAME.into(),
            audio_file_name: DEFAULT_AUDIO_FILE_NAME.into(),
            audio_window: AudioWindow::default(),
            load_into_memory: true,
        }
    }

    pub fn file_name(&self, artifact: ArtifactKind) -> &str {
        match artifact {
            ArtifactKind::Report => &self.report_file_name,
            ArtifactKind::HexDump => &self.hex_dump_file_name,
            ArtifactKind::Audio => &self.audio_file_name,
        }
    }
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let artifacts: Vec<_> = self.artifacts.iter().map(ToString::to_string).collect();

        writeln!(f, "gb_file_path: {}", self.gb_file_path)?;
        writeln!(f, "output_dir: {}", self.output_dir)?;
        writeln!(f, "artifacts: {}", artifacts.join(", "))?;
        writeln!(f, "report_file_name: {}", self.report_file_name)?;
        writeln!(f, "hex_dump_file_name: {}", self.hex_dump_file_name)?;
        writeln!(f, "audio_file_name: {}", self.audio_file_name)?;
        writeln!(f, "audio_window: {}", self.audio_window)?;
        writeln!(f, "load_into_memory: {}", self.load_into_memory)?;

        Ok(())
    }
}
