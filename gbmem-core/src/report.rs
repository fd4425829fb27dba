//! Text artifacts describing a cartridge image: a full analysis report, a fixed-width hex dump, and
//! a raw dump of the window that may hold audio data.

use crate::config::{ArtifactKind, AudioWindow, RunConfig};
use crate::header::HeaderFacts;
use crate::memory::address;
use std::fmt::Formatter;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

const HEX_DUMP_BYTES_PER_LINE: usize = 16;

#[derive(Error, Debug)]
#[error("error writing {artifact} artifact to '{}': {source}", .path.display())]
pub struct ArtifactWriteError {
    pub artifact: ArtifactKind,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

struct LowerHex<'a>(&'a [u8]);

impl std::fmt::Display for LowerHex<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Header hex, decoded header fields and the whole image as hex.
pub struct FullReport<'a> {
    data: &'a [u8],
    header: &'a HeaderFacts,
}

impl<'a> FullReport<'a> {
    pub fn new(data: &'a [u8], header: &'a HeaderFacts) -> Self {
        Self { data, header }
    }
}

impl std::fmt::Display for FullReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let raw_header = self
            .data
            .get(address::HEADER_START..address::HEADER_END)
            .unwrap_or_default();

        writeln!(f, "---- Full analysis of .gb file ----")?;
        writeln!(f)?;
        writeln!(f, "Header (hex):")?;
        writeln!(f, "{}", LowerHex(raw_header))?;
        writeln!(f)?;
        writeln!(f, "Game title: {}", self.header.title)?;
        writeln!(f, "Cartridge type: {}", self.header.cartridge_type)?;
        writeln!(f, "ROM size: {}", self.header.rom_size)?;
        writeln!(f, "RAM size: {}", self.header.ram_size)?;
        writeln!(
            f,
            "Header checksum: {:#04X} ({})",
            self.header.header_checksum,
            if self.header.checksum_valid() { "valid" } else { "invalid" }
        )?;
        writeln!(f)?;
        writeln!(f, "Full ROM:")?;
        writeln!(f, "{}", LowerHex(self.data))
    }
}

/// 16 bytes per line, each line prefixed with the offset of its first byte.
pub struct HexDump<'a> {
    data: &'a [u8],
    title: &'a str,
}

impl<'a> HexDump<'a> {
    pub fn new(data: &'a [u8], title: &'a str) -> Self {
        Self { data, title }
    }
}

impl std::fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Game title: {}", self.title)?;
        writeln!(f)?;

        for (i, chunk) in self.data.chunks(HEX_DUMP_BYTES_PER_LINE).enumerate() {
            write!(f, "0x{:04X} :", i * HEX_DUMP_BYTES_PER_LINE)?;
            for byte in chunk {
                write!(f, " {byte:02X}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

pub struct AudioDump<'a> {
    data: &'a [u8],
    window: AudioWindow,
}

impl<'a> AudioDump<'a> {
    pub fn new(data: &'a [u8], window: AudioWindow) -> Self {
        Self { data, window }
    }

    /// The window clamped to the image; empty if the image ends before the window starts.
    pub fn bytes(&self) -> &'a [u8] {
        let end = self.window.end.min(self.data.len());
        let start = self.window.start.min(end);
        &self.data[start..end]
    }
}

impl std::fmt::Display for AudioDump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "---- Game audio ----")?;
        write!(f, "{}", LowerHex(self.bytes()))
    }
}

pub fn render_artifact(
    artifact: ArtifactKind,
    data: &[u8],
    header: &HeaderFacts,
    run_config: &RunConfig,
) -> String {
    match artifact {
        ArtifactKind::Report => FullReport::new(data, header).to_string(),
        ArtifactKind::HexDump => HexDump::new(data, &header.title).to_string(),
        ArtifactKind::Audio => AudioDump::new(data, run_config.audio_window).to_string(),
    }
}

/// Render and write every artifact selected in the config into the output directory, creating the
/// directory if needed. Returns the written paths in the order the artifacts were selected.
pub fn write_artifacts(
    data: &[u8],
    header: &HeaderFacts,
    run_config: &RunConfig,
) -> Result<Vec<PathBuf>, ArtifactWriteError> {
    let output_dir = Path::new(&run_config.output_dir);

    let mut paths = Vec::with_capacity(run_config.artifacts.len());
    for &artifact in &run_config.artifacts {
        let path = output_dir.join(run_config.file_name(artifact));
        let contents = render_artifact(artifact, data, header, run_config);

        fs::create_dir_all(output_dir)
            .and_then(|()| fs::write(&path, contents))
            .map_err(|source| ArtifactWriteError {
                artifact,
                path: path.clone(),
                source,
            })?;

        log::info!("Wrote {artifact} to '{}'", path.display());

        paths.push(path);
    }

    Ok(paths)
}
