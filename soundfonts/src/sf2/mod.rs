use std::{fs::File, path::PathBuf, sync::Arc};

use thiserror::Error;

mod instrument;
mod preset;
mod sample;
mod zone;

pub use instrument::Sf2Instrument;
pub use preset::Sf2Preset;
pub use sample::Sf2SampleHeader;
pub use zone::{pack_range, Sf2Zone, ZoneGenerator, ZoneLink};

/// Errors that can be generated when loading an SF2 file.
#[derive(Error, Debug, Clone)]
pub enum Sf2ParseError {
    #[error("Failed to read file: {0}")]
    FailedToReadFile(PathBuf),

    #[error("Failed to parse file: {0}")]
    FailedToParseFile(String),

    #[error("The file has no sample data")]
    MissingSampleData,
}

/// A loaded SF2 bank: the preset/instrument/sample hierarchy and the
/// shared 16-bit PCM pool every sample header points into.
#[derive(Clone, Debug)]
pub struct Sf2Bank {
    pub presets: Vec<Sf2Preset>,
    pub instruments: Vec<Sf2Instrument>,
    pub sample_headers: Vec<Sf2SampleHeader>,
    pub sample_data: Arc<[u8]>,
}

impl Default for Sf2Bank {
    fn default() -> Self {
        Self {
            presets: Vec::new(),
            instruments: Vec::new(),
            sample_headers: Vec::new(),
            sample_data: Arc::from(Vec::new()),
        }
    }
}

impl Sf2Bank {
    pub fn instrument(&self, index: u16) -> Option<&Sf2Instrument> {
        self.instruments.get(index as usize)
    }

    pub fn sample_header(&self, index: u16) -> Option<&Sf2SampleHeader> {
        self.sample_headers.get(index as usize)
    }
}

/// Parses an SF2 file. Presets keep their file order.
pub fn load_bank(sf2_path: impl Into<PathBuf>) -> Result<Sf2Bank, Sf2ParseError> {
    let sf2_path: PathBuf = sf2_path.into();
    let sf2_path: PathBuf = sf2_path
        .canonicalize()
        .map_err(|_| Sf2ParseError::FailedToReadFile(sf2_path.clone()))?;
    let mut file = File::open(sf2_path.clone())
        .map_err(|_| Sf2ParseError::FailedToReadFile(sf2_path.clone()))?;
    let file = &mut file;
    let sf2 = soundfont::SoundFont2::load(file)
        .map_err(|e| Sf2ParseError::FailedToParseFile(format!("{:#?}", e)))?;

    let presets = Sf2Preset::parse_presets(&sf2.presets);
    let instruments = Sf2Instrument::parse_instruments(&sf2.instruments);
    let sample_headers = Sf2SampleHeader::parse_sample_headers(&sf2.sample_headers);
    let sample_data = sample::read_sample_pool(file, sf2.sample_data)?;

    Ok(Sf2Bank {
        presets,
        instruments,
        sample_headers,
        sample_data,
    })
}
