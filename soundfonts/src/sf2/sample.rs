use super::Sf2ParseError;
use soundfont::data::{hydra::sample::SampleHeader, sample_data::SampleData};
use std::{fs::File, sync::Arc};

/// A sample header. Offsets are in sample frames into the shared PCM pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sf2SampleHeader {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub loop_start: u32,
    pub loop_end: u32,
    pub sample_rate: u32,
    pub origpitch: u8,
    pub pitchadj: i8,
}

impl Sf2SampleHeader {
    pub fn parse_sample_headers(headers: &[SampleHeader]) -> Vec<Self> {
        headers
            .iter()
            .map(|h| Sf2SampleHeader {
                name: h.name.clone(),
                start: h.start,
                end: h.end,
                loop_start: h.loop_start,
                loop_end: h.loop_end,
                sample_rate: h.sample_rate,
                origpitch: h.origpitch,
                pitchadj: h.pitchadj,
            })
            .collect()
    }

    /// Length of the sample in frames.
    pub fn frames(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Reads the 16-bit `smpl` chunk. The 24-bit `sm24` extension is ignored,
/// the low byte it carries is not needed for 16-bit output.
pub fn read_sample_pool(file: &mut File, data: SampleData) -> Result<Arc<[u8]>, Sf2ParseError> {
    let smpl = data.smpl.ok_or(Sf2ParseError::MissingSampleData)?;
    let bytes = smpl
        .read_contents(file)
        .map_err(|_| Sf2ParseError::FailedToParseFile("Failed to read sample data".into()))?;
    Ok(bytes.into())
}
