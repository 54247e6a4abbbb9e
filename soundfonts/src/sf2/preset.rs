use super::{Sf2Zone, ZoneLink};
use soundfont::Preset;

#[derive(Clone, Debug, Default)]
pub struct Sf2Preset {
    pub name: String,
    pub bank: u16,
    pub preset: u16,
    pub zones: Vec<Sf2Zone>,
}

impl Sf2Preset {
    /// Parses the preset headers, keeping the order they have in the file.
    pub fn parse_presets(presets: &[Preset]) -> Vec<Sf2Preset> {
        presets
            .iter()
            .map(|preset| Sf2Preset {
                name: preset.header.name.clone(),
                bank: preset.header.bank,
                preset: preset.header.preset,
                zones: Sf2Zone::parse(&preset.zones, ZoneLink::Instrument),
            })
            .collect()
    }
}
