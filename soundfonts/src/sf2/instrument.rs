use super::{Sf2Zone, ZoneLink};
use soundfont::Instrument;

#[derive(Clone, Debug, Default)]
pub struct Sf2Instrument {
    pub name: String,
    pub zones: Vec<Sf2Zone>,
}

impl Sf2Instrument {
    pub fn parse_instruments(instruments: &[Instrument]) -> Vec<Self> {
        instruments
            .iter()
            .map(|instrument| Sf2Instrument {
                name: instrument.header.name.clone(),
                zones: Sf2Zone::parse(&instrument.zones, ZoneLink::Sample),
            })
            .collect()
    }
}
