use soundfont::{data::hydra::generator::GeneratorType, Zone};

/// Packs an inclusive `low..=high` pair the way SF2 stores range generators:
/// low byte first, high byte second.
pub fn pack_range(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Which generator links a zone to the next level of the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneLink {
    Instrument,
    Sample,
}

/// The generator values of a zone that matter for key splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneGenerator {
    /// Packed key range (`low | high << 8`).
    KeyRange(u16),
    /// Packed velocity range (`low | high << 8`).
    VelRange(u16),
    SampleModes(i16),
    OverridingRootKey(i16),
    Instrument(u16),
    SampleId(u16),
}

/// The generators of a preset or instrument zone that matter for key splitting.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Sf2Zone {
    /// Instrument index for preset zones, sample header index for instrument zones.
    pub index: Option<u16>,
    /// Packed key range (`low | high << 8`).
    pub keyrange: Option<u16>,
    /// Packed velocity range (`low | high << 8`).
    pub velrange: Option<u16>,
    pub root_override: Option<i16>,
    pub sample_mode: Option<i16>,
}

impl Sf2Zone {
    /// Parses a zone list. See [`Sf2Zone::from_generators`].
    pub fn parse(zones: &[Zone], link: ZoneLink) -> Vec<Self> {
        let generators = zones.iter().map(|zone| {
            zone.gen_list
                .iter()
                .filter_map(|gen| match gen.ty {
                    GeneratorType::KeyRange => gen
                        .amount
                        .as_range()
                        .map(|range| ZoneGenerator::KeyRange(pack_range(range.low, range.high))),
                    GeneratorType::VelRange => gen
                        .amount
                        .as_range()
                        .map(|range| ZoneGenerator::VelRange(pack_range(range.low, range.high))),
                    GeneratorType::SampleModes => {
                        gen.amount.as_i16().copied().map(ZoneGenerator::SampleModes)
                    }
                    GeneratorType::OverridingRootKey => gen
                        .amount
                        .as_i16()
                        .copied()
                        .map(ZoneGenerator::OverridingRootKey),
                    GeneratorType::Instrument => {
                        gen.amount.as_u16().copied().map(ZoneGenerator::Instrument)
                    }
                    GeneratorType::SampleID => {
                        gen.amount.as_u16().copied().map(ZoneGenerator::SampleId)
                    }
                    _ => None,
                })
                .collect::<Vec<_>>()
        });

        Self::from_generators(generators, link)
    }

    /// Builds zones from their generator lists. A leading zone without a link
    /// is a global zone: it is not returned, its generators become the
    /// defaults of the following zones. Only the generator matching `link`
    /// sets [`Sf2Zone::index`].
    pub fn from_generators<G>(zones: impl IntoIterator<Item = G>, link: ZoneLink) -> Vec<Self>
    where
        G: IntoIterator<Item = ZoneGenerator>,
    {
        let mut regions: Vec<Sf2Zone> = Vec::new();
        let mut global_region = Sf2Zone::default();

        for (i, generators) in zones.into_iter().enumerate() {
            let mut region = global_region.clone();

            for gen in generators {
                match gen {
                    ZoneGenerator::KeyRange(range) => region.keyrange = Some(range),
                    ZoneGenerator::VelRange(range) => region.velrange = Some(range),
                    ZoneGenerator::SampleModes(mode) => region.sample_mode = Some(mode),
                    ZoneGenerator::OverridingRootKey(key) => region.root_override = Some(key),
                    ZoneGenerator::Instrument(index) if link == ZoneLink::Instrument => {
                        region.index = Some(index)
                    }
                    ZoneGenerator::SampleId(index) if link == ZoneLink::Sample => {
                        region.index = Some(index)
                    }
                    _ => {}
                }
            }

            if i == 0 && region.index.is_none() {
                global_region = region;
            } else {
                regions.push(region);
            }
        }

        regions
    }

    /// Sample mode generator, 0 when absent.
    pub fn sample_mode(&self) -> i16 {
        self.sample_mode.unwrap_or(0)
    }
}
