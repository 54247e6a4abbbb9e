use std::collections::HashSet;

use sf2xrni_soundfonts::sf2::{Sf2Bank, Sf2Preset, Sf2SampleHeader, Sf2Zone};
use tracing::debug;

use crate::range::{Range, MAX_VALUE};

/// One instrument zone flattened out of the preset → instrument → sample hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneRecord<'a> {
    pub key_range: Range,
    pub velocity_range: Range,
    /// Index of `sample` in the bank's sample header table.
    pub sample_index: u16,
    pub sample: &'a Sf2SampleHeader,
    pub overriding_root_key: Option<u8>,
    pub loop_enabled: bool,
    /// Position of the record in encounter order, before sorting.
    pub ordinal: usize,
}

impl ZoneRecord<'_> {
    fn identity(&self) -> (Range, Range, u16) {
        (self.key_range, self.velocity_range, self.sample_index)
    }
}

/// Counters for zones that were skipped while resolving a preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub missing_instrument: usize,
    pub missing_sample: usize,
    pub velocity_layers_dropped: usize,
    pub duplicates_dropped: usize,
}

impl ResolveStats {
    pub fn skipped(&self) -> usize {
        self.missing_instrument
            + self.missing_sample
            + self.velocity_layers_dropped
            + self.duplicates_dropped
    }
}

/// Only the loudest velocity layer of a key is kept. A zone whose velocity
/// range ends below 127 is a softer layer.
fn is_soft_layer(velocity_range: Range) -> bool {
    !velocity_range.is_unbounded() && velocity_range.high < MAX_VALUE
}

fn zone_velocity_range(zone: &Sf2Zone) -> Range {
    zone.velrange.map(Range::from_packed).unwrap_or_default()
}

fn zone_key_range(zone: &Sf2Zone) -> Range {
    zone.keyrange.map(Range::from_packed).unwrap_or_default()
}

fn zone_root_key(zone: &Sf2Zone) -> Option<u8> {
    zone.root_override
        .filter(|key| (0..=MAX_VALUE as i16).contains(key))
        .map(|key| key as u8)
}

/// Walks the zones of a preset down to their sample headers.
pub struct ZoneResolver<'a> {
    bank: &'a Sf2Bank,
    stats: ResolveStats,
}

impl<'a> ZoneResolver<'a> {
    pub fn new(bank: &'a Sf2Bank) -> Self {
        Self {
            bank,
            stats: ResolveStats::default(),
        }
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Returns the deduplicated zone records of `preset`, sorted by key range
    /// low bound, then high bound. Records that compare equal keep their
    /// encounter order.
    ///
    /// [`ZoneResolver::stats`] afterwards only counts the zones of `preset`.
    pub fn resolve(&mut self, preset: &Sf2Preset) -> Vec<ZoneRecord<'a>> {
        let bank = self.bank;
        self.stats = ResolveStats::default();
        let mut records: Vec<ZoneRecord<'a>> = Vec::new();
        let mut seen = HashSet::new();

        for pzone in &preset.zones {
            let Some(instrument) = pzone.index.and_then(|i| bank.instrument(i)) else {
                self.stats.missing_instrument += 1;
                continue;
            };

            if is_soft_layer(zone_velocity_range(pzone)) {
                self.stats.velocity_layers_dropped += 1;
                continue;
            }

            for izone in &instrument.zones {
                let Some((sample_index, sample)) = izone
                    .index
                    .and_then(|i| bank.sample_header(i).map(|sample| (i, sample)))
                else {
                    self.stats.missing_sample += 1;
                    continue;
                };

                let velocity_range = zone_velocity_range(izone);
                if is_soft_layer(velocity_range) {
                    self.stats.velocity_layers_dropped += 1;
                    continue;
                }

                let record = ZoneRecord {
                    key_range: zone_key_range(izone),
                    velocity_range,
                    sample_index,
                    sample,
                    overriding_root_key: zone_root_key(izone),
                    loop_enabled: izone.sample_mode() != 0,
                    ordinal: records.len(),
                };

                if !seen.insert(record.identity()) {
                    self.stats.duplicates_dropped += 1;
                    continue;
                }

                records.push(record);
            }
        }

        records.sort_by_key(|r| (r.key_range.low, r.key_range.high));

        if self.stats.skipped() > 0 {
            debug!(
                preset = %preset.name,
                missing_instrument = self.stats.missing_instrument,
                missing_sample = self.stats.missing_sample,
                velocity_layers = self.stats.velocity_layers_dropped,
                duplicates = self.stats.duplicates_dropped,
                "Skipped zones"
            );
        }

        records
    }
}

/// Resolves the zones of a single preset. See [`ZoneResolver::resolve`].
pub fn resolve_zones<'a>(bank: &'a Sf2Bank, preset: &Sf2Preset) -> Vec<ZoneRecord<'a>> {
    ZoneResolver::new(bank).resolve(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf2xrni_soundfonts::sf2::{Sf2Instrument, Sf2SampleHeader};

    fn sample(name: &str) -> Sf2SampleHeader {
        Sf2SampleHeader {
            name: name.into(),
            start: 0,
            end: 10,
            sample_rate: 44100,
            origpitch: 60,
            ..Default::default()
        }
    }

    fn izone(sample: u16, keyrange: Option<Range>, velrange: Option<Range>) -> Sf2Zone {
        Sf2Zone {
            index: Some(sample),
            keyrange: keyrange.map(Range::to_packed),
            velrange: velrange.map(Range::to_packed),
            ..Default::default()
        }
    }

    fn bank(zones: Vec<Sf2Zone>) -> Sf2Bank {
        Sf2Bank {
            presets: vec![Sf2Preset {
                name: "Test".into(),
                zones: vec![Sf2Zone {
                    index: Some(0),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            instruments: vec![Sf2Instrument {
                name: "Inst".into(),
                zones,
            }],
            sample_headers: vec![sample("A"), sample("B"), sample("C")],
            ..Default::default()
        }
    }

    #[test]
    fn test_velocity_layer_filter() {
        let bank = bank(vec![
            izone(0, Some(Range::new(0, 127)), Some(Range::new(0, 64))),
            izone(1, Some(Range::new(0, 127)), Some(Range::new(0, 127))),
            izone(2, Some(Range::new(0, 127)), None),
        ]);
        let mut resolver = ZoneResolver::new(&bank);
        let records = resolver.resolve(&bank.presets[0]);

        let samples: Vec<u16> = records.iter().map(|r| r.sample_index).collect();
        assert_eq!(samples, vec![1, 2]);
        assert_eq!(resolver.stats().velocity_layers_dropped, 1);
    }

    #[test]
    fn test_preset_velocity_layer_filter() {
        let mut bank = bank(vec![izone(0, None, None)]);
        bank.presets[0].zones[0].velrange = Some(Range::new(0, 64).to_packed());
        assert!(resolve_zones(&bank, &bank.presets[0]).is_empty());
    }

    #[test]
    fn test_duplicates_dropped() {
        let bank = bank(vec![
            izone(0, Some(Range::new(60, 72)), None),
            izone(0, Some(Range::new(60, 72)), None),
            izone(1, Some(Range::new(60, 72)), None),
        ]);
        let mut resolver = ZoneResolver::new(&bank);
        let records = resolver.resolve(&bank.presets[0]);
        assert_eq!(records.len(), 2);
        assert_eq!(resolver.stats().duplicates_dropped, 1);
    }

    #[test]
    fn test_missing_links_skipped() {
        let mut bank = bank(vec![
            Sf2Zone::default(),
            izone(9, None, None),
            izone(0, None, None),
        ]);
        bank.presets[0].zones.push(Sf2Zone::default());
        bank.presets[0].zones.push(Sf2Zone {
            index: Some(5),
            ..Default::default()
        });

        let mut resolver = ZoneResolver::new(&bank);
        let records = resolver.resolve(&bank.presets[0]);
        assert_eq!(records.len(), 1);
        assert_eq!(resolver.stats().missing_sample, 2);
        assert_eq!(resolver.stats().missing_instrument, 2);
    }

    #[test]
    fn test_ordering() {
        let bank = bank(vec![
            izone(0, Some(Range::new(64, 127)), None),
            izone(1, Some(Range::new(0, 63)), None),
            izone(2, Some(Range::new(0, 48)), None),
        ]);
        let records = resolve_zones(&bank, &bank.presets[0]);

        let order: Vec<(u16, usize)> = records.iter().map(|r| (r.sample_index, r.ordinal)).collect();
        assert_eq!(order, vec![(2, 2), (1, 1), (0, 0)]);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let bank = bank(vec![
            izone(2, Some(Range::new(0, 63)), Some(Range::new(64, 127))),
            izone(0, Some(Range::new(0, 63)), Some(Range::new(0, 127))),
        ]);
        let records = resolve_zones(&bank, &bank.presets[0]);
        let samples: Vec<u16> = records.iter().map(|r| r.sample_index).collect();
        assert_eq!(samples, vec![2, 0]);
    }

    #[test]
    fn test_zone_attributes() {
        let bank = bank(vec![Sf2Zone {
            index: Some(0),
            root_override: Some(48),
            sample_mode: Some(1),
            ..Default::default()
        }]);
        let records = resolve_zones(&bank, &bank.presets[0]);
        assert_eq!(records[0].overriding_root_key, Some(48));
        assert!(records[0].loop_enabled);
        assert_eq!(records[0].key_range, Range::UNBOUNDED);
        assert_eq!(records[0].sample.name, "A");

        let bank = bank_with_root(-1);
        let records = resolve_zones(&bank, &bank.presets[0]);
        assert_eq!(records[0].overriding_root_key, None);
        assert!(!records[0].loop_enabled);
    }

    #[test]
    fn test_stats_are_per_preset() {
        let mut bank = bank(vec![izone(0, None, None)]);
        bank.presets.push(bank.presets[0].clone());
        bank.presets[0].zones.push(Sf2Zone::default());

        let mut resolver = ZoneResolver::new(&bank);
        resolver.resolve(&bank.presets[0]);
        assert_eq!(resolver.stats().missing_instrument, 1);

        let records = resolver.resolve(&bank.presets[1]);
        assert_eq!(records.len(), 1);
        assert_eq!(resolver.stats(), ResolveStats::default());
    }

    fn bank_with_root(root: i16) -> Sf2Bank {
        bank(vec![Sf2Zone {
            index: Some(0),
            root_override: Some(root),
            ..Default::default()
        }])
    }
}
