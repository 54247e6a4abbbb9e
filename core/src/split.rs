use std::ops::RangeInclusive;

use crate::{range::Range, zone::ZoneRecord};

/// Number of MIDI keys covered by a split map.
pub const KEY_COUNT: usize = 128;

/// Keeps only the first record of each run of records sharing the same key
/// range low bound. The others are alternate layers of the same split point.
///
/// Expects records ordered by [`crate::zone::ZoneResolver`].
pub fn retain_split_points(records: Vec<ZoneRecord<'_>>) -> Vec<ZoneRecord<'_>> {
    let mut retained: Vec<ZoneRecord> = Vec::with_capacity(records.len());

    for record in records {
        if retained.last().map(|r| r.key_range.low) == Some(record.key_range.low) {
            continue;
        }
        retained.push(record);
    }

    retained
}

/// Key → sample index table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitMap {
    entries: [Option<usize>; KEY_COUNT],
}

impl Default for SplitMap {
    fn default() -> Self {
        Self {
            entries: [None; KEY_COUNT],
        }
    }
}

impl SplitMap {
    /// Builds the table from key ranges given in ascending low bound order.
    /// The n-th range maps to sample index n.
    ///
    /// Later ranges overwrite earlier ones where they overlap. Keys below the
    /// first range take the first sample; keys in a gap or above the last
    /// range take the sample of the closest range below them. The table is
    /// fully populated unless `ranges` is empty.
    pub fn from_ranges(ranges: impl IntoIterator<Item = Range>) -> Self {
        let mut entries = [None; KEY_COUNT];

        for (index, range) in ranges.into_iter().enumerate() {
            for key in range.as_inclusive() {
                entries[key as usize] = Some(index);
            }
        }

        let mut last = entries.iter().flatten().next().copied();
        for entry in entries.iter_mut() {
            match entry {
                Some(index) => last = Some(*index),
                None => *entry = last,
            }
        }

        Self { entries }
    }

    pub fn from_records(records: &[ZoneRecord<'_>]) -> Self {
        Self::from_ranges(records.iter().map(|r| r.key_range))
    }

    pub fn get(&self, key: u8) -> Option<usize> {
        self.entries.get(key as usize).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }

    pub fn as_array(&self) -> &[Option<usize>; KEY_COUNT] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.entries.iter().copied()
    }

    /// Collapses the table into contiguous `(sample index, keys)` spans.
    pub fn note_ranges(&self) -> Vec<(usize, RangeInclusive<u8>)> {
        let mut spans: Vec<(usize, RangeInclusive<u8>)> = Vec::new();

        for (key, entry) in self.entries.iter().enumerate() {
            let Some(index) = *entry else {
                continue;
            };
            let key = key as u8;
            match spans.last_mut() {
                Some((last, keys)) if *last == index && *keys.end() + 1 == key => {
                    *keys = *keys.start()..=key;
                }
                _ => spans.push((index, key..=key)),
            }
        }

        spans
    }
}
