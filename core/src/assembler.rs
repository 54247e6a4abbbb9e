use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    ThreadPool, ThreadPoolBuildError,
};
use sf2xrni_soundfonts::sf2::{Sf2Bank, Sf2Preset};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::{ConvertOptions, ThreadCount},
    sample::{encode_sample, EncodedSample},
    split::{retain_split_points, SplitMap},
    zone::{ResolveStats, ZoneResolver},
};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to create the conversion thread pool")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// The tracker instrument built from one preset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPreset {
    pub name: String,
    pub bank: u16,
    pub preset: u16,
    /// Every populated entry indexes into `samples`.
    pub split_map: SplitMap,
    pub samples: Vec<EncodedSample>,
    pub stats: ResolveStats,
    /// Samples dropped because their header points outside the PCM pool.
    pub skipped_samples: usize,
}

/// Converts a single preset.
pub fn assemble_preset(bank: &Sf2Bank, preset: &Sf2Preset) -> ResolvedPreset {
    let mut resolver = ZoneResolver::new(bank);
    let records = retain_split_points(resolver.resolve(preset));

    let mut ranges = Vec::with_capacity(records.len());
    let mut samples = Vec::with_capacity(records.len());
    let mut skipped_samples = 0;

    for record in &records {
        match encode_sample(record, &bank.sample_data) {
            Ok(sample) => {
                ranges.push(record.key_range);
                samples.push(sample);
            }
            Err(e) => {
                warn!(preset = %preset.name, "{}, skipping sample", e);
                skipped_samples += 1;
            }
        }
    }

    if samples.is_empty() {
        warn!(preset = %preset.name, "Preset has no usable samples");
    }

    let split_map = SplitMap::from_ranges(ranges);
    debug!(
        preset = %preset.name,
        samples = samples.len(),
        "Assembled preset"
    );

    ResolvedPreset {
        name: preset.name.clone(),
        bank: preset.bank,
        preset: preset.preset,
        split_map,
        samples,
        stats: resolver.stats(),
        skipped_samples,
    }
}

/// The presets of `bank` that pass the name filter, in file order.
pub fn selected_presets<'a>(bank: &'a Sf2Bank, options: &ConvertOptions) -> Vec<&'a Sf2Preset> {
    bank.presets
        .iter()
        .filter(|preset| options.matches(&preset.name))
        .collect()
}

fn build_pool(threading: &ThreadCount) -> Result<Option<ThreadPool>, ConvertError> {
    let pool = match threading {
        ThreadCount::None => None,
        ThreadCount::Auto => Some(rayon::ThreadPoolBuilder::new().build()?),
        ThreadCount::Manual(threads) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(*threads)
                .build()?,
        ),
    };
    Ok(pool)
}

/// Converts every selected preset and returns them in file order.
pub fn assemble_presets(
    bank: &Sf2Bank,
    options: &ConvertOptions,
) -> Result<Vec<ResolvedPreset>, ConvertError> {
    let presets = selected_presets(bank, options);

    let resolved: Vec<ResolvedPreset> = match build_pool(&options.threading)? {
        None => presets
            .iter()
            .map(|preset| assemble_preset(bank, preset))
            .collect(),
        Some(pool) => pool.install(|| {
            presets
                .par_iter()
                .map(|preset| assemble_preset(bank, preset))
                .collect()
        }),
    };

    Ok(resolved)
}

/// Converts every selected preset and hands each result to `callback` as
/// soon as it is ready, together with its zero-based position among the
/// selected presets. With multithreading the callback runs concurrently and
/// in no particular order. The first error stops the conversion.
pub fn try_for_each_preset<F, E>(
    bank: &Sf2Bank,
    options: &ConvertOptions,
    callback: F,
) -> Result<(), E>
where
    F: Fn(usize, ResolvedPreset) -> Result<(), E> + Sync + Send,
    E: From<ConvertError> + Send,
{
    let presets = selected_presets(bank, options);
    let run = |(index, preset): (usize, &&Sf2Preset)| {
        callback(index, assemble_preset(bank, preset))
    };

    match build_pool(&options.threading)? {
        None => presets.iter().enumerate().try_for_each(run),
        Some(pool) => pool.install(|| presets.par_iter().enumerate().try_for_each(run)),
    }
}
