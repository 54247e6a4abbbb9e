use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use sf2xrni_core::{
    selected_presets,
    soundfonts::sf2::{load_bank, Sf2Bank, Sf2ParseError},
    try_for_each_preset, ConvertError, ThreadCount,
};
use thiserror::Error;
use tracing::info;

use crate::{config::Sf2XrniConfig, utils::default_output_dir, writer::XrniWriter};

/// Reported after each preset has been written.
#[derive(Clone, Debug)]
pub struct Sf2XrniProgress {
    pub preset: String,
    /// Sequence number used in the file name, counting from 1.
    pub sequence: usize,
    pub samples: usize,
    pub path: PathBuf,
    /// Presets written so far, including this one.
    pub completed: usize,
    pub total: usize,
}

/// Totals of a finished conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sf2XrniStats {
    pub presets: usize,
    pub samples: usize,
    pub skipped_samples: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum Sf2XrniError {
    #[error("SF2 loading failed")]
    SfLoadingFailed(#[from] Sf2ParseError),

    #[error("Conversion failed")]
    ConversionFailed(#[from] ConvertError),

    #[error("IO Error")]
    IOError(#[from] io::Error),

    #[error("Failed to write instrument manifest")]
    ManifestFailed(#[from] serde_json::Error),

    #[error("Failed to write WAV file")]
    WavFailed(#[from] hound::Error),
}

pub struct Sf2XrniBuilder<'a, ProgressCallback: Fn(Sf2XrniProgress) + Sync + Send> {
    config: Sf2XrniConfig,
    input: &'a Path,
    progress_callback: ProgressCallback,
}

pub fn sf2xrni_converter(
    input: &Path,
) -> Sf2XrniBuilder<'_, impl Fn(Sf2XrniProgress) + Sync + Send> {
    Sf2XrniBuilder {
        config: Sf2XrniConfig::default(),
        input,
        progress_callback: |_| {},
    }
}

impl<'a, ProgressCallback: Fn(Sf2XrniProgress) + Sync + Send>
    Sf2XrniBuilder<'a, ProgressCallback>
{
    // Config functions
    pub fn with_config(mut self, config: Sf2XrniConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.config.convert.filter = filter;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_threading(mut self, threading: ThreadCount) -> Self {
        self.config.convert.threading = threading;
        self
    }

    pub fn write_samples(mut self, write_samples: bool) -> Self {
        self.config.write_samples = write_samples;
        self
    }

    pub fn with_progress_callback<F: Fn(Sf2XrniProgress) + Sync + Send>(
        self,
        progress_callback: F,
    ) -> Sf2XrniBuilder<'a, F> {
        Sf2XrniBuilder {
            config: self.config,
            input: self.input,
            progress_callback,
        }
    }

    /// Loads the input bank and converts it.
    pub fn run(self) -> Result<Sf2XrniStats, Sf2XrniError> {
        let bank = load_bank(self.input)?;
        self.convert_bank(&bank)
    }

    /// Converts an already loaded bank. The input path is only used to pick
    /// the default output directory.
    pub fn convert_bank(self, bank: &Sf2Bank) -> Result<Sf2XrniStats, Sf2XrniError> {
        let output_dir = self
            .config
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(self.input));
        fs::create_dir_all(&output_dir)?;

        if let Some(filter) = &self.config.convert.filter {
            info!("Applied filter: {}", filter);
        }

        let writer = XrniWriter::new(&output_dir).with_samples(self.config.write_samples);
        let total = selected_presets(bank, &self.config.convert).len();
        let completed = AtomicUsize::new(0);
        let samples = AtomicUsize::new(0);
        let skipped_samples = AtomicUsize::new(0);

        try_for_each_preset(bank, &self.config.convert, |index, preset| {
            info!("Processing {}", preset.name);
            let sequence = index + 1;
            let path = writer.write(sequence, &preset)?;

            samples.fetch_add(preset.samples.len(), Ordering::Relaxed);
            skipped_samples.fetch_add(preset.skipped_samples, Ordering::Relaxed);

            (self.progress_callback)(Sf2XrniProgress {
                sequence,
                samples: preset.samples.len(),
                preset: preset.name,
                path,
                completed: completed.fetch_add(1, Ordering::Relaxed) + 1,
                total,
            });
            Ok::<(), Sf2XrniError>(())
        })?;

        Ok(Sf2XrniStats {
            presets: total,
            samples: samples.into_inner(),
            skipped_samples: skipped_samples.into_inner(),
            output_dir,
        })
    }
}
