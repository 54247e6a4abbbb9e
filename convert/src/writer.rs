use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use serde::Serialize;
use sf2xrni_core::{EncodedSample, LoopMode, ResolvedPreset};

use crate::{builder::Sf2XrniError, utils::normalize_file_name};

/// Extension of the instrument manifest files.
pub const MANIFEST_EXTENSION: &str = "xrni.json";

#[derive(Serialize)]
struct NoteMapping {
    sample_index: usize,
    note_start: u8,
    note_end: u8,
    base_note: i8,
    /// Set together with the velocity bounds for bounded velocity layers.
    map_velocity_to_volume: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    velocity_start: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    velocity_end: Option<u8>,
}

impl NoteMapping {
    fn new(sample_index: usize, keys: RangeInclusive<u8>, sample: &EncodedSample) -> Self {
        let velocity = sample.velocity_range;
        let bounded = !velocity.is_unbounded();

        Self {
            sample_index,
            note_start: *keys.start(),
            note_end: *keys.end(),
            base_note: sample.base_note,
            map_velocity_to_volume: bounded,
            velocity_start: bounded.then_some(velocity.low),
            velocity_end: bounded.then_some(velocity.high),
        }
    }
}

#[derive(Serialize)]
struct SampleEntry<'a> {
    name: &'a str,
    original_name: &'a str,
    file_name: Option<String>,
    base_note: i8,
    fine_tune: i8,
    loop_mode: LoopMode,
    loop_start: u32,
    loop_end: u32,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    frames: usize,
}

#[derive(Serialize)]
struct InstrumentManifest<'a> {
    name: &'a str,
    bank: u16,
    program: u16,
    /// Sample index for each of the 128 keys.
    split_map: Vec<Option<usize>>,
    note_mappings: Vec<NoteMapping>,
    samples: Vec<SampleEntry<'a>>,
}

fn sample_file_name(sample: &EncodedSample) -> String {
    format!("{}.wav", normalize_file_name(&sample.name))
}

/// Writes converted presets into a directory.
///
/// Preset number `n` (counting from 1) called `name` becomes
/// `{n}_{name}.xrni.json`, its samples are written as WAV files into the
/// `{n}_{name}/` directory next to it.
#[derive(Clone, Debug)]
pub struct XrniWriter {
    dir: PathBuf,
    write_samples: bool,
}

impl XrniWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_samples: true,
        }
    }

    pub fn with_samples(mut self, write_samples: bool) -> Self {
        self.write_samples = write_samples;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File stem shared by the manifest and the sample directory.
    pub fn file_stem(sequence: usize, name: &str) -> String {
        normalize_file_name(&format!("{sequence}_{name}"))
    }

    /// Writes one preset and returns the path of its manifest.
    pub fn write(&self, sequence: usize, preset: &ResolvedPreset) -> Result<PathBuf, Sf2XrniError> {
        let stem = Self::file_stem(sequence, &preset.name);

        let sample_files = if self.write_samples && !preset.samples.is_empty() {
            let sample_dir = self.dir.join(&stem);
            fs::create_dir_all(&sample_dir)?;

            let mut names = Vec::with_capacity(preset.samples.len());
            for sample in &preset.samples {
                let file_name = sample_file_name(sample);
                let file = BufWriter::new(File::create(sample_dir.join(&file_name))?);
                sample.write_wav(file)?;
                names.push(Some(format!("{stem}/{file_name}")));
            }
            names
        } else {
            vec![None; preset.samples.len()]
        };

        let manifest = InstrumentManifest {
            name: &preset.name,
            bank: preset.bank,
            program: preset.preset,
            split_map: preset.split_map.iter().collect(),
            note_mappings: preset
                .split_map
                .note_ranges()
                .into_iter()
                .map(|(sample_index, keys)| {
                    NoteMapping::new(sample_index, keys, &preset.samples[sample_index])
                })
                .collect(),
            samples: preset
                .samples
                .iter()
                .zip(sample_files)
                .map(|(sample, file_name)| SampleEntry {
                    name: &sample.name,
                    original_name: &sample.original_name,
                    file_name,
                    base_note: sample.base_note,
                    fine_tune: sample.fine_tune,
                    loop_mode: sample.loop_mode,
                    loop_start: sample.loop_start,
                    loop_end: sample.loop_end,
                    sample_rate: sample.sample_rate,
                    channels: sample.channels(),
                    bits_per_sample: sample.bits_per_sample(),
                    frames: sample.frames(),
                })
                .collect(),
        };

        let path = self.dir.join(format!("{stem}.{MANIFEST_EXTENSION}"));
        let mut file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut file, &manifest)?;
        file.flush()?;

        Ok(path)
    }
}
