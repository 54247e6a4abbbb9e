use std::path::PathBuf;

use sf2xrni_core::ConvertOptions;

/// Options for converting one SF2 bank to instrument files.
#[derive(Clone, Debug)]
pub struct Sf2XrniConfig {
    /// Preset selection and threading. See `ConvertOptions`.
    pub convert: ConvertOptions,

    /// Directory receiving the instrument files.
    /// `None` uses the input path without its extension.
    ///
    /// Default: `None`
    pub output_dir: Option<PathBuf>,

    /// If set to false, only the instrument manifests are written and the
    /// WAV files of the samples are skipped.
    ///
    /// Default: `true`
    pub write_samples: bool,
}

impl Default for Sf2XrniConfig {
    fn default() -> Self {
        Self {
            convert: ConvertOptions::default(),
            output_dir: None,
            write_samples: true,
        }
    }
}
