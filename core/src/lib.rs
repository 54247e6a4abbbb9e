//! Converts SF2 presets into flat, per-key sample split instruments.
//!
//! A preset's zones are resolved down to their sample headers
//! ([`zone::ZoneResolver`]), reduced to one sample per split point and laid
//! out on a 128 key table ([`split::SplitMap`]), and each kept sample is cut
//! out of the bank's PCM pool as a mono 16-bit sample
//! ([`sample::encode_sample`]).

pub mod assembler;
pub use assembler::*;

pub mod config;
pub use config::*;

pub mod range;
pub use range::Range;

pub mod sample;
pub use sample::{EncodedSample, LoopMode, SampleRangeError};

pub mod split;
pub use split::SplitMap;

pub mod zone;
pub use zone::{ResolveStats, ZoneRecord, ZoneResolver};

pub use sf2xrni_soundfonts as soundfonts;
