use std::io::{Cursor, Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use crate::{range::Range, zone::ZoneRecord};

/// Channel count of every encoded sample. Stereo pairs are not merged.
pub const CHANNELS: u16 = 1;

/// Bit depth of every encoded sample, identical to the SF2 `smpl` chunk.
pub const BITS_PER_SAMPLE: u16 = 16;

const BYTES_PER_FRAME: usize = 2;

/// Root key used when a sample header carries no usable original pitch
/// (255 is "unpitched", 128-254 are invalid).
const DEFAULT_ROOT_KEY: i8 = 60;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LoopMode {
    #[default]
    Off,
    Forward,
}

/// A sample header points outside the PCM pool, or its end precedes its start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Sample \"{name}\" spans bytes {start}..{end}, outside of the {pool_len} byte sample pool")]
pub struct SampleRangeError {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub pool_len: usize,
}

/// A mono 16-bit sample cut out of the bank's PCM pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSample {
    pub name: String,
    /// The sample name as stored in the bank.
    pub original_name: String,
    pub base_note: i8,
    /// Pitch correction in cents.
    pub fine_tune: i8,
    /// Loop start in frames, relative to the first frame of `pcm`.
    pub loop_start: u32,
    /// Loop end in frames, relative to the first frame of `pcm`.
    pub loop_end: u32,
    pub loop_mode: LoopMode,
    /// Velocity range of the zone the sample was taken from. Unbounded
    /// unless the zone is the loudest of several velocity layers.
    pub velocity_range: Range,
    pub sample_rate: u32,
    /// Little endian 16-bit PCM.
    pub pcm: Vec<u8>,
}

impl EncodedSample {
    pub fn channels(&self) -> u16 {
        CHANNELS
    }

    pub fn bits_per_sample(&self) -> u16 {
        BITS_PER_SAMPLE
    }

    pub fn frames(&self) -> usize {
        self.pcm.len() / BYTES_PER_FRAME
    }

    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: CHANNELS,
            sample_rate: self.sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        }
    }

    /// Writes the sample as a WAV file.
    pub fn write_wav<W: Write + Seek>(&self, writer: W) -> Result<(), hound::Error> {
        let mut wav = WavWriter::new(writer, self.wav_spec())?;
        for frame in self.pcm.chunks_exact(BYTES_PER_FRAME) {
            wav.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        wav.finalize()
    }

    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, hound::Error> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.pcm.len() + 44));
        self.write_wav(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// Name of the n-th sample of an instrument.
pub fn sample_name(ordinal: usize, original_name: &str) -> String {
    format!("Sample{ordinal:02}({original_name})")
}

fn base_note(record: &ZoneRecord<'_>) -> i8 {
    let key = record
        .overriding_root_key
        .filter(|&key| key != 0)
        .unwrap_or(record.sample.origpitch);

    i8::try_from(key).unwrap_or(DEFAULT_ROOT_KEY)
}

/// Copies the frames of `record`'s sample header out of `pool`.
///
/// Header offsets count 16-bit frames, so the byte range is
/// `2 * start..2 * end`. Loop points are rebased onto the first copied frame
/// and stay in frames.
pub fn encode_sample(
    record: &ZoneRecord<'_>,
    pool: &[u8],
) -> Result<EncodedSample, SampleRangeError> {
    let header = record.sample;
    let start = header.start as usize * BYTES_PER_FRAME;
    let end = header.end as usize * BYTES_PER_FRAME;

    if end < start || end > pool.len() {
        return Err(SampleRangeError {
            name: header.name.clone(),
            start,
            end,
            pool_len: pool.len(),
        });
    }

    Ok(EncodedSample {
        name: sample_name(record.ordinal, &header.name),
        original_name: header.name.clone(),
        base_note: base_note(record),
        fine_tune: header.pitchadj,
        loop_start: header.loop_start.saturating_sub(header.start),
        loop_end: header.loop_end.saturating_sub(header.start),
        loop_mode: if record.loop_enabled {
            LoopMode::Forward
        } else {
            LoopMode::Off
        },
        velocity_range: record.velocity_range,
        sample_rate: header.sample_rate,
        pcm: pool[start..end].to_vec(),
    })
}
