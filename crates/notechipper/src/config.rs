//! # Quantization Config
//!
//! The immutable parameter bundle shared by every strategy:
//! pitch bounds, the variable beat-resolution table, the velocity
//! bucket count, and the auxiliary token switches.

use core::ops::{Range, RangeInclusive};

use crate::errors::{NCResult, NotechipperError};

/// One row of the beat-resolution table.
///
/// Assigns a frame density (frames per beat) to a half-open range of
/// beat indices, counted from the start of the track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeatResRange {
    /// Half-open beat index range covered by this row.
    pub beats: Range<u32>,

    /// Frames per beat inside the range.
    pub frames_per_beat: u32,
}

impl BeatResRange {
    /// Create a new beat-resolution row.
    pub fn new(
        beats: Range<u32>,
        frames_per_beat: u32,
    ) -> Self {
        Self {
            beats,
            frames_per_beat,
        }
    }
}

/// Switches for auxiliary (analysis-derived) tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AuxiliaryFlags {
    /// Emit chord tokens for recognized simultaneous-note patterns.
    pub chords: bool,
}

/// Quantization parameters for one tokenizer instance.
///
/// Built once, validated eagerly, and never mutated afterwards; the
/// vocabulary derived from it is only stable for this exact config.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizationConfig {
    /// Closed pitch interval kept by the normalizer; notes outside are dropped.
    pub pitch_range: RangeInclusive<u8>,

    /// Beat-resolution table; rows must tile `0..n` contiguously, and
    /// every resolution must divide the largest one.
    pub beat_res: Vec<BeatResRange>,

    /// Number of equal-width velocity buckets over `0..=127`.
    pub num_velocities: u8,

    /// Auxiliary token switches.
    pub auxiliary: AuxiliaryFlags,
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self {
            pitch_range: 21..=108,
            beat_res: vec![BeatResRange::new(0..4, 8), BeatResRange::new(4..12, 4)],
            num_velocities: 32,
            auxiliary: AuxiliaryFlags::default(),
        }
    }
}

fn config_err(reason: impl Into<String>) -> NotechipperError {
    NotechipperError::Config {
        reason: reason.into(),
    }
}

impl QuantizationConfig {
    /// Replace the pitch range.
    pub fn with_pitch_range(
        self,
        pitch_range: RangeInclusive<u8>,
    ) -> Self {
        Self {
            pitch_range,
            ..self
        }
    }

    /// Replace the beat-resolution table.
    pub fn with_beat_res(
        self,
        beat_res: Vec<BeatResRange>,
    ) -> Self {
        Self { beat_res, ..self }
    }

    /// Replace the velocity bucket count.
    pub fn with_num_velocities(
        self,
        num_velocities: u8,
    ) -> Self {
        Self {
            num_velocities,
            ..self
        }
    }

    /// Enable or disable chord tokens.
    pub fn with_chords(
        self,
        chords: bool,
    ) -> Self {
        Self {
            auxiliary: AuxiliaryFlags { chords },
            ..self
        }
    }

    /// The largest frame density in the table.
    ///
    /// This is the sample unit of the time grid: one beat spans
    /// `max_frames_per_beat()` samples.
    pub fn max_frames_per_beat(&self) -> u32 {
        self.beat_res
            .iter()
            .map(|r| r.frames_per_beat)
            .max()
            .unwrap_or(0)
    }

    /// Validate the config.
    ///
    /// ## Returns
    /// `Ok(())`, or a `Config` error naming the first violation found.
    pub fn validate(&self) -> NCResult<()> {
        if self.beat_res.is_empty() {
            return Err(config_err("beat_res table is empty"));
        }

        let mut expected_start = 0;
        for row in &self.beat_res {
            if row.beats.start != expected_start {
                return Err(config_err(format!(
                    "beat_res ranges must tile contiguously from beat 0; \
                     found range starting at beat {} where beat {} was expected",
                    row.beats.start, expected_start
                )));
            }
            if row.beats.end <= row.beats.start {
                return Err(config_err(format!(
                    "beat_res range {}..{} is empty",
                    row.beats.start, row.beats.end
                )));
            }
            if row.frames_per_beat == 0 {
                return Err(config_err(format!(
                    "beat_res range {}..{} has zero resolution",
                    row.beats.start, row.beats.end
                )));
            }
            expected_start = row.beats.end;
        }

        let max_fpb = self.max_frames_per_beat();
        for row in &self.beat_res {
            if max_fpb % row.frames_per_beat != 0 {
                return Err(config_err(format!(
                    "resolution {} does not divide the maximum resolution {}; \
                     the ranges' frame grids must union into a single grid",
                    row.frames_per_beat, max_fpb
                )));
            }
        }

        if *self.pitch_range.start() > 127 || *self.pitch_range.end() > 127 {
            return Err(config_err("pitch_range must lie within 0..=127"));
        }
        if self.pitch_range.is_empty() {
            return Err(config_err("pitch_range is empty"));
        }

        if self.num_velocities == 0 || self.num_velocities > 128 {
            return Err(config_err("num_velocities must be in 1..=128"));
        }

        Ok(())
    }

    /// Serialize the config to a JSON string.
    ///
    /// Persist this verbatim next to any stored token sequence;
    /// the sequence is only decodable with the same config.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> NCResult<String> {
        serde_json::to_string(self).map_err(|e| NotechipperError::Parse(e.to_string()))
    }

    /// Deserialize a config from a JSON string, and validate it.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> NCResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NotechipperError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
