//! # Note Normalizer
//!
//! Pure mapping from raw note events to the canonical quantized form.
//! Out-of-range and degenerate notes are filtered and counted, never
//! raised; one bad note must not abort a whole track.

use crate::{
    config::QuantizationConfig,
    grid::TimeGrid,
    note::{sort_notes, NormalizedNote, RawNote},
};

/// The result of normalizing one track's notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizeOutcome {
    /// The surviving notes, sorted by `(start, pitch)`.
    pub notes: Vec<NormalizedNote>,

    /// How many input notes were filtered out.
    pub dropped: usize,
}

/// Quantize a velocity into one of `num_velocities` equal-width buckets.
pub fn velocity_bucket(
    velocity: u8,
    num_velocities: u8,
) -> u8 {
    let bucket = (u32::from(velocity) * u32::from(num_velocities)) / 128;
    bucket.min(u32::from(num_velocities) - 1) as u8
}

/// Map a velocity bucket back to a representative MIDI velocity.
///
/// Uses the bucket midpoint; exact input velocity is quantized away.
pub fn bucket_velocity(
    bucket: u8,
    num_velocities: u8,
) -> u8 {
    let mid = (2 * u32::from(bucket) + 1) * 128 / (2 * u32::from(num_velocities));
    mid.min(127) as u8
}

/// Normalize a track's raw notes.
///
/// Notes with pitch outside `config.pitch_range`, or with
/// `end_tick <= start_tick`, are dropped and counted. Survivors are
/// velocity-bucketed, snapped to the grid, and sorted canonically.
///
/// ## Arguments
/// * `raw` - the track's note events.
/// * `config` - quantization parameters.
/// * `grid` - the derived time grid.
/// * `ticks_per_beat` - the source's tick resolution.
pub fn normalize_notes(
    raw: &[RawNote],
    config: &QuantizationConfig,
    grid: &TimeGrid,
    ticks_per_beat: u32,
) -> NormalizeOutcome {
    let mut notes = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for note in raw {
        if !config.pitch_range.contains(&note.pitch) || note.end_tick <= note.start_tick {
            dropped += 1;
            continue;
        }

        let start = grid.snap_tick(note.start_tick, ticks_per_beat);
        let end = grid.snap_tick(note.end_tick, ticks_per_beat);

        notes.push(NormalizedNote {
            pitch: note.pitch,
            velocity: velocity_bucket(note.velocity, config.num_velocities),
            start,
            duration: grid.snap_duration(end.saturating_sub(start)),
            program: note.program,
            is_drum: note.is_drum,
        });
    }

    sort_notes(&mut notes);

    if dropped > 0 {
        log::debug!("normalize: dropped {dropped} of {} notes", raw.len());
    }

    NormalizeOutcome { notes, dropped }
}

/// Render normalized notes back to raw events at a chosen resolution.
///
/// The inverse boundary map for the MIDI-writing collaborator.
pub fn denormalize_notes(
    notes: &[NormalizedNote],
    config: &QuantizationConfig,
    grid: &TimeGrid,
    ticks_per_beat: u32,
) -> Vec<RawNote> {
    notes
        .iter()
        .map(|n| RawNote {
            pitch: n.pitch,
            velocity: bucket_velocity(n.velocity, config.num_velocities),
            start_tick: grid.sample_to_tick(n.start, ticks_per_beat),
            end_tick: grid.sample_to_tick(n.end(), ticks_per_beat),
            program: n.program,
            is_drum: n.is_drum,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        pitch: u8,
        velocity: u8,
        start_tick: u32,
        end_tick: u32,
    ) -> RawNote {
        RawNote {
            pitch,
            velocity,
            start_tick,
            end_tick,
            program: 0,
            is_drum: false,
        }
    }

    #[test]
    fn test_velocity_buckets() {
        assert_eq!(velocity_bucket(0, 32), 0);
        assert_eq!(velocity_bucket(127, 32), 31);
        assert_eq!(velocity_bucket(64, 32), 16);
        assert_eq!(velocity_bucket(127, 1), 0);
    }

    #[test]
    fn test_out_of_range_pitch_is_dropped_not_raised() {
        let config = QuantizationConfig::default(); // pitch 21..=108
        let grid = TimeGrid::new(&config).unwrap();

        let outcome = normalize_notes(
            &[raw(10, 100, 0, 480), raw(60, 100, 0, 480)],
            &config,
            &grid,
            480,
        );
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.notes.len(), 1);
        assert_eq!(outcome.notes[0].pitch, 60);
    }

    #[test]
    fn test_degenerate_length_is_dropped() {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();

        let outcome = normalize_notes(&[raw(60, 100, 480, 480)], &config, &grid, 480);
        assert_eq!(outcome.dropped, 1);
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn test_canonical_sort() {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();

        let outcome = normalize_notes(
            &[
                raw(64, 100, 0, 480),
                raw(60, 100, 0, 480),
                raw(50, 100, 240, 480),
            ],
            &config,
            &grid,
            480,
        );
        let pitches: Vec<u8> = outcome.notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![60, 64, 50]);
    }

    #[test]
    fn test_tiny_note_gets_smallest_duration() {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();

        // 10 ticks at 480/beat snaps both ends to sample 0.
        let outcome = normalize_notes(&[raw(60, 100, 0, 10)], &config, &grid, 480);
        assert_eq!(outcome.notes[0].duration, grid.durations()[0]);
    }

    #[test]
    fn test_denormalize_roundtrip_at_grid_resolution() {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();

        let outcome = normalize_notes(
            &[raw(60, 100, 0, 480), raw(72, 60, 480, 960)],
            &config,
            &grid,
            480,
        );
        let rendered = denormalize_notes(&outcome.notes, &config, &grid, 480);
        let again = normalize_notes(&rendered, &config, &grid, 480);
        assert_eq!(again.notes, outcome.notes);
    }
}
