//! # Time Grid
//!
//! The discretized tick space derived from a beat-resolution table.
//!
//! The grid's sample unit is `1 / max_frames_per_beat` of a beat; a
//! beat covered by a coarser table row only admits samples on that
//! row's sub-grid. The union of the rows' sub-grids is the single grid
//! every strategy snaps against, and the distinct deltas between grid
//! points within the covered span form the shared Duration / TimeShift
//! value table.

use crate::{
    config::QuantizationConfig,
    errors::NCResult,
};

/// Beats per bar; the tokenizer assumes 4/4 bars.
pub const BEATS_PER_BAR: u32 = 4;

/// Derived, read-only tick grid for one [`QuantizationConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    /// Samples per beat (the finest table resolution).
    samples_per_beat: u32,

    /// `(beat range end, step in samples)` rows, ascending by range end.
    steps: Vec<(u32, u32)>,

    /// Step of the last row; extended indefinitely past the table.
    last_step: u32,

    /// Sorted distinct grid-point deltas within the covered span.
    /// Always starts at 1 (the finest row has adjacent points).
    durations: Vec<u32>,
}

impl TimeGrid {
    /// Build the grid for a config.
    ///
    /// ## Returns
    /// The grid, or a `Config` error for a malformed beat-resolution
    /// table.
    pub fn new(config: &QuantizationConfig) -> NCResult<Self> {
        config.validate()?;

        let samples_per_beat = config.max_frames_per_beat();

        let mut steps = Vec::with_capacity(config.beat_res.len());
        for row in &config.beat_res {
            steps.push((row.beats.end, samples_per_beat / row.frames_per_beat));
        }
        let last_step = steps.last().map(|&(_, s)| s).unwrap_or(1);

        // Union grid points over the covered span.
        let covered_beats = config.beat_res.last().map(|r| r.beats.end).unwrap_or(0);
        let mut points: Vec<u32> = Vec::new();
        for row in &config.beat_res {
            let step = samples_per_beat / row.frames_per_beat;
            let mut s = row.beats.start * samples_per_beat;
            let end = row.beats.end * samples_per_beat;
            while s <= end {
                points.push(s);
                s += step;
            }
        }
        points.sort_unstable();
        points.dedup();

        let span = (covered_beats * samples_per_beat) as usize;
        let mut seen = vec![false; span + 1];
        for (i, &a) in points.iter().enumerate() {
            for &b in &points[i + 1..] {
                seen[(b - a) as usize] = true;
            }
        }
        let durations: Vec<u32> = (1..=span as u32).filter(|&d| seen[d as usize]).collect();

        Ok(Self {
            samples_per_beat,
            steps,
            last_step,
            durations,
        })
    }

    /// Samples per beat (the finest configured resolution).
    pub fn samples_per_beat(&self) -> u32 {
        self.samples_per_beat
    }

    /// Samples per bar; also the number of distinct Position values.
    pub fn samples_per_bar(&self) -> u32 {
        BEATS_PER_BAR * self.samples_per_beat
    }

    /// The bar index containing a sample.
    pub fn bar_of(
        &self,
        sample: u32,
    ) -> u32 {
        sample / self.samples_per_bar()
    }

    /// The bar-local position of a sample.
    pub fn position_in_bar(
        &self,
        sample: u32,
    ) -> u32 {
        sample % self.samples_per_bar()
    }

    /// The sorted Duration value table.
    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    /// The largest representable duration.
    pub fn max_duration(&self) -> u32 {
        *self.durations.last().unwrap_or(&1)
    }

    /// The TimeShift value table: zero plus the duration table.
    pub fn shift_values(&self) -> Vec<u32> {
        core::iter::once(0).chain(self.durations.iter().copied()).collect()
    }

    /// The grid step, in samples, for a beat index.
    fn step_for_beat(
        &self,
        beat: u32,
    ) -> u32 {
        for &(end, step) in &self.steps {
            if beat < end {
                return step;
            }
        }
        self.last_step
    }

    /// Snap a raw tick to the nearest grid point.
    ///
    /// Ties round toward the earlier position. Beats past the table
    /// use the last row's resolution.
    ///
    /// ## Arguments
    /// * `tick` - the raw tick value.
    /// * `ticks_per_beat` - the source's tick resolution (must be > 0).
    ///
    /// ## Returns
    /// The grid point as a sample index.
    pub fn snap_tick(
        &self,
        tick: u32,
        ticks_per_beat: u32,
    ) -> u32 {
        let step = self.step_for_beat(tick / ticks_per_beat);

        let num = u64::from(tick) * u64::from(self.samples_per_beat);
        let unit = u64::from(ticks_per_beat) * u64::from(step);

        let mut q = num / unit;
        if (num % unit) * 2 > unit {
            q += 1;
        }
        u32::try_from(q * u64::from(step)).unwrap_or(u32::MAX)
    }

    /// Render a sample index back to ticks at a caller-chosen resolution.
    pub fn sample_to_tick(
        &self,
        sample: u32,
        ticks_per_beat: u32,
    ) -> u32 {
        let num = u64::from(sample) * u64::from(ticks_per_beat);
        let den = u64::from(self.samples_per_beat);
        u32::try_from((num + den / 2) / den).unwrap_or(u32::MAX)
    }

    /// Snap a sample count to the nearest Duration table value.
    ///
    /// Ties round toward the smaller value; counts past the table
    /// clamp to the largest entry.
    pub fn snap_duration(
        &self,
        samples: u32,
    ) -> u32 {
        let durations = &self.durations;
        let idx = durations.partition_point(|&d| d < samples);
        if idx == 0 {
            return durations[0];
        }
        if idx == durations.len() {
            return durations[idx - 1];
        }
        let lo = durations[idx - 1];
        let hi = durations[idx];
        if samples - lo <= hi - samples {
            lo
        } else {
            hi
        }
    }

    /// Decompose a time delta into an exact sum of TimeShift values.
    ///
    /// Greedy largest-first; exact because the table contains 1.
    pub fn decompose_shift(
        &self,
        delta: u32,
    ) -> Vec<u32> {
        let mut shifts = Vec::new();
        let mut remaining = delta;
        while remaining > 0 {
            let idx = self.durations.partition_point(|&d| d <= remaining);
            let shift = self.durations[idx - 1];
            shifts.push(shift);
            remaining -= shift;
        }
        shifts
    }
}
