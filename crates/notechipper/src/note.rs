//! # Note Representations
//!
//! [`RawNote`] is what the MIDI-parsing collaborator hands us;
//! [`NormalizedNote`] is the canonical quantized form every strategy
//! encodes from and decodes back to.

/// A note event as observed from a parsed MIDI track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNote {
    /// MIDI pitch, `0..=127`.
    pub pitch: u8,

    /// MIDI velocity, `0..=127`.
    pub velocity: u8,

    /// Onset tick.
    pub start_tick: u32,

    /// Release tick; expected to be greater than `start_tick`.
    pub end_tick: u32,

    /// MIDI program number.
    pub program: u8,

    /// Whether the note belongs to a drum track.
    pub is_drum: bool,
}

/// A note after range filtering and grid / velocity quantization.
///
/// Sorted collections of these are the engine's canonical form:
/// globally ordered by `(start, pitch ascending)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedNote {
    /// Pitch, within the configured pitch range.
    pub pitch: u8,

    /// Velocity bucket index, `0..num_velocities`.
    pub velocity: u8,

    /// Onset as a time-grid sample index.
    pub start: u32,

    /// Length in samples; always a Duration table value.
    pub duration: u32,

    /// MIDI program number.
    pub program: u8,

    /// Whether the note belongs to a drum track.
    pub is_drum: bool,
}

impl NormalizedNote {
    /// Release sample (onset + duration).
    pub fn end(&self) -> u32 {
        self.start + self.duration
    }
}

/// Per-track metadata a token stream does not carry.
///
/// Supplied as a side input to every decode; programs and drum flags
/// are not recoverable from pitch/time tokens alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackInfo {
    /// MIDI program number for the decoded notes.
    pub program: u8,

    /// Whether the decoded notes belong to a drum track.
    pub is_drum: bool,
}

/// Sort notes into the canonical `(start, pitch)` order, stably.
pub fn sort_notes(notes: &mut [NormalizedNote]) {
    notes.sort_by_key(|n| (n.start, n.pitch));
}
