//! # Chord Detection
//!
//! The auxiliary token detector: scans normalized notes for onset
//! groups whose interval pattern matches a known chord, yielding
//! events the REMI and Compound-Word strategies interleave into their
//! streams.

use strum::IntoEnumIterator;

use crate::note::NormalizedNote;

/// The catalog of recognized chord qualities.
///
/// Patterns are semitone offsets from the lowest pitch of the group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum ChordQuality {
    /// Major triad.
    #[strum(serialize = "maj")]
    Major,
    /// Minor triad.
    #[strum(serialize = "min")]
    Minor,
    /// Diminished triad.
    #[strum(serialize = "dim")]
    Diminished,
    /// Augmented triad.
    #[strum(serialize = "aug")]
    Augmented,
    /// Suspended second.
    #[strum(serialize = "sus2")]
    Sus2,
    /// Suspended fourth.
    #[strum(serialize = "sus4")]
    Sus4,
    /// Dominant seventh.
    #[strum(serialize = "7dom")]
    Dom7,
    /// Minor seventh.
    #[strum(serialize = "7min")]
    Min7,
    /// Major seventh.
    #[strum(serialize = "7maj")]
    Maj7,
    /// Half-diminished seventh.
    #[strum(serialize = "7halfdim")]
    HalfDim7,
    /// Diminished seventh.
    #[strum(serialize = "7dim")]
    Dim7,
    /// Augmented seventh.
    #[strum(serialize = "7aug")]
    Aug7,
    /// Major ninth.
    #[strum(serialize = "9maj")]
    Maj9,
    /// Minor ninth.
    #[strum(serialize = "9min")]
    Min9,
}

impl ChordQuality {
    /// The root-relative semitone pattern for this quality.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            Self::Major => &[0, 4, 7],
            Self::Minor => &[0, 3, 7],
            Self::Diminished => &[0, 3, 6],
            Self::Augmented => &[0, 4, 8],
            Self::Sus2 => &[0, 2, 7],
            Self::Sus4 => &[0, 5, 7],
            Self::Dom7 => &[0, 4, 7, 10],
            Self::Min7 => &[0, 3, 7, 10],
            Self::Maj7 => &[0, 4, 7, 11],
            Self::HalfDim7 => &[0, 3, 6, 10],
            Self::Dim7 => &[0, 3, 6, 9],
            Self::Aug7 => &[0, 4, 8, 11],
            Self::Maj9 => &[0, 4, 7, 10, 14],
            Self::Min9 => &[0, 4, 7, 10, 13],
        }
    }

    /// Match a sorted, deduplicated interval pattern against the catalog.
    pub fn from_intervals(intervals: &[u8]) -> Option<Self> {
        Self::iter().find(|q| q.intervals() == intervals)
    }
}

/// A detected chord: an onset sample and the matched quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordEvent {
    /// Onset sample shared by the chord's notes.
    pub start: u32,

    /// The matched quality.
    pub quality: ChordQuality,
}

/// Detect chords over a canonical-sorted note sequence.
///
/// An onset group is every note sharing a `start`; a group with at
/// least two distinct pitches whose root-relative interval pattern
/// exactly matches a catalog entry yields one [`ChordEvent`].
pub fn detect_chords(notes: &[NormalizedNote]) -> Vec<ChordEvent> {
    let mut chords = Vec::new();

    let mut i = 0;
    while i < notes.len() {
        let start = notes[i].start;
        let mut j = i;
        while j < notes.len() && notes[j].start == start {
            j += 1;
        }

        // Notes are pitch-ascending within an onset group.
        let mut intervals: Vec<u8> = notes[i..j]
            .iter()
            .map(|n| n.pitch - notes[i].pitch)
            .collect();
        intervals.dedup();

        if intervals.len() >= 2 {
            if let Some(quality) = ChordQuality::from_intervals(&intervals) {
                chords.push(ChordEvent { start, quality });
            }
        }

        i = j;
    }

    chords
}
