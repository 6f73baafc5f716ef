//! # Token Descriptions

use core::fmt;

use crate::chords::ChordQuality;

/// The event family of a Compound-Word tuple.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter,
)]
pub enum EventFamily {
    /// Structural events: bars and positions.
    #[strum(serialize = "Metric")]
    Metric,
    /// Note events: pitch / velocity / duration.
    #[strum(serialize = "Note")]
    Note,
}

/// The type of a token, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum TokenKind {
    /// Reserved filler for absent Compound-Word slots.
    Pad,
    /// Compound-Word family marker.
    Family,
    /// Bar boundary.
    Bar,
    /// Bar-local time position.
    Position,
    /// Note pitch (REMI, Compound-Word, Structured).
    Pitch,
    /// Note onset (MIDI-Like).
    NoteOn,
    /// Note release (MIDI-Like).
    NoteOff,
    /// Velocity bucket.
    Velocity,
    /// Note length in grid samples.
    Duration,
    /// Forward time delta in grid samples.
    TimeShift,
    /// Detected chord quality (auxiliary).
    Chord,
}

/// A token: a type plus its quantized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Reserved filler for absent Compound-Word slots.
    Pad,
    /// Compound-Word family marker.
    Family(EventFamily),
    /// Bar boundary (valueless; bar index is implicit in the count).
    Bar,
    /// Bar-local time position, in samples.
    Position(u32),
    /// Note pitch.
    Pitch(u8),
    /// Note onset pitch.
    NoteOn(u8),
    /// Note release pitch.
    NoteOff(u8),
    /// Velocity bucket index.
    Velocity(u8),
    /// Note length in samples.
    Duration(u32),
    /// Forward time delta in samples.
    TimeShift(u32),
    /// Detected chord quality.
    Chord(ChordQuality),
}

impl Token {
    /// The token's kind.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Pad => TokenKind::Pad,
            Token::Family(_) => TokenKind::Family,
            Token::Bar => TokenKind::Bar,
            Token::Position(_) => TokenKind::Position,
            Token::Pitch(_) => TokenKind::Pitch,
            Token::NoteOn(_) => TokenKind::NoteOn,
            Token::NoteOff(_) => TokenKind::NoteOff,
            Token::Velocity(_) => TokenKind::Velocity,
            Token::Duration(_) => TokenKind::Duration,
            Token::TimeShift(_) => TokenKind::TimeShift,
            Token::Chord(_) => TokenKind::Chord,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Token::Pad => write!(f, "Pad_None"),
            Token::Family(family) => write!(f, "Family_{family}"),
            Token::Bar => write!(f, "Bar_None"),
            Token::Position(p) => write!(f, "Position_{p}"),
            Token::Pitch(p) => write!(f, "Pitch_{p}"),
            Token::NoteOn(p) => write!(f, "NoteOn_{p}"),
            Token::NoteOff(p) => write!(f, "NoteOff_{p}"),
            Token::Velocity(v) => write!(f, "Velocity_{v}"),
            Token::Duration(d) => write!(f, "Duration_{d}"),
            Token::TimeShift(d) => write!(f, "TimeShift_{d}"),
            Token::Chord(q) => write!(f, "Chord_{q}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Token::Pitch(60).to_string(), "Pitch_60");
        assert_eq!(Token::Bar.to_string(), "Bar_None");
        assert_eq!(Token::Chord(ChordQuality::Major).to_string(), "Chord_maj");
        assert_eq!(
            Token::Family(EventFamily::Metric).to_string(),
            "Family_Metric"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(Token::Pitch(60).kind(), TokenKind::Pitch);
        assert_eq!(Token::Pad.kind(), TokenKind::Pad);
    }
}
