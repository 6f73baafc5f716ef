//! # REMI Strategy
//!
//! Bar-structured layout: `Bar` marks every bar boundary, `Position`
//! places the cursor inside the bar, and each note is a
//! `Pitch Velocity Duration` triple at the current cursor. Chord
//! tokens (when enabled) sit between a `Position` and the first
//! `Pitch` of its onset group.
//!
//! Decode is a strict grammar automaton; any out-of-order token fails
//! the whole call.

use crate::{
    chords::detect_chords,
    errors::NCResult,
    grid::TimeGrid,
    note::{NormalizedNote, TrackInfo},
    types::TokenId,
    vocab::{Token, TokenKind, Vocabulary},
};

use super::grammar_err;

const TAG: &str = "REMI";

/// Encode notes into a `Bar/Position/Pitch/Velocity/Duration` stream.
pub fn encode<T: TokenId>(
    notes: &[NormalizedNote],
    vocab: &Vocabulary<T>,
    grid: &TimeGrid,
) -> NCResult<Vec<T>> {
    let chords = if vocab.contains_kind(TokenKind::Chord) {
        let pitched: Vec<NormalizedNote> =
            notes.iter().copied().filter(|n| !n.is_drum).collect();
        detect_chords(&pitched)
    } else {
        Vec::new()
    };
    let mut next_chord = chords.iter().peekable();

    let mut tokens = Vec::with_capacity(notes.len() * 3 + 4);
    let mut current_bar: i64 = -1;
    let mut last_onset: Option<u32> = None;

    for note in notes {
        let bar = i64::from(grid.bar_of(note.start));
        while current_bar < bar {
            tokens.push(Token::Bar);
            current_bar += 1;
        }

        if last_onset != Some(note.start) {
            last_onset = Some(note.start);
            tokens.push(Token::Position(grid.position_in_bar(note.start)));

            while let Some(chord) = next_chord.peek() {
                if chord.start > note.start {
                    break;
                }
                if chord.start == note.start {
                    tokens.push(Token::Chord(chord.quality));
                }
                next_chord.next();
            }
        }

        tokens.push(Token::Pitch(note.pitch));
        tokens.push(Token::Velocity(note.velocity));
        tokens.push(Token::Duration(note.duration));
    }

    vocab.tokens_to_ids(&tokens)
}

/// Decoder automaton states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing read yet; only `Bar` may open the stream.
    Start,
    /// After `Bar`: another `Bar`, or a `Position`.
    AfterBar,
    /// After `Position` or `Chord`: a `Pitch` (or a `Chord` right
    /// after the `Position`).
    AtOnset { chord_ok: bool },
    /// After `Pitch`: a `Velocity`.
    AfterPitch,
    /// After `Velocity`: a `Duration`.
    AfterVelocity,
    /// After a completed note: next note, next onset, or next bar.
    AfterDuration,
}

/// Decode a REMI stream.
pub fn decode<T: TokenId>(
    ids: &[T],
    vocab: &Vocabulary<T>,
    grid: &TimeGrid,
    track: &TrackInfo,
) -> NCResult<Vec<NormalizedNote>> {
    let mut notes = Vec::new();
    let mut state = State::Start;
    let mut bar: i64 = -1;
    let mut position = 0;
    let mut pitch = 0;
    let mut velocity = 0;

    for (index, &id) in ids.iter().enumerate() {
        let token = vocab.id_to_token(id)?;
        state = match (state, token) {
            (State::Start | State::AfterBar | State::AfterDuration, Token::Bar) => {
                bar += 1;
                position = 0;
                State::AfterBar
            }
            (State::AfterBar | State::AfterDuration, Token::Position(p)) => {
                position = p;
                State::AtOnset { chord_ok: true }
            }
            (State::AtOnset { chord_ok: true }, Token::Chord(_)) => {
                State::AtOnset { chord_ok: false }
            }
            (
                State::AtOnset { .. } | State::AfterDuration,
                Token::Pitch(p),
            ) => {
                pitch = p;
                State::AfterPitch
            }
            (State::AfterPitch, Token::Velocity(v)) => {
                velocity = v;
                State::AfterVelocity
            }
            (State::AfterVelocity, Token::Duration(d)) => {
                notes.push(NormalizedNote {
                    pitch,
                    velocity,
                    start: bar as u32 * grid.samples_per_bar() + position,
                    duration: d,
                    program: track.program,
                    is_drum: track.is_drum,
                });
                State::AfterDuration
            }
            (state, token) => {
                return Err(grammar_err(
                    TAG,
                    index,
                    format!("unexpected {token} (decoder state {state:?})"),
                ));
            }
        };
    }

    match state {
        State::Start | State::AfterBar | State::AfterDuration => Ok(notes),
        _ => Err(grammar_err(
            TAG,
            ids.len(),
            "stream ends mid-note".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chords::ChordQuality,
        config::QuantizationConfig,
        strategies::Strategy,
    };

    type T = u32;

    fn setup(chords: bool) -> (TimeGrid, Vocabulary<T>) {
        let config = QuantizationConfig::default().with_chords(chords);
        let grid = TimeGrid::new(&config).unwrap();
        let vocab = Vocabulary::from_schedule(
            &Strategy::Remi.token_kinds(&config),
            &config,
            &grid,
        )
        .unwrap();
        (grid, vocab)
    }

    fn note(
        pitch: u8,
        velocity: u8,
        start: u32,
        duration: u32,
    ) -> NormalizedNote {
        NormalizedNote {
            pitch,
            velocity,
            start,
            duration,
            program: 0,
            is_drum: false,
        }
    }

    #[test]
    fn test_roundtrip_across_bars() {
        let (grid, vocab) = setup(false);
        let notes = vec![
            note(60, 16, 0, 8),
            note(64, 16, 0, 8),
            note(67, 20, 8, 16),
            // Bar 2 (empty bar 1 in between is spanned by Bar tokens).
            note(72, 8, 70, 2),
        ];

        let ids = encode(&notes, &vocab, &grid).unwrap();
        let decoded = decode(&ids, &vocab, &grid, &TrackInfo::default()).unwrap();
        assert_eq!(decoded, notes);
    }

    #[test]
    fn test_macro_structure() {
        let (grid, vocab) = setup(false);
        let ids = encode(&[note(60, 16, 0, 8)], &vocab, &grid).unwrap();
        let tokens = vocab.ids_to_tokens(&ids).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Bar,
                Token::Position(0),
                Token::Pitch(60),
                Token::Velocity(16),
                Token::Duration(8),
            ]
        );
    }

    #[test]
    fn test_chord_token_before_first_pitch_of_group() {
        let (grid, vocab) = setup(true);
        let notes = vec![note(60, 16, 0, 8), note(64, 16, 0, 8), note(67, 16, 0, 8)];

        let ids = encode(&notes, &vocab, &grid).unwrap();
        let tokens = vocab.ids_to_tokens(&ids).unwrap();
        assert_eq!(tokens[0], Token::Bar);
        assert_eq!(tokens[1], Token::Position(0));
        assert_eq!(tokens[2], Token::Chord(ChordQuality::Major));
        assert_eq!(tokens[3], Token::Pitch(60));
        assert_eq!(
            tokens.iter().filter(|t| t.kind() == TokenKind::Chord).count(),
            1
        );

        // Chords are auxiliary: decode still rebuilds the notes.
        let decoded = decode(&ids, &vocab, &grid, &TrackInfo::default()).unwrap();
        assert_eq!(decoded, notes);
    }

    #[test]
    fn test_out_of_order_token_is_grammar_error() {
        let (grid, vocab) = setup(false);
        // Duration before Pitch.
        let ids = vocab
            .tokens_to_ids(&[
                Token::Bar,
                Token::Position(0),
                Token::Duration(8),
            ])
            .unwrap();
        assert!(decode(&ids, &vocab, &grid, &TrackInfo::default()).is_err());
    }

    #[test]
    fn test_missing_leading_bar_is_grammar_error() {
        let (grid, vocab) = setup(false);
        let ids = vocab.tokens_to_ids(&[Token::Position(0)]).unwrap();
        assert!(decode(&ids, &vocab, &grid, &TrackInfo::default()).is_err());
    }

    #[test]
    fn test_truncated_note_is_grammar_error() {
        let (grid, vocab) = setup(false);
        let ids = vocab
            .tokens_to_ids(&[Token::Bar, Token::Position(0), Token::Pitch(60)])
            .unwrap();
        assert!(decode(&ids, &vocab, &grid, &TrackInfo::default()).is_err());
    }
}
