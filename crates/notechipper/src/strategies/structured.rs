//! # Structured Strategy
//!
//! Strictly cyclic layout: `Pitch Velocity Duration TimeShift`, one
//! full cycle per note in canonical order, with the final note closing
//! on a zero shift. Simultaneous notes keep the cycle (zero shifts)
//! rather than sharing time tokens; the transition pattern never
//! varies, which is the point of the layout.
//!
//! A gap wider than the largest table value snaps to it (the cycle
//! admits exactly one shift per note), so decoded onsets past such a
//! gap are bounded by the configured span, like the layout it models.

use crate::{
    errors::NCResult,
    grid::TimeGrid,
    note::{NormalizedNote, TrackInfo},
    types::TokenId,
    vocab::{Token, Vocabulary},
};

use super::grammar_err;

const TAG: &str = "Structured";

/// Encode notes into the strict four-token cycle.
pub fn encode<T: TokenId>(
    notes: &[NormalizedNote],
    vocab: &Vocabulary<T>,
    grid: &TimeGrid,
) -> NCResult<Vec<T>> {
    let mut tokens = Vec::with_capacity(notes.len() * 4);

    for (i, note) in notes.iter().enumerate() {
        let shift = match notes.get(i + 1) {
            Some(next) => {
                let delta = next.start - note.start;
                if delta == 0 {
                    0
                } else {
                    grid.snap_duration(delta)
                }
            }
            None => 0,
        };

        tokens.push(Token::Pitch(note.pitch));
        tokens.push(Token::Velocity(note.velocity));
        tokens.push(Token::Duration(note.duration));
        tokens.push(Token::TimeShift(shift));
    }

    vocab.tokens_to_ids(&tokens)
}

/// Decode the strict four-token cycle.
pub fn decode<T: TokenId>(
    ids: &[T],
    vocab: &Vocabulary<T>,
    track: &TrackInfo,
) -> NCResult<Vec<NormalizedNote>> {
    if ids.len() % 4 != 0 {
        return Err(grammar_err(
            TAG,
            ids.len(),
            "stream ends mid-cycle (length is not a multiple of 4)",
        ));
    }

    let mut notes = Vec::with_capacity(ids.len() / 4);
    let mut now = 0;
    let mut pitch = 0;
    let mut velocity = 0;
    let mut duration = 0;

    for (index, &id) in ids.iter().enumerate() {
        let token = vocab.id_to_token(id)?;
        match (index % 4, token) {
            (0, Token::Pitch(p)) => pitch = p,
            (1, Token::Velocity(v)) => velocity = v,
            (2, Token::Duration(d)) => duration = d,
            (3, Token::TimeShift(delta)) => {
                notes.push(NormalizedNote {
                    pitch,
                    velocity,
                    start: now,
                    duration,
                    program: track.program,
                    is_drum: track.is_drum,
                });
                now += delta;
            }
            (phase, token) => {
                const CYCLE: [&str; 4] = ["Pitch", "Velocity", "Duration", "TimeShift"];
                return Err(grammar_err(
                    TAG,
                    index,
                    format!("expected {}, found {token}", CYCLE[phase]),
                ));
            }
        }
    }

    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::QuantizationConfig,
        strategies::Strategy,
    };

    type T = u32;

    fn setup() -> (TimeGrid, Vocabulary<T>) {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();
        let vocab = Vocabulary::from_schedule(
            &Strategy::Structured.token_kinds(&config),
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
    fn test_roundtrip_with_simultaneity() {
        let (grid, vocab) = setup();
        let notes = vec![
            note(60, 16, 0, 8),
            note(64, 16, 0, 8),
            note(67, 16, 0, 8),
            note(72, 8, 16, 4),
        ];

        let ids = encode(&notes, &vocab, &grid).unwrap();
        assert_eq!(ids.len(), notes.len() * 4);
        let decoded = decode(&ids, &vocab, &TrackInfo::default()).unwrap();
        assert_eq!(decoded, notes);
    }

    #[test]
    fn test_wrong_cycle_order_is_grammar_error() {
        let (_grid, vocab) = setup();
        // Pitch, Duration, Velocity, TimeShift: wrong order.
        let ids = vocab
            .tokens_to_ids(&[
                Token::Pitch(60),
                Token::Duration(8),
                Token::Velocity(16),
                Token::TimeShift(0),
            ])
            .unwrap();
        assert!(decode(&ids, &vocab, &TrackInfo::default()).is_err());
    }

    #[test]
    fn test_truncated_cycle_is_grammar_error() {
        let (_grid, vocab) = setup();
        let ids = vocab
            .tokens_to_ids(&[Token::Pitch(60), Token::Velocity(16)])
            .unwrap();
        assert!(decode(&ids, &vocab, &TrackInfo::default()).is_err());
    }

    #[test]
    fn test_empty_stream_is_valid() {
        let (_grid, vocab) = setup();
        assert!(decode(&[], &vocab, &TrackInfo::default())
            .unwrap()
            .is_empty());
    }
}
