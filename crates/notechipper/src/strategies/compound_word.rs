//! # Compound-Word Strategy
//!
//! One fixed-arity token tuple per musical event, aligned slots:
//! `[Family, Bar, Position, Pitch, Velocity, Duration]`, plus a
//! trailing chord slot when chord tokens are enabled. Absent slots
//! carry the reserved `Pad` id, so every tuple in a sequence has the
//! same width regardless of event kind.
//!
//! Metric tuples carry a `Bar` or a `Position` (the position tuple
//! also carries the onset's chord, when detected); note tuples carry
//! `Pitch/Velocity/Duration`.

use crate::{
    chords::detect_chords,
    errors::NCResult,
    grid::TimeGrid,
    note::{NormalizedNote, TrackInfo},
    types::TokenId,
    vocab::{EventFamily, Token, TokenKind, Vocabulary},
};

use super::grammar_err;

const TAG: &str = "Compound-Word";

/// Slot count without the chord slot.
const BASE_ARITY: usize = 6;

/// The tuple arity for a vocabulary (7 with chords, else 6).
pub fn tuple_arity<T: TokenId>(vocab: &Vocabulary<T>) -> usize {
    if vocab.contains_kind(TokenKind::Chord) {
        BASE_ARITY + 1
    } else {
        BASE_ARITY
    }
}

fn pad_tuple(arity: usize) -> Vec<Token> {
    vec![Token::Pad; arity]
}

/// Encode notes into fixed-arity tuples.
pub fn encode<T: TokenId>(
    notes: &[NormalizedNote],
    vocab: &Vocabulary<T>,
    grid: &TimeGrid,
) -> NCResult<Vec<Vec<T>>> {
    let arity = tuple_arity(vocab);

    let chords = if vocab.contains_kind(TokenKind::Chord) {
        let pitched: Vec<NormalizedNote> =
            notes.iter().copied().filter(|n| !n.is_drum).collect();
        detect_chords(&pitched)
    } else {
        Vec::new()
    };

    let mut tuples: Vec<Vec<Token>> = Vec::with_capacity(notes.len() * 2);
    let mut current_bar: i64 = -1;
    let mut last_onset: Option<u32> = None;

    for note in notes {
        let bar = i64::from(grid.bar_of(note.start));
        while current_bar < bar {
            let mut tuple = pad_tuple(arity);
            tuple[0] = Token::Family(EventFamily::Metric);
            tuple[1] = Token::Bar;
            tuples.push(tuple);
            current_bar += 1;
        }

        if last_onset != Some(note.start) {
            last_onset = Some(note.start);
            let mut tuple = pad_tuple(arity);
            tuple[0] = Token::Family(EventFamily::Metric);
            tuple[2] = Token::Position(grid.position_in_bar(note.start));
            if let Some(chord) = chords.iter().find(|c| c.start == note.start) {
                tuple[BASE_ARITY] = Token::Chord(chord.quality);
            }
            tuples.push(tuple);
        }

        let mut tuple = pad_tuple(arity);
        tuple[0] = Token::Family(EventFamily::Note);
        tuple[3] = Token::Pitch(note.pitch);
        tuple[4] = Token::Velocity(note.velocity);
        tuple[5] = Token::Duration(note.duration);
        tuples.push(tuple);
    }

    tuples
        .iter()
        .map(|tuple| vocab.tokens_to_ids(tuple))
        .collect()
}

fn expect_pad(
    tuple: &[Token],
    slots: &[usize],
    index: usize,
) -> NCResult<()> {
    for &slot in slots {
        if tuple[slot] != Token::Pad {
            return Err(grammar_err(
                TAG,
                index,
                format!("slot {slot} must be padded, found {}", tuple[slot]),
            ));
        }
    }
    Ok(())
}

/// Decode fixed-arity tuples.
pub fn decode<T: TokenId>(
    tuples: &[Vec<T>],
    vocab: &Vocabulary<T>,
    grid: &TimeGrid,
    track: &TrackInfo,
) -> NCResult<Vec<NormalizedNote>> {
    let arity = tuple_arity(vocab);

    let mut notes = Vec::new();
    let mut bar: i64 = -1;
    let mut position: Option<u32> = None;

    for (index, ids) in tuples.iter().enumerate() {
        if ids.len() != arity {
            return Err(grammar_err(
                TAG,
                index,
                format!("tuple arity {} != expected {arity}", ids.len()),
            ));
        }
        let tuple = vocab.ids_to_tokens(ids)?;

        match tuple[0] {
            Token::Family(EventFamily::Metric) => {
                expect_pad(&tuple, &[3, 4, 5], index)?;
                match (tuple[1], tuple[2]) {
                    (Token::Bar, Token::Pad) => {
                        bar += 1;
                        position = Some(0);
                    }
                    (Token::Pad, Token::Position(p)) => {
                        if bar < 0 {
                            return Err(grammar_err(TAG, index, "position before any bar"));
                        }
                        position = Some(p);
                    }
                    (a, b) => {
                        return Err(grammar_err(
                            TAG,
                            index,
                            format!("metric tuple must carry Bar or Position, found {a}/{b}"),
                        ));
                    }
                }
            }
            Token::Family(EventFamily::Note) => {
                expect_pad(&tuple, &[1, 2], index)?;
                if arity > BASE_ARITY {
                    expect_pad(&tuple, &[BASE_ARITY], index)?;
                }
                let (pos, (pitch, velocity, duration)) =
                    match (position, (tuple[3], tuple[4], tuple[5])) {
                        (
                            Some(pos),
                            (Token::Pitch(p), Token::Velocity(v), Token::Duration(d)),
                        ) => (pos, (p, v, d)),
                        (None, _) => {
                            return Err(grammar_err(TAG, index, "note before any position"));
                        }
                        _ => {
                            return Err(grammar_err(
                                TAG,
                                index,
                                "note tuple must carry Pitch/Velocity/Duration",
                            ));
                        }
                    };
                notes.push(NormalizedNote {
                    pitch,
                    velocity,
                    start: bar as u32 * grid.samples_per_bar() + pos,
                    duration,
                    program: track.program,
                    is_drum: track.is_drum,
                });
            }
            other => {
                return Err(grammar_err(
                    TAG,
                    index,
                    format!("tuple must open with a Family token, found {other}"),
                ));
            }
        }
    }

    Ok(notes)
}
