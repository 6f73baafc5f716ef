//! # MIDI-Like Strategy
//!
//! Serializes notes the way a MIDI event stream would: onsets and
//! releases as `NoteOn`/`NoteOff`, a running velocity, and explicit
//! `TimeShift` deltas between event times. Each note contributes
//! `Velocity NoteOn ... NoteOff`; decode keeps the most recent
//! velocity and matches a release to the earliest open onset of the
//! same pitch.
//!
//! The layout is permissive by design: decode drops (and counts)
//! unmatched onsets and orphan releases instead of failing, since a
//! truncated stream is still mostly recoverable.

use crate::{
    errors::NCResult,
    grid::TimeGrid,
    note::{sort_notes, NormalizedNote, TrackInfo},
    types::TokenId,
    vocab::{Token, Vocabulary},
};

use super::grammar_err;

const TAG: &str = "MIDI-Like";

/// Encode notes into a `Velocity/NoteOn/NoteOff/TimeShift` stream.
pub fn encode<T: TokenId>(
    notes: &[NormalizedNote],
    vocab: &Vocabulary<T>,
    grid: &TimeGrid,
) -> NCResult<Vec<T>> {
    // (time, token) events; stable sort keeps each note's
    // Velocity/NoteOn adjacency within an onset.
    let mut events: Vec<(u32, Token)> = Vec::with_capacity(notes.len() * 3);
    for note in notes {
        events.push((note.start, Token::Velocity(note.velocity)));
        events.push((note.start, Token::NoteOn(note.pitch)));
        events.push((note.end(), Token::NoteOff(note.pitch)));
    }
    events.sort_by_key(|&(time, _)| time);

    let mut tokens = Vec::with_capacity(events.len());
    let mut now = 0;
    for (time, token) in events {
        for shift in grid.decompose_shift(time - now) {
            tokens.push(Token::TimeShift(shift));
        }
        now = time;
        tokens.push(token);
    }

    vocab.tokens_to_ids(&tokens)
}

/// Decode a MIDI-Like stream.
pub fn decode<T: TokenId>(
    ids: &[T],
    vocab: &Vocabulary<T>,
    track: &TrackInfo,
) -> NCResult<Vec<NormalizedNote>> {
    let mut notes = Vec::new();
    let mut open: Vec<(u8, u32, u8)> = Vec::new(); // (pitch, start, velocity)
    let mut velocity = 0;
    let mut now = 0;
    let mut dropped = 0usize;

    for (index, &id) in ids.iter().enumerate() {
        match vocab.id_to_token(id)? {
            Token::Velocity(v) => velocity = v,
            Token::NoteOn(pitch) => open.push((pitch, now, velocity)),
            Token::NoteOff(pitch) => {
                match open.iter().position(|&(p, _, _)| p == pitch) {
                    Some(i) => {
                        let (_, start, velocity) = open.remove(i);
                        if now > start {
                            notes.push(NormalizedNote {
                                pitch,
                                velocity,
                                start,
                                duration: now - start,
                                program: track.program,
                                is_drum: track.is_drum,
                            });
                        } else {
                            dropped += 1;
                        }
                    }
                    None => dropped += 1,
                }
            }
            Token::TimeShift(delta) => now += delta,
            other => {
                return Err(grammar_err(
                    TAG,
                    index,
                    format!("unexpected {other} in a MIDI-Like stream"),
                ));
            }
        }
    }

    dropped += open.len();
    if dropped > 0 {
        log::debug!("MIDI-Like decode: dropped {dropped} unmatched/degenerate notes");
    }

    sort_notes(&mut notes);
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::QuantizationConfig,
        strategies::Strategy,
        vocab::TokenKind,
    };

    type T = u32;

    fn setup() -> (QuantizationConfig, TimeGrid, Vocabulary<T>) {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();
        let vocab = Vocabulary::from_schedule(
            &Strategy::MidiLike.token_kinds(&config),
            &config,
            &grid,
        )
        .unwrap();
        (config, grid, vocab)
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
    fn test_roundtrip_with_polyphony() {
        let (_config, grid, vocab) = setup();
        let notes = vec![
            note(60, 16, 0, 8),
            note(64, 16, 0, 8),
            note(67, 20, 4, 16),
            note(60, 3, 40, 2),
        ];

        let ids = encode(&notes, &vocab, &grid).unwrap();
        let decoded = decode(&ids, &vocab, &TrackInfo::default()).unwrap();
        assert_eq!(decoded, notes);
    }

    #[test]
    fn test_overlapping_same_pitch_matches_earliest_open() {
        let (_config, grid, vocab) = setup();
        let notes = vec![note(60, 10, 0, 16), note(60, 10, 4, 4)];

        let ids = encode(&notes, &vocab, &grid).unwrap();
        let decoded = decode(&ids, &vocab, &TrackInfo::default()).unwrap();
        // Earliest-open matching reassigns the durations, but the
        // onset/release multiset is preserved.
        let mut onsets: Vec<u32> = decoded.iter().map(|n| n.start).collect();
        onsets.sort_unstable();
        assert_eq!(onsets, vec![0, 4]);
        let mut ends: Vec<u32> = decoded.iter().map(|n| n.end()).collect();
        ends.sort_unstable();
        assert_eq!(ends, vec![8, 16]);
    }

    #[test]
    fn test_unmatched_note_on_is_dropped() {
        let (_config, _grid, vocab) = setup();
        let ids = vocab
            .tokens_to_ids(&[Token::Velocity(5), Token::NoteOn(60)])
            .unwrap();
        let decoded = decode(&ids, &vocab, &TrackInfo::default()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_orphan_note_off_is_dropped() {
        let (_config, _grid, vocab) = setup();
        let ids = vocab.tokens_to_ids(&[Token::NoteOff(60)]).unwrap();
        let decoded = decode(&ids, &vocab, &TrackInfo::default()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_schedule_has_no_chords() {
        let config = QuantizationConfig::default().with_chords(true);
        let kinds = Strategy::MidiLike.token_kinds(&config);
        assert!(!kinds.contains(&TokenKind::Chord));
    }
}
