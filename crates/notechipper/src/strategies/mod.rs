//! # Strategy Codecs
//!
//! The four interchangeable token layouts. Each strategy is a pair of
//! pure functions between canonical-sorted [`NormalizedNote`]s and a
//! token sequence, plus the token-kind schedule its vocabulary is
//! built from. Dispatch is by the [`Strategy`] tag; there is no open
//! extension point.
//!
//! Every codec threads its time cursor through the loop as a local
//! accumulator; nothing is shared across calls.

pub mod compound_word;
pub mod midi_like;
pub mod remi;
pub mod structured;

use crate::{
    config::QuantizationConfig,
    errors::{NCResult, NotechipperError},
    grid::TimeGrid,
    note::{NormalizedNote, TrackInfo},
    types::TokenId,
    vocab::{TokenKind, Vocabulary},
};

/// The token-layout strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Strategy {
    /// `NoteOn`/`NoteOff` event stream with explicit time shifts.
    #[strum(serialize = "MIDI-Like")]
    MidiLike,
    /// Bar/Position structure with Pitch/Velocity/Duration notes.
    #[strum(serialize = "REMI")]
    Remi,
    /// One fixed-arity token tuple per musical event.
    #[strum(serialize = "Compound-Word")]
    CompoundWord,
    /// Strict Pitch/Velocity/Duration/TimeShift cycle.
    #[strum(serialize = "Structured")]
    Structured,
}

impl Strategy {
    /// The token-kind schedule the vocabulary is enumerated from.
    ///
    /// Kinds appear in id-assignment order. Auxiliary kinds only
    /// appear for strategies that can place them: MIDI-Like and
    /// Structured ignore the chord flag (a no-op, not an error).
    pub fn token_kinds(
        &self,
        config: &QuantizationConfig,
    ) -> Vec<TokenKind> {
        let mut kinds = match self {
            Strategy::MidiLike => vec![
                TokenKind::NoteOn,
                TokenKind::NoteOff,
                TokenKind::Velocity,
                TokenKind::TimeShift,
            ],
            Strategy::Remi => vec![
                TokenKind::Bar,
                TokenKind::Position,
                TokenKind::Pitch,
                TokenKind::Velocity,
                TokenKind::Duration,
            ],
            Strategy::CompoundWord => vec![
                TokenKind::Pad,
                TokenKind::Family,
                TokenKind::Bar,
                TokenKind::Position,
                TokenKind::Pitch,
                TokenKind::Velocity,
                TokenKind::Duration,
            ],
            Strategy::Structured => vec![
                TokenKind::Pitch,
                TokenKind::Velocity,
                TokenKind::Duration,
                TokenKind::TimeShift,
            ],
        };

        if config.auxiliary.chords
            && matches!(self, Strategy::Remi | Strategy::CompoundWord)
        {
            kinds.push(TokenKind::Chord);
        }

        kinds
    }

    /// Encode canonical-sorted notes into a token sequence.
    pub fn encode<T: TokenId>(
        &self,
        notes: &[NormalizedNote],
        vocab: &Vocabulary<T>,
        grid: &TimeGrid,
    ) -> NCResult<TokenSequence<T>> {
        match self {
            Strategy::MidiLike => Ok(TokenSequence::Stream(midi_like::encode(
                notes, vocab, grid,
            )?)),
            Strategy::Remi => Ok(TokenSequence::Stream(remi::encode(notes, vocab, grid)?)),
            Strategy::CompoundWord => Ok(TokenSequence::Tuples(compound_word::encode(
                notes, vocab, grid,
            )?)),
            Strategy::Structured => Ok(TokenSequence::Stream(structured::encode(
                notes, vocab, grid,
            )?)),
        }
    }

    /// Decode a token sequence back into canonical-sorted notes.
    ///
    /// `track` supplies the program/drum metadata the stream does not
    /// carry.
    pub fn decode<T: TokenId>(
        &self,
        sequence: &TokenSequence<T>,
        vocab: &Vocabulary<T>,
        grid: &TimeGrid,
        track: &TrackInfo,
    ) -> NCResult<Vec<NormalizedNote>> {
        match (self, sequence) {
            (Strategy::MidiLike, TokenSequence::Stream(ids)) => {
                midi_like::decode(ids, vocab, track)
            }
            (Strategy::Remi, TokenSequence::Stream(ids)) => {
                remi::decode(ids, vocab, grid, track)
            }
            (Strategy::CompoundWord, TokenSequence::Tuples(tuples)) => {
                compound_word::decode(tuples, vocab, grid, track)
            }
            (Strategy::Structured, TokenSequence::Stream(ids)) => {
                structured::decode(ids, vocab, track)
            }
            _ => Err(NotechipperError::Grammar {
                strategy: self.tag(),
                index: 0,
                reason: "sequence framing does not match the strategy".into(),
            }),
        }
    }

    /// Static name for error messages.
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            Strategy::MidiLike => "MIDI-Like",
            Strategy::Remi => "REMI",
            Strategy::CompoundWord => "Compound-Word",
            Strategy::Structured => "Structured",
        }
    }
}

/// A strategy's output: a flat id stream, or fixed-arity id tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSequence<T: TokenId> {
    /// Flat ordered ids (MIDI-Like, REMI, Structured).
    Stream(Vec<T>),

    /// Ordered fixed-arity tuples (Compound-Word).
    Tuples(Vec<Vec<T>>),
}

impl<T: TokenId> TokenSequence<T> {
    /// The number of tokens (tuple slots count individually).
    pub fn len(&self) -> usize {
        match self {
            TokenSequence::Stream(ids) => ids.len(),
            TokenSequence::Tuples(tuples) => tuples.iter().map(Vec::len).sum(),
        }
    }

    /// True if no tokens were emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The flat id stream, if this is a stream sequence.
    pub fn as_stream(&self) -> Option<&[T]> {
        match self {
            TokenSequence::Stream(ids) => Some(ids),
            TokenSequence::Tuples(_) => None,
        }
    }

    /// The tuple list, if this is a tuple sequence.
    pub fn as_tuples(&self) -> Option<&[Vec<T>]> {
        match self {
            TokenSequence::Stream(_) => None,
            TokenSequence::Tuples(tuples) => Some(tuples),
        }
    }
}

/// Shorthand for a decode-side grammar error.
pub(crate) fn grammar_err(
    strategy: &'static str,
    index: usize,
    reason: impl Into<String>,
) -> NotechipperError {
    NotechipperError::Grammar {
        strategy,
        index,
        reason: reason.into(),
    }
}
