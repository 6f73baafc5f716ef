//! # Combined Tokenizer

use crate::{
    config::QuantizationConfig,
    errors::NCResult,
    grid::TimeGrid,
    normalize::{denormalize_notes, normalize_notes, NormalizeOutcome},
    note::{NormalizedNote, RawNote, TrackInfo},
    strategies::{Strategy, TokenSequence},
    types::TokenId,
    vocab::Vocabulary,
};

/// One configured tokenizer: a strategy plus the grid and vocabulary
/// derived from a [`QuantizationConfig`].
///
/// Everything is built once at construction and shared read-only by
/// every call; encode and decode are pure functions of their inputs,
/// so independent tracks can be processed concurrently.
#[derive(Debug, Clone)]
pub struct NoteTokenizer<T: TokenId> {
    config: QuantizationConfig,
    strategy: Strategy,
    grid: TimeGrid,
    vocab: Vocabulary<T>,
}

impl<T: TokenId> NoteTokenizer<T> {
    /// Create a new tokenizer.
    ///
    /// ## Arguments
    /// * `config` - quantization parameters; validated eagerly.
    /// * `strategy` - the token layout.
    ///
    /// ## Returns
    /// The tokenizer, or a `Config` / `VocabSizeOverflow` error.
    pub fn new(
        config: QuantizationConfig,
        strategy: Strategy,
    ) -> NCResult<Self> {
        let grid = TimeGrid::new(&config)?;
        let vocab = Vocabulary::from_schedule(&strategy.token_kinds(&config), &config, &grid)?;

        log::debug!(
            "built {strategy} tokenizer: {} tokens, {} samples/bar",
            vocab.len(),
            grid.samples_per_bar(),
        );

        Ok(Self {
            config,
            strategy,
            grid,
            vocab,
        })
    }

    /// Get the quantization config.
    pub fn config(&self) -> &QuantizationConfig {
        &self.config
    }

    /// Get the strategy tag.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the derived time grid.
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &Vocabulary<T> {
        &self.vocab
    }

    /// Normalize one track's raw notes.
    ///
    /// ## Arguments
    /// * `raw` - the track's note events.
    /// * `ticks_per_beat` - the source's tick resolution.
    pub fn normalize(
        &self,
        raw: &[RawNote],
        ticks_per_beat: u32,
    ) -> NormalizeOutcome {
        normalize_notes(raw, &self.config, &self.grid, ticks_per_beat)
    }

    /// Render normalized notes back to raw events.
    ///
    /// ## Arguments
    /// * `notes` - normalized notes.
    /// * `ticks_per_beat` - the caller-chosen output resolution.
    pub fn denormalize(
        &self,
        notes: &[NormalizedNote],
        ticks_per_beat: u32,
    ) -> Vec<RawNote> {
        denormalize_notes(notes, &self.config, &self.grid, ticks_per_beat)
    }

    /// Encode canonical-sorted normalized notes.
    pub fn encode_notes(
        &self,
        notes: &[NormalizedNote],
    ) -> NCResult<TokenSequence<T>> {
        self.strategy.encode(notes, &self.vocab, &self.grid)
    }

    /// Decode a token sequence into normalized notes.
    ///
    /// ## Arguments
    /// * `sequence` - the token sequence.
    /// * `track` - program/drum metadata the stream does not carry.
    pub fn decode_tokens(
        &self,
        sequence: &TokenSequence<T>,
        track: &TrackInfo,
    ) -> NCResult<Vec<NormalizedNote>> {
        self.strategy.decode(sequence, &self.vocab, &self.grid, track)
    }

    /// Normalize and encode one raw track.
    pub fn encode_track(
        &self,
        raw: &[RawNote],
        ticks_per_beat: u32,
    ) -> NCResult<TokenSequence<T>> {
        let outcome = self.normalize(raw, ticks_per_beat);
        self.encode_notes(&outcome.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{check_is_send, check_is_sync};

    #[test]
    fn test_construction_rejects_bad_config() {
        let config = QuantizationConfig::default().with_num_velocities(0);
        assert!(NoteTokenizer::<u32>::new(config, Strategy::Remi).is_err());
    }

    #[test]
    fn test_tokenizer_is_shareable() {
        let tokenizer: NoteTokenizer<u32> =
            NoteTokenizer::new(QuantizationConfig::default(), Strategy::Remi).unwrap();
        check_is_send(&tokenizer);
        check_is_sync(&tokenizer);
    }

    #[test]
    fn test_encode_track_convenience() {
        let tokenizer: NoteTokenizer<u32> =
            NoteTokenizer::new(QuantizationConfig::default(), Strategy::MidiLike).unwrap();

        let raw = vec![RawNote {
            pitch: 60,
            velocity: 100,
            start_tick: 0,
            end_tick: 480,
            program: 0,
            is_drum: false,
        }];
        let sequence = tokenizer.encode_track(&raw, 480).unwrap();
        assert!(!sequence.is_empty());
    }
}
