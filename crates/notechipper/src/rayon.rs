//! # Rayon Utilities
//!
//! [`rayon`] powered helpers for batch per-track encode / decode.
//!
//! Tracks are independent: each call only reads the tokenizer's
//! immutable grid and vocabulary, so a plain parallel map is safe.

use rayon::prelude::*;

use crate::{
    errors::NCResult,
    note::{NormalizedNote, TrackInfo},
    strategies::TokenSequence,
    tokenizer::NoteTokenizer,
    types::TokenId,
};

/// Encode a batch of per-track note lists in parallel.
///
/// ## Returns
/// One token sequence per track, in input order; the first error, if
/// any call fails.
pub fn par_encode_tracks<T: TokenId>(
    tokenizer: &NoteTokenizer<T>,
    tracks: &[Vec<NormalizedNote>],
) -> NCResult<Vec<TokenSequence<T>>> {
    tracks
        .par_iter()
        .map(|notes| tokenizer.encode_notes(notes))
        .collect()
}

/// Decode a batch of `(sequence, track metadata)` pairs in parallel.
pub fn par_decode_tracks<T: TokenId>(
    tokenizer: &NoteTokenizer<T>,
    batch: &[(TokenSequence<T>, TrackInfo)],
) -> NCResult<Vec<Vec<NormalizedNote>>> {
    batch
        .par_iter()
        .map(|(sequence, track)| tokenizer.decode_tokens(sequence, track))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::QuantizationConfig,
        strategies::Strategy,
    };

    type T = u32;

    fn note(
        pitch: u8,
        start: u32,
    ) -> NormalizedNote {
        NormalizedNote {
            pitch,
            velocity: 16,
            start,
            duration: 8,
            program: 0,
            is_drum: false,
        }
    }

    #[test]
    fn test_parallel_roundtrip() {
        let tokenizer: NoteTokenizer<T> =
            NoteTokenizer::new(QuantizationConfig::default(), Strategy::Remi).unwrap();

        let tracks: Vec<Vec<NormalizedNote>> = (0..16)
            .map(|i| vec![note(60 + i, 0), note(64 + i, 8)])
            .collect();

        let sequences = par_encode_tracks(&tokenizer, &tracks).unwrap();
        assert_eq!(sequences.len(), tracks.len());

        let batch: Vec<(TokenSequence<T>, TrackInfo)> = sequences
            .into_iter()
            .map(|s| (s, TrackInfo::default()))
            .collect();
        let decoded = par_decode_tracks(&tokenizer, &batch).unwrap();
        assert_eq!(decoded, tracks);
    }
}
