//! # Vocabulary
//!
//! The bijection between token descriptions and integer ids for one
//! configuration + strategy pair. Ids are assigned contiguously in
//! schedule order, values ascending within each kind, so two builds
//! from equal configs are identical.

use crate::{
    config::QuantizationConfig,
    errors::{NCResult, NotechipperError},
    grid::TimeGrid,
    types::{hash_map_with_capacity, NCHashMap, TokenId},
    vocab::token_types::{EventFamily, Token, TokenKind},
};

/// Check that a vocab of `size` entries is indexable by `T`.
fn try_vocab_size<T: TokenId>(size: usize) -> NCResult<()> {
    match T::from_usize(size.saturating_sub(1)) {
        Some(_) => Ok(()),
        None => Err(NotechipperError::VocabSizeOverflow { size }),
    }
}

/// Bidirectional token id table.
#[derive(Debug, Clone)]
pub struct Vocabulary<T: TokenId> {
    /// id -> token; the id is the index.
    tokens: Vec<Token>,

    /// token -> id.
    ids: NCHashMap<Token, T>,
}

impl<T: TokenId> Vocabulary<T> {
    /// Enumerate every admissible token for one kind, values ascending.
    fn push_kind(
        tokens: &mut Vec<Token>,
        kind: TokenKind,
        config: &QuantizationConfig,
        grid: &TimeGrid,
    ) {
        use strum::IntoEnumIterator;

        match kind {
            TokenKind::Pad => tokens.push(Token::Pad),
            TokenKind::Bar => tokens.push(Token::Bar),
            TokenKind::Family => {
                tokens.extend(EventFamily::iter().map(Token::Family));
            }
            TokenKind::Position => {
                tokens.extend((0..grid.samples_per_bar()).map(Token::Position));
            }
            TokenKind::Pitch => {
                tokens.extend(config.pitch_range.clone().map(Token::Pitch));
            }
            TokenKind::NoteOn => {
                tokens.extend(config.pitch_range.clone().map(Token::NoteOn));
            }
            TokenKind::NoteOff => {
                tokens.extend(config.pitch_range.clone().map(Token::NoteOff));
            }
            TokenKind::Velocity => {
                tokens.extend((0..config.num_velocities).map(Token::Velocity));
            }
            TokenKind::Duration => {
                tokens.extend(grid.durations().iter().copied().map(Token::Duration));
            }
            TokenKind::TimeShift => {
                tokens.extend(grid.shift_values().into_iter().map(Token::TimeShift));
            }
            TokenKind::Chord => {
                tokens.extend(crate::chords::ChordQuality::iter().map(Token::Chord));
            }
        }
    }

    /// Build a vocabulary from a strategy's token-kind schedule.
    ///
    /// ## Arguments
    /// * `schedule` - the kinds, in id-assignment order.
    /// * `config` - quantization parameters.
    /// * `grid` - the derived time grid.
    ///
    /// ## Returns
    /// The vocabulary, or `VocabSizeOverflow` if `T` cannot index it.
    pub fn from_schedule(
        schedule: &[TokenKind],
        config: &QuantizationConfig,
        grid: &TimeGrid,
    ) -> NCResult<Self> {
        let mut tokens = Vec::new();
        for &kind in schedule {
            Self::push_kind(&mut tokens, kind, config, grid);
        }

        try_vocab_size::<T>(tokens.len())?;

        let mut ids = hash_map_with_capacity(tokens.len());
        for (id, &token) in tokens.iter().enumerate() {
            // from_usize cannot fail below the checked size.
            ids.insert(token, T::from_usize(id).unwrap());
        }

        Ok(Self { tokens, ids })
    }

    /// The number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens, in id order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// True if the vocabulary carries any token of `kind`.
    pub fn contains_kind(
        &self,
        kind: TokenKind,
    ) -> bool {
        self.tokens.iter().any(|t| t.kind() == kind)
    }

    /// Look up the id for a token description.
    ///
    /// ## Returns
    /// The id, or `UnknownValue` if the token is not in the vocabulary.
    pub fn token_to_id(
        &self,
        token: &Token,
    ) -> NCResult<T> {
        self.ids
            .get(token)
            .copied()
            .ok_or_else(|| NotechipperError::UnknownValue {
                token: token.to_string(),
            })
    }

    /// Look up the token description for an id.
    ///
    /// ## Returns
    /// The token, or `UnknownToken` if the id is not in the vocabulary.
    pub fn id_to_token(
        &self,
        id: T,
    ) -> NCResult<Token> {
        id.to_usize()
            .and_then(|i| self.tokens.get(i).copied())
            .ok_or(NotechipperError::UnknownToken {
                id: id.to_usize().unwrap_or(usize::MAX),
            })
    }

    /// Bulk token -> id conversion.
    pub fn tokens_to_ids(
        &self,
        tokens: &[Token],
    ) -> NCResult<Vec<T>> {
        tokens.iter().map(|t| self.token_to_id(t)).collect()
    }

    /// Bulk id -> token conversion.
    pub fn ids_to_tokens(
        &self,
        ids: &[T],
    ) -> NCResult<Vec<Token>> {
        ids.iter().map(|&id| self.id_to_token(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build<T: TokenId>(schedule: &[TokenKind]) -> NCResult<Vocabulary<T>> {
        let config = QuantizationConfig::default();
        let grid = TimeGrid::new(&config).unwrap();
        Vocabulary::from_schedule(schedule, &config, &grid)
    }

    #[test]
    fn test_ids_are_contiguous_and_deterministic() {
        type T = u32;
        let schedule = [TokenKind::Pitch, TokenKind::Velocity, TokenKind::Duration];

        let a: Vocabulary<T> = build(&schedule).unwrap();
        let b: Vocabulary<T> = build(&schedule).unwrap();
        assert_eq!(a.tokens(), b.tokens());

        // 88 pitches, then 32 velocities.
        assert_eq!(a.token_to_id(&Token::Pitch(21)).unwrap(), 0);
        assert_eq!(a.token_to_id(&Token::Pitch(108)).unwrap(), 87);
        assert_eq!(a.token_to_id(&Token::Velocity(0)).unwrap(), 88);

        for (id, &token) in a.tokens().iter().enumerate() {
            assert_eq!(a.token_to_id(&token).unwrap(), id as T);
            assert_eq!(a.id_to_token(id as T).unwrap(), token);
        }
    }

    #[test]
    fn test_unknown_lookups() {
        type T = u32;
        let vocab: Vocabulary<T> = build(&[TokenKind::Pitch]).unwrap();

        assert!(matches!(
            vocab.token_to_id(&Token::Pitch(10)),
            Err(NotechipperError::UnknownValue { .. })
        ));
        assert!(matches!(
            vocab.id_to_token(10_000),
            Err(NotechipperError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_vocab_size_overflow() {
        // 32 positions + 88 pitches + 96 durations + 97 shifts > 256.
        let result: NCResult<Vocabulary<u8>> = build(&[
            TokenKind::Position,
            TokenKind::Pitch,
            TokenKind::Duration,
            TokenKind::TimeShift,
        ]);
        assert!(matches!(
            result,
            Err(NotechipperError::VocabSizeOverflow { .. })
        ));
    }

    #[test]
    fn test_bulk_conversions() {
        type T = u16;
        let vocab: Vocabulary<T> = build(&[TokenKind::Pitch, TokenKind::Velocity]).unwrap();

        let tokens = vec![Token::Pitch(60), Token::Velocity(3), Token::Pitch(21)];
        let ids = vocab.tokens_to_ids(&tokens).unwrap();
        assert_eq!(vocab.ids_to_tokens(&ids).unwrap(), tokens);
    }
}
