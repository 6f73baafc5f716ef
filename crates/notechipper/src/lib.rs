//! # `notechipper` Symbolic Music Tokenizer
//!
//! `notechipper` converts symbolic music (timed note events per
//! instrument) into discrete token sequences for sequence models, and
//! back. It is the pure encode/decode engine: MIDI byte parsing,
//! dataset traversal, and persistence live outside it; the engine only
//! ever sees in-memory note and token collections.
//!
//! See:
//! * [`config`] for the quantization parameter bundle.
//! * [`grid`] for the derived time grid.
//! * [`normalize`] for raw-note canonicalization.
//! * [`vocab`] for token descriptions and id tables.
//! * [`strategies`] for the four token layouts.
//! * [`tokenizer`] for the combined facade.
//!
//! ## Example
//!
//! ```rust
//! use notechipper::{NoteTokenizer, QuantizationConfig, RawNote, Strategy, TrackInfo};
//!
//! let tokenizer = NoteTokenizer::<u32>::new(QuantizationConfig::default(), Strategy::Remi)?;
//!
//! let raw = vec![RawNote {
//!     pitch: 60,
//!     velocity: 100,
//!     start_tick: 0,
//!     end_tick: 480,
//!     program: 0,
//!     is_drum: false,
//! }];
//!
//! let outcome = tokenizer.normalize(&raw, 480);
//! let sequence = tokenizer.encode_notes(&outcome.notes)?;
//! let decoded = tokenizer.decode_tokens(&sequence, &TrackInfo::default())?;
//! assert_eq!(decoded, outcome.notes);
//! # Ok::<(), notechipper::NotechipperError>(())
//! ```
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``rayon``
//! * ``serde``
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap implementations for ``ahash``; which is a
//! performance win on many/(most?) modern CPUs.
//!
//! This is done by the ``types::NCHash{*}`` type alias machinery.
//!
//! #### feature: ``rayon``
//!
//! This enables batch per-track parallelism wrappers using the
//! ``rayon`` crate.
//!
//! #### feature: ``serde``
//!
//! This enables JSON persistence of [`QuantizationConfig`]. A stored
//! token sequence is only decodable alongside the exact config that
//! produced it, so the config must travel with the data.
#![warn(missing_docs, unused)]

pub mod chords;
pub mod config;
pub mod errors;
pub mod grid;
pub mod normalize;
pub mod note;
pub mod strategies;
pub mod tokenizer;
pub mod types;
pub mod vocab;

#[cfg(feature = "rayon")]
pub mod rayon;

#[doc(inline)]
pub use chords::{ChordEvent, ChordQuality};
#[doc(inline)]
pub use config::{AuxiliaryFlags, BeatResRange, QuantizationConfig};
#[doc(inline)]
pub use errors::{NCResult, NotechipperError};
#[doc(inline)]
pub use grid::TimeGrid;
#[doc(inline)]
pub use normalize::NormalizeOutcome;
#[doc(inline)]
pub use note::{NormalizedNote, RawNote, TrackInfo};
#[doc(inline)]
pub use strategies::{Strategy, TokenSequence};
#[doc(inline)]
pub use tokenizer::NoteTokenizer;
#[doc(inline)]
pub use types::TokenId;
#[doc(inline)]
pub use vocab::{Token, TokenKind, Vocabulary};
