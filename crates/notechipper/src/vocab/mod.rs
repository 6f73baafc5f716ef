//! # Vocabulary
//!
//! Token descriptions and the per-configuration id table.
//!
//! A [`Vocabulary`] is only stable for one configuration + strategy
//! pair; never assume ids are portable across configurations.

pub mod token_types;
pub mod vocabulary;

#[doc(inline)]
pub use token_types::{EventFamily, Token, TokenKind};
#[doc(inline)]
pub use vocabulary::Vocabulary;
