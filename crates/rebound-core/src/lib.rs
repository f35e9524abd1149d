#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared primitives for the rebound regex engine.
//!
//! The compiler and the matcher never inspect characters directly. Every
//! question about a character (is it a digit, what does it fold to, which
//! syntax role does it play) goes through a [`CharTraits`] object, so a
//! caller can swap in locale-aware behavior without touching either side.

mod colors;
mod default_traits;
mod traits;

pub use colors::Colors;
pub use default_traits::DefaultTraits;
pub use traits::{CharTraits, ClassMask, EscapeType, SyntaxType, is_separator};

#[cfg(test)]
mod traits_tests;
