//! Core types, algorithms and trait definitions for Verbum.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the canon, the reference parser, the Strong's canonicalizer, the
//! gloss aligner and the query-time resolver; storage backends implement
//! [`store::ScriptureStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod align;
pub mod canon;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod reference;
pub mod resolve;
pub mod store;
pub mod strongs;

pub use error::{Error, Result};
pub use reference::{CanonicalReference, VerseScope, parse};
pub use strongs::{Language, StrongsNumber, canonicalize, canonicalize_strong};
