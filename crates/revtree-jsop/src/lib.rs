//! Token-stream reader for the textual node listing protocol.
//!
//! Stores answer node listings with a JSON-like blob:
//!
//! ```text
//! {"title":"home","tags":["a","b"],"child":{},":childNodeCount":1}
//! ```
//!
//! This crate does not build a document tree. It exposes the blob as a stream
//! of tokens through the [`JsopReader`] trait so that decoders can consume
//! exactly the structure they expect and fail at the first deviation.
//!
//! # Modules
//!
//! - [`token`] -- [`TokenKind`], the lexical categories
//! - [`reader`] -- The [`JsopReader`] trait
//! - [`tokenizer`] -- [`JsopTokenizer`], the lookahead implementation over `&str`
//! - [`error`] -- [`JsopError`]

pub mod error;
pub mod reader;
pub mod token;
pub mod tokenizer;

pub use error::{JsopError, JsopResult};
pub use reader::JsopReader;
pub use token::TokenKind;
pub use tokenizer::JsopTokenizer;
