//! Chess opening table and lookup.
//!
//! This crate stores named opening lines and answers two questions about a
//! game's move history:
//!
//! - [`OpeningBook::identify`] - which named opening does this game follow?
//! - [`OpeningBook::in_book`] - is the game still inside a known opening line?
//!
//! A small built-in table is provided via [`OpeningBook::builtin`]; custom
//! books can be loaded from JSON with [`OpeningBook::from_file`].

pub mod builtin;
pub mod database;
pub mod opening;

pub use database::{BookError, OpeningBook};
pub use opening::Opening;
