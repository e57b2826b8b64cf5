//! Incremental search-and-replace engine for text editors.
//!
//! The engine turns a typed query plus a set of [`modes::ModeSet`] toggles
//! into live match feedback, navigates between matches and replaces them.
//! It drives an editor through the [`host::HostEditor`] trait and keeps a
//! per-query mode history that persists with the search term lists.

pub mod cli;
pub mod config;
pub mod controller;
pub mod history;
pub mod host;
pub mod modes;
pub mod output;
pub mod prefs;
pub mod replace;
pub mod search;
