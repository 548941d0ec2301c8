//! Core engine for the auction server search bot.
//!
//! This crate is intentionally framework-agnostic: the menu tree, the
//! navigation state machine, the session store and the ephemeral reply
//! manager all talk to the outside world through the `MessagingPort` trait
//! implemented in the Telegram adapter crate.

pub mod config;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod formatting;
pub mod logging;
pub mod menu;
pub mod messaging;
pub mod navigator;
pub mod replies;
pub mod session;

pub use errors::{Error, Result};
