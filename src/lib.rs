//! Solo-friendly place picker.
//!
//! Loads a catalog of places (remote table first, static JSON fallback),
//! scores each place against the visitor's preferences and draws a few
//! matching entries at random. A contact relay forwards place suggestions to
//! a mailbox.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod engine;
pub mod output;
pub mod prefs;
pub mod server;
pub mod session;
