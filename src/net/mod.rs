//! Browser bindings for the `platform` client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! `browser` implements the transport, storage, navigation and timer seams
//! over `gloo-net`, `localStorage`, `window.location` and `gloo-timers`.
//! Everything above this module is written against the `platform` types.

pub mod browser;
pub mod files;
