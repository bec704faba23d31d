//! Utility helpers shared across UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Formatting and routing helpers kept out of page and component bodies so
//! they can be unit tested natively.

pub mod auth;
pub mod format;
