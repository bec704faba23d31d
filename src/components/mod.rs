//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render page chrome and shared widgets while reading/writing
//! shared state from Leptos context providers.

pub mod backend_gate;
pub mod market_card;
pub mod navbar;
pub mod staking_panel;
pub mod wallet_button;
