//! Shared application state provided through Leptos context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` and the wallet state are reactive signals read by views. `services`
//! holds the non-`Send` `platform` objects that own the actual state and talk
//! to the server; views call them and mirror results into the signals.

pub mod auth;
pub mod services;
