//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`.

pub mod admin;
pub mod create_market;
pub mod dashboard;
pub mod markets;
pub mod oauth_callback;
pub mod positions;
pub mod profile;
pub mod signin;
pub mod signup;
pub mod staking;
pub mod wallet;
