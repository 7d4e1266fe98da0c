//! Services module

pub mod auth;
pub mod dice;

pub use auth::AuthService;
pub use dice::{roll_dice, DEFAULT_SIDES, MAX_DICE};
