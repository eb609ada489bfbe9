//! Shared record types for the DKP bot

pub mod classes;
pub mod player;

pub use classes::ClassSet;
pub use player::{canonical_name, identity_key, parse_points, title_case, Player, PlayerGroup};
