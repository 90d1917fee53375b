pub mod models;
pub mod roster;

pub use models::{normalize_player_name, AuthorizationState, Credential, MatchRecord, Player, Summary};
pub use roster::{MatchSelection, RosterSnapshot};
