pub mod leaderboard;
pub mod payout;
pub mod range;
pub mod settings;

pub use leaderboard::*;
pub use payout::payout_for;
pub use range::{parse_date, resolve_range, window_from_api_value};
pub use settings::*;
