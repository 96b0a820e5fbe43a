//! # Onboard Cards
//!
//! Pure card builders. Every function here maps domain data to a card
//! payload (`serde_json::Value` inside a [`CardAttachment`]) — no I/O, no
//! clocks, deterministic for identical inputs. Delivery is the channel
//! crate's problem.

pub mod learning_plan;
pub mod pair_up;
pub mod survey;

pub use learning_plan::{learning_item_card, learning_plan_list_card};
pub use pair_up::pair_up_card;
pub use survey::survey_card;

/// Adaptive Card schema version used by all builders.
pub const ADAPTIVE_CARD_VERSION: &str = "1.2";

/// Bot command text sent back when a user asks to share feedback.
pub const SHARE_FEEDBACK_COMMAND: &str = "share feedback";

/// Bot command text sent back when a user pauses pair-up matches.
pub const PAUSE_MATCHES_COMMAND: &str = "pause all matches";
