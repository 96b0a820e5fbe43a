//! # Onboard Storage
//!
//! SQLite persistence for registered users — survives restarts, zero setup.
//! One table, written on bot install/uninstall events and opt-in toggles,
//! read by the notifiers.

pub mod users;

pub use users::UserStore;
