//! Sync orchestration
//!
//! - `fetch`: GET, then upsert the returned object or array into the store
//! - `save`: POST (new record) or PUT (saved record with an id), then apply
//!   the response and save locally
//! - `destroy`: DELETE, then remove locally on success or when forced
//!
//! Configuration errors are returned as `Err`. Everything the network or the
//! server can get wrong comes back as an empty [`Outcome`](crate::outcome::Outcome).

mod action;
mod client;
mod response;

pub use action::{member_location, save_action, save_location, SaveAction};
pub use client::{DestroyOptions, Destroyed, SaveOptions, Saved, Syncer};
