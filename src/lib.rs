//! Volunteer shift planning for a one-day event.
//!
//! A survey export becomes a [`roster::Roster`], a planning grid with
//! headcounts per role and hour becomes a [`grid::Grid`], and the
//! [`schedule::FillEngine`] writes names into the open seats. The
//! [`mail`] module turns the finished grid into per-volunteer emails.

pub mod config;
pub mod display;
pub mod error;
pub mod grid;
pub mod mail;
pub mod roster;
pub mod schedule;

pub use config::Config;
pub use error::{Error, Result};
