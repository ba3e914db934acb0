//! Decides what the page background shows and keeps it fresh.
//!
//! The [`Controller`] ties the persisted record, a random [`ImageSource`] and a
//! [`Display`] sink together. User actions arrive as [`Command`]s; the
//! [`RefreshTimer`] re-runs the load-and-decide pass on a fixed period.
//!
//! [`ImageSource`]: wallpaper_source::ImageSource

mod command;
mod controller;
mod display;
mod error;
mod prompt;
mod timer;

pub use command::{Command, Outcome};
pub use controller::{Controller, RefreshSettings, REFRESH_INTERVAL, STALE_AFTER};
pub use display::{Background, BackgroundState, Display};
pub use error::{ControllerError, Result};
pub use prompt::{AutoConfirm, Notice, Prompt};
pub use timer::RefreshTimer;
