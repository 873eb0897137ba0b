//! IO modules - what leaves the simulation core
//!
//! This module contains the outward-facing consumers of the core:
//! - `events` - Typed, non-blocking channel for shop events
//! - `narrator` - Console narration of shop events
//! - `reporting` - Periodic stats snapshots and the per-day reporting hook

pub mod events;
pub mod narrator;
pub mod reporting;

// Re-export commonly used types
pub use events::{create_event_channel, EventSender, ShopEvent};
pub use narrator::Narrator;
pub use reporting::{
    create_day_report_channel, ChannelDayReporter, DayReport, DayReporter, LogDayReporter,
    StatsReporter,
};
