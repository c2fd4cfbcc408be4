//! Core types for staycal.
//!
//! This crate turns a per-day booking status feed into calendar events:
//! - `day`: day records as delivered by a feed
//! - `store`: first-seen-wins merging of fetched day ranges
//! - `merger`: detection of stays and blocks, with per-day positions
//! - `view`: a month window that grows in both directions
//! - `source`, `feed`: where batches come from and how they are decoded

pub mod config;
pub mod constants;
pub mod day;
pub mod diagnostics;
pub mod error;
pub mod feed;
pub mod ics;
pub mod merger;
pub mod source;
pub mod store;
pub mod view;
pub mod window;

pub use day::{DayRecord, DayStatus, Reservation};
pub use diagnostics::Diagnostic;
pub use error::{StayCalError, StayCalResult};
pub use merger::{
    CalendarEvent, CalendarEventDay, EventId, EventMerge, EventPosition, EventType,
    compute_events,
};
pub use source::{DayBatch, DayRangeSource, FeedDirSource};
pub use store::{CalendarDataStore, MergeReport, Merged};
pub use view::CalendarView;
pub use window::DateWindow;
