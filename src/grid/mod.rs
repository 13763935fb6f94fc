//! Grid geometry: where blocks go, and how activity is condensed for display.

pub mod layout;
pub mod merge;
pub mod week;

pub use layout::{position, BlockPosition, GridLayout, Positioned, ZOOM_LEVELS};
pub use merge::{drop_short_activities, merge_consecutive};
pub use week::{week_blocks, week_day, week_start, week_summary, WeekDay, WeekSummary, WeekTimeBlock};
