use anyhow::{bail, Result};
use chrono::{TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Zoom levels offered by the grid, in pixels per hour.
pub const ZOOM_LEVELS: [u32; 5] = [60, 80, 100, 120, 150];

/// Geometry of the day grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GridLayout {
    /// Local hour drawn in the first row. Negative values start on the previous
    /// evening, e.g. `-1` for week views that begin at 23:00.
    pub first_hour: i32,
    pub pixels_per_hour: f64,
    /// Space above the first hour row.
    pub header_height: f64,
    /// Blocks never render shorter than this, whatever the zoom.
    pub min_block_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            first_hour: 0,
            pixels_per_hour: 60.0,
            header_height: 32.0,
            min_block_height: 4.0,
        }
    }
}

impl GridLayout {
    /// Layout at one of the [`ZOOM_LEVELS`].
    pub fn with_zoom(self, pixels_per_hour: u32) -> Result<Self> {
        if !ZOOM_LEVELS.contains(&pixels_per_hour) {
            bail!("unsupported zoom {pixels_per_hour}px/h; expected one of {ZOOM_LEVELS:?}");
        }
        Ok(Self {
            pixels_per_hour: f64::from(pixels_per_hour),
            ..self
        })
    }

    /// Full scrollable height: header plus 24 hour rows.
    pub fn grid_height(&self) -> f64 {
        self.header_height + 24.0 * self.pixels_per_hour
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BlockPosition {
    pub top: f64,
    pub height: f64,
}

/// An item paired with its place on the grid.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Positioned<T> {
    #[serde(flatten)]
    pub item: T,
    pub top: f64,
    pub height: f64,
}

impl<T> Positioned<T> {
    pub fn new(item: T, position: BlockPosition) -> Self {
        Self {
            item,
            top: position.top,
            height: position.height,
        }
    }
}

/// Vertical offset and height of an event on the grid.
///
/// The hour row is the event's local hour counted from `layout.first_hour`,
/// wrapping within the 24 rows. Zoom is taken as given. Returns `None` only
/// for timestamps chrono cannot represent.
pub fn position<Tz: TimeZone>(
    timestamp: i64,
    duration_secs: f64,
    layout: &GridLayout,
    tz: &Tz,
) -> Option<BlockPosition> {
    let local = Utc.timestamp_opt(timestamp, 0).single()?.with_timezone(tz);
    let hour_offset = (local.hour() as i32 - layout.first_hour).rem_euclid(24);
    let minute_of_hour = f64::from(local.minute());

    let top = layout.header_height
        + f64::from(hour_offset) * layout.pixels_per_hour
        + (minute_of_hour / 60.0) * layout.pixels_per_hour;
    let height = (duration_secs.max(0.0) / 3600.0 * layout.pixels_per_hour)
        .max(layout.min_block_height);

    Some(BlockPosition { top, height })
}
