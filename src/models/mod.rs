pub mod bundle;
pub mod dot;
pub mod events;
pub mod span;

pub use bundle::{DayBundle, EventCollection, EventFilters};
pub use dot::{DotType, NormalizedDot};
pub use events::{
    Activity, AwayPeriod, BrowserVisit, Commit, FileEvent, RawEvent, Screenshot, ShellCommand,
};
pub use span::TimeSpan;
