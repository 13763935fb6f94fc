//! Row aggregator: merges dots into named lanes for the grid view.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::log_debug;
use crate::models::NormalizedDot;

const ENABLE_LOGS: bool = false;

/// Lanes pinned after all application rows, in display order.
pub const SPECIAL_LANES: [&str; 6] = ["Git", "Shell", "Browser", "Files", "Breaks", "Screenshots"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub name: String,
    pub dot_count: usize,
    pub dots: Vec<NormalizedDot>,
}

impl Row {
    pub fn is_special(&self) -> bool {
        special_lane_index(&self.name.to_lowercase()).is_some()
    }
}

/// Per-key state built during one aggregation pass.
struct RowAccumulator {
    display_name: String,
    has_capitalized: bool,
    dots: Vec<NormalizedDot>,
}

impl RowAccumulator {
    fn new(row_key: &str) -> Self {
        Self {
            display_name: row_key.to_string(),
            has_capitalized: has_uppercase(row_key),
            dots: Vec::new(),
        }
    }

    /// The first capitalized spelling seen replaces an all-lowercase one.
    fn observe_name(&mut self, row_key: &str) {
        if !self.has_capitalized && has_uppercase(row_key) {
            self.display_name = row_key.to_string();
            self.has_capitalized = true;
        }
    }

    fn into_row(self) -> Row {
        let mut dots = self.dots;
        dots.sort_by_key(|dot| dot.timestamp);
        Row {
            name: self.display_name,
            dot_count: dots.len(),
            dots,
        }
    }
}

/// Group dots case-insensitively by row key.
///
/// Application rows come first, busiest first (ties keep first-seen order),
/// followed by whichever special lanes are present in [`SPECIAL_LANES`] order.
pub fn aggregate(dots: &[NormalizedDot]) -> Vec<Row> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut accumulators: Vec<RowAccumulator> = Vec::new();

    for dot in dots {
        let key = dot.row_key.to_lowercase();
        let slot = *index.entry(key).or_insert_with(|| {
            accumulators.push(RowAccumulator::new(&dot.row_key));
            accumulators.len() - 1
        });
        let accumulator = &mut accumulators[slot];
        accumulator.observe_name(&dot.row_key);
        accumulator.dots.push(dot.clone());
    }

    let mut app_rows = Vec::new();
    let mut special_rows: Vec<(usize, Row)> = Vec::new();
    for accumulator in accumulators {
        let lane = special_lane_index(&accumulator.display_name.to_lowercase());
        let row = accumulator.into_row();
        match lane {
            Some(position) => special_rows.push((position, row)),
            None => app_rows.push(row),
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    app_rows.sort_by(|a, b| b.dot_count.cmp(&a.dot_count));
    special_rows.sort_by_key(|(position, _)| *position);

    log_debug!(
        "aggregated {} dots into {} app rows and {} special lanes",
        dots.len(),
        app_rows.len(),
        special_rows.len()
    );

    app_rows
        .into_iter()
        .chain(special_rows.into_iter().map(|(_, row)| row))
        .collect()
}

fn special_lane_index(lowercase_name: &str) -> Option<usize> {
    SPECIAL_LANES
        .iter()
        .position(|lane| lane.to_lowercase() == lowercase_name)
}

fn has_uppercase(value: &str) -> bool {
    value.chars().any(char::is_uppercase)
}
