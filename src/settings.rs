use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::clustering::ClusterConfig;
use crate::grid::{GridLayout, ZOOM_LEVELS};
use crate::inference::MIN_ACTIVITY_SECS;
use crate::models::EventFilters;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceSettings {
    /// Shortest inferred activity interval, and the floor below which away
    /// periods are ignored.
    pub min_activity_secs: i64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            min_activity_secs: MIN_ACTIVITY_SECS,
        }
    }
}

/// Optional condensing of activity dots before rows are built.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupingSettings {
    pub enabled: bool,
    /// Same-app activities this close together become one block.
    pub continuity_merge_secs: i64,
    /// Activities shorter than this are hidden.
    pub min_duration_secs: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub layout: GridLayout,
    pub filters: EventFilters,
    pub clustering: ClusterConfig,
    pub inference: InferenceSettings,
    pub grouping: GroupingSettings,
}

impl Settings {
    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or unparsable.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = match serde_json::from_str::<Settings>(&contents) {
            Ok(settings) => settings,
            Err(err) => {
                log_warn!("ignoring unparsable settings in {}: {err}", path.display());
                Settings::default()
            }
        };
        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if !is_zoom_level(self.layout.pixels_per_hour) {
            log_warn!(
                "pixelsPerHour {} is not a zoom level; using {}",
                self.layout.pixels_per_hour,
                GridLayout::default().pixels_per_hour
            );
            self.layout.pixels_per_hour = GridLayout::default().pixels_per_hour;
        }
        self
    }
}

fn is_zoom_level(pixels_per_hour: f64) -> bool {
    ZOOM_LEVELS.iter().any(|level| f64::from(*level) == pixels_per_hour)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = Settings::load(&path)?;
        log_info!("settings loaded from {}", path.display());
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> Settings {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn layout(&self) -> GridLayout {
        self.data.read().unwrap_or_else(PoisonError::into_inner).layout
    }

    pub fn filters(&self) -> EventFilters {
        self.data.read().unwrap_or_else(PoisonError::into_inner).filters
    }

    pub fn clustering(&self) -> ClusterConfig {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clustering
    }

    pub fn inference(&self) -> InferenceSettings {
        self.data.read().unwrap_or_else(PoisonError::into_inner).inference
    }

    pub fn grouping(&self) -> GroupingSettings {
        self.data.read().unwrap_or_else(PoisonError::into_inner).grouping
    }

    /// Replace the layout. The zoom must be one of [`ZOOM_LEVELS`].
    pub fn update_layout(&self, layout: GridLayout) -> Result<()> {
        if !is_zoom_level(layout.pixels_per_hour) {
            return Err(anyhow!(
                "pixelsPerHour {} is not one of {ZOOM_LEVELS:?}",
                layout.pixels_per_hour
            ));
        }
        self.update(|settings| settings.layout = layout)
    }

    pub fn update_filters(&self, filters: EventFilters) -> Result<()> {
        self.update(|settings| settings.filters = filters)
    }

    pub fn update_clustering(&self, clustering: ClusterConfig) -> Result<()> {
        self.update(|settings| settings.clustering = clustering)
    }

    pub fn update_inference(&self, inference: InferenceSettings) -> Result<()> {
        self.update(|settings| settings.inference = inference)
    }

    pub fn update_grouping(&self, grouping: GroupingSettings) -> Result<()> {
        self.update(|settings| settings.grouping = grouping)
    }

    fn update(&self, apply: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        apply(&mut *guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    /// Re-read the file. Unlike [`SettingsStore::new`], a missing or invalid
    /// file is an error and the current settings are kept.
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", self.path.display()))?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data.sanitized();
        Ok(())
    }
}
