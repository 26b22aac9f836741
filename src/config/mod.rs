// SPDX-License-Identifier: MPL-2.0
//! This module handles the engine configuration, including loading and saving
//! it from an `overlays.toml` file.
//!
//! Responsive rules are stored as an array of tables. Each entry names the
//! region it applies to, the breakpoint query, an optional destination and
//! the constraints active while the query matches:
//!
//! ```toml
//! root_id = "rom-portal"
//! recalculate_interval_ms = 500
//!
//! [[rules]]
//! region = "TOP_RIGHT"
//! query = "(max-width: 600px)"
//! destination = "TOP_FULL_WIDTH"
//! constraints = [{ type = "MAX_ITEMS", max = 3 }]
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use overlay_regions::config::{self, EngineConfig};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.stagger_step_ms = 0;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::{InsetDebounce, RecalculateInterval, Region, StaggerStep};
use crate::error::Result;
use crate::layout::responsive::{BreakpointRule, Constraint, ResponsiveRules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "overlays.toml";
const APP_NAME: &str = "OverlayRegions";

/// One responsive rule as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Region the rule applies to (the overlay's requested region).
    pub region: Region,
    /// Viewport query, evaluated by the embedder's viewport.
    pub query: String,
    /// Where matching overlays go. Absent means they stay put.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Region>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl RuleEntry {
    fn to_rule(&self) -> BreakpointRule {
        BreakpointRule {
            query: self.query.clone(),
            destination: self.destination,
            constraints: self.constraints.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identifier of the rendering root; containers are `{root_id}_{REGION}`.
    pub root_id: String,
    /// Regions that receive a container. Overlays resolved elsewhere are not shown.
    pub regions: Vec<Region>,
    pub recalculate_interval_ms: u64,
    pub inset_debounce_ms: u64,
    pub stagger_step_ms: u64,
    pub rules: Vec<RuleEntry>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            regions: Region::ALL.to_vec(),
            recalculate_interval_ms: DEFAULT_RECALCULATE_INTERVAL_MS,
            inset_debounce_ms: DEFAULT_INSET_DEBOUNCE_MS,
            stagger_step_ms: DEFAULT_STAGGER_STEP_MS,
            rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Config`] if the text is not valid TOML
    /// or names a region that does not exist.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Appends a responsive rule for `region`.
    #[must_use]
    pub fn with_rule(mut self, region: Region, rule: BreakpointRule) -> Self {
        self.rules.push(RuleEntry {
            region,
            query: rule.query,
            destination: rule.destination,
            constraints: rule.constraints,
        });
        self
    }

    #[must_use]
    pub fn recalculate_interval(&self) -> RecalculateInterval {
        RecalculateInterval::new(self.recalculate_interval_ms)
    }

    #[must_use]
    pub fn inset_debounce(&self) -> InsetDebounce {
        InsetDebounce::new(self.inset_debounce_ms)
    }

    #[must_use]
    pub fn stagger_step(&self) -> StaggerStep {
        StaggerStep::new(self.stagger_step_ms)
    }

    /// Builds the rule table, keeping the file order of entries per region.
    #[must_use]
    pub fn responsive_rules(&self) -> ResponsiveRules {
        let mut rules = ResponsiveRules::new();
        for entry in &self.rules {
            rules.push(entry.region, entry.to_rule());
        }
        rules
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the user's config directory.
///
/// Returns the default configuration when no file exists yet.
pub fn load() -> Result<EngineConfig> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(EngineConfig::default())
}

pub fn save(config: &EngineConfig) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a configuration file.
///
/// # Errors
///
/// Returns [`crate::error::Error::Io`] if the file cannot be read and
/// [`crate::error::Error::Config`] if it does not parse.
pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)?;
    EngineConfig::from_toml_str(&content)
}

pub fn save_to_path(config: &EngineConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
