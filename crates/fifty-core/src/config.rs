//! Analysis and generator configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/fifty/config/fifty.toml)
//!    or an explicit path
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! The habit-formation constants (21/66/90 days, 0.6/0.4 blend) come from
//! the usual habit-formation rules of thumb and are kept configurable
//! rather than hard-coded.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/fifty.toml");

/// Aggregation settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Most recent records used for the recent completion rate
    pub recent_window: usize,
    /// Weight of the overall completion rate in the prediction
    pub overall_weight: f64,
    /// Weight of the recent completion rate in the prediction
    pub recent_weight: f64,
    /// Length of best / struggling goal lists
    pub top_goals: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recent_window: 7,
            overall_weight: 0.6,
            recent_weight: 0.4,
            top_goals: 3,
        }
    }
}

/// Habit-formation model settings
#[derive(Debug, Clone, PartialEq)]
pub struct FormationConfig {
    /// Last day (inclusive) of the forming stage
    pub forming_days: u32,
    /// Last day (inclusive) of the developing stage
    pub developing_days: u32,
    /// Automaticity at which a habit counts as established
    pub target_automaticity: f64,
    /// Maximum number of tracked days fed into the curve
    pub max_days: usize,
    pub min_projection_days: u32,
    pub max_projection_days: u32,
    pub motivation_floor: f64,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            forming_days: 21,
            developing_days: 66,
            target_automaticity: 90.0,
            max_days: 100,
            min_projection_days: 21,
            max_projection_days: 100,
            motivation_floor: 30.0,
        }
    }
}

/// Insight generator call settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub formation: FormationConfig,
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit override path (embedded defaults if it doesn't exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fifty").join("config").join("fifty.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = match override_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(ref p) if p.exists() => {
            debug!(path = %p.display(), "Loading config override");
            fs::read_to_string(p)
                .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
    formation: Option<RawFormation>,
    generator: Option<RawGenerator>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    recent_window: Option<usize>,
    overall_weight: Option<f64>,
    recent_weight: Option<f64>,
    top_goals: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawFormation {
    forming_days: Option<u32>,
    developing_days: Option<u32>,
    target_automaticity: Option<f64>,
    max_days: Option<usize>,
    min_projection_days: Option<u32>,
    max_projection_days: Option<u32>,
    motivation_floor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGenerator {
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(analysis) = raw.analysis {
        let target = &mut config.analysis;
        if let Some(window) = analysis.recent_window {
            target.recent_window = window;
        }
        if let Some(weight) = analysis.overall_weight {
            target.overall_weight = weight;
        }
        if let Some(weight) = analysis.recent_weight {
            target.recent_weight = weight;
        }
        if let Some(top) = analysis.top_goals {
            target.top_goals = top;
        }
    }

    if let Some(formation) = raw.formation {
        let target = &mut config.formation;
        if let Some(days) = formation.forming_days {
            target.forming_days = days;
        }
        if let Some(days) = formation.developing_days {
            target.developing_days = days;
        }
        if let Some(level) = formation.target_automaticity {
            target.target_automaticity = level;
        }
        if let Some(days) = formation.max_days {
            target.max_days = days;
        }
        if let Some(days) = formation.min_projection_days {
            target.min_projection_days = days;
        }
        if let Some(days) = formation.max_projection_days {
            target.max_projection_days = days;
        }
        if let Some(floor) = formation.motivation_floor {
            target.motivation_floor = floor;
        }
    }

    if let Some(generator) = raw.generator {
        let target = &mut config.generator;
        if let Some(secs) = generator.timeout_secs {
            target.timeout = Duration::from_secs(secs);
        }
        if let Some(temp) = generator.temperature {
            target.temperature = temp;
        }
        if let Some(tokens) = generator.max_tokens {
            target.max_tokens = tokens;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let analysis = &config.analysis;
    if analysis.recent_window == 0 {
        return Err(Error::InvalidData(
            "analysis.recent_window must be at least 1".into(),
        ));
    }
    if analysis.overall_weight < 0.0 || analysis.recent_weight < 0.0 {
        return Err(Error::InvalidData(
            "analysis.overall_weight and analysis.recent_weight must not be negative".into(),
        ));
    }
    let formation = &config.formation;
    if !(formation.target_automaticity > 0.0 && formation.target_automaticity < 100.0) {
        return Err(Error::InvalidData(
            "formation.target_automaticity must be between 0 and 100 (exclusive)".into(),
        ));
    }
    if !(0.0..=100.0).contains(&formation.motivation_floor) {
        return Err(Error::InvalidData(
            "formation.motivation_floor must be between 0 and 100".into(),
        ));
    }
    if formation.max_days == 0 {
        return Err(Error::InvalidData(
            "formation.max_days must be at least 1".into(),
        ));
    }
    if formation.forming_days >= formation.developing_days {
        return Err(Error::InvalidData(
            "formation.forming_days must be below formation.developing_days".into(),
        ));
    }
    if formation.min_projection_days > formation.max_projection_days {
        return Err(Error::InvalidData(
            "formation.min_projection_days must not exceed max_projection_days".into(),
        ));
    }
    Ok(())
}
