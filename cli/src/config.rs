//! Configuration management for the inventory dashboard CLI
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with INVDASH__ prefix

use std::path::Path;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    FilterState, Granularity, SortDirection, SummaryStats, TurnoverSort, TurnoverSortKey,
    ViewOptions, DEFAULT_TOP_N,
};

/// Environment variable prefix; nested keys use `__`
pub const ENV_PREFIX: &str = "INVDASH";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Dashboard rendering defaults
    pub view: ViewConfig,

    /// Initial filter behaviour
    pub filter: FilterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// Rows kept in the turnover table
    pub top_n: usize,

    pub stock_granularity: Granularity,

    pub consumption_granularity: Granularity,

    /// Initial turnover sort column
    pub sort_key: TurnoverSortKey,

    pub sort_direction: SortDirection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilterConfig {
    /// Start from date bounds spanning the loaded data instead of no bounds
    pub seed_date_bounds: bool,
}

impl Config {
    /// Load configuration from `config/` and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var(format!("{}__ENVIRONMENT", ENV_PREFIX))
            .unwrap_or_else(|_| "development".into());
        Self::load_from(Path::new("config"), &environment)
    }

    /// Load configuration with files looked up in `config_dir`
    pub fn load_from(config_dir: &Path, environment: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("view.top_n", DEFAULT_TOP_N as u64)?
            .set_default("view.stock_granularity", "daily")?
            .set_default("view.consumption_granularity", "monthly")?
            .set_default("view.sort_key", TurnoverSortKey::Itr.as_str())?
            .set_default("view.sort_direction", SortDirection::Descending.as_str())?
            .set_default("filter.seed_date_bounds", true)?
            // Load environment-specific config file
            .add_source(File::from(config_dir.join(environment)).required(false))
            // Override with environment variables (INVDASH__ prefix)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// View options before any command-line overrides
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            stock_granularity: self.view.stock_granularity,
            consumption_granularity: self.view.consumption_granularity,
            turnover_sort: TurnoverSort::new(self.view.sort_key, self.view.sort_direction),
            top_n: self.view.top_n,
        }
    }

    /// Filter a freshly loaded dataset starts from
    pub fn initial_filter(&self, stats: &SummaryStats) -> FilterState {
        if self.filter.seed_date_bounds {
            FilterState::seeded(stats)
        } else {
            FilterState::cleared()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            view: ViewConfig::default(),
            filter: FilterConfig {
                seed_date_bounds: true,
            },
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        let options = ViewOptions::default();
        Self {
            top_n: options.top_n,
            stock_granularity: options.stock_granularity,
            consumption_granularity: options.consumption_granularity,
            sort_key: options.turnover_sort.key,
            sort_direction: options.turnover_sort.direction,
        }
    }
}
