//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/shop.toml
//!
//! Every field has a default equal to the reference shop, so an empty or
//! missing file yields a working simulation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Largest waiting room accepted; the room's storage is allocated up front
pub const MAX_CAPACITY: usize = 10_000;
/// Largest staff accepted; each barber is its own task
pub const MAX_BARBERS: u32 = 1_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Waiting room chairs
    pub capacity: usize,
    /// Number of barbers
    pub barbers: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self { capacity: 4, barbers: 2 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BarberConfig {
    /// Chance (0-100) that an idle barber with no customer falls asleep
    pub sleep_chance_pct: u32,
    pub sleep_min_ms: u64,
    pub sleep_max_ms: u64,
    pub cut_min_ms: u64,
    pub cut_max_ms: u64,
    /// Pause before retrying the claim when neither serving nor sleeping
    pub idle_backoff_ms: u64,
}

impl Default for BarberConfig {
    fn default() -> Self {
        Self {
            sleep_chance_pct: 30,
            sleep_min_ms: 5000,
            sleep_max_ms: 10000,
            cut_min_ms: 2000,
            cut_max_ms: 3000,
            idle_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CustomersConfig {
    pub arrival_interval_ms: u64,
    /// Chance (0-100) that an arrival leaves when every barber is asleep
    pub all_asleep_leave_pct: u32,
}

impl Default for CustomersConfig {
    fn default() -> Self {
        Self { arrival_interval_ms: 2000, all_asleep_leave_pct: 50 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenegingConfig {
    pub tick_ms: u64,
    /// A waiting customer leaves with probability 1/one_in per tick
    pub one_in: u32,
}

impl Default for RenegingConfig {
    fn default() -> Self {
        Self { tick_ms: 1000, one_in: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub interval_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DayCycleConfig {
    pub enabled: bool,
    /// Customers issued per day
    pub batch_size: u64,
    /// Days to run (0 runs until shutdown)
    pub days: u64,
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self { enabled: false, batch_size: 20, days: 0 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RandomConfig {
    /// Fixed seed for reproducible runs (entropy when absent)
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub buffer: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { buffer: 1000 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TomlConfig {
    pub shop: ShopConfig,
    pub barber: BarberConfig,
    pub customers: CustomersConfig,
    pub reneging: RenegingConfig,
    pub stats: StatsConfig,
    pub day_cycle: DayCycleConfig,
    pub random: RandomConfig,
    pub events: EventsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    capacity: usize,
    barbers: u32,
    sleep_chance_pct: u32,
    sleep_min_ms: u64,
    sleep_max_ms: u64,
    cut_min_ms: u64,
    cut_max_ms: u64,
    idle_backoff_ms: u64,
    arrival_interval_ms: u64,
    all_asleep_leave_pct: u32,
    renege_tick_ms: u64,
    renege_one_in: u32,
    stats_interval_ms: u64,
    day_cycle_enabled: bool,
    batch_size: u64,
    days: u64,
    seed: Option<u64>,
    event_buffer: usize,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            capacity: toml_config.shop.capacity,
            barbers: toml_config.shop.barbers,
            sleep_chance_pct: toml_config.barber.sleep_chance_pct,
            sleep_min_ms: toml_config.barber.sleep_min_ms,
            sleep_max_ms: toml_config.barber.sleep_max_ms,
            cut_min_ms: toml_config.barber.cut_min_ms,
            cut_max_ms: toml_config.barber.cut_max_ms,
            idle_backoff_ms: toml_config.barber.idle_backoff_ms,
            arrival_interval_ms: toml_config.customers.arrival_interval_ms,
            all_asleep_leave_pct: toml_config.customers.all_asleep_leave_pct,
            renege_tick_ms: toml_config.reneging.tick_ms,
            renege_one_in: toml_config.reneging.one_in,
            stats_interval_ms: toml_config.stats.interval_ms,
            day_cycle_enabled: toml_config.day_cycle.enabled,
            batch_size: toml_config.day_cycle.batch_size,
            days: toml_config.day_cycle.days,
            seed: toml_config.random.seed,
            event_buffer: toml_config.events.buffer,
            config_file,
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/shop.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let config = Self::from_toml(toml_config, path.display().to_string());
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load(args: &[String]) -> Self {
        Self::load_from_path(&Self::resolve_config_path(args))
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            bail!("shop.capacity must be within 1-{}, got {}", MAX_CAPACITY, self.capacity);
        }
        if self.barbers == 0 || self.barbers > MAX_BARBERS {
            bail!("shop.barbers must be within 1-{}, got {}", MAX_BARBERS, self.barbers);
        }
        if self.sleep_chance_pct > 100 {
            bail!("barber.sleep_chance_pct must be within 0-100, got {}", self.sleep_chance_pct);
        }
        if self.all_asleep_leave_pct > 100 {
            bail!(
                "customers.all_asleep_leave_pct must be within 0-100, got {}",
                self.all_asleep_leave_pct
            );
        }
        if self.sleep_min_ms > self.sleep_max_ms {
            bail!("barber.sleep_min_ms ({}) exceeds sleep_max_ms ({})", self.sleep_min_ms, self.sleep_max_ms);
        }
        if self.cut_min_ms > self.cut_max_ms {
            bail!("barber.cut_min_ms ({}) exceeds cut_max_ms ({})", self.cut_min_ms, self.cut_max_ms);
        }
        if self.renege_one_in == 0 {
            bail!("reneging.one_in must be at least 1");
        }
        if self.renege_tick_ms == 0 || self.stats_interval_ms == 0 {
            bail!("reneging.tick_ms and stats.interval_ms must be positive");
        }
        if self.arrival_interval_ms == 0 {
            bail!("customers.arrival_interval_ms must be positive");
        }
        if self.idle_backoff_ms == 0 {
            bail!("barber.idle_backoff_ms must be positive");
        }
        if self.day_cycle_enabled && self.batch_size == 0 {
            bail!("day_cycle.batch_size must be at least 1");
        }
        if self.event_buffer == 0 {
            bail!("events.buffer must be at least 1");
        }
        Ok(())
    }

    // Getters for all config fields
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn barbers(&self) -> u32 {
        self.barbers
    }

    pub fn sleep_chance_pct(&self) -> u32 {
        self.sleep_chance_pct
    }

    pub fn sleep_min_ms(&self) -> u64 {
        self.sleep_min_ms
    }

    pub fn sleep_max_ms(&self) -> u64 {
        self.sleep_max_ms
    }

    pub fn cut_min_ms(&self) -> u64 {
        self.cut_min_ms
    }

    pub fn cut_max_ms(&self) -> u64 {
        self.cut_max_ms
    }

    pub fn idle_backoff_ms(&self) -> u64 {
        self.idle_backoff_ms
    }

    pub fn arrival_interval_ms(&self) -> u64 {
        self.arrival_interval_ms
    }

    pub fn all_asleep_leave_pct(&self) -> u32 {
        self.all_asleep_leave_pct
    }

    pub fn renege_tick_ms(&self) -> u64 {
        self.renege_tick_ms
    }

    pub fn renege_one_in(&self) -> u32 {
        self.renege_one_in
    }

    pub fn stats_interval_ms(&self) -> u64 {
        self.stats_interval_ms
    }

    pub fn day_cycle_enabled(&self) -> bool {
        self.day_cycle_enabled
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn event_buffer(&self) -> usize {
        self.event_buffer
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    // Builder methods for CLI overrides and tests

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_barbers(mut self, barbers: u32) -> Self {
        self.barbers = barbers;
        self
    }

    pub fn with_sleep_chance_pct(mut self, pct: u32) -> Self {
        self.sleep_chance_pct = pct;
        self
    }

    pub fn with_sleep_ms(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.sleep_min_ms = min_ms;
        self.sleep_max_ms = max_ms;
        self
    }

    pub fn with_cut_ms(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.cut_min_ms = min_ms;
        self.cut_max_ms = max_ms;
        self
    }

    pub fn with_idle_backoff_ms(mut self, ms: u64) -> Self {
        self.idle_backoff_ms = ms;
        self
    }

    pub fn with_arrival_interval_ms(mut self, ms: u64) -> Self {
        self.arrival_interval_ms = ms;
        self
    }

    pub fn with_all_asleep_leave_pct(mut self, pct: u32) -> Self {
        self.all_asleep_leave_pct = pct;
        self
    }

    pub fn with_reneging(mut self, tick_ms: u64, one_in: u32) -> Self {
        self.renege_tick_ms = tick_ms;
        self.renege_one_in = one_in;
        self
    }

    pub fn with_day_cycle(mut self, batch_size: u64, days: u64) -> Self {
        self.day_cycle_enabled = true;
        self.batch_size = batch_size;
        self.days = days;
        self
    }

    pub fn with_days(mut self, days: u64) -> Self {
        self.days = days;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
