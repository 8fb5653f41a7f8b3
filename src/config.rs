use std::{error::Error, fmt, fs, io, path::Path};

use serde::Deserialize;

/// The configuration module's result type.
pub type Result<T> = std::result::Result<T, ConfigErr>;

/// Host configuration failures.
#[derive(Debug)]
pub enum ConfigErr {
    Io(io::Error),
    Parse(serde_json::Error),

    /// A knob sits outside its documented range. Out-of-range values are
    /// rejected, never clamped.
    OutOfRange {
        what: &'static str,
        got: f64,
        min: f64,
        max: f64,
    },
}

impl fmt::Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::Io(e) => write!(f, "io error: {e}"),
            ConfigErr::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigErr::OutOfRange {
                what,
                got,
                min,
                max,
            } => write!(f, "{what} must be between {min} and {max}, got {got}"),
        }
    }
}

impl Error for ConfigErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigErr::Io(e) => Some(e),
            ConfigErr::Parse(e) => Some(e),
            ConfigErr::OutOfRange { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Automaton page settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifeConfig {
    pub num_rows: usize,
    pub num_cols: usize,
    pub speed: u32,
    pub birth_rate: u8,
    pub death_rate: u8,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            num_rows: 15,
            num_cols: 35,
            speed: 50,
            birth_rate: 25,
            death_rate: 10,
        }
    }
}

/// Curve-fitting page settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    pub learning_rate: f32,
    pub degree: u8,
    /// Fixed training cadence in milliseconds.
    pub train_interval_ms: u64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            degree: 1,
            train_interval_ms: 50,
        }
    }
}

/// Clustering page settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfig {
    pub cluster_count: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { cluster_count: 2 }
    }
}

/// Whole-playground settings, one section per engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaygroundConfig {
    pub life: LifeConfig,
    pub fit: FitConfig,
    pub cluster: ClusterConfig,

    /// Seed for the injected random sources; omitted means OS entropy.
    pub seed: Option<u64>,
}

impl PlaygroundConfig {
    /// Loads a JSON config file. The caller validates separately.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Checks every knob against its documented range.
    pub fn validate(&self) -> Result<()> {
        range("life.num_rows", self.life.num_rows as f64, 1.0, 100.0)?;
        range("life.num_cols", self.life.num_cols as f64, 1.0, 100.0)?;
        range("life.speed", f64::from(self.life.speed), 1.0, 100.0)?;
        range("life.birth_rate", f64::from(self.life.birth_rate), 0.0, 100.0)?;
        range("life.death_rate", f64::from(self.life.death_rate), 0.0, 100.0)?;
        range(
            "fit.learning_rate",
            f64::from(self.fit.learning_rate),
            0.0,
            1.0,
        )?;
        range("fit.degree", f64::from(self.fit.degree), 1.0, 2.0)?;
        range(
            "fit.train_interval_ms",
            self.fit.train_interval_ms as f64,
            1.0,
            5000.0,
        )?;
        range(
            "cluster.cluster_count",
            self.cluster.cluster_count as f64,
            2.0,
            10.0,
        )?;
        Ok(())
    }
}

fn range(what: &'static str, got: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&got) {
        return Ok(());
    }

    Err(ConfigErr::OutOfRange {
        what,
        got,
        min,
        max,
    })
}
