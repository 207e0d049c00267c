//! Write transaction settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{TransactionError, TransactionResult};

/// Auto-commit thresholds of a write transaction.
///
/// ```toml
/// max_node_count = 1000
/// max_time_secs = 2.5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteTrxConfig {
    /// Commit once more than this many modifications are pending. 0 disables.
    pub max_node_count: u64,
    /// Commit on this period. `None` disables the worker.
    #[serde(
        rename = "max_time_secs",
        with = "seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_time: Option<Duration>,
}

impl WriteTrxConfig {
    pub fn from_toml_str(raw: &str) -> TransactionResult<Self> {
        toml::from_str(raw).map_err(|e| TransactionError::config(e.to_string()))
    }

    pub fn with_max_node_count(mut self, max_node_count: u64) -> Self {
        self.max_node_count = max_node_count;
        self
    }

    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = (!max_time.is_zero()).then_some(max_time);
        self
    }
}

/// Intervals as fractional seconds; zero means disabled.
mod seconds {
    use std::time::Duration;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(|d| d.as_secs_f64()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        match Option::<f64>::deserialize(deserializer)? {
            None => Ok(None),
            Some(secs) if secs.is_finite() && secs >= 0.0 => {
                Ok((secs > 0.0).then(|| Duration::from_secs_f64(secs)))
            }
            Some(secs) => Err(D::Error::custom(format!("invalid interval: {secs}"))),
        }
    }
}
