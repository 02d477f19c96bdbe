use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PersistError, Result};

/// Tunable thresholds for picking, editing and topology detection.
///
/// Distance thresholds are ratios of the mesh bounding-box diagonal, so the
/// same configuration works for outcrops of any scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Polyline hit-testing radius in select mode.
    pub selection_ratio: f64,
    /// Control point deletion radius in edit mode.
    pub delete_ratio: f64,
    /// Endpoint radius for joining two polylines in edit mode.
    pub join_ratio: f64,
    /// Maximum spacing between the two clicks of a double-click.
    pub double_click_ratio: f64,
    /// Maximum time between the two clicks of a double-click.
    #[serde(with = "seconds")]
    pub double_click_interval: Duration,
    /// Endpoint picking radius in topology mode.
    pub endpoint_pick_ratio: f64,
    /// τ = `tau_multiplier` × mean segment length.
    pub tau_multiplier: f64,
    /// Mean segment length assumed when no polyline has a segment.
    pub fallback_mean_spacing: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            selection_ratio: 0.008,
            delete_ratio: 0.003,
            join_ratio: 0.008,
            double_click_ratio: 0.05,
            double_click_interval: Duration::from_millis(500),
            endpoint_pick_ratio: 0.02,
            tau_multiplier: 2.0,
            fallback_mean_spacing: 0.01,
        }
    }
}

impl MapperConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or a value fails
    /// [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(PersistError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file written as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(PersistError::from)?;
        tracing::debug!("Loading mapper config: {}", path.display());
        Self::from_json_str(&json)
    }

    /// Checks that every ratio and constant is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let fields = [
            ("selection_ratio", self.selection_ratio),
            ("delete_ratio", self.delete_ratio),
            ("join_ratio", self.join_ratio),
            ("double_click_ratio", self.double_click_ratio),
            (
                "double_click_interval",
                self.double_click_interval.as_secs_f64(),
            ),
            ("endpoint_pick_ratio", self.endpoint_pick_ratio),
            ("tau_multiplier", self.tau_multiplier),
            ("fallback_mean_spacing", self.fallback_mean_spacing),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

/// Mesh-scaled distance thresholds derived from a [`MapperConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub selection: f64,
    pub delete: f64,
    pub join: f64,
    pub double_click: f64,
    pub endpoint_pick: f64,
}

impl Thresholds {
    /// Scales every ratio by the mesh diagonal.
    #[must_use]
    pub fn for_diagonal(config: &MapperConfig, diagonal: f64) -> Self {
        Self {
            selection: diagonal * config.selection_ratio,
            delete: diagonal * config.delete_ratio,
            join: diagonal * config.join_ratio,
            double_click: diagonal * config.double_click_ratio,
            endpoint_pick: diagonal * config.endpoint_pick_ratio,
        }
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TraceMapError;

    #[test]
    fn defaults_validate() {
        let config = MapperConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.tau_multiplier * config.fallback_mean_spacing - 0.02).abs() < 1e-12);
    }

    #[test]
    fn partial_json_overrides_named_fields_only() {
        let config =
            MapperConfig::from_json_str(r#"{ "join_ratio": 0.01, "double_click_interval": 0.25 }"#)
                .unwrap();
        assert!((config.join_ratio - 0.01).abs() < 1e-12);
        assert_eq!(config.double_click_interval, Duration::from_millis(250));
        assert!((config.selection_ratio - 0.008).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = MapperConfig::from_json_str(r#"{ "tau_multiplier": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TraceMapError::Config(ConfigError::NotPositive {
                field: "tau_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = MapperConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TraceMapError::Persist(PersistError::Json(_))));
    }

    #[test]
    fn thresholds_scale_with_diagonal() {
        let t = Thresholds::for_diagonal(&MapperConfig::default(), 100.0);
        assert!((t.selection - 0.8).abs() < 1e-12);
        assert!((t.delete - 0.3).abs() < 1e-12);
        assert!((t.join - 0.8).abs() < 1e-12);
        assert!((t.double_click - 5.0).abs() < 1e-12);
        assert!((t.endpoint_pick - 2.0).abs() < 1e-12);
    }
}
