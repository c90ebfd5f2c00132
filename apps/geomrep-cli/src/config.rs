use std::path::Path;

use geomrep_replicator::ReplicatorConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading a demo config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Demo scene settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of copies scattered over the field.
    pub replicas: usize,
    pub seed: u64,
    /// Side length of the square field, centred on the origin.
    pub area: f32,
    pub min_scale: f32,
    /// Scales are drawn from `[min_scale, min_scale + scale_range)`.
    pub scale_range: f32,
    /// Point every normal straight up so the field lights evenly.
    pub normals_up: bool,
    /// Copies stepped per wind tick.
    pub wind_batch: usize,
    pub wind_velocity: Vec3,
    /// Seconds a vertex sways out before easing back.
    pub wind_cycle: f32,
    pub replicator: ReplicatorConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            replicas: 10_000,
            seed: 42,
            area: 90.0,
            min_scale: 0.5,
            scale_range: 2.0,
            normals_up: true,
            wind_batch: 1_000,
            wind_velocity: Vec3::new(0.2, -0.2, 0.2),
            wind_cycle: 0.4,
            replicator: ReplicatorConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded demo config");
        Ok(config)
    }

    /// Reject values the replicator would panic on or that make no sense as a scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wind_batch == 0 {
            return Err(ConfigError::Invalid("wind_batch must be positive".into()));
        }
        if !self.area.is_finite() || self.area < 0.0 {
            return Err(ConfigError::Invalid(format!("area must not be negative, got {}", self.area)));
        }
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 || self.scale_range < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scales must be positive, got min {} range {}",
                self.min_scale, self.scale_range
            )));
        }
        if self.replicator.wind.step_interval.is_nan() || self.replicator.wind.step_interval < 0.0 {
            return Err(ConfigError::Invalid("wind step interval must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_demo_scene() {
        let config = DemoConfig::default();
        assert_eq!(config.replicas, 10_000);
        assert_eq!(config.area, 90.0);
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.scale_range, 2.0);
        config.validate().unwrap();
    }

    #[test]
    fn load_partial_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{ "replicas": 250, "wind_velocity": [1.0, 0.0, 0.0], "replicator": {{ "track_motion": false }} }}"#
        )
        .unwrap();

        let config = DemoConfig::load(tmp.path()).unwrap();
        assert_eq!(config.replicas, 250);
        assert_eq!(config.wind_velocity, Vec3::X);
        assert!(!config.replicator.track_motion);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = DemoConfig::load(tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_malformed_json() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ replicas: ").unwrap();
        let err = DemoConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_rejects_zero_batch() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "wind_batch": 0 }}"#).unwrap();
        let err = DemoConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("wind_batch"));
    }

    #[test]
    fn round_trips_through_json() {
        let config = DemoConfig {
            replicas: 3,
            normals_up: false,
            ..DemoConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: DemoConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
