//! Configuration management for the collaboration network analyzer

use crate::error::AnalysisError;

/// Default configuration for the collaboration network analyzer
pub struct Config {
    /// Number of highest-degree nodes to keep before community detection
    pub top_n: usize,

    /// Minimum modularity gain for the detection loop to keep running
    pub gain_tolerance: f64,

    /// Maximum number of aggregation levels
    pub max_levels: usize,

    /// Maximum number of local-moving sweeps per level
    pub max_sweeps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: 80,
            gain_tolerance: 1e-9,
            max_levels: 32,
            max_sweeps: 1_000,
        }
    }
}

impl Config {
    /// Create a new configuration with a custom top-N cutoff
    pub fn with_top_n(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::default()
        }
    }

    /// Check that every value is in its valid range
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.top_n == 0 {
            return Err(AnalysisError::InvalidConfiguration(
                "top_n must be positive".to_string(),
            ));
        }
        if self.gain_tolerance <= 0.0 {
            return Err(AnalysisError::InvalidConfiguration(
                "gain_tolerance must be positive".to_string(),
            ));
        }
        if self.max_levels == 0 || self.max_sweeps == 0 {
            return Err(AnalysisError::InvalidConfiguration(
                "iteration bounds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let config = Config::with_top_n(0);
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfiguration(_))
        ));
    }
}
