//! Synthetic workload parameters used by the command line driver.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct WorkloadConfig {
    /// Seed for the deterministic workload generator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of root events scheduled before the run starts.
    #[serde(default = "default_events")]
    #[validate(range(min = 1, max = 10_000_000))]
    pub events: usize,

    /// Upper bound (exclusive) for random delays, in ticks.
    #[serde(default = "default_max_delay")]
    #[validate(range(min = 1))]
    pub max_delay: i64,

    /// Probability that an executed event spawns a zero-delay follow-up.
    #[serde(default = "default_chain_probability")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub chain_probability: f64,

    /// Probability that an executed event cancels or removes a pending one.
    #[serde(default = "default_cancel_probability")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub cancel_probability: f64,

    /// Destroy-phase callbacks registered up front.
    #[serde(default = "default_destroy_callbacks")]
    #[validate(range(max = 10_000))]
    pub destroy_callbacks: usize,
}

fn default_seed() -> u64 {
    42
}

fn default_events() -> usize {
    10_000
}

fn default_max_delay() -> i64 {
    1_000
}

fn default_chain_probability() -> f64 {
    0.1
}

fn default_cancel_probability() -> f64 {
    0.05
}

fn default_destroy_callbacks() -> usize {
    4
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            events: default_events(),
            max_delay: default_max_delay(),
            chain_probability: default_chain_probability(),
            cancel_probability: default_cancel_probability(),
            destroy_callbacks: default_destroy_callbacks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probabilities_must_be_fractions() {
        let config = WorkloadConfig {
            chain_probability: 1.5,
            ..WorkloadConfig::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("chain_probability"));
    }

    #[test]
    fn empty_workload_is_rejected() {
        let config = WorkloadConfig {
            events: 0,
            ..WorkloadConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
