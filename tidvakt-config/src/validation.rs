//! Custom validation functions for configuration.

use validator::ValidationError;

use crate::simulator::CalendarConfig;

/// Validate a tracing level name.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("(?i)^(trace|debug|info|warn|error)$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level")
            .with_message("expected one of trace, debug, info, warn, error".into()))
    }
}

/// The calendar must start with at least as many buckets as it may shrink to.
pub fn validate_calendar(calendar: &CalendarConfig) -> Result<(), ValidationError> {
    if calendar.min_buckets > calendar.initial_buckets {
        return Err(ValidationError::new("min_buckets_exceeds_initial")
            .with_message("min_buckets must not exceed initial_buckets".into()));
    }
    Ok(())
}
