//! Time parsing and formatting utilities

use crate::domain::errors::DomainError;

/// Parse a time string (`SS`, `MM:SS` or `HH:MM:SS`, fractional seconds allowed) to seconds
pub fn parse_time(time_str: &str) -> Result<f64, DomainError> {
    let parts = time_str
        .split(':')
        .map(|part| parse_component(part, time_str))
        .collect::<Result<Vec<f64>, DomainError>>()?;

    match parts.as_slice() {
        [seconds] => Ok(*seconds),
        [minutes, seconds] => Ok(minutes * 60.0 + seconds),
        [hours, minutes, seconds] => Ok(hours * 3600.0 + minutes * 60.0 + seconds),
        _ => Err(DomainError::InvalidFormat(time_str.to_string())),
    }
}

fn parse_component(part: &str, time_str: &str) -> Result<f64, DomainError> {
    part.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DomainError::InvalidFormat(time_str.to_string()))
}

/// Render seconds as a plain numeric string ("90", "12.5")
pub fn format_seconds(seconds: f64) -> String {
    format!("{}", seconds)
}

/// Format seconds to H:MM:SS.mmm for human-readable output
pub fn format_hms(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis % 3_600_000) / 60_000;
    let secs = (total_millis % 60_000) / 1000;
    let millis = total_millis % 1000;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}
