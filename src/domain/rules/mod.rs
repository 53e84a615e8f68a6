// Domain rules - Trim window policies

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::utils::time::{format_seconds, parse_time};

/// Trim end used when the source duration is unknown
pub const FALLBACK_TRIM_END: &str = "100";

/// Rules keeping the trim window consistent while either bound is edited
pub struct TrimRules;

impl TrimRules {
    /// Turn the start bound on, defaulting it to "0"
    pub fn enable_trim_start(options: &mut InputOptions) {
        options.trim_start.get_or_insert_with(|| "0".to_string());
    }

    /// Turn the end bound on, defaulting it to the source duration
    pub fn enable_trim_end(options: &mut InputOptions, duration: Option<f64>) {
        options.trim_end.get_or_insert_with(|| {
            duration
                .map(format_seconds)
                .unwrap_or_else(|| FALLBACK_TRIM_END.to_string())
        });
    }

    pub fn disable_trim_start(options: &mut InputOptions) {
        options.trim_start = None;
    }

    pub fn disable_trim_end(options: &mut InputOptions) {
        options.trim_end = None;
    }

    /// Set the start bound; an end at or before the new start is moved onto it
    pub fn set_trim_start(options: &mut InputOptions, value: &str) -> Result<(), DomainError> {
        let start = parse_time(value)?;
        let coerce_end = match &options.trim_end {
            Some(end) => start >= parse_time(end)?,
            None => false,
        };

        options.trim_start = Some(value.to_string());
        if coerce_end {
            options.trim_end = Some(value.to_string());
        }
        Ok(())
    }

    /// Set the end bound; a start at or after the new end is moved onto it
    pub fn set_trim_end(options: &mut InputOptions, value: &str) -> Result<(), DomainError> {
        let end = parse_time(value)?;
        let coerce_start = match &options.trim_start {
            Some(start) => parse_time(start)? >= end,
            None => false,
        };

        options.trim_end = Some(value.to_string());
        if coerce_start {
            options.trim_start = Some(value.to_string());
        }
        Ok(())
    }

    /// Range-slider position of the start bound in seconds
    pub fn start_position(options: &InputOptions) -> Result<f64, DomainError> {
        options.trim_start.as_deref().map_or(Ok(0.0), parse_time)
    }

    /// Range-slider position of the end bound in seconds
    pub fn end_position(options: &InputOptions, duration: f64) -> Result<f64, DomainError> {
        options.trim_end.as_deref().map_or(Ok(duration), parse_time)
    }

    /// Text shown in the start field
    pub fn start_display(options: &InputOptions) -> String {
        options
            .trim_start
            .clone()
            .unwrap_or_else(|| format_seconds(0.0))
    }

    /// Text shown in the end field
    pub fn end_display(options: &InputOptions, duration: f64) -> String {
        options
            .trim_end
            .clone()
            .unwrap_or_else(|| format_seconds(duration))
    }
}
