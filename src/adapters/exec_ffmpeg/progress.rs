//! Progress estimation from ffmpeg's `-progress` key/value stream

use crate::utils::time::parse_time;

/// Turns `out_time_us` reports into completed fractions of the trimmed input
#[derive(Debug, Clone, Default)]
pub struct ProgressEstimator {
    trim_start: Option<f64>,
    trim_end: Option<f64>,
    input_duration: Option<f64>,
}

impl ProgressEstimator {
    /// Pick up the input-side trim window from an argument vector
    pub fn from_args(args: &[String]) -> Self {
        let input_index = args.iter().position(|arg| arg == "-i").unwrap_or(args.len());
        let input_side = &args[..input_index];
        let value_of = |flag: &str| {
            input_side
                .iter()
                .position(|arg| arg == flag)
                .and_then(|index| input_side.get(index + 1))
                .and_then(|value| parse_time(value).ok())
        };

        Self {
            trim_start: value_of("-ss"),
            trim_end: value_of("-to"),
            input_duration: None,
        }
    }

    /// Inspect a log line for the first input's `Duration:` header
    pub fn observe_log_line(&mut self, line: &str) {
        if self.input_duration.is_some() {
            return;
        }
        if let Some(rest) = line.trim_start().strip_prefix("Duration:") {
            let value = rest.split(',').next().unwrap_or_default().trim();
            self.input_duration = parse_time(value).ok();
        }
    }

    /// Seconds of output the command is expected to produce
    pub fn expected_duration(&self) -> Option<f64> {
        let end = self.trim_end.or(self.input_duration)?;
        let start = self.trim_start.unwrap_or(0.0);
        Some((end - start).max(0.0))
    }

    /// Fraction for a `-progress` line, when the line carries one
    pub fn observe_progress_line(&self, line: &str) -> Option<f64> {
        let (key, value) = line.trim().split_once('=')?;
        match key {
            // out_time_ms is in microseconds as well
            "out_time_us" | "out_time_ms" => {
                let micros: f64 = value.trim().parse().ok()?;
                let expected = self.expected_duration().filter(|duration| *duration > 0.0)?;
                Some((micros / 1_000_000.0 / expected).clamp(0.0, 1.0))
            }
            "progress" if value.trim() == "end" => Some(1.0),
            _ => None,
        }
    }
}
