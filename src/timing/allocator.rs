use crate::foundation::error::{ReelError, ReelResult};

/// A word (or caption fragment) with its absolute `[start, end)` time in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedUnit {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TimedUnit {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Share a window equally between the whitespace-separated words of `text`.
///
/// Units are contiguous and in reading order; the last one ends exactly at
/// `window_start + window_len`. Text without words yields no units.
pub fn allocate_block(text: &str, window_start: f64, window_len: f64) -> ReelResult<Vec<TimedUnit>> {
    if !window_start.is_finite() || window_start < 0.0 {
        return Err(ReelError::validation(format!(
            "caption window start {window_start} must be finite and >= 0"
        )));
    }
    if !window_len.is_finite() || window_len <= 0.0 {
        return Err(ReelError::validation(format!(
            "caption window length {window_len} must be finite and > 0"
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let share = window_len / words.len() as f64;
    let window_end = window_start + window_len;
    let last = words.len() - 1;
    let units = words
        .iter()
        .enumerate()
        .map(|(i, w)| TimedUnit {
            text: (*w).to_owned(),
            start: window_start + share * i as f64,
            end: if i == last {
                window_end
            } else {
                window_start + share * (i + 1) as f64
            },
        })
        .collect();
    Ok(units)
}

#[cfg(test)]
#[path = "../../tests/unit/timing/allocator.rs"]
mod tests;
