/// Live results for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            wpm: 0,
            accuracy: 100,
        }
    }
}

impl Metrics {
    pub fn compute(reference: &str, typed: &str, elapsed_secs: u64) -> Self {
        Self {
            wpm: words_per_minute(typed.chars().count(), elapsed_secs),
            accuracy: accuracy(reference, typed),
        }
    }
}

/// Gross WPM over everything typed so far. Zero until a full second has passed.
pub fn words_per_minute(typed_chars: usize, elapsed_secs: u64) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    // (n / 5) / (e / 60) == 12n / e; half-up rounding as floor((24n + e) / 2e)
    let n = typed_chars as u64;
    ((24 * n + elapsed_secs) / (2 * elapsed_secs)) as u32
}

/// Percentage of positionally matching characters over the compared prefix.
///
/// The compared prefix is `min(typed, reference)` characters long; with nothing
/// to compare the result is 100.
pub fn accuracy(reference: &str, typed: &str) -> u32 {
    let (compared, matching) = reference
        .chars()
        .zip(typed.chars())
        .fold((0usize, 0usize), |(compared, matching), (r, t)| {
            (compared + 1, matching + usize::from(r == t))
        });

    if compared == 0 {
        return 100;
    }
    ((matching as f64 / compared as f64) * 100.0).round() as u32
}
