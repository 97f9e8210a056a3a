use crate::error::{ChunkerError, Result};
use std::time::{Duration, Instant};

/// Hard ceiling on document length: 50 MiB worth of characters.
pub const MAX_DOCUMENT_CHARS: usize = 50 * 1024 * 1024;

pub const DEFAULT_MAX_HEADER_DEPTH: usize = 10;

pub const DEFAULT_SLOW_RUN_WARNING_SECS: u64 = 30;

pub const DEFAULT_MEMORY_GROWTH_WARNING_BYTES: u64 = 100 * 1024 * 1024;

/// Reject documents longer than `max_chars` characters.
///
/// Byte length bounds character length from above, so the character count
/// is only taken when the byte length is over the limit.
pub fn check_document_size(content: &str, max_chars: usize) -> Result<usize> {
    if content.len() <= max_chars {
        return Ok(content.chars().count());
    }
    let chars = content.chars().count();
    if chars > max_chars {
        return Err(ChunkerError::InputTooLarge {
            chars,
            max: max_chars,
        });
    }
    Ok(chars)
}

/// Upper bound on fixed-size windowing steps.
///
/// A zero advance means the window cannot make real progress, so the
/// bound collapses to its floor.
#[must_use]
pub fn fixed_size_iteration_bound(total_chars: usize, advance: usize) -> usize {
    if advance == 0 {
        return 10;
    }
    (total_chars / advance + 5).max(10)
}

/// Allocate a string buffer, reporting exhaustion instead of aborting.
pub fn try_string_with_capacity(capacity: usize) -> Result<String> {
    let mut buf = String::new();
    buf.try_reserve(capacity)?;
    Ok(buf)
}

/// Allocate a vector, reporting exhaustion instead of aborting.
pub fn try_vec_with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve(capacity)?;
    Ok(out)
}

fn resident_bytes_linux_best_effort() -> Option<u64> {
    let contents = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in contents.lines() {
        let line = line.trim_start();
        if !line.starts_with("VmRSS:") {
            continue;
        }
        let kb = line
            .split_whitespace()
            .nth(1)
            .and_then(|v| v.parse::<u64>().ok())?;
        return Some(kb * 1024);
    }
    None
}

/// Observed cost of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub elapsed: Duration,
    pub memory_growth_bytes: Option<u64>,
    pub slow: bool,
    pub memory_heavy: bool,
}

/// Watches wall-clock time and resident memory across one run.
///
/// Crossing a threshold is logged, never an error.
#[derive(Debug)]
pub struct RunMonitor {
    started: Instant,
    resident_at_start: Option<u64>,
    slow_after: Duration,
    memory_warning_bytes: u64,
}

impl RunMonitor {
    #[must_use]
    pub fn start(slow_after_secs: u64, memory_warning_bytes: u64) -> Self {
        Self {
            started: Instant::now(),
            resident_at_start: resident_bytes_linux_best_effort(),
            slow_after: Duration::from_secs(slow_after_secs),
            memory_warning_bytes,
        }
    }

    pub fn finish(self, label: &str) -> RunReport {
        let elapsed = self.started.elapsed();
        let memory_growth_bytes = self
            .resident_at_start
            .zip(resident_bytes_linux_best_effort())
            .map(|(before, after)| after.saturating_sub(before));

        let report = RunReport {
            elapsed,
            memory_growth_bytes,
            slow: elapsed > self.slow_after,
            memory_heavy: memory_growth_bytes
                .is_some_and(|grown| grown > self.memory_warning_bytes),
        };

        if report.slow {
            log::warn!(
                "Chunking {label} took {:.1}s (threshold {}s)",
                elapsed.as_secs_f64(),
                self.slow_after.as_secs()
            );
        }
        if report.memory_heavy {
            log::warn!(
                "Chunking {label} grew resident memory by {} bytes (threshold {})",
                memory_growth_bytes.unwrap_or_default(),
                self.memory_warning_bytes
            );
        }

        report
    }
}
