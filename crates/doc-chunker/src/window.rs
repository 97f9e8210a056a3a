//! Fixed-size windowing over raw text.

use crate::config::ChunkingOptions;
use crate::error::{ChunkerError, Result};
use crate::limits::{fixed_size_iteration_bound, try_vec_with_capacity};
use crate::preserve::ProtectedText;

/// Byte offset `n` characters past `from`, clamped to the end of `text`
fn offset_after_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(idx, _)| from + idx)
}

/// `floor(n * 0.8)` without overflow
const fn four_fifths(n: usize) -> usize {
    n / 5 * 4 + n % 5 * 4 / 5
}

fn push_restored(
    protected: &ProtectedText,
    fragment: &str,
    windows: &mut Vec<String>,
) -> Result<()> {
    let restored = protected.restore(fragment);
    let trimmed = restored.trim();
    if !trimmed.is_empty() {
        windows.try_reserve(1)?;
        windows.push(trimmed.to_string());
    }
    Ok(())
}

/// Split `content` into overlapping windows of at most `max_chunk_size`
/// characters (more when a preserved span is restored into a window).
pub fn fixed_size_windows(content: &str, options: &ChunkingOptions) -> Result<Vec<String>> {
    let protected =
        ProtectedText::protect(content, options.preserve_code_blocks, options.preserve_tables);
    let text = protected.text();
    let total_chars = text.chars().count();
    if protected.span_count() > 0 {
        log::debug!(
            "Windowing {total_chars} chars around {} preserved span(s)",
            protected.span_count()
        );
    }

    let max = options.max_chunk_size.max(1);
    let overlap = options.overlap_chars();
    let guaranteed_advance = if overlap >= max {
        0
    } else {
        four_fifths(max).saturating_sub(overlap).max(1)
    };
    let max_iterations = fixed_size_iteration_bound(total_chars, guaranteed_advance);

    let mut windows = try_vec_with_capacity(total_chars / max + 1)?;
    let mut pos = 0;
    let mut pos_chars = 0;
    let mut iterations = 0;

    while pos < text.len() {
        iterations += 1;
        if iterations > max_iterations {
            log::warn!(
                "Fixed-size chunking stopped at iteration bound {max_iterations} ({total_chars} chars, overlap {overlap})"
            );
            return Err(ChunkerError::IterationLimit {
                iterations,
                max_iterations,
            });
        }

        let mut end = offset_after_chars(text, pos, max);
        if let Some(token) = protected.token_around(end) {
            end = token.end;
        }
        let reaches_end = end >= text.len();

        if !reaches_end {
            let window = &text[pos..end];
            if let Some(space) = window.rfind(' ') {
                if window[..space].chars().count() > four_fifths(max) {
                    end = pos + space;
                }
            }
        }

        let window = &text[pos..end];
        push_restored(&protected, window, &mut windows)?;
        if reaches_end {
            break;
        }

        let step = window.chars().count().saturating_sub(overlap).max(1);
        let mut next = offset_after_chars(text, pos, step);
        if let Some(emitted) = protected.last_token_end(pos..end) {
            next = next.max(emitted);
        }
        if let Some(token) = protected.token_around(next) {
            next = token.end;
        }
        pos_chars += text[pos..next].chars().count();
        pos = next;

        let remaining = total_chars - pos_chars;
        if pos < text.len() && remaining <= max && step.saturating_mul(10) < max {
            push_restored(&protected, &text[pos..], &mut windows)?;
            break;
        }
    }

    Ok(windows)
}
