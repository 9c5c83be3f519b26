// Range partitioning: tile a [start, end) span into query windows.

use chrono::{DateTime, Utc};

use subpulse_common::{Granularity, SubpulseError, TimeWindow};

/// Split `[start, end)` into contiguous, non-overlapping windows of one
/// granularity step, time-ascending. Boundaries begin at `start` and advance
/// strictly below `end`; when the span is not a whole multiple of the step,
/// the last window's end overshoots `end`.
///
/// With no granularity given, one is inferred from the span
/// (see [`Granularity::infer`]).
pub fn partition(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Option<Granularity>,
) -> Result<Vec<TimeWindow>, SubpulseError> {
    if start >= end {
        return Err(SubpulseError::EmptyRange(format!(
            "start {start} does not precede end {end}"
        )));
    }

    let granularity = granularity.unwrap_or_else(|| Granularity::infer(start, end));
    let step = granularity.step();

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor < end {
        windows.push(TimeWindow {
            start: cursor,
            end: cursor + step,
        });
        cursor += step;
    }

    if windows.is_empty() {
        return Err(SubpulseError::EmptyRange(format!(
            "no {granularity:?} windows fit between {start} and {end}"
        )));
    }

    Ok(windows)
}
