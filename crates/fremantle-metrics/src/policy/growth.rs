//! Year-over-year growth.

use super::{TRAILING_WINDOW, YOY_LAG, finite};
use crate::series::AlignedSeries;

/// Mean of `value[t] / value[t - 4] - 1` over the four most recent positions.
///
/// The series must span at least eight quarters and every one of those eight
/// values must be present. A single gap in the latest year or its year-ago
/// counterpart makes the whole average unavailable rather than averaging the
/// remaining quarters.
pub fn average_yoy_growth(series: &AlignedSeries) -> Option<f64> {
    let len = series.len();
    if len < TRAILING_WINDOW + YOY_LAG {
        return None;
    }

    let mut total = 0.0;
    for t in len - TRAILING_WINDOW..len {
        let current = series.get(t)?;
        let year_ago = series.get(t - YOY_LAG)?;
        if year_ago == 0.0 {
            return None;
        }
        total += current / year_ago - 1.0;
    }

    finite(total / TRAILING_WINDOW as f64)
}
