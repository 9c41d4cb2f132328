//! Tick derivation for axis ranges.
//!
//! The generation contract is round-then-filter: the start and stop of the
//! candidate sequence are snapped to the nearest step multiple first, the
//! sequence is generated exclusive of the stop, and only then clipped to the
//! requested interval. Deriving ticks from raw values and rounding afterwards
//! produces different sequences and is deliberately not what happens here.

use crate::error::{FigureError, Result};
use crate::geometry::Extent;

/// Derive tick positions within `[a, b]` inclusive.
///
/// When `step` is omitted it becomes the order of magnitude of the span,
/// `10^floor(log10(|b - a|))`. The sequence starts at `round(a / step) * step`
/// and stops (exclusively) at `round(b / step) * step`.
pub fn guess_ticks(a: f64, b: f64, step: Option<f64>) -> Result<Vec<f64>> {
    if !a.is_finite() || !b.is_finite() || b <= a {
        return Err(FigureError::invalid_interval(a, b));
    }

    let step = match step {
        Some(value) if value.is_finite() && value > 0.0 => value,
        Some(value) => return Err(FigureError::InvalidTickStep(value)),
        None => 10f64.powf((b - a).log10().floor()),
    };

    let start = (a / step).round() * step;
    let stop = (b / step).round() * step;

    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    let mut ticks = Vec::with_capacity(count);
    for index in 0..count {
        let value = start + index as f64 * step;
        if value >= a && value <= b {
            ticks.push(value);
        }
    }
    Ok(ticks)
}

/// Tick positions for both axes of a geographic extent.
pub fn extent_ticks(extent: &Extent, step: Option<f64>) -> Result<(Vec<f64>, Vec<f64>)> {
    extent.validate()?;
    let xs = guess_ticks(extent.x_min, extent.x_max, step)?;
    let ys = guess_ticks(extent.y_min, extent.y_max, step)?;
    Ok((xs, ys))
}

/// Format tick values as `%.3f` degree labels.
///
/// Crowded axes are thinned: past seven labels, only every third survives and
/// the rest are blanked so the backend still places a tick mark without text.
pub fn degree_labels(ticks: &[f64]) -> Vec<String> {
    let mut labels: Vec<String> = ticks.iter().map(|tick| format!("{tick:.3}\u{b0}")).collect();
    if labels.len() > 7 {
        for (index, label) in labels.iter_mut().enumerate() {
            if index % 3 != 0 {
                label.clear();
            }
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(values: &[f64], expected: &[f64]) {
        assert_eq!(values.len(), expected.len(), "got {values:?}");
        for (value, want) in values.iter().zip(expected) {
            assert!((value - want).abs() < 1e-9, "got {values:?}");
        }
    }

    #[test]
    fn derives_step_from_order_of_magnitude() {
        let ticks = guess_ticks(0.0, 0.35, None).unwrap();
        assert_close(&ticks, &[0.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn values_past_the_interval_are_excluded() {
        let ticks = guess_ticks(0.0, 0.35, None).unwrap();
        assert!(ticks.iter().all(|t| *t <= 0.35));
    }

    #[test]
    fn explicit_step_is_respected() {
        let ticks = guess_ticks(9.0, 11.0, Some(0.5)).unwrap();
        assert_close(&ticks, &[9.0, 9.5, 10.0, 10.5]);
    }

    #[test]
    fn start_snaps_to_step_multiple() {
        let ticks = guess_ticks(0.07, 0.35, None).unwrap();
        assert_close(&ticks, &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn inverted_interval_is_rejected() {
        assert!(guess_ticks(1.0, 0.0, None).is_err());
        assert!(guess_ticks(5.0, 5.0, None).is_err());
    }

    #[test]
    fn non_positive_step_is_rejected() {
        assert!(matches!(
            guess_ticks(0.0, 1.0, Some(0.0)),
            Err(FigureError::InvalidTickStep(_))
        ));
        assert!(matches!(
            guess_ticks(0.0, 1.0, Some(-0.1)),
            Err(FigureError::InvalidTickStep(_))
        ));
    }

    #[test]
    fn extent_ticks_cover_both_axes() {
        let extent = Extent::new(9.0, 11.0, 49.0, 51.0);
        let (xs, ys) = extent_ticks(&extent, Some(1.0)).unwrap();
        assert_close(&xs, &[9.0, 10.0]);
        assert_close(&ys, &[49.0, 50.0]);
    }

    #[test]
    fn short_label_sets_are_untouched() {
        let labels = degree_labels(&[9.0, 9.1, 9.2]);
        assert_eq!(labels, vec!["9.000\u{b0}", "9.100\u{b0}", "9.200\u{b0}"]);
    }

    #[test]
    fn crowded_label_sets_keep_every_third() {
        let ticks: Vec<f64> = (0..9).map(f64::from).collect();
        let labels = degree_labels(&ticks);
        assert_eq!(labels[0], "0.000\u{b0}");
        assert_eq!(labels[1], "");
        assert_eq!(labels[2], "");
        assert_eq!(labels[3], "3.000\u{b0}");
        assert_eq!(labels[6], "6.000\u{b0}");
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let first = guess_ticks(0.0, 0.35, None).unwrap();
        let second = guess_ticks(0.0, 0.35, None).unwrap();
        assert_eq!(first, second);
    }
}
