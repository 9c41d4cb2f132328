//! Scale-bar geometry for map panels.
//!
//! Everything here is plain coordinate arithmetic over a projected extent.
//! Drawing the bar, its label and the north arrow is the backend's job; this
//! module only decides where they go and how long the bar is.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};
use crate::geo::{Projector, utm_zone};
use crate::geometry::Extent;

// Anchor fractions of the metric extent. These are the visual contract of
// the bar, not tuning knobs.
const BAR_END_X: f64 = 0.95;
const BAR_Y: f64 = 0.04;
const LABEL_RAISE: f64 = 0.01;
const NORTH_ARROW_X: f64 = 0.97;
const NORTH_ARROW_Y: f64 = 0.90;
const WEST_INSET_X: f64 = 0.03;

/// Length unit of a scale bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kilometers,
    Meters,
}

impl Unit {
    pub const fn meters_per_unit(&self) -> f64 {
        match self {
            Self::Kilometers => 1000.0,
            Self::Meters => 1.0,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Meters => "m",
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::Kilometers
    }
}

impl FromStr for Unit {
    type Err = FigureError;

    fn from_str(text: &str) -> Result<Self> {
        Ok(match text {
            "km" | "kilometers" => Self::Kilometers,
            "m" | "meters" => Self::Meters,
            other => return Err(FigureError::UnsupportedUnit(other.to_string())),
        })
    }
}

/// Relative placement of the bar within the panel, as fractions of the
/// extent. `(0.95, 0.04)` puts the bar end near the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: BAR_END_X,
            y: BAR_Y,
        }
    }
}

/// A computed scale bar in projected metric coordinates.
///
/// Computed fresh per panel at finalization time and never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleBar {
    /// Projection zone selected from the extent's centre longitude.
    pub zone: u8,
    /// Bar length, one of the fixed ladder `{10, 1, 0.1}`.
    pub length: f64,
    pub unit: Unit,
    /// Western end of the bar.
    pub start: (f64, f64),
    /// Eastern end of the bar.
    pub end: (f64, f64),
    /// Where the `"10 km"` style label sits, slightly above the bar.
    pub label_anchor: (f64, f64),
    /// Where the north arrow sits, near the top-right corner.
    pub north_arrow_anchor: (f64, f64),
    /// X coordinate of the west text inset, for attribution annotations.
    pub west_inset_x: f64,
    /// The reprojected extent the anchors were derived from.
    pub metric_extent: Extent,
}

impl ScaleBar {
    /// The bar's annotation text, e.g. `10 km` or `0.1 km`.
    pub fn label(&self) -> String {
        format!("{} {}", self.length, self.unit.label())
    }
}

/// Bar length in units for a metric extent width. Thresholds are
/// exclusive-lower on purpose: a width of exactly 15000 m takes the 1-unit
/// rung.
fn length_ladder(metric_width: f64) -> f64 {
    if metric_width > 15_000.0 {
        10.0
    } else if metric_width > 1500.0 {
        1.0
    } else {
        0.1
    }
}

/// Compute scale-bar geometry for a geographic extent.
///
/// Selects the projection zone from the extent's centre longitude, asks the
/// geodesy collaborator for the metric extent, picks the bar length from the
/// ladder, and places all anchors as affine combinations of the metric
/// corners. Fails with an invalid-extent error for degenerate input; no bar
/// should ever be drawn for such an extent.
pub fn compute_scalebar(
    extent: &Extent,
    projector: &dyn Projector,
    unit: Unit,
    placement: Placement,
) -> Result<ScaleBar> {
    extent.validate()?;
    let (center_lon, _) = extent.center();
    let zone = utm_zone(center_lon);

    let metric = projector.project(extent, zone)?;
    metric.validate()?;

    let length = length_ladder(metric.width());
    let end = metric.at(placement.x, placement.y);
    let start = (end.0 - length * unit.meters_per_unit(), end.1);
    let label_anchor = metric.at(placement.x, placement.y + LABEL_RAISE);
    let north_arrow_anchor = metric.at(NORTH_ARROW_X, NORTH_ARROW_Y);
    let west_inset_x = metric.at(WEST_INSET_X, 0.0).0;

    Ok(ScaleBar {
        zone,
        length,
        unit,
        start,
        end,
        label_anchor,
        north_arrow_anchor,
        west_inset_x,
        metric_extent: metric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Projector that multiplies both axes by a fixed factor, so expected
    /// anchor positions stay easy to compute by hand.
    struct ScaledProjector(f64);

    impl Projector for ScaledProjector {
        fn project(&self, extent: &Extent, _zone: u8) -> Result<Extent> {
            Ok(Extent::new(
                extent.x_min * self.0,
                extent.x_max * self.0,
                extent.y_min * self.0,
                extent.y_max * self.0,
            ))
        }
    }

    #[test]
    fn ladder_rungs() {
        assert_eq!(length_ladder(20_000.0), 10.0);
        assert_eq!(length_ladder(2000.0), 1.0);
        assert_eq!(length_ladder(500.0), 0.1);
    }

    #[test]
    fn ladder_thresholds_are_exclusive_lower() {
        assert_eq!(length_ladder(15_000.0), 1.0);
        assert_eq!(length_ladder(15_000.1), 10.0);
        assert_eq!(length_ladder(1500.0), 0.1);
        assert_eq!(length_ladder(1500.1), 1.0);
    }

    #[test]
    fn anchors_are_affine_combinations_of_the_metric_corners() {
        // 0.1 x 0.1 degrees, scaled by 200_000: a 20_000 m wide extent.
        let extent = Extent::new(0.0, 0.1, 0.0, 0.1);
        let bar = compute_scalebar(
            &extent,
            &ScaledProjector(200_000.0),
            Unit::Kilometers,
            Placement::default(),
        )
        .unwrap();

        assert_eq!(bar.length, 10.0);
        assert_eq!(bar.end, (19_000.0, 800.0));
        assert_eq!(bar.start, (19_000.0 - 10_000.0, 800.0));
        assert_eq!(bar.label_anchor, (19_000.0, 1000.0));
        assert_eq!(bar.north_arrow_anchor, (19_400.0, 18_000.0));
        assert_eq!(bar.west_inset_x, 600.0);
        assert_eq!(bar.label(), "10 km");
    }

    #[test]
    fn zone_comes_from_center_longitude() {
        let extent = Extent::new(9.0, 11.0, 49.0, 51.0);
        let bar = compute_scalebar(
            &extent,
            &ScaledProjector(1000.0),
            Unit::Kilometers,
            Placement::default(),
        )
        .unwrap();
        assert_eq!(bar.zone, utm_zone(10.0));
        assert_eq!(bar.zone, 32);
    }

    #[test]
    fn meters_unit_shortens_the_bar() {
        let extent = Extent::new(0.0, 0.1, 0.0, 0.1);
        let bar = compute_scalebar(
            &extent,
            &ScaledProjector(200_000.0),
            Unit::Meters,
            Placement::default(),
        )
        .unwrap();
        assert_eq!(bar.end.0 - bar.start.0, 10.0);
        assert_eq!(bar.label(), "10 m");
    }

    #[test]
    fn degenerate_extents_are_rejected() {
        let projector = ScaledProjector(1.0);
        for extent in [
            Extent::new(10.0, 5.0, 0.0, 1.0),
            Extent::new(0.0, 0.0, 0.0, 1.0),
        ] {
            let err = compute_scalebar(&extent, &projector, Unit::Kilometers, Placement::default())
                .unwrap_err();
            assert!(matches!(err, FigureError::InvalidExtent { .. }));
        }
    }

    #[test]
    fn degenerate_projection_output_is_rejected() {
        struct CollapsingProjector;
        impl Projector for CollapsingProjector {
            fn project(&self, _extent: &Extent, _zone: u8) -> Result<Extent> {
                Ok(Extent::new(0.0, 0.0, 0.0, 0.0))
            }
        }

        let extent = Extent::new(9.0, 11.0, 49.0, 51.0);
        assert!(
            compute_scalebar(
                &extent,
                &CollapsingProjector,
                Unit::Kilometers,
                Placement::default()
            )
            .is_err()
        );
    }

    #[test]
    fn unit_parsing() {
        assert_eq!("km".parse::<Unit>().unwrap(), Unit::Kilometers);
        assert_eq!("meters".parse::<Unit>().unwrap(), Unit::Meters);
        assert!(matches!(
            "furlongs".parse::<Unit>(),
            Err(FigureError::UnsupportedUnit(_))
        ));
    }

    #[test]
    fn repeated_computation_is_bit_identical() {
        let extent = Extent::new(9.0, 11.0, 49.0, 51.0);
        let projector = ScaledProjector(111_320.0);
        let first =
            compute_scalebar(&extent, &projector, Unit::Kilometers, Placement::default()).unwrap();
        let second =
            compute_scalebar(&extent, &projector, Unit::Kilometers, Placement::default()).unwrap();
        assert_eq!(first, second);
    }
}
