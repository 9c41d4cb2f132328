//! Per-panel cosmetic options and the defaults cascade.
//!
//! Options left unset on a panel fall back to figure-level defaults; the
//! panel value wins when both are present. Cascading happens once, at panel
//! finalization, and produces a fully resolved [`PanelStyle`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Extent;

/// Title font size applied by backends, matching the house style.
pub const TITLE_FONT_SIZE: u32 = 10;
/// Grid line ink and opacity applied by backends.
pub const GRID_COLOR: &str = "k";
pub const GRID_ALPHA: f64 = 0.15;

/// Visible axis spines.
///
/// Parsed from `"lrtb"` subsets the way panel strings write them: `"lb"`
/// shows the left and bottom spines only. Characters outside `lrtb` are
/// ignored, mirroring the tolerant source convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spines {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Spines {
    pub const fn all() -> Self {
        Self {
            left: true,
            right: true,
            top: true,
            bottom: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            left: false,
            right: false,
            top: false,
            bottom: false,
        }
    }
}

impl Default for Spines {
    fn default() -> Self {
        Self {
            left: true,
            right: false,
            top: false,
            bottom: true,
        }
    }
}

impl FromStr for Spines {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            left: text.contains('l'),
            right: text.contains('r'),
            top: text.contains('t'),
            bottom: text.contains('b'),
        })
    }
}

/// Which axes receive grid lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLines {
    None,
    X,
    Y,
    Both,
}

impl Default for GridLines {
    fn default() -> Self {
        Self::Both
    }
}

impl FromStr for GridLines {
    type Err = std::convert::Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(match text {
            "x" => Self::X,
            "y" => Self::Y,
            "xy" | "both" => Self::Both,
            _ => Self::None,
        })
    }
}

/// Cosmetic options for one panel. Unset fields cascade to the figure's
/// [`PanelDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelOptions {
    pub title: Option<String>,
    pub spines: Option<Spines>,
    pub grid: Option<GridLines>,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub extent: Option<Extent>,
}

impl PanelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(text.into());
        self
    }

    pub fn spines(mut self, spines: Spines) -> Self {
        self.spines = Some(spines);
        self
    }

    pub fn grid(mut self, grid: GridLines) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn x_range(mut self, min: f64, max: f64) -> Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Resolve this panel's options against figure defaults.
    pub fn cascade(&self, defaults: &PanelDefaults) -> PanelStyle {
        PanelStyle {
            title: self.title.clone(),
            spines: self.spines.unwrap_or(defaults.spines),
            grid: self.grid.unwrap_or(defaults.grid),
            x_range: self.x_range.or(defaults.x_range),
            y_range: self.y_range.or(defaults.y_range),
            extent: self.extent.or(defaults.extent),
        }
    }
}

/// Figure-level fallback values for unset panel options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelDefaults {
    pub spines: Spines,
    pub grid: GridLines,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub extent: Option<Extent>,
}

/// Fully resolved cosmetics for one panel, ready to hand to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelStyle {
    pub title: Option<String>,
    pub spines: Spines,
    pub grid: GridLines,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub extent: Option<Extent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spines_parse_from_letter_sets() {
        let spines: Spines = "lb".parse().unwrap();
        assert!(spines.left && spines.bottom);
        assert!(!spines.right && !spines.top);

        let all: Spines = "lrtb".parse().unwrap();
        assert_eq!(all, Spines::all());

        let none: Spines = "".parse().unwrap();
        assert_eq!(none, Spines::none());
    }

    #[test]
    fn unknown_spine_letters_are_ignored() {
        let spines: Spines = "lq".parse().unwrap();
        assert!(spines.left);
        assert!(!spines.right && !spines.top && !spines.bottom);
    }

    #[test]
    fn grid_lines_parse() {
        assert_eq!("x".parse::<GridLines>().unwrap(), GridLines::X);
        assert_eq!("xy".parse::<GridLines>().unwrap(), GridLines::Both);
        assert_eq!("both".parse::<GridLines>().unwrap(), GridLines::Both);
        assert_eq!("".parse::<GridLines>().unwrap(), GridLines::None);
    }

    #[test]
    fn panel_value_wins_over_default() {
        let defaults = PanelDefaults {
            spines: Spines::default(),
            grid: GridLines::Both,
            x_range: Some((0.0, 1.0)),
            y_range: None,
            extent: None,
        };
        let options = PanelOptions::new().grid(GridLines::None).y_range(2.0, 3.0);
        let style = options.cascade(&defaults);

        assert_eq!(style.grid, GridLines::None);
        assert_eq!(style.y_range, Some((2.0, 3.0)));
        // Unset fields fall back.
        assert_eq!(style.spines, Spines::default());
        assert_eq!(style.x_range, Some((0.0, 1.0)));
    }

    #[test]
    fn default_cascade_shows_left_bottom_spines_and_full_grid() {
        let style = PanelOptions::new().cascade(&PanelDefaults::default());
        assert_eq!(style.spines, "lb".parse().unwrap());
        assert_eq!(style.grid, GridLines::Both);
        assert_eq!(style.title, None);
    }
}
