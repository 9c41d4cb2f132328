use thiserror::Error;

/// Unified result type for the panelkit crate.
pub type Result<T> = std::result::Result<T, FigureError>;

/// Errors surfaced by figure composition.
///
/// All variants are raised synchronously at the point of computation; none
/// are transient, so nothing is retried and no partial results are returned.
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("invalid extent: x [{x_min}, {x_max}], y [{y_min}, {y_max}]")]
    InvalidExtent {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    #[error("unsupported unit `{0}`")]
    UnsupportedUnit(String),
    #[error("tick step must be positive and finite, got {0}")]
    InvalidTickStep(f64),
    #[error(
        "unknown tile provider `{0}`, choose one of: osm, google, satellite-google, \
         satellite-ms, stamen, stamen-toner, stamen-watercolor"
    )]
    UnknownTileProvider(String),
    #[error("panel `{0}` not found")]
    PanelNotFound(String),
    #[error("geographic panel requires an extent")]
    MissingExtent,
    #[error("all {0} panel slots already acquired")]
    SlotsExhausted(usize),
    #[error("backend error: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FigureError {
    /// Degenerate 1-D interval reported as an invalid extent collapsed onto
    /// one axis.
    pub(crate) fn invalid_interval(a: f64, b: f64) -> Self {
        Self::InvalidExtent {
            x_min: a,
            x_max: b,
            y_min: a,
            y_max: b,
        }
    }
}
