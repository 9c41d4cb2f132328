//! Geographic helpers: projection zone selection, the geodesy collaborator
//! boundary, and basemap tile providers.

mod core;

pub use core::{
    EquirectangularProjector, MapProjection, OverlayInk, Projector, TileProvider, utm_zone,
};
