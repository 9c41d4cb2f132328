//! Compose a map panel over an OSM basemap and print the backend
//! instruction stream, scale bar and all, as JSON lines.
//!
//! ```sh
//! cargo run --example geo_trace
//! ```

use serde_json::json;

use panelkit::{
    Extent, Figure, FigureOptions, GeoPanelOptions, Layout, MapProjection, PanelOptions, Result,
    TileProvider, TraceBackend,
};

fn main() -> Result<()> {
    let options = FigureOptions::new(Layout::grid(1, 1)).title("Survey area");
    let mut figure = Figure::new(options, TraceBackend::new(std::io::stdout()))?;

    let extent = Extent::validated(12.0, 12.1, 50.0, 50.1)?;
    figure.geo_panel(
        GeoPanelOptions::new()
            .base(PanelOptions::new().extent(extent))
            .projection(MapProjection::PlateCarree)
            .tiles(TileProvider::Osm)
            .zoom(11),
        |panel| {
            panel.draw(json!({
                "track": {"lon": [12.0, 12.1], "lat": [50.0, 50.1]}
            }))
        },
    )?;

    figure.finish()?;
    Ok(())
}
