//! Compose a three-panel mosaic figure and print the backend instruction
//! stream as JSON lines.
//!
//! ```sh
//! cargo run --example mosaic_trace
//! ```

use serde_json::json;

use panelkit::{
    Figure, FigureOptions, GridLines, Layout, PanelOptions, Result, SaveTarget, TraceBackend,
};

fn main() -> Result<()> {
    let layout = Layout::from_json(r#"[[0, 0, 1], [2, ".", 1]]"#)?;
    let options = FigureOptions::new(layout)
        .title("My grid")
        .save(SaveTarget::Buffer);

    let mut figure = Figure::new(options, TraceBackend::new(std::io::stdout()))?;

    figure.panel(PanelOptions::new().title("a) wide"), |panel| {
        panel.draw(json!({"plot": {"x": [1, 2], "y": [3, 4]}}))
    })?;
    figure.panel(
        PanelOptions::new().title("b) tall").grid(GridLines::None),
        |panel| panel.draw(json!({"plot": {"x": [5, 5], "y": [6, 4]}})),
    )?;
    figure.panel(
        PanelOptions::new().title("c) small").grid(GridLines::X),
        |panel| {
            panel.draw(json!({
                "scatter": {"x": [1, 5, 6, 2, 7, 9], "y": [6, 4, 9, 5, 1, 4]}
            }))
        },
    )?;

    figure.finish()?;
    Ok(())
}
