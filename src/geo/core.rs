use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};
use crate::geometry::Extent;

/// Projection zone index for a longitude.
///
/// Zones are six degrees wide and longitude -180 maps to zone 1. The mapping
/// is approximate near the polar regions (Norway, Svalbard and Antarctica
/// carve exceptions this function ignores).
pub fn utm_zone(lon: f64) -> u8 {
    (((lon + 180.0) / 6.0).floor() + 1.0) as u8
}

/// Geodesy collaborator: reproject a geographic extent into planar metric
/// coordinates for the given zone.
///
/// Implementations are expected to behave as pure functions; the core never
/// caches or mutates through this boundary.
pub trait Projector {
    fn project(&self, extent: &Extent, zone: u8) -> Result<Extent>;
}

/// Metres per degree of latitude, and of longitude at the equator.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Built-in approximate projector scaling degrees to metres, with longitude
/// compressed by the cosine of the centre latitude.
///
/// Good enough for demos, tests and small extents; swap in a real geodesy
/// library behind [`Projector`] for survey-grade output.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquirectangularProjector;

impl Projector for EquirectangularProjector {
    fn project(&self, extent: &Extent, _zone: u8) -> Result<Extent> {
        extent.validate()?;
        let (_, center_lat) = extent.center();
        let scale_x = METERS_PER_DEGREE * center_lat.to_radians().cos();
        Ok(Extent::new(
            extent.x_min * scale_x,
            extent.x_max * scale_x,
            extent.y_min * METERS_PER_DEGREE,
            extent.y_max * METERS_PER_DEGREE,
        ))
    }
}

/// Map projection requested for a geographic panel.
///
/// `PlateCarree` is the flat lat/lon projection; anything else is passed to
/// the backend by name and interpreted there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapProjection {
    PlateCarree,
    Named(String),
}

impl FromStr for MapProjection {
    type Err = FigureError;

    fn from_str(text: &str) -> Result<Self> {
        Ok(match text {
            "PlateCarree" | "flat" => Self::PlateCarree,
            other => Self::Named(other.to_string()),
        })
    }
}

/// Basemap tile provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileProvider {
    Osm,
    GoogleStreet,
    GoogleSatellite,
    Quadtree,
    StamenTerrain,
    StamenToner,
    StamenWatercolor,
}

/// Overlay ink for annotations drawn on top of a basemap. Street maps take
/// dark ink, imagery and terrain take light ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayInk {
    Dark,
    Light,
}

impl TileProvider {
    pub fn overlay_ink(&self) -> OverlayInk {
        match self {
            Self::Osm | Self::GoogleStreet => OverlayInk::Dark,
            _ => OverlayInk::Light,
        }
    }
}

impl FromStr for TileProvider {
    type Err = FigureError;

    fn from_str(text: &str) -> Result<Self> {
        Ok(match text {
            "OSM" | "osm" => Self::Osm,
            "GoogleTiles-street" | "google" => Self::GoogleStreet,
            "GoogleTiles-satellite" | "satellite-google" => Self::GoogleSatellite,
            "QuadtreeTiles" | "satellite-ms" => Self::Quadtree,
            "Stamen-terrain" | "stamen-terrain" | "stamen" => Self::StamenTerrain,
            "Stamen-toner" | "stamen-toner" => Self::StamenToner,
            "Stamen-watercolor" | "stamen-watercolor" => Self::StamenWatercolor,
            other => return Err(FigureError::UnknownTileProvider(other.to_string())),
        })
    }
}
