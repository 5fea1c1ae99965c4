use crate::features::feature_name;
use geo::{BoundingRect, Geometry, Rect};
use geojson::{Feature, JsonObject};
use serde::{Deserialize, Serialize};

/// A ski area boundary and the box that contains it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkiArea {
    pub name: String,
    pub geometry: Option<geojson::Geometry>,

    /// `None` when the area has no geometry, or none that converts to
    /// a [`geo::Geometry`].
    pub bounds: Option<Bounds>,
    pub properties: JsonObject,
}

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            north: rect.max().y,
            south: rect.min().y,
            east: rect.max().x,
            west: rect.min().x,
        }
    }
}

impl Bounds {
    /// Returns the box around `geometry`, if it has any extent.
    pub fn of(geometry: &geojson::Geometry) -> Option<Self> {
        Geometry::<f64>::try_from(geometry.value.clone())
            .ok()?
            .bounding_rect()
            .map(Self::from)
    }
}

impl From<&Feature> for SkiArea {
    fn from(feature: &Feature) -> Self {
        Self {
            name: feature_name(feature).unwrap_or_default().to_owned(),
            bounds: feature.geometry.as_ref().and_then(Bounds::of),
            geometry: feature.geometry.clone(),
            properties: feature.properties.clone().unwrap_or_default(),
        }
    }
}
