//! Geometry descriptor → primitive.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vista_renderer::geometry::primitives::{
    cuboid, cylinder, plane, sphere, BoxOptions, CylinderOptions, PlaneOptions, SphereOptions,
};
use vista_renderer::Geometry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HotspotGeometryType {
    Box,
    Sphere,
    Cylinder,
    #[default]
    Plane,
}

impl HotspotGeometryType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "box" => Some(Self::Box),
            "sphere" => Some(Self::Sphere),
            "cylinder" => Some(Self::Cylinder),
            "plane" => Some(Self::Plane),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Plane => "plane",
        }
    }
}

/// `{ "type": "sphere", "options": { "radius": 4 } }`.  The type is kept as
/// a plain string so an unknown one still parses and can fall back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryDescriptor {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub options: Value,
}

/// Build the primitive a descriptor names.  No descriptor, no type, or a
/// type that is not recognised yields the default plane; options are only
/// read for a known type.
pub fn build(descriptor: Option<&GeometryDescriptor>) -> Geometry {
    let known = descriptor.and_then(|d| {
        let name = d.kind.as_deref()?;
        match HotspotGeometryType::parse(name) {
            Some(kind) => Some((kind, &d.options)),
            None => {
                log::warn!("unknown geometry type `{name}`, using a plane");
                None
            }
        }
    });
    let Some((kind, options)) = known else {
        return plane(&PlaneOptions::default());
    };

    match kind {
        HotspotGeometryType::Box => cuboid(&options_for::<BoxOptions>(kind, options)),
        HotspotGeometryType::Sphere => sphere(&options_for::<SphereOptions>(kind, options)),
        HotspotGeometryType::Cylinder => cylinder(&options_for::<CylinderOptions>(kind, options)),
        HotspotGeometryType::Plane => plane(&options_for::<PlaneOptions>(kind, options)),
    }
}

fn options_for<T: DeserializeOwned + Default>(kind: HotspotGeometryType, options: &Value) -> T {
    if options.is_null() {
        return T::default();
    }
    serde_json::from_value(options.clone()).unwrap_or_else(|err| {
        log::warn!("invalid {} options ({err}), using defaults", kind.as_str());
        T::default()
    })
}
