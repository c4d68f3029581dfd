//! Template manifests and layer resolution.
//!
//! A [`TemplateManifest`] is the enumerated list of layers a specific template
//! contains — names, kinds, and geometry for image layers. Manifests are
//! produced by the render backend (which probes the template file); the core
//! never opens template files itself.
//!
//! [`TemplateManifest::resolve`] is the validation gate between "the user
//! picked this template" and "we will build a plan for it": every required
//! layer must exist (all absences reported at once), and the resolver reports
//! which optional layers are actually available so the plan builder can skip
//! the rest. Matching is case-sensitive and exact — `title1` does not satisfy
//! `Title1`; catching that kind of typo is the whole point.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("duplicate layer name in template: {0}")]
    DuplicateLayer(String),
    #[error("image layer {0} has no geometry")]
    MissingGeometry(String),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("template is missing required layers: {}", .0.join(", "))]
    MissingLayers(Vec<String>),
}

/// What a layer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Text,
    Image,
    Other,
}

/// Position and size of a layer on the template canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One layer descriptor: name, kind, and (for image layers) geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<LayerGeometry>,
}

impl Layer {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Text,
            geometry: None,
        }
    }

    pub fn image(name: impl Into<String>, geometry: LayerGeometry) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Image,
            geometry: Some(geometry),
        }
    }
}

/// The ordered set of layers present in one template.
///
/// Layer names are unique; construction rejects duplicates and image layers
/// without geometry, so downstream code can rely on both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct TemplateManifest {
    layers: Vec<Layer>,
}

impl TemplateManifest {
    pub fn new(layers: Vec<Layer>) -> Result<Self, TemplateError> {
        let mut seen = BTreeSet::new();
        for layer in &layers {
            if !seen.insert(layer.name.as_str()) {
                return Err(TemplateError::DuplicateLayer(layer.name.clone()));
            }
            if layer.kind == LayerKind::Image && layer.geometry.is_none() {
                return Err(TemplateError::MissingGeometry(layer.name.clone()));
            }
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Validate required layers and report available optional ones.
    ///
    /// Fails with [`ResolveError::MissingLayers`] naming *every* absent
    /// required layer. On success the returned [`ResolvedLayers`] answers
    /// presence queries for the full resolved set (required + present
    /// optional) and carries the geometry of its image-kind layers.
    pub fn resolve(
        &self,
        required: &[&str],
        optional: &[&str],
    ) -> Result<ResolvedLayers, ResolveError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ResolveError::MissingLayers(missing));
        }

        let mut present: BTreeSet<String> = required.iter().map(|n| n.to_string()).collect();
        present.extend(
            optional
                .iter()
                .filter(|name| self.contains(name))
                .map(|name| name.to_string()),
        );

        let geometry: BTreeMap<String, LayerGeometry> = present
            .iter()
            .filter_map(|name| {
                let layer = self.get(name)?;
                if layer.kind == LayerKind::Image {
                    layer.geometry.map(|g| (name.clone(), g))
                } else {
                    None
                }
            })
            .collect();

        Ok(ResolvedLayers { present, geometry })
    }
}

impl TryFrom<Vec<Layer>> for TemplateManifest {
    type Error = TemplateError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<TemplateManifest> for Vec<Layer> {
    fn from(manifest: TemplateManifest) -> Self {
        manifest.layers
    }
}

/// Result of a successful [`TemplateManifest::resolve`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayers {
    present: BTreeSet<String>,
    geometry: BTreeMap<String, LayerGeometry>,
}

impl ResolvedLayers {
    /// Is this layer part of the resolved set? Required layers always are;
    /// optional layers only when the template has them.
    pub fn is_present(&self, name: &str) -> bool {
        self.present.contains(name)
    }

    /// Geometry of an image-kind layer in the resolved set.
    pub fn image_geometry(&self, name: &str) -> Option<LayerGeometry> {
        self.geometry.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(x: i32, y: i32, w: u32, h: u32) -> LayerGeometry {
        LayerGeometry {
            x,
            y,
            width: w,
            height: h,
        }
    }

    fn full_manifest() -> TemplateManifest {
        TemplateManifest::new(vec![
            Layer::text("Title1"),
            Layer::text("Title2"),
            Layer::text("SpeakerName"),
            Layer::text("SpeakerTitle"),
            Layer::text("Date"),
            Layer::text("Time"),
            Layer::image("SpeakerPhoto", geometry(40, 120, 300, 300)),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_layer_names_rejected() {
        let result = TemplateManifest::new(vec![Layer::text("Title1"), Layer::text("Title1")]);
        assert!(matches!(result, Err(TemplateError::DuplicateLayer(name)) if name == "Title1"));
    }

    #[test]
    fn image_layer_requires_geometry() {
        let result = TemplateManifest::new(vec![Layer {
            name: "SpeakerPhoto".into(),
            kind: LayerKind::Image,
            geometry: None,
        }]);
        assert!(matches!(result, Err(TemplateError::MissingGeometry(_))));
    }

    #[test]
    fn resolve_reports_every_missing_required_layer() {
        let manifest = TemplateManifest::new(vec![
            Layer::text("Title1"),
            Layer::text("Date"),
        ])
        .unwrap();

        let err = manifest
            .resolve(&["Title1", "SpeakerName", "Date", "Time"], &[])
            .unwrap_err();
        let ResolveError::MissingLayers(missing) = err;
        assert_eq!(missing, vec!["SpeakerName".to_string(), "Time".to_string()]);
    }

    #[test]
    fn resolve_matches_case_sensitively() {
        let manifest = TemplateManifest::new(vec![Layer::text("title1")]).unwrap();
        let err = manifest.resolve(&["Title1"], &[]).unwrap_err();
        let ResolveError::MissingLayers(missing) = err;
        assert_eq!(missing, vec!["Title1".to_string()]);
    }

    #[test]
    fn resolve_reports_present_optional_layers() {
        let resolved = full_manifest()
            .resolve(
                &["Title1", "SpeakerName", "Date", "Time"],
                &["Title2", "SpeakerTitle", "SpeakerPhoto"],
            )
            .unwrap();

        assert!(resolved.is_present("Title1"));
        assert!(resolved.is_present("Title2"));
        assert!(resolved.is_present("SpeakerPhoto"));
        assert!(!resolved.is_present("Watermark"));
    }

    #[test]
    fn resolve_skips_absent_optional_layers() {
        let manifest = TemplateManifest::new(vec![
            Layer::text("Title1"),
            Layer::text("SpeakerName"),
            Layer::text("Date"),
            Layer::text("Time"),
        ])
        .unwrap();

        let resolved = manifest
            .resolve(
                &["Title1", "SpeakerName", "Date", "Time"],
                &["Title2", "SpeakerPhoto"],
            )
            .unwrap();
        assert!(!resolved.is_present("Title2"));
        assert!(!resolved.is_present("SpeakerPhoto"));
    }

    #[test]
    fn resolve_exposes_image_geometry() {
        let resolved = full_manifest()
            .resolve(&["Title1"], &["SpeakerPhoto"])
            .unwrap();

        assert_eq!(
            resolved.image_geometry("SpeakerPhoto"),
            Some(geometry(40, 120, 300, 300))
        );
        // Text layers have no image geometry even when present.
        assert_eq!(resolved.image_geometry("Title1"), None);
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let manifest = full_manifest();
        let json = serde_json::to_string(&manifest).unwrap();
        let back: TemplateManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn manifest_json_with_duplicates_fails_to_parse() {
        let json = r#"[{"name":"Title1","kind":"text"},{"name":"Title1","kind":"text"}]"#;
        assert!(serde_json::from_str::<TemplateManifest>(json).is_err());
    }
}
