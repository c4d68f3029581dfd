//! Population plans: what to do to a template, described before it is done.
//!
//! A [`PopulationPlan`] is an ordered list of layer mutations plus the output
//! base path — *what* the render backend should do, not *how*. Building a plan
//! performs every validation (fields, layers, geometry, naming) up front, so
//! by the time GIMP is launched nothing is left to go wrong but GIMP itself.
//!
//! Plans are immutable once built and deterministic: identical inputs produce
//! element-wise identical plans, with instructions always in the canonical
//! field order ([`TextField::ALL`]) followed by the photo instruction —
//! never in template layer order.

use crate::fields::{FieldSet, MissingFieldError, TextField};
use crate::fit::{self, GeometryError};
use crate::naming::{self, NamingError};
use crate::template::{ResolveError, TemplateManifest};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional name of the photo placeholder layer.
pub const PHOTO_LAYER: &str = "SpeakerPhoto";

/// Name given to the photo layer the renderer inserts.
pub const INSERTED_PHOTO_LAYER: &str = "SpeakerPhoto_Inserted";

/// Extension of the editable layered artifact.
pub const EDITABLE_EXT: &str = "xcf";

/// Extension of the flattened raster artifact.
pub const RASTER_EXT: &str = "png";

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    MissingFields(#[from] MissingFieldError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// A photo to insert, with dimensions already read by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// One layer mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Replace the text content of a text layer.
    SetText { layer: String, text: String },
    /// Insert `source` as a new layer named `new_layer`, scaled to
    /// `width`×`height` and positioned at the absolute canvas offsets.
    InsertScaledImage {
        placeholder: String,
        new_layer: String,
        source: PathBuf,
        width: u32,
        height: u32,
        offset_x: i32,
        offset_y: i32,
    },
}

/// The full recipe for one generation: instructions plus output naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationPlan {
    pub instructions: Vec<Instruction>,
    /// Output path without extension; both artifacts derive from it.
    pub output_base: PathBuf,
    pub editable_ext: String,
    pub raster_ext: String,
}

impl PopulationPlan {
    /// Path of the editable layered artifact.
    pub fn editable_path(&self) -> PathBuf {
        self.output_base.with_extension(&self.editable_ext)
    }

    /// Path of the flattened raster artifact.
    pub fn raster_path(&self) -> PathBuf {
        self.output_base.with_extension(&self.raster_ext)
    }

    /// Return the plan with `-suffix` appended to the base file name.
    ///
    /// Used when generating from several templates in one run, so each
    /// template's artifacts get distinct names.
    #[must_use]
    pub fn with_base_suffix(mut self, suffix: &str) -> Self {
        if let Some(name) = self.output_base.file_name() {
            let name = format!("{}-{}", name.to_string_lossy(), suffix);
            self.output_base.set_file_name(name);
        }
        self
    }
}

/// Build the population plan for one template.
///
/// Validation order: blank required fields first (all reported at once), then
/// required layers (all reported at once), then naming and photo geometry.
/// No partial plan is ever returned.
///
/// A photo supplied for a template without a `SpeakerPhoto` layer is simply
/// left out of the plan — templates without a photo slot are a supported
/// layout, not an error.
pub fn build_plan(
    fields: &FieldSet,
    manifest: &TemplateManifest,
    photo: Option<&PhotoAsset>,
    output_dir: &Path,
    today: NaiveDate,
) -> Result<PopulationPlan, PlanError> {
    fields.validate()?;

    let required: Vec<&str> = TextField::ALL
        .iter()
        .filter(|f| f.is_required())
        .map(|f| f.layer_name())
        .collect();
    let mut optional: Vec<&str> = TextField::ALL
        .iter()
        .filter(|f| !f.is_required())
        .map(|f| f.layer_name())
        .collect();
    optional.push(PHOTO_LAYER);

    let resolved = manifest.resolve(&required, &optional)?;

    let mut instructions = Vec::new();
    for field in TextField::ALL {
        let value = fields.value(field);
        if value.trim().is_empty() || !resolved.is_present(field.layer_name()) {
            continue;
        }
        instructions.push(Instruction::SetText {
            layer: field.layer_name().to_string(),
            text: value.to_string(),
        });
    }

    if let Some(photo) = photo {
        if let Some(region) = resolved.image_geometry(PHOTO_LAYER) {
            let placement = fit::fit(region.width, region.height, photo.width, photo.height)?;
            instructions.push(Instruction::InsertScaledImage {
                placeholder: PHOTO_LAYER.to_string(),
                new_layer: INSERTED_PHOTO_LAYER.to_string(),
                source: photo.path.clone(),
                width: placement.width,
                height: placement.height,
                // Fit offsets are region-relative; the plan carries canvas
                // coordinates so the renderer needs no geometry lookup.
                offset_x: region.x + placement.offset_x as i32,
                offset_y: region.y + placement.offset_y as i32,
            });
        }
    }

    let base = naming::base_name(&fields.date, &fields.title1, today)?;

    Ok(PopulationPlan {
        instructions,
        output_base: output_dir.join(base),
        editable_ext: EDITABLE_EXT.to_string(),
        raster_ext: RASTER_EXT.to_string(),
    })
}
