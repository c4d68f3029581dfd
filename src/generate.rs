//! Banner generation orchestration.
//!
//! Runs the full pipeline for each selected template: probe the manifest,
//! build the population plan, hand it to the render backend, optionally open
//! the editable result. One failing template does not stop the others — the
//! original use case is "regenerate this event's banner in every template
//! size we have", and a broken template should not cost the user the rest of
//! the batch. Per-template outcomes are collected in a [`GenerateSummary`].
//!
//! The backend is injected so the whole stage runs under a mock in tests,
//! without GIMP installed.

use crate::fields::FieldSet;
use crate::naming;
use crate::plan::{self, PhotoAsset, PlanError};
use crate::render::{BackendError, RenderBackend, RenderedArtifacts};
use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Everything one generation run needs.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub templates: Vec<PathBuf>,
    pub fields: FieldSet,
    pub photo: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Reference date for year guessing in the namer.
    pub today: NaiveDate,
    /// Open each editable artifact in the interactive editor on success.
    pub open_result: bool,
}

/// What happened to one template.
#[derive(Debug)]
pub struct TemplateOutcome {
    pub template: PathBuf,
    pub result: Result<RenderedArtifacts, GenerateError>,
}

/// Per-template outcomes of one run.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    pub outcomes: Vec<TemplateOutcome>,
}

impl GenerateSummary {
    pub fn generated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.generated()
    }

    pub fn all_ok(&self) -> bool {
        self.failed() == 0
    }
}

/// Generate banners for every template in the request.
///
/// Fails outright only on problems that doom every template alike: blank
/// required fields, or an unreadable photo. Template-specific problems
/// (missing layers, engine failures) land in that template's outcome.
pub fn generate_banners(
    backend: &impl RenderBackend,
    request: &GenerateRequest,
) -> Result<GenerateSummary, GenerateError> {
    request.fields.validate().map_err(PlanError::from)?;

    let photo = match &request.photo {
        Some(path) => {
            let dims = backend.photo_dimensions(path)?;
            Some(PhotoAsset {
                path: path.clone(),
                width: dims.width,
                height: dims.height,
            })
        }
        None => None,
    };

    let multi = request.templates.len() > 1;
    let mut summary = GenerateSummary::default();
    for template in &request.templates {
        let result = generate_one(backend, request, template, photo.as_ref(), multi);
        summary.outcomes.push(TemplateOutcome {
            template: template.clone(),
            result,
        });
    }
    Ok(summary)
}

fn generate_one(
    backend: &impl RenderBackend,
    request: &GenerateRequest,
    template: &Path,
    photo: Option<&PhotoAsset>,
    multi: bool,
) -> Result<RenderedArtifacts, GenerateError> {
    let manifest = backend.read_manifest(template)?;
    let mut plan = plan::build_plan(
        &request.fields,
        &manifest,
        photo,
        &request.output_dir,
        request.today,
    )?;

    // Several templates in one run: suffix each base name with a slug of the
    // template's file stem so the artifacts don't overwrite each other.
    if multi {
        let stem = template
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Ok(slug) = naming::slugify(&stem) {
            plan = plan.with_base_suffix(&slug);
        }
    }

    let artifacts = backend.render(template, &plan)?;
    if request.open_result {
        backend.open_editor(&artifacts.editable)?;
    }
    Ok(artifacts)
}

/// List the `.xcf` templates directly inside a directory, sorted by name.
pub fn find_templates(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_xcf = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xcf"));
        if is_xcf {
            templates.push(entry.into_path());
        }
    }
    templates.sort();
    Ok(templates)
}
