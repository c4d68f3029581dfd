//! Render backend trait and shared types.
//!
//! The [`RenderBackend`] trait defines the four operations the external
//! collaborators must support: read a template's layer manifest, read a
//! photo's pixel dimensions, execute a population plan, and open a finished
//! artifact in an interactive editor.
//!
//! The production implementation is [`GimpBackend`](super::gimp::GimpBackend),
//! which drives headless GIMP 3 through generated Python-Fu batch scripts.
//! Everything above this trait is engine-agnostic: plan building never knows
//! (or cares) what renders it.

use crate::plan::PopulationPlan;
use crate::template::{TemplateError, TemplateManifest};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("GIMP 3.0 or newer is required: {0}")]
    UnsupportedEngine(String),
    #[error("render engine timed out after {0} seconds")]
    Timeout(u64),
    #[error("render engine failed: {0}")]
    EngineFailed(String),
    #[error("could not read photo: {0}")]
    Photo(String),
    #[error("could not parse template manifest: {0}")]
    ManifestParse(String),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Pixel dimensions of a photo, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Paths of the two artifacts a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub editable: PathBuf,
    pub raster: PathBuf,
}

/// Trait for render backends.
///
/// A backend owns every interaction with the outside world: template files,
/// photo files, the rendering engine, and the interactive editor. The core
/// stays pure and hands it nothing but paths and plans.
pub trait RenderBackend {
    /// Probe a template file for its layer manifest.
    fn read_manifest(&self, template: &Path) -> Result<TemplateManifest, BackendError>;

    /// Read a photo's pixel dimensions.
    fn photo_dimensions(&self, photo: &Path) -> Result<Dimensions, BackendError>;

    /// Execute a population plan against a template, exporting both artifacts.
    fn render(
        &self,
        template: &Path,
        plan: &PopulationPlan,
    ) -> Result<RenderedArtifacts, BackendError>;

    /// Open an artifact in the interactive editor. Fire-and-forget: returns
    /// once the editor is launched, never waits for it.
    fn open_editor(&self, artifact: &Path) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that serves canned manifests/dimensions and records
    /// every operation without touching the filesystem or GIMP.
    #[derive(Default)]
    pub struct MockBackend {
        pub manifests: Mutex<Vec<TemplateManifest>>,
        pub dimension_results: Mutex<Vec<Dimensions>>,
        pub render_failures: Mutex<Vec<String>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        ReadManifest(String),
        PhotoDimensions(String),
        Render {
            template: String,
            instruction_count: usize,
            output_base: String,
        },
        OpenEditor(String),
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve the same manifest for every template read.
        pub fn with_manifest(manifest: TemplateManifest, templates: usize) -> Self {
            Self {
                manifests: Mutex::new(vec![manifest; templates]),
                ..Self::default()
            }
        }

        pub fn with_dimensions(mut self, dims: Vec<Dimensions>) -> Self {
            self.dimension_results = Mutex::new(dims);
            self
        }

        /// Make `render` fail with this diagnostic, once per queued entry.
        pub fn failing_render(mut self, diagnostic: &str) -> Self {
            self.render_failures = Mutex::new(vec![diagnostic.to_string()]);
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl RenderBackend for MockBackend {
        fn read_manifest(&self, template: &Path) -> Result<TemplateManifest, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::ReadManifest(
                    template.to_string_lossy().to_string(),
                ));

            self.manifests
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ManifestParse("no mock manifest".to_string()))
        }

        fn photo_dimensions(&self, photo: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::PhotoDimensions(
                    photo.to_string_lossy().to_string(),
                ));

            self.dimension_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Photo("no mock dimensions".to_string()))
        }

        fn render(
            &self,
            template: &Path,
            plan: &PopulationPlan,
        ) -> Result<RenderedArtifacts, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Render {
                template: template.to_string_lossy().to_string(),
                instruction_count: plan.instructions.len(),
                output_base: plan.output_base.to_string_lossy().to_string(),
            });

            if let Some(diagnostic) = self.render_failures.lock().unwrap().pop() {
                return Err(BackendError::EngineFailed(diagnostic));
            }

            Ok(RenderedArtifacts {
                editable: plan.editable_path(),
                raster: plan.raster_path(),
            })
        }

        fn open_editor(&self, artifact: &Path) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::OpenEditor(
                artifact.to_string_lossy().to_string(),
            ));
            Ok(())
        }
    }

    #[test]
    fn mock_records_manifest_reads() {
        let manifest = TemplateManifest::new(vec![]).unwrap();
        let backend = MockBackend::with_manifest(manifest, 1);

        backend.read_manifest(Path::new("/templates/wide.xcf")).unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::ReadManifest(p) if p == "/templates/wide.xcf"));
    }

    #[test]
    fn mock_serves_queued_dimensions() {
        let backend = MockBackend::new().with_dimensions(vec![Dimensions {
            width: 600,
            height: 300,
        }]);

        let dims = backend.photo_dimensions(Path::new("/p.jpg")).unwrap();
        assert_eq!(dims.width, 600);
        assert!(backend.photo_dimensions(Path::new("/p.jpg")).is_err());
    }

    #[test]
    fn mock_render_failure_surfaces_diagnostic() {
        let manifest = TemplateManifest::new(vec![]).unwrap();
        let backend = MockBackend::with_manifest(manifest, 1).failing_render("no display");

        let plan = PopulationPlan {
            instructions: vec![],
            output_base: "/out/banner-x".into(),
            editable_ext: "xcf".into(),
            raster_ext: "png".into(),
        };
        let err = backend.render(Path::new("/t.xcf"), &plan).unwrap_err();
        assert!(matches!(err, BackendError::EngineFailed(d) if d == "no display"));
    }
}
