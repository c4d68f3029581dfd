//! # Bannersmith
//!
//! Event banner generator: populates the named layers of a layered GIMP
//! template (six text fields and one photo placeholder) and exports two
//! artifacts per template — an editable `.xcf` and a flattened `.png` —
//! named deterministically from the event date and title.
//!
//! # Architecture: Plan, Then Render
//!
//! Generation is split into a pure planning core and a subprocess-driven
//! rendering edge:
//!
//! ```text
//! 1. Probe    template.xcf   →  TemplateManifest   (layer names, kinds, geometry)
//! 2. Plan     fields + manifest + photo  →  PopulationPlan
//! 3. Render   plan  →  out/2025-12-31-ai-worksho.{xcf,png}
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Validation up front**: blank fields, missing layers, degenerate
//!   geometry, and unusable titles are all caught while building the plan —
//!   before a single GIMP process is spawned.
//! - **Determinism**: a plan is a pure function of its inputs. Building twice
//!   from the same fields, manifest, and photo yields identical instruction
//!   sequences, in a fixed order independent of template layer order.
//! - **Testability**: the planning core runs entirely without GIMP; the
//!   orchestration layer is exercised against a recording mock backend.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`fields`] | Closed enum of logical text fields + the field → layer lookup table |
//! | [`naming`] | Output base names: free-text date extraction + title slugification |
//! | [`template`] | Layer manifests and required/optional layer resolution |
//! | [`fit`] | Pure aspect-fit math for photo placement |
//! | [`plan`] | `PopulationPlan` construction — the validation gate |
//! | [`render`] | `RenderBackend` trait + headless GIMP 3 implementation |
//! | [`generate`] | Per-template orchestration and run summaries |
//! | [`config`] | `config.toml` loading, validation, stock config generation |
//! | [`output`] | CLI output formatting — pure format functions + print wrappers |
//!
//! # Design Decisions
//!
//! ## Closed Field Set
//!
//! Templates are addressed through six conventional layer names (`Title1`,
//! `Title2`, `SpeakerName`, `SpeakerTitle`, `Date`, `Time`) plus the
//! `SpeakerPhoto` placeholder. Those names live in exactly one place — the
//! [`fields::TextField`] enum — instead of being scattered as string
//! literals. A typo'd layer name in a template surfaces at plan time as a
//! missing-layer error naming every absence, not as a silently unpopulated
//! banner.
//!
//! ## GIMP as a Replaceable Backend
//!
//! Nothing above [`render::RenderBackend`] knows GIMP exists. The production
//! backend generates Python-Fu batch scripts and drives `gimp-console`
//! headlessly; the trait boundary keeps plan building engine-agnostic and
//! lets the whole pipeline run under a mock in tests. GIMP 2.x is refused
//! outright — its batch API is incompatible and not worth a compatibility
//! layer.
//!
//! ## Scaling Decisions Stay in the Core
//!
//! The photo's fit (uniform scale, centered placement) is computed in Rust
//! from the placeholder geometry and the photo's pixel dimensions, and the
//! generated script applies precomputed numbers. The alternative — letting
//! the GIMP script do the math — would put the only interesting geometry
//! logic in the one place that can't be unit tested.
//!
//! ## Chronological Filenames
//!
//! Artifacts are named `YYYY-MM-DD-<title slug>` so an output directory
//! sorts by event date. The date is extracted from free-form text ("Dec 31",
//! "2025-06-15 at Mexico City") through an ordered chain of parsers; text
//! with no recognizable date falls back to a `banner-` prefix rather than
//! failing the run.

pub mod config;
pub mod fields;
pub mod fit;
pub mod generate;
pub mod naming;
pub mod output;
pub mod plan;
pub mod render;
pub mod template;
