//! Rendering — everything that touches the world outside the core.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Template manifest** | Python-Fu probe script → JSON over stdout |
//! | **Photo dimensions** | `image::image_dimensions` |
//! | **Render plan** | generated Python-Fu script, headless GIMP 3 |
//! | **Open in editor** | detached `gimp <artifact>` |
//!
//! The module is split into:
//! - **Backend**: the [`RenderBackend`] trait + shared types
//! - **Script**: Python-Fu source generation (pure string building)
//! - **Gimp**: [`GimpBackend`], the production subprocess driver

pub mod backend;
pub mod gimp;
pub mod script;

pub use backend::{BackendError, Dimensions, RenderBackend, RenderedArtifacts};
pub use gimp::{DEFAULT_TIMEOUT_SECS, GimpBackend};
