//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! Display follows a two-level pattern: a header line naming the entity
//! (template file, usually), then indented context lines with the details.
//!
//! ```text
//! banner.xcf
//!     XCF: out/2025-12-31-ai-worksho.xcf
//!     PNG: out/2025-12-31-ai-worksho.png
//! square.xcf
//!     Error: template is missing required layers: Time
//!
//! Generated 1/2 banner(s)
//! Failed: 1
//! ```

use crate::fields::TextField;
use crate::generate::GenerateSummary;
use crate::plan::PHOTO_LAYER;
use crate::template::{LayerKind, TemplateManifest};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of a path, for header lines; falls back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// generate
// ============================================================================

/// Format the per-template results and the closing counts of one run.
pub fn format_generate_summary(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();

    for outcome in &summary.outcomes {
        lines.push(display_name(&outcome.template));
        match &outcome.result {
            Ok(artifacts) => {
                lines.push(format!("{}XCF: {}", indent(1), artifacts.editable.display()));
                lines.push(format!("{}PNG: {}", indent(1), artifacts.raster.display()));
            }
            Err(err) => lines.push(format!("{}Error: {err}", indent(1))),
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}/{} banner(s)",
        summary.generated(),
        summary.outcomes.len()
    ));
    if summary.failed() > 0 {
        lines.push(format!("Failed: {}", summary.failed()));
    }
    lines
}

pub fn print_generate_summary(summary: &GenerateSummary) {
    for line in format_generate_summary(summary) {
        println!("{line}");
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the layer report for `check`: every conventional layer with its
/// status in this template.
pub fn format_check_report(template: &Path, manifest: &TemplateManifest) -> Vec<String> {
    let mut lines = vec![display_name(template)];

    lines.push(format!("{}Required layers", indent(1)));
    for field in TextField::ALL.into_iter().filter(|f| f.is_required()) {
        let status = if manifest.contains(field.layer_name()) {
            "ok"
        } else {
            "MISSING"
        };
        lines.push(format!("{}{}: {status}", indent(2), field.layer_name()));
    }

    lines.push(format!("{}Optional layers", indent(1)));
    for field in TextField::ALL.into_iter().filter(|f| !f.is_required()) {
        let status = if manifest.contains(field.layer_name()) {
            "present"
        } else {
            "absent"
        };
        lines.push(format!("{}{}: {status}", indent(2), field.layer_name()));
    }
    lines.push(format!(
        "{}{PHOTO_LAYER}: {}",
        indent(2),
        describe_photo_layer(manifest)
    ));

    let extra: Vec<&str> = manifest
        .layers()
        .iter()
        .filter(|l| !is_conventional(&l.name))
        .map(|l| l.name.as_str())
        .collect();
    if !extra.is_empty() {
        lines.push(format!("{}Other layers: {}", indent(1), extra.join(", ")));
    }

    lines
}

fn is_conventional(name: &str) -> bool {
    name == PHOTO_LAYER
        || TextField::ALL
            .iter()
            .any(|f| f.layer_name() == name)
}

fn describe_photo_layer(manifest: &TemplateManifest) -> String {
    match manifest.get(PHOTO_LAYER) {
        Some(layer) if layer.kind == LayerKind::Image => match layer.geometry {
            Some(g) => format!("present ({}x{} at {},{})", g.width, g.height, g.x, g.y),
            None => "present".to_string(),
        },
        Some(_) => "present (but not an image layer)".to_string(),
        None => "absent".to_string(),
    }
}

pub fn print_check_report(template: &Path, manifest: &TemplateManifest) {
    for line in format_check_report(template, manifest) {
        println!("{line}");
    }
}

// ============================================================================
// templates
// ============================================================================

/// Format the template listing for a directory.
pub fn format_template_list(dir: &Path, templates: &[std::path::PathBuf]) -> Vec<String> {
    if templates.is_empty() {
        return vec![format!("No .xcf templates in {}", dir.display())];
    }
    let mut lines = vec![format!("Templates in {}", dir.display())];
    for template in templates {
        lines.push(format!("{}{}", indent(1), display_name(template)));
    }
    lines.push(String::new());
    lines.push(format!("{} template(s)", templates.len()));
    lines
}

pub fn print_template_list(dir: &Path, templates: &[std::path::PathBuf]) {
    for line in format_template_list(dir, templates) {
        println!("{line}");
    }
}
