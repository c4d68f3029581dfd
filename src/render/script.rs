//! Python-Fu batch script generation for GIMP 3.
//!
//! GIMP's batch mode takes a Python script over its `python-fu-eval`
//! interpreter; this module turns plans into those scripts as plain strings.
//! Two scripts exist:
//!
//! - the **population script**, which applies a [`PopulationPlan`] to a
//!   template and exports the `.xcf` and flattened `.png` artifacts;
//! - the **manifest probe**, which loads a template and dumps its layer
//!   list as JSON between sentinel markers on stdout, for
//!   [`GimpBackend`](super::gimp::GimpBackend) to parse back.
//!
//! Every user-controlled string is escaped before interpolation — titles
//! containing quotes, backslashes, or newlines must not be able to break
//! out of a Python string literal.

use crate::plan::{Instruction, PopulationPlan};
use std::path::Path;

/// Marker lines bracketing the probe's JSON payload on stdout.
pub const MANIFEST_BEGIN: &str = "BANNERSMITH-MANIFEST-BEGIN";
pub const MANIFEST_END: &str = "BANNERSMITH-MANIFEST-END";

/// Escape a string for inclusion in a double-quoted Python string literal.
pub fn escape_py(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn py_path(path: &Path) -> String {
    escape_py(&path.to_string_lossy())
}

/// Script that applies `plan` to `template` and exports both artifacts.
pub fn population_script(template: &Path, plan: &PopulationPlan) -> String {
    let mut script = String::new();

    script.push_str("from gi.repository import Gimp, Gio\n\n");
    script.push_str(&format!(
        "image = Gimp.file_load(Gimp.RunMode.NONINTERACTIVE, \
         Gio.File.new_for_path(\"{}\"))\n",
        py_path(template)
    ));
    script.push_str("layers = {layer.get_name(): layer for layer in image.get_layers()}\n\n");

    for instruction in &plan.instructions {
        match instruction {
            Instruction::SetText { layer, text } => {
                script.push_str(&format!(
                    concat!(
                        "layer = layers.get(\"{layer}\")\n",
                        "if layer is not None:\n",
                        "    layer.set_text(\"{text}\")\n",
                        "else:\n",
                        "    print(\"Warning: layer '{layer}' not found in template\")\n\n",
                    ),
                    layer = escape_py(layer),
                    text = escape_py(text),
                ));
            }
            // The placeholder layer itself stays untouched underneath the
            // inserted photo, as a guide for later manual edits of the .xcf.
            Instruction::InsertScaledImage {
                placeholder: _,
                new_layer,
                source,
                width,
                height,
                offset_x,
                offset_y,
            } => {
                script.push_str(&format!(
                    concat!(
                        "photo = Gimp.file_load(Gimp.RunMode.NONINTERACTIVE, ",
                        "Gio.File.new_for_path(\"{source}\"))\n",
                        "photo.scale({width}, {height})\n",
                        "drawable = photo.get_layers()[0]\n",
                        "inserted = Gimp.Layer.new_from_drawable(drawable, image)\n",
                        "image.insert_layer(inserted, None, 0)\n",
                        "inserted.set_offsets({offset_x}, {offset_y})\n",
                        "inserted.set_name(\"{new_layer}\")\n",
                        "photo.delete()\n\n",
                    ),
                    source = py_path(source),
                    width = width,
                    height = height,
                    offset_x = offset_x,
                    offset_y = offset_y,
                    new_layer = escape_py(new_layer),
                ));
            }
        }
    }

    script.push_str(&format!(
        concat!(
            "Gimp.file_save(Gimp.RunMode.NONINTERACTIVE, image, ",
            "Gio.File.new_for_path(\"{xcf}\"))\n",
            "flat = image.duplicate()\n",
            "flat.flatten()\n",
            "Gimp.file_save(Gimp.RunMode.NONINTERACTIVE, flat, ",
            "Gio.File.new_for_path(\"{png}\"))\n",
            "flat.delete()\n",
            "image.delete()\n",
        ),
        xcf = py_path(&plan.editable_path()),
        png = py_path(&plan.raster_path()),
    ));

    script
}

/// Script that dumps a template's layer list as JSON between the manifest
/// markers.
///
/// Each entry carries `name`, `kind` (`text` | `image` | `other`), and the
/// layer's canvas geometry. Group layers are reported as `other`.
pub fn manifest_probe_script(template: &Path) -> String {
    format!(
        concat!(
            "import json\n",
            "from gi.repository import Gimp, Gio\n\n",
            "image = Gimp.file_load(Gimp.RunMode.NONINTERACTIVE, ",
            "Gio.File.new_for_path(\"{template}\"))\n",
            "entries = []\n",
            "for layer in image.get_layers():\n",
            "    if isinstance(layer, Gimp.TextLayer):\n",
            "        kind = \"text\"\n",
            "    elif isinstance(layer, Gimp.GroupLayer):\n",
            "        kind = \"other\"\n",
            "    else:\n",
            "        kind = \"image\"\n",
            "    x, y = layer.get_offsets()[-2:]\n",
            "    entries.append({{\n",
            "        \"name\": layer.get_name(),\n",
            "        \"kind\": kind,\n",
            "        \"x\": x,\n",
            "        \"y\": y,\n",
            "        \"width\": layer.get_width(),\n",
            "        \"height\": layer.get_height(),\n",
            "    }})\n",
            "image.delete()\n",
            "print(\"{begin}\")\n",
            "print(json.dumps(entries))\n",
            "print(\"{end}\")\n",
        ),
        template = py_path(template),
        begin = MANIFEST_BEGIN,
        end = MANIFEST_END,
    )
}
