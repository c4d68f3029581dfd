//! Planning pipeline exercised through the public API: manifest in, plan out.

use bannersmith::fields::FieldSet;
use bannersmith::plan::{Instruction, PhotoAsset, build_plan};
use bannersmith::template::{Layer, LayerGeometry, TemplateManifest};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn fields() -> FieldSet {
    FieldSet {
        title1: "Neural Nets 101".into(),
        title2: "An introduction".into(),
        speaker_name: "Ada Lovelace".into(),
        speaker_title: "Analyst".into(),
        date: "2025-06-15 at Mexico City".into(),
        time: "6-8PM".into(),
    }
}

fn manifest() -> TemplateManifest {
    TemplateManifest::new(vec![
        Layer::text("Title1"),
        Layer::text("Title2"),
        Layer::text("SpeakerName"),
        Layer::text("SpeakerTitle"),
        Layer::text("Date"),
        Layer::text("Time"),
        Layer::image(
            "SpeakerPhoto",
            LayerGeometry {
                x: 100,
                y: 50,
                width: 400,
                height: 400,
            },
        ),
    ])
    .unwrap()
}

#[test]
fn full_plan_from_manifest_and_photo() {
    let photo = PhotoAsset {
        path: PathBuf::from("/photos/ada.png"),
        width: 800,
        height: 400,
    };

    let plan = build_plan(&fields(), &manifest(), Some(&photo), Path::new("out"), today()).unwrap();

    assert_eq!(plan.instructions.len(), 7);
    assert_eq!(
        plan.editable_path(),
        PathBuf::from("out/2025-06-15-neural-net.xcf")
    );
    assert_eq!(
        plan.raster_path(),
        PathBuf::from("out/2025-06-15-neural-net.png")
    );

    // 800x400 into 400x400 → 400x200, centered at (100, 50+100).
    match plan.instructions.last().unwrap() {
        Instruction::InsertScaledImage {
            width,
            height,
            offset_x,
            offset_y,
            ..
        } => {
            assert_eq!((*width, *height), (400, 200));
            assert_eq!((*offset_x, *offset_y), (100, 150));
        }
        other => panic!("expected image instruction, got {other:?}"),
    }
}

#[test]
fn rebuilding_is_byte_for_byte_stable() {
    let photo = PhotoAsset {
        path: PathBuf::from("/photos/ada.png"),
        width: 800,
        height: 400,
    };

    let a = build_plan(&fields(), &manifest(), Some(&photo), Path::new("out"), today()).unwrap();
    let b = build_plan(&fields(), &manifest(), Some(&photo), Path::new("out"), today()).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn photo_against_photoless_template_is_not_an_error() {
    let manifest = TemplateManifest::new(vec![
        Layer::text("Title1"),
        Layer::text("SpeakerName"),
        Layer::text("Date"),
        Layer::text("Time"),
    ])
    .unwrap();
    let photo = PhotoAsset {
        path: PathBuf::from("/photos/ada.png"),
        width: 800,
        height: 400,
    };

    let plan = build_plan(&fields(), &manifest, Some(&photo), Path::new("out"), today()).unwrap();
    assert!(plan
        .instructions
        .iter()
        .all(|i| matches!(i, Instruction::SetText { .. })));
}
