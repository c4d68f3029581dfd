//! Logical form fields and their mapping onto template layer names.
//!
//! Templates address their editable content through a fixed, conventional set
//! of layer names. Rather than passing free-form strings around (where a typo
//! surfaces as a silent no-op at render time), the fields are a closed enum:
//! [`TextField`] enumerates every logical field, and [`TextField::layer_name`]
//! is the single lookup table from field to layer. Today that mapping is the
//! identity onto the conventional names; it exists so the convention has
//! exactly one home.
//!
//! [`TextField::ALL`] doubles as the canonical emission order for plan
//! instructions — fixed, independent of template layer order.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The six logical text fields a banner template can carry.
///
/// Declaration order is the canonical instruction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextField {
    Title1,
    Title2,
    SpeakerName,
    SpeakerTitle,
    Date,
    Time,
}

impl TextField {
    /// Every field, in canonical emission order.
    pub const ALL: [TextField; 6] = [
        TextField::Title1,
        TextField::Title2,
        TextField::SpeakerName,
        TextField::SpeakerTitle,
        TextField::Date,
        TextField::Time,
    ];

    /// The template layer name this field populates.
    pub fn layer_name(self) -> &'static str {
        match self {
            TextField::Title1 => "Title1",
            TextField::Title2 => "Title2",
            TextField::SpeakerName => "SpeakerName",
            TextField::SpeakerTitle => "SpeakerTitle",
            TextField::Date => "Date",
            TextField::Time => "Time",
        }
    }

    /// Human-readable label for error messages and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            TextField::Title1 => "Title 1",
            TextField::Title2 => "Title 2",
            TextField::SpeakerName => "Speaker Name",
            TextField::SpeakerTitle => "Speaker Title",
            TextField::Date => "Date",
            TextField::Time => "Time",
        }
    }

    /// Required fields must be non-empty (after trimming) before a plan can
    /// be built; the rest may stay blank.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            TextField::Title1 | TextField::SpeakerName | TextField::Date | TextField::Time
        )
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layer_name())
    }
}

fn field_labels(fields: &[TextField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One or more required fields were blank. Names every offender, not just
/// the first.
#[derive(Error, Debug)]
#[error("required fields are blank: {}", field_labels(.fields))]
pub struct MissingFieldError {
    pub fields: Vec<TextField>,
}

/// The values a user supplied for one generation request.
///
/// Optional fields default to the empty string; blank optional fields simply
/// produce no instruction for their layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSet {
    pub title1: String,
    pub title2: String,
    pub speaker_name: String,
    pub speaker_title: String,
    pub date: String,
    pub time: String,
}

impl FieldSet {
    /// The raw value for a field.
    pub fn value(&self, field: TextField) -> &str {
        match field {
            TextField::Title1 => &self.title1,
            TextField::Title2 => &self.title2,
            TextField::SpeakerName => &self.speaker_name,
            TextField::SpeakerTitle => &self.speaker_title,
            TextField::Date => &self.date,
            TextField::Time => &self.time,
        }
    }

    /// Check that every required field has content.
    ///
    /// Whitespace-only values count as blank. All blank required fields are
    /// reported in a single error.
    pub fn validate(&self) -> Result<(), MissingFieldError> {
        let fields: Vec<TextField> = TextField::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.value(*f).trim().is_empty())
            .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(MissingFieldError { fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FieldSet {
        FieldSet {
            title1: "AI Workshop".into(),
            title2: "Hands-on session".into(),
            speaker_name: "Jane Doe".into(),
            speaker_title: "CTO, Example Corp".into(),
            date: "Dec 31, 2025".into(),
            time: "7:00 PM".into(),
        }
    }

    #[test]
    fn complete_set_validates() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let fields = FieldSet {
            title2: String::new(),
            speaker_title: String::new(),
            ..complete()
        };
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn every_blank_required_field_is_reported() {
        let fields = FieldSet {
            speaker_name: String::new(),
            time: "   ".into(),
            ..complete()
        };
        let err = fields.validate().unwrap_err();
        assert_eq!(err.fields, vec![TextField::SpeakerName, TextField::Time]);
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let fields = FieldSet {
            title1: " \t\n".into(),
            ..complete()
        };
        let err = fields.validate().unwrap_err();
        assert_eq!(err.fields, vec![TextField::Title1]);
    }

    #[test]
    fn error_message_lists_labels() {
        let err = FieldSet::default().validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Title 1"));
        assert!(msg.contains("Speaker Name"));
        assert!(msg.contains("Date"));
        assert!(msg.contains("Time"));
    }

    #[test]
    fn canonical_order_is_stable() {
        let names: Vec<&str> = TextField::ALL.iter().map(|f| f.layer_name()).collect();
        assert_eq!(
            names,
            ["Title1", "Title2", "SpeakerName", "SpeakerTitle", "Date", "Time"]
        );
    }
}
