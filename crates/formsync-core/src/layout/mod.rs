//! Declarative form layouts.
//!
//! A [`FormLayout`] lists the fields a configuration page renders.  From it
//! the crate generates both the [`MemoryForm`] (the elements, in markup
//! order, with their default state) and the [`BindingTable`] the
//! synchronizer needs, following the page's markup conventions:
//!
//! | Field kind  | Elements generated                                              |
//! |-------------|-----------------------------------------------------------------|
//! | `direct`    | input `KEY` named `KEY`                                         |
//! | `toggle`    | hidden `KEY-hidden` named `KEY`, checkbox `KEY-toggle`          |
//! | `segmented` | hidden `KEY-hidden` named `KEY`, radios `KEY-<choice>` in group `KEY-choices` |
//!
//! Layouts are written in TOML:
//!
//! ```toml
//! form_id = "config-form"
//!
//! [[field]]
//! key = "UNIT_SYSTEM"
//! kind = "segmented"
//! choices = ["METRIC", "IMPERIAL"]
//! default = "METRIC"
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::binding::BindingTable;
use crate::domain::form::{Element, ElementId, FormError, MemoryForm};
use crate::sync::{FormSynchronizer, TOGGLE_OFF, TOGGLE_ON};

/// The built-in layout of the digest mailer's configuration page.
const DIGEST_LAYOUT: &str = include_str!("../../layouts/digest.toml");

/// Error type for layout parsing, validation and generation.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to parse layout TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("field with an empty key")]
    EmptyKey,

    #[error("duplicate field key {0:?}")]
    DuplicateKey(String),

    #[error("segmented field {0:?} has no choices")]
    NoChoices(String),

    #[error("segmented field {key:?} lists choice {choice:?} twice")]
    DuplicateChoice { key: String, choice: String },

    #[error("segmented field {key:?} cannot use {choice:?} as a choice: its id would be the carrier's")]
    ReservedChoice { key: String, choice: String },

    #[error("default {default:?} of {key:?} is not one of its choices")]
    DefaultNotAChoice { key: String, default: String },

    #[error("toggle {key:?} default must be \"True\" or \"False\", got {default:?}")]
    InvalidToggleDefault { key: String, default: String },

    #[error("field {0:?} declares choices but is not segmented")]
    UnexpectedChoices(String),

    #[error("generated elements collide: {0}")]
    Form(#[from] FormError),
}

/// Widget kind of a layout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Direct,
    Toggle,
    Segmented,
}

/// One field of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Config key (also the submission name).
    pub key: String,
    pub kind: FieldKind,
    /// Literal choice values, for segmented fields only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Markup default before any config is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Human-readable label (display only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FieldSpec {
    pub fn direct(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: FieldKind::Direct,
            choices: Vec::new(),
            default: None,
            label: None,
        }
    }

    pub fn toggle(key: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Toggle,
            ..Self::direct(key)
        }
    }

    pub fn segmented<I, S>(key: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: FieldKind::Segmented,
            choices: choices.into_iter().map(Into::into).collect(),
            ..Self::direct(key)
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label, or the key when the field has none.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

fn default_form_id() -> String {
    "config-form".to_string()
}

/// A whole configuration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    /// Id of the submission form element.
    #[serde(default = "default_form_id")]
    pub form_id: String,
    /// Fields in markup order.
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldSpec>,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
            fields: Vec::new(),
        }
    }
}

impl FormLayout {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML layout.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Parse`] for malformed TOML, or any validation error
    /// from [`validate`](Self::validate).
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutError> {
        let layout: Self = toml::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    /// The digest mailer's configuration page.
    ///
    /// # Errors
    ///
    /// Only if the embedded layout file is broken.
    pub fn digest() -> Result<Self, LayoutError> {
        Self::from_toml_str(DIGEST_LAYOUT)
    }

    /// Checks the structural rules of the layout.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: empty or duplicate keys, segmented
    /// fields without (or with duplicate) choices, a choice whose id would
    /// be the carrier's, defaults outside the allowed values, or choices on
    /// a non-segmented field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut keys = HashSet::new();
        for field in &self.fields {
            if field.key.is_empty() {
                return Err(LayoutError::EmptyKey);
            }
            if !keys.insert(field.key.as_str()) {
                return Err(LayoutError::DuplicateKey(field.key.clone()));
            }
            match field.kind {
                FieldKind::Direct => {
                    if !field.choices.is_empty() {
                        return Err(LayoutError::UnexpectedChoices(field.key.clone()));
                    }
                }
                FieldKind::Toggle => {
                    if !field.choices.is_empty() {
                        return Err(LayoutError::UnexpectedChoices(field.key.clone()));
                    }
                    if let Some(d) = &field.default {
                        if d != TOGGLE_ON && d != TOGGLE_OFF {
                            return Err(LayoutError::InvalidToggleDefault {
                                key: field.key.clone(),
                                default: d.clone(),
                            });
                        }
                    }
                }
                FieldKind::Segmented => {
                    if field.choices.is_empty() {
                        return Err(LayoutError::NoChoices(field.key.clone()));
                    }
                    let mut seen = HashSet::new();
                    for c in &field.choices {
                        if choice_id(&field.key, c) == carrier_id(&field.key) {
                            return Err(LayoutError::ReservedChoice {
                                key: field.key.clone(),
                                choice: c.clone(),
                            });
                        }
                        if !seen.insert(c.as_str()) {
                            return Err(LayoutError::DuplicateChoice {
                                key: field.key.clone(),
                                choice: c.clone(),
                            });
                        }
                    }
                    if let Some(d) = &field.default {
                        if !seen.contains(d.as_str()) {
                            return Err(LayoutError::DefaultNotAChoice {
                                key: field.key.clone(),
                                default: d.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Generates the page's elements and binding table.
    ///
    /// # Errors
    ///
    /// Validation errors, or [`LayoutError::Form`] if two fields generate
    /// the same element id (e.g. a direct field literally named `X-hidden`
    /// next to a toggle `X`).
    pub fn build(&self) -> Result<(MemoryForm, BindingTable), LayoutError> {
        self.validate()?;

        let mut form = MemoryForm::new();
        let mut table = BindingTable::new();

        for field in &self.fields {
            let key = field.key.as_str();
            match field.kind {
                FieldKind::Direct => {
                    let value = field.default.clone().unwrap_or_default();
                    form.push(Element::input(key, value).named(key))?;
                    table.direct(key, key);
                }
                FieldKind::Toggle => {
                    let on = field.default.as_deref() == Some(TOGGLE_ON);
                    let carrier = carrier_id(key);
                    let control = toggle_id(key);
                    form.push(
                        Element::input(carrier.clone(), if on { TOGGLE_ON } else { TOGGLE_OFF })
                            .named(key),
                    )?;
                    form.push(Element::checkbox(control.clone(), on))?;
                    table.toggle(key, carrier, control);
                }
                FieldKind::Segmented => {
                    // Validation guarantees at least one choice.
                    let selected = field
                        .default
                        .as_deref()
                        .or_else(|| field.choices.first().map(String::as_str))
                        .unwrap_or_default();
                    let carrier = carrier_id(key);
                    form.push(Element::input(carrier.clone(), selected).named(key))?;

                    let group = choice_group(key);
                    let mut ids = Vec::with_capacity(field.choices.len());
                    for choice in &field.choices {
                        let id = choice_id(key, choice);
                        form.push(Element::radio(
                            id.clone(),
                            group.clone(),
                            choice.clone(),
                            choice == selected,
                        ))?;
                        ids.push(id);
                    }
                    table.segmented(key, carrier, ids);
                }
            }
        }
        Ok((form, table))
    }

    /// Convenience: [`build`](Self::build) plus a ready synchronizer.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn instantiate(&self) -> Result<(MemoryForm, FormSynchronizer), LayoutError> {
        let (form, table) = self.build()?;
        Ok((form, FormSynchronizer::new(table)))
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Id of the hidden carrier backing a toggle or segmented control.
pub fn carrier_id(key: &str) -> ElementId {
    ElementId::new(format!("{key}-hidden"))
}

/// Id of a toggle's checkbox.
pub fn toggle_id(key: &str) -> ElementId {
    ElementId::new(format!("{key}-toggle"))
}

/// Id of one segmented choice.
pub fn choice_id(key: &str, choice: &str) -> ElementId {
    ElementId::new(format!("{key}-{choice}"))
}

fn choice_group(key: &str) -> String {
    format!("{key}-choices")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
