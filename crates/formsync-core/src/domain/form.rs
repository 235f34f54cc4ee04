//! Form document model.
//!
//! The synchronizer never talks to a browser directly.  It reads and writes
//! element state through the [`FormDocument`] trait, which a DOM adapter (or
//! the in-memory [`MemoryForm`] shipped here) implements.
//!
//! # Element kinds
//!
//! | Kind       | Has `value` | Has `checked` | Submitted when           |
//! |------------|-------------|---------------|--------------------------|
//! | `Input`    | yes         | no            | it has a `name`          |
//! | `Checkbox` | yes         | yes           | it has a `name` and is checked |
//! | `Radio`    | yes         | yes           | it has a `name` and is checked |
//!
//! Hidden carrier fields are plain `Input` elements.  Toggle controls and
//! segmented choices are normally left unnamed so that only their carrier is
//! submitted.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Identifier of a form element (the DOM `id` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The behavioural kind of a form element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Text, select, textarea or hidden field.
    Input,
    /// Checkbox-like control (used by toggles).
    Checkbox,
    /// Radio-like choice.  Checking one radio unchecks every other radio in
    /// the same `group`.
    Radio { group: String },
}

/// A single form element and its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Submission name.  Unnamed elements are never submitted.
    pub name: Option<String>,
    pub value: String,
    pub checked: bool,
}

impl Element {
    /// A text/select/hidden input with the given initial value.
    pub fn input(id: impl Into<ElementId>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Input,
            name: None,
            value: value.into(),
            checked: false,
        }
    }

    /// A checkbox.  Its submitted value defaults to `"on"` like in HTML.
    pub fn checkbox(id: impl Into<ElementId>, checked: bool) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Checkbox,
            name: None,
            value: "on".to_string(),
            checked,
        }
    }

    /// A radio choice belonging to `group`.
    pub fn radio(
        id: impl Into<ElementId>,
        group: impl Into<String>,
        value: impl Into<String>,
        checked: bool,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Radio {
                group: group.into(),
            },
            name: None,
            value: value.into(),
            checked,
        }
    }

    /// Sets the submission name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns `true` for elements that carry a checked state.
    pub fn is_checkable(&self) -> bool {
        !matches!(self.kind, ElementKind::Input)
    }

    /// The `(name, value)` pair this element contributes to a form
    /// submission, if any.
    pub fn submission(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref()?;
        if self.is_checkable() && !self.checked {
            return None;
        }
        Some((name, self.value.as_str()))
    }
}

/// Errors raised while assembling a [`MemoryForm`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),
}

/// Read/write access to the elements of one form page.
///
/// Every mutator returns `false` when the element does not exist (or cannot
/// hold the requested state) instead of failing: callers are expected to
/// tolerate a page that renders only a subset of the known keys.
pub trait FormDocument {
    /// Returns `true` if an element with `id` exists.
    fn contains(&self, id: &ElementId) -> bool;

    /// Current value of the element, or `None` if it does not exist.
    fn value(&self, id: &ElementId) -> Option<String>;

    /// Writes the element's value.
    fn set_value(&mut self, id: &ElementId, value: &str) -> bool;

    /// Checked state of a checkbox/radio, or `None` for missing or
    /// non-checkable elements.
    fn is_checked(&self, id: &ElementId) -> Option<bool>;

    /// Writes the checked state of a checkbox/radio.
    fn set_checked(&mut self, id: &ElementId, checked: bool) -> bool;

    /// All `(name, value)` pairs the form would submit, in document order.
    fn submission_fields(&self) -> Vec<(String, String)>;
}

/// An in-memory form document with browser-like radio semantics.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    /// Elements in document order.
    elements: Vec<Element>,
    /// id → position in `elements`.
    index: HashMap<ElementId, usize>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element at the end of the document.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateId`] if an element with the same id is
    /// already present.
    pub fn push(&mut self, element: Element) -> Result<(), FormError> {
        if self.index.contains_key(&element.id) {
            return Err(FormError::DuplicateId(element.id));
        }
        self.index.insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    /// Builder-style variant of [`push`](Self::push).
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn with(mut self, element: Element) -> Result<Self, FormError> {
        self.push(element)?;
        Ok(self)
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        let i = *self.index.get(id)?;
        self.elements.get_mut(i)
    }
}

impl FormDocument for MemoryForm {
    fn contains(&self, id: &ElementId) -> bool {
        self.index.contains_key(id)
    }

    fn value(&self, id: &ElementId) -> Option<String> {
        self.element(id).map(|e| e.value.clone())
    }

    fn set_value(&mut self, id: &ElementId, value: &str) -> bool {
        match self.element_mut(id) {
            Some(e) => {
                e.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn is_checked(&self, id: &ElementId) -> Option<bool> {
        self.element(id)
            .filter(|e| e.is_checkable())
            .map(|e| e.checked)
    }

    fn set_checked(&mut self, id: &ElementId, checked: bool) -> bool {
        let group = match self.element_mut(id) {
            Some(e) if e.is_checkable() => {
                e.checked = checked;
                match &e.kind {
                    ElementKind::Radio { group } if checked => Some(group.clone()),
                    _ => None,
                }
            }
            _ => return false,
        };

        // Radio exclusivity: checking one member unchecks its siblings.
        if let Some(group) = group {
            for other in self.elements.iter_mut() {
                if other.id == *id {
                    continue;
                }
                if matches!(&other.kind, ElementKind::Radio { group: g } if *g == group) {
                    other.checked = false;
                }
            }
        }
        true
    }

    fn submission_fields(&self) -> Vec<(String, String)> {
        self.elements
            .iter()
            .filter_map(Element::submission)
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
