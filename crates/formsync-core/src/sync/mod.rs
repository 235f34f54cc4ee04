//! Bidirectional synchronization between a [`ConfigMap`] and form widgets.
//!
//! # The three directions
//!
//! ```text
//!  server config ──apply_config──▶ widgets          (page load)
//!  widget change ──handle_event──▶ hidden carriers  (user interaction)
//!  form fields   ──collect_config─▶ ConfigMap        (save)
//! ```
//!
//! Toggle and segmented widgets are projections of a hidden *carrier* field.
//! The carrier is what the form submits, so the synchronizer's job on every
//! change is to keep the carrier equal to what the visible control shows.
//!
//! # Tolerant merge
//!
//! A key in the config with no binding, or a binding whose element is not on
//! the page, is skipped silently.  The page may render a superset or a
//! subset of the keys the server knows about.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::domain::binding::{Binding, BindingTable};
use crate::domain::config_map::ConfigMap;
use crate::domain::form::{ElementId, FormDocument};

/// Carrier value of a checked toggle.
pub const TOGGLE_ON: &str = "True";
/// Carrier value of an unchecked toggle.
pub const TOGGLE_OFF: &str = "False";

/// A user-input event raised by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The element's checked state or value was changed by the user.
    Change(ElementId),
}

/// Errors returned by [`FormSynchronizer::user_edit`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no form binding for key {0:?}")]
    UnknownKey(String),

    #[error("element {0} is not on the page")]
    MissingElement(ElementId),

    #[error("toggle {key:?} accepts only \"True\" or \"False\", got {value:?}")]
    InvalidToggleValue { key: String, value: String },

    #[error("{value:?} is not a choice of {key:?}")]
    UnknownChoice { key: String, value: String },
}

/// What to do when a bound control fires a change event.
#[derive(Debug, Clone)]
enum Listener {
    /// Copy the checkbox state into the carrier as `"True"`/`"False"`.
    Toggle { carrier: ElementId },
    /// Copy the choice value into the carrier if the choice is selected.
    Choice { carrier: ElementId },
}

/// Keeps one page's widgets and a configuration map in agreement.
///
/// Construct one per page from its [`BindingTable`].  The instance holds no
/// element state of its own; all state lives in the [`FormDocument`] passed
/// to each call, so several pages (or tests) can run side by side.
#[derive(Debug, Clone)]
pub struct FormSynchronizer {
    bindings: BindingTable,
    /// control id → listeners attached to it.
    listeners: HashMap<ElementId, Vec<Listener>>,
}

impl FormSynchronizer {
    /// Creates a synchronizer and attaches change listeners to every toggle
    /// control and segmented choice in `bindings`.
    pub fn new(bindings: BindingTable) -> Self {
        let mut listeners: HashMap<ElementId, Vec<Listener>> = HashMap::new();
        for (_, binding) in bindings.iter() {
            match binding {
                Binding::Direct { .. } => {}
                Binding::Toggle { carrier, control } => {
                    listeners
                        .entry(control.clone())
                        .or_default()
                        .push(Listener::Toggle {
                            carrier: carrier.clone(),
                        });
                }
                Binding::Segmented { carrier, choices } => {
                    for choice in choices {
                        listeners
                            .entry(choice.clone())
                            .or_default()
                            .push(Listener::Choice {
                                carrier: carrier.clone(),
                            });
                    }
                }
            }
        }
        Self {
            bindings,
            listeners,
        }
    }

    /// Returns `true` if a change listener is attached to `id`.
    pub fn is_listening(&self, id: &ElementId) -> bool {
        self.listeners.contains_key(id)
    }

    // ── Load direction ────────────────────────────────────────────────────────

    /// Writes every key of `config` into its bound widgets.
    ///
    /// - **Direct**: the element value becomes the config value.
    /// - **Toggle**: checked and carrier `"True"` iff the value is exactly
    ///   `"True"`; anything else unchecks and writes `"False"`.
    /// - **Segmented**: the choice whose literal value equals the config
    ///   value is checked and copied into the carrier.  With no matching
    ///   choice the markup default selection is left as is.
    pub fn apply_config<F>(&self, form: &mut F, config: &ConfigMap)
    where
        F: FormDocument + ?Sized,
    {
        let mut bound = 0usize;
        for (key, value) in config.iter() {
            let bindings = self.bindings.get(key);
            if !bindings.is_empty() {
                bound += 1;
            }
            for binding in bindings {
                apply_binding(form, binding, value);
            }
        }
        debug!(
            "applied config: {} keys received, {} bound on this page",
            config.len(),
            bound
        );
    }

    // ── Interaction direction ─────────────────────────────────────────────────

    /// Reacts to a user event on the page.
    ///
    /// Returns `true` if at least one carrier was updated.  Events on
    /// elements with no listener are ignored.
    pub fn handle_event<F>(&self, form: &mut F, event: &FormEvent) -> bool
    where
        F: FormDocument + ?Sized,
    {
        let FormEvent::Change(id) = event;
        let Some(listeners) = self.listeners.get(id) else {
            return false;
        };

        let mut updated = false;
        for listener in listeners {
            match listener {
                Listener::Toggle { carrier } => {
                    let Some(checked) = form.is_checked(id) else {
                        continue;
                    };
                    let value = if checked { TOGGLE_ON } else { TOGGLE_OFF };
                    updated |= form.set_value(carrier, value);
                }
                Listener::Choice { carrier } => {
                    if form.is_checked(id) != Some(true) {
                        continue;
                    }
                    if let Some(value) = form.value(id) {
                        updated |= form.set_value(carrier, &value);
                    }
                }
            }
        }
        updated
    }

    /// Performs the widget manipulation a user would make to set `key` to
    /// `value`, then dispatches the resulting change event.
    ///
    /// The first binding of the key (in Direct → Toggle → Segmented order)
    /// is the one edited.
    ///
    /// # Errors
    ///
    /// - [`EditError::UnknownKey`] – the key has no binding.
    /// - [`EditError::MissingElement`] – the bound control is not on the page.
    /// - [`EditError::InvalidToggleValue`] – a toggle was given something
    ///   other than `"True"`/`"False"`.
    /// - [`EditError::UnknownChoice`] – no segmented choice has that value.
    pub fn user_edit<F>(&self, form: &mut F, key: &str, value: &str) -> Result<(), EditError>
    where
        F: FormDocument + ?Sized,
    {
        let binding = self
            .bindings
            .get(key)
            .first()
            .ok_or_else(|| EditError::UnknownKey(key.to_string()))?;

        let changed = match binding {
            Binding::Direct { element } => {
                if !form.set_value(element, value) {
                    return Err(EditError::MissingElement(element.clone()));
                }
                element.clone()
            }
            Binding::Toggle { control, .. } => {
                let checked = match value {
                    TOGGLE_ON => true,
                    TOGGLE_OFF => false,
                    _ => {
                        return Err(EditError::InvalidToggleValue {
                            key: key.to_string(),
                            value: value.to_string(),
                        })
                    }
                };
                if !form.set_checked(control, checked) {
                    return Err(EditError::MissingElement(control.clone()));
                }
                control.clone()
            }
            Binding::Segmented { choices, .. } => {
                let choice = choices
                    .iter()
                    .find(|c| form.value(c).as_deref() == Some(value))
                    .ok_or_else(|| EditError::UnknownChoice {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
                form.set_checked(choice, true);
                choice.clone()
            }
        };

        self.handle_event(form, &FormEvent::Change(changed));
        Ok(())
    }

    // ── Collect direction ─────────────────────────────────────────────────────

    /// Reads the form's submittable fields into a [`ConfigMap`].
    ///
    /// Carriers are ordinary submittable fields, so the result already holds
    /// the canonical toggle/segmented values.  A repeated name keeps its last
    /// value.
    pub fn collect_config<F>(&self, form: &F) -> ConfigMap
    where
        F: FormDocument + ?Sized,
    {
        ConfigMap::from_pairs(form.submission_fields())
    }
}

fn apply_binding<F>(form: &mut F, binding: &Binding, value: &str)
where
    F: FormDocument + ?Sized,
{
    match binding {
        Binding::Direct { element } => {
            form.set_value(element, value);
        }
        Binding::Toggle { carrier, control } => {
            if !form.contains(carrier) || !form.contains(control) {
                return;
            }
            // Closed two-value domain: only the literal "True" is on.
            let on = value == TOGGLE_ON;
            form.set_checked(control, on);
            form.set_value(carrier, if on { TOGGLE_ON } else { TOGGLE_OFF });
        }
        Binding::Segmented { carrier, choices } => {
            for choice in choices {
                if form.value(choice).as_deref() == Some(value) {
                    form.set_checked(choice, true);
                    form.set_value(carrier, value);
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
