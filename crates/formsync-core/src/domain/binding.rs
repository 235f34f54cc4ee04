//! Explicit binding table between config keys and form elements.
//!
//! A page declares, for every configuration key it renders, which elements
//! represent that key.  The synchronizer consults only this table; it never
//! derives element ids from naming conventions on its own.

use std::collections::BTreeMap;

use super::form::ElementId;

/// How one config key is represented on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A single element whose value is the config value verbatim.
    Direct { element: ElementId },

    /// A checkbox control projecting a hidden carrier holding `"True"` or
    /// `"False"`.
    Toggle {
        carrier: ElementId,
        control: ElementId,
    },

    /// Mutually exclusive choices projecting a hidden carrier holding the
    /// selected choice's literal value.
    Segmented {
        carrier: ElementId,
        choices: Vec<ElementId>,
    },
}

/// Discriminant of [`Binding`], ordered by application precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKind {
    Direct,
    Toggle,
    Segmented,
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Binding::Direct { .. } => BindingKind::Direct,
            Binding::Toggle { .. } => BindingKind::Toggle,
            Binding::Segmented { .. } => BindingKind::Segmented,
        }
    }
}

/// `key → bindings` table.
///
/// A key may have more than one binding (e.g. both a toggle and a segmented
/// control sharing a carrier).  Bindings of one key are kept sorted by
/// [`BindingKind`] so they are always applied Direct → Toggle → Segmented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    entries: BTreeMap<String, Vec<Binding>>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding for `key`.
    pub fn bind(&mut self, key: impl Into<String>, binding: Binding) -> &mut Self {
        let list = self.entries.entry(key.into()).or_default();
        list.push(binding);
        // Stable sort keeps declaration order within the same kind.
        list.sort_by_key(Binding::kind);
        self
    }

    pub fn direct(&mut self, key: impl Into<String>, element: impl Into<ElementId>) -> &mut Self {
        self.bind(
            key,
            Binding::Direct {
                element: element.into(),
            },
        )
    }

    pub fn toggle(
        &mut self,
        key: impl Into<String>,
        carrier: impl Into<ElementId>,
        control: impl Into<ElementId>,
    ) -> &mut Self {
        self.bind(
            key,
            Binding::Toggle {
                carrier: carrier.into(),
                control: control.into(),
            },
        )
    }

    pub fn segmented<I, E>(
        &mut self,
        key: impl Into<String>,
        carrier: impl Into<ElementId>,
        choices: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ElementId>,
    {
        self.bind(
            key,
            Binding::Segmented {
                carrier: carrier.into(),
                choices: choices.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Bindings for `key`, empty if the key is not rendered on this page.
    pub fn get(&self, key: &str) -> &[Binding] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates over `(key, binding)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries
            .iter()
            .flat_map(|(k, list)| list.iter().map(move |b| (k.as_str(), b)))
    }
}
