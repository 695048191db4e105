#![forbid(unsafe_code)]

//! Ordered, deduplicated section handles.
//!
//! The registry is built once at mount from the known content blocks and is
//! never reordered or shrunk afterwards. A section's position is its index
//! in registration order.

use std::collections::HashMap;

/// Opaque handle identifying one content section.
///
/// Identity is the only thing the engine cares about; hosts map handles to
/// DOM nodes, widget ids, or layout slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(u64);

impl SectionId {
    /// Create a handle from a raw id.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SectionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A registered section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    index: usize,
    entered: bool,
    visible: bool,
}

impl Section {
    /// The section's handle.
    pub const fn id(&self) -> SectionId {
        self.id
    }

    /// Position in registration order.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether the section has ever crossed the visibility threshold.
    ///
    /// Goes from `false` to `true` at most once and is never reset.
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Whether the last report for this section had it at or above the threshold.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns `true` on the false → true transition.
    fn mark_entered(&mut self) -> bool {
        !std::mem::replace(&mut self.entered, true)
    }
}

/// Outcome of [`SectionRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    /// The handle was added at this position.
    New(usize),
    /// The handle was already present at this position.
    Existing(usize),
}

impl Registered {
    /// Position of the handle, whether new or existing.
    pub const fn index(self) -> usize {
        match self {
            Self::New(index) | Self::Existing(index) => index,
        }
    }
}

/// Ordered sequence of sections, unique by handle.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: Vec<Section>,
    positions: HashMap<SectionId, usize>,
}

impl SectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry in one pass, keeping the first occurrence of each handle.
    pub fn from_handles<I>(handles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        let mut registry = Self::new();
        for handle in handles {
            registry.register(handle.into());
        }
        registry
    }

    /// Register a handle. Duplicates are a no-op that reports the existing position.
    pub fn register(&mut self, id: SectionId) -> Registered {
        if let Some(&index) = self.positions.get(&id) {
            tracing::trace!(section = id.get(), index, "duplicate section registration ignored");
            return Registered::Existing(index);
        }
        let index = self.sections.len();
        self.sections.push(Section {
            id,
            index,
            entered: false,
            visible: false,
        });
        self.positions.insert(id, index);
        Registered::New(index)
    }

    /// Section at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Number of registered sections.
    pub fn count(&self) -> usize {
        self.sections.len()
    }

    /// Check if no sections are registered.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Registry position of a handle.
    pub fn position_of(&self, id: SectionId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Sections in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Handles in registration order.
    pub fn ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(Section::id).collect()
    }

    /// Set the entered flag at `index`. Returns `true` only on the first transition.
    pub(crate) fn mark_entered(&mut self, index: usize) -> bool {
        self.sections
            .get_mut(index)
            .is_some_and(Section::mark_entered)
    }

    /// Record the latest reported visibility at `index`.
    pub(crate) fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(section) = self.sections.get_mut(index) {
            section.visible = visible;
        }
    }
}

impl<'a> IntoIterator for &'a SectionRegistry {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
