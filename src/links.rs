//! Link table: the ordered list of every bindable control in the dialog.
//!
//! The table lists joypad controls first and shortcuts after them. Its order
//! is the traversal order used by focus auto-advance, and its break positions
//! mark where auto-advance stops and hands focus to the cancel button.

use std::sync::{Arc, LazyLock};

use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::controls::{Control, ControlGroup, JoypadControl, Shortcut};

static STANDARD_LINKS: LazyLock<Arc<LinkTable>> = LazyLock::new(|| {
    let links = JoypadControl::iter()
        .map(Slot::Joypad)
        .chain(Shortcut::iter().map(Slot::Shortcut))
        .collect();
    Arc::new(LinkTable::grouped(links))
});

/// Where a control's binding lives: the selected joypad profile or the
/// shortcut pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Joypad(JoypadControl),
    Shortcut(Shortcut),
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Joypad(control) => control.name(),
            Slot::Shortcut(shortcut) => shortcut.name(),
        }
    }

    pub fn group(self) -> ControlGroup {
        match self {
            Slot::Joypad(control) => control.group(),
            Slot::Shortcut(shortcut) => shortcut.group(),
        }
    }

    #[inline]
    pub fn is_joypad(self) -> bool {
        matches!(self, Slot::Joypad(_))
    }
}

/// Position of a control inside a [`LinkTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(usize);

impl ControlId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<Slot>,
    /// Ascending, always ends with `links.len()`.
    breaks: SmallVec<[usize; 8]>,
}

impl LinkTable {
    /// The table used by the preferences dialog.
    pub fn standard() -> Arc<LinkTable> {
        STANDARD_LINKS.clone()
    }

    /// Creates a table with explicit break positions. The table end is always
    /// a break; positions past the end are dropped.
    pub fn new(links: Vec<Slot>, breaks: impl IntoIterator<Item = usize>) -> Self {
        let len = links.len();
        let mut breaks: SmallVec<[usize; 8]> = breaks
            .into_iter()
            .filter(|&position| position > 0 && position <= len)
            .collect();
        breaks.push(len);
        breaks.sort_unstable();
        breaks.dedup();

        Self { links, breaks }
    }

    /// Creates a table with a break wherever the control group changes.
    pub fn grouped(links: Vec<Slot>) -> Self {
        let breaks: SmallVec<[usize; 8]> = links
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].group() != pair[1].group())
            .map(|(position, _)| position + 1)
            .collect();
        Self::new(links, breaks)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[inline]
    pub fn breaks(&self) -> &[usize] {
        &self.breaks
    }

    /// Returns the id for a table position, if it is in range.
    pub fn id(&self, index: usize) -> Option<ControlId> {
        (index < self.links.len()).then_some(ControlId(index))
    }

    /// # Panics
    ///
    /// Panics if `id` comes from a different, shorter table.
    #[inline]
    pub fn slot(&self, id: ControlId) -> Slot {
        self.links[id.0]
    }

    #[inline]
    pub fn name(&self, id: ControlId) -> &'static str {
        self.slot(id).name()
    }

    /// Looks a control up by its stable name.
    pub fn find(&self, name: &str) -> Option<ControlId> {
        self.links
            .iter()
            .position(|slot| slot.name() == name)
            .map(ControlId)
    }

    pub fn id_of(&self, slot: Slot) -> Option<ControlId> {
        self.links.iter().position(|&s| s == slot).map(ControlId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlId, Slot)> + '_ {
        self.links
            .iter()
            .enumerate()
            .map(|(index, &slot)| (ControlId(index), slot))
    }

    /// Number of joypad entries in the table.
    pub fn num_joypad_links(&self) -> usize {
        self.links.iter().filter(|slot| slot.is_joypad()).count()
    }

    /// Control that receives focus after `current`.
    ///
    /// `None` stands for the cancel button. Advancing onto a break position,
    /// or advancing while no control is focused, lands on the cancel button.
    pub fn next_focus(&self, current: Option<ControlId>) -> Option<ControlId> {
        let next = current?.0 + 1;
        if self.breaks.contains(&next) {
            return None;
        }
        self.id(next)
    }
}
