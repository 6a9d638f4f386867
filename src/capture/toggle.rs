//! Mutually exclusive toggle buttons.

/// A group of toggles of which at most one is active.
///
/// Activating a member deactivates the previous one; deactivating the active
/// member leaves the group empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleGroup<T> {
    active: Option<T>,
}

impl<T: Copy + PartialEq> ToggleGroup<T> {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// Applies a toggle state change and returns the member that was switched
    /// off as a result, if any.
    pub fn set(&mut self, member: T, on: bool) -> Option<T> {
        if on {
            self.active.replace(member).filter(|&previous| previous != member)
        } else {
            if self.active == Some(member) {
                self.active = None;
            }
            None
        }
    }

    #[inline]
    pub fn active(&self) -> Option<T> {
        self.active
    }

    #[inline]
    pub fn is_active(&self, member: T) -> bool {
        self.active == Some(member)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

impl<T: Copy + PartialEq> Default for ToggleGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}
