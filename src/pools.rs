//! Binding pools.
//!
//! A pool is the set of bindings inside which one physical input may be
//! attached to at most one control. Every joypad profile is its own pool and
//! the shortcuts form one more. Pools never look at each other.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

use crate::binding::Binding;
use crate::controls::{Control, JoypadControl, Shortcut};

/// Fixed-size set of bindings, one per control of kind `C`.
pub struct BindingPool<C: Control> {
    slots: Vec<Binding>,
    _control: PhantomData<C>,
}

/// One controller slot's bindings.
pub type JoypadBinding = BindingPool<JoypadControl>;
/// Global shortcut bindings.
pub type ShortcutBindings = BindingPool<Shortcut>;

impl<C: Control> BindingPool<C> {
    /// Creates a pool with every control unbound.
    pub fn new() -> Self {
        Self {
            slots: vec![Binding::None; C::COUNT],
            _control: PhantomData,
        }
    }

    #[inline]
    pub fn get(&self, control: C) -> &Binding {
        &self.slots[control.index()]
    }

    /// Overwrites one slot without touching the others.
    #[inline]
    pub fn set(&mut self, control: C, binding: Binding) {
        self.slots[control.index()] = binding;
    }

    /// Stores `binding` on `control` and unbinds every other control of this
    /// pool that refers to the same physical input.
    ///
    /// Returns the controls that lost their binding.
    pub fn store(&mut self, control: C, binding: Binding) -> SmallVec<[C; 4]> {
        let mut cleared = SmallVec::new();

        for other in C::iter() {
            if other == control {
                continue;
            }
            let slot = &mut self.slots[other.index()];
            if slot.matches(&binding) {
                slot.clear();
                cleared.push(other);
            }
        }

        self.slots[control.index()] = binding;
        cleared
    }

    /// Unbinds every control.
    pub fn clear_all(&mut self) {
        self.slots.iter_mut().for_each(Binding::clear);
    }

    /// Controls currently bound to the same physical input as `binding`.
    pub fn controls_matching(&self, binding: &Binding) -> SmallVec<[C; 4]> {
        self.iter()
            .filter(|(_, slot)| slot.matches(binding))
            .map(|(control, _)| control)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (C, &Binding)> + '_ {
        C::iter().zip(self.slots.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Binding::is_empty)
    }
}

impl<C: Control> Default for BindingPool<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Control> Clone for BindingPool<C> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            _control: PhantomData,
        }
    }
}

impl<C: Control> PartialEq for BindingPool<C> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
    }
}

impl<C: Control> Eq for BindingPool<C> {}

impl<C: Control> fmt::Debug for BindingPool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .filter(|(_, binding)| !binding.is_empty())
                    .map(|(control, binding)| (control.name(), binding.to_string())),
            )
            .finish()
    }
}

impl<C: Control> Serialize for BindingPool<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(C::COUNT))?;
        for (control, binding) in self.iter() {
            map.serialize_entry(control.name(), binding)?;
        }
        map.end()
    }
}

impl<'de, C: Control> Deserialize<'de> for BindingPool<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Binding>::deserialize(deserializer)?;
        let mut pool = Self::new();

        for (name, binding) in entries {
            match name.parse::<C>() {
                Ok(control) => pool.set(control, binding),
                Err(_) => tracing::warn!("Ignoring binding for unknown control `{}`", name),
            }
        }

        Ok(pool)
    }
}
