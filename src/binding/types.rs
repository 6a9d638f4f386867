//! Type definitions for bindings.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::vk;

/// Joystick threshold used when a binding string omits one.
pub const DEFAULT_JOYSTICK_THRESHOLD: u16 = 16000;

bitflags! {
    /// Modifier keys held while a key was pressed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 0b001;
        const SHIFT = 0b010;
        const ALT = 0b100;
    }
}

/// Direction of an axis deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    Positive,
    Negative,
}

/// Identifies a button or an axis direction on one joystick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyParam {
    Button(u16),
    Axis { axis: u8, direction: AxisDirection },
}

/// One physical input attached to one logical control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Binding {
    /// Unbound.
    #[default]
    None,
    /// Keyboard key identified by its virtual key code.
    Key { vk: u32, modifiers: Modifiers },
    /// Joystick button or axis direction. The threshold only affects how far
    /// an axis has to travel; it is not part of the physical identity.
    Joystick {
        device: u8,
        param: JoyParam,
        threshold: u16,
    },
}

impl Binding {
    /// Creates a keyboard binding.
    ///
    /// A modifier key bound on its own carries no modifier state, since the
    /// key itself is what gets pressed.
    pub fn key(vk: u32, modifiers: Modifiers) -> Self {
        let modifiers = if vk::is_modifier(vk) {
            Modifiers::empty()
        } else {
            modifiers
        };
        Binding::Key { vk, modifiers }
    }

    pub fn joystick(device: u8, param: JoyParam, threshold: u16) -> Self {
        Binding::Joystick {
            device,
            param,
            threshold,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Binding::None)
    }

    #[inline]
    pub fn is_key(&self) -> bool {
        matches!(self, Binding::Key { .. })
    }

    #[inline]
    pub fn is_joystick(&self) -> bool {
        matches!(self, Binding::Joystick { .. })
    }

    pub fn clear(&mut self) {
        *self = Binding::None;
    }

    /// Returns true if both bindings denote the same physical input.
    ///
    /// An empty binding matches nothing, not even another empty binding.
    pub fn matches(&self, other: &Binding) -> bool {
        match (self, other) {
            (
                Binding::Key { vk, modifiers },
                Binding::Key {
                    vk: other_vk,
                    modifiers: other_modifiers,
                },
            ) => vk == other_vk && modifiers == other_modifiers,
            (
                Binding::Joystick { device, param, .. },
                Binding::Joystick {
                    device: other_device,
                    param: other_param,
                    ..
                },
            ) => device == other_device && param == other_param,
            _ => false,
        }
    }

    /// Human-readable text shown next to a control.
    pub fn label(&self) -> String {
        match self {
            Binding::None => "Unset".to_string(),
            Binding::Key { vk, modifiers } => {
                let mut label = String::with_capacity(24);
                if modifiers.contains(Modifiers::CTRL) {
                    label.push_str("Ctrl+");
                }
                if modifiers.contains(Modifiers::SHIFT) {
                    label.push_str("Shift+");
                }
                if modifiers.contains(Modifiers::ALT) {
                    label.push_str("Alt+");
                }
                label.push_str(&super::vk_to_key_name(*vk));
                label
            }
            Binding::Joystick {
                device,
                param: JoyParam::Button(button),
                ..
            } => format!("Joystick {} Button {}", u16::from(*device) + 1, button),
            Binding::Joystick {
                device,
                param: JoyParam::Axis { axis, direction },
                threshold,
            } => {
                let sign = match direction {
                    AxisDirection::Positive => '+',
                    AxisDirection::Negative => '-',
                };
                format!(
                    "Joystick {} Axis {} {} T={}",
                    u16::from(*device) + 1,
                    axis,
                    sign,
                    threshold
                )
            }
        }
    }
}
