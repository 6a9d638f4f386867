//! Binding values.
//!
//! A [`Binding`] attaches one physical input (a keyboard key with its
//! modifiers, a joystick button or a joystick axis direction) to one logical
//! control. Bindings round-trip through a compact text form that is used by
//! the configuration file.

mod parsing;
mod types;
pub mod vk;

pub use parsing::{ParseBindingError, key_name_to_vk, vk_to_key_name};
pub use types::*;
