//! Input binding capture for an emulator's preferences dialog.
//!
//! The crate keeps the toolkit out: the host feeds key events, joystick
//! devices and dialog responses in, and renders from the labels and
//! notifications that come out.

pub mod binding;
pub mod capture;
pub mod config;
pub mod controls;
pub mod dialog;
pub mod joystick;
pub mod links;
pub mod pools;

pub use binding::{Binding, JoyParam, Modifiers};
pub use capture::{CaptureSession, DialogEvent, KeyEvent, KeyHandling, Page};
pub use config::BindingConfig;
pub use dialog::{DialogOutcome, DialogResponse, PreferencesDialog};
pub use links::{ControlId, LinkTable};
