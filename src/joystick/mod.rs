//! Joystick devices as seen by the preferences dialog.
//!
//! Devices expose a non-blocking event queue. The dialog drains it from a
//! periodic tick, so nothing here blocks or spawns threads.

mod channel;
#[cfg(windows)]
mod xinput;

use std::ops::{Deref, DerefMut};

pub use channel::{ChannelJoystick, EVENT_QUEUE_CAPACITY, JoystickFeeder};
#[cfg(windows)]
pub use xinput::XInputJoystick;

use crate::binding::JoyParam;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoyState {
    Pressed,
    Released,
}

/// One queued joystick state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoyEvent {
    pub state: JoyState,
    pub param: JoyParam,
}

impl JoyEvent {
    pub fn press(param: JoyParam) -> Self {
        Self {
            state: JoyState::Pressed,
            param,
        }
    }

    pub fn release(param: JoyParam) -> Self {
        Self {
            state: JoyState::Released,
            param,
        }
    }

    #[inline]
    pub fn is_press(&self) -> bool {
        self.state == JoyState::Pressed
    }
}

/// A joystick the dialog can read events from.
pub trait JoystickDevice {
    fn name(&self) -> &str;

    /// Samples the device once and queues the resulting events. Called at
    /// the start of every poll pass; queue-fed devices need nothing here.
    fn update(&mut self) {}

    /// Pops the next queued event without blocking. Never samples the
    /// hardware, so draining a device ends once its queue is empty.
    fn next_event(&mut self) -> Option<JoyEvent>;

    /// Discards every queued event.
    fn flush(&mut self);

    /// Takes the current stick positions as the rest position.
    fn register_centers(&mut self) {}
}

/// Who receives joystick input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoystickMode {
    /// Each joystick drives its own emulated controller.
    #[default]
    Individual,
    /// Every joystick feeds the preferences dialog.
    Global,
}

/// Attached joysticks, in index order.
#[derive(Default)]
pub struct JoystickHub {
    devices: Vec<Box<dyn JoystickDevice>>,
    mode: JoystickMode,
}

impl JoystickHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every connected XInput controller.
    #[cfg(windows)]
    pub fn with_xinput(threshold: u16) -> Self {
        let mut hub = Self::new();
        for device in XInputJoystick::connected(threshold) {
            hub.add(device);
        }
        hub
    }

    /// Attaches a device and returns its joystick index.
    pub fn add(&mut self, device: impl JoystickDevice + 'static) -> usize {
        tracing::debug!("Attached joystick {}: {}", self.devices.len(), device.name());
        self.devices.push(Box::new(device));
        self.devices.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices_mut(&mut self) -> &mut [Box<dyn JoystickDevice>] {
        &mut self.devices
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.devices.iter().map(|device| device.name())
    }

    #[inline]
    pub fn mode(&self) -> JoystickMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: JoystickMode) {
        if self.mode != mode {
            tracing::debug!("Joystick mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Samples every device once.
    pub fn update(&mut self) {
        for device in &mut self.devices {
            device.update();
        }
    }

    /// Discards pending events on every device.
    pub fn flush(&mut self) {
        for device in &mut self.devices {
            device.flush();
        }
    }

    pub fn register_centers(&mut self) {
        for device in &mut self.devices {
            device.register_centers();
        }
    }
}

/// Routes all joysticks to the dialog for as long as it is alive.
///
/// Dropping the grab flushes pending events and restores the previous mode.
pub struct JoystickGrab<'a> {
    hub: &'a mut JoystickHub,
    previous: JoystickMode,
}

impl<'a> JoystickGrab<'a> {
    pub fn new(hub: &'a mut JoystickHub) -> Self {
        let previous = hub.mode();
        hub.set_mode(JoystickMode::Global);
        hub.flush();
        Self { hub, previous }
    }
}

impl Deref for JoystickGrab<'_> {
    type Target = JoystickHub;

    fn deref(&self) -> &JoystickHub {
        self.hub
    }
}

impl DerefMut for JoystickGrab<'_> {
    fn deref_mut(&mut self) -> &mut JoystickHub {
        self.hub
    }
}

impl Drop for JoystickGrab<'_> {
    fn drop(&mut self) {
        self.hub.flush();
        self.hub.set_mode(self.previous);
    }
}
