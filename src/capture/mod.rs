//! Binding capture controller.
//!
//! A [`CaptureSession`] owns a staging copy of every binding while the
//! preferences dialog is open. Key presses and joystick events captured while
//! a control is focused are stored on that control, conflicting bindings in
//! the same pool are cleared, and focus moves on to the next control so a
//! whole row can be bound by pressing inputs in sequence.

mod keys;
#[cfg(test)]
mod tests;
mod toggle;

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use thiserror::Error;

pub use keys::{KeyAction, KeyEvent, KeyState, Page, normalize};
pub use toggle::ToggleGroup;

use crate::binding::Binding;
use crate::config::BindingConfig;
use crate::controls::{Control, NUM_JOYPADS};
use crate::joystick::{EVENT_QUEUE_CAPACITY, JoystickHub};
use crate::links::{ControlId, LinkTable, Slot};
use crate::pools::{JoypadBinding, ShortcutBindings};

/// Notifications kept for the UI layer before the oldest are dropped.
pub const EVENT_BACKLOG: usize = 256;

/// Notifications for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// `None` means the cancel button holds focus.
    FocusChanged(Option<ControlId>),
    /// Labels of the given profile (and of the shortcuts) must be redrawn.
    BindingsChanged { profile: usize },
    ProfileSelected(usize),
}

/// Whether a key event was used by the capture logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHandling {
    Consumed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("unknown control `{0}`")]
    UnknownControl(String),
    #[error("joypad profile {0} is out of range")]
    ProfileOutOfRange(usize),
}

pub struct CaptureSession {
    links: Arc<LinkTable>,
    pads: Vec<JoypadBinding>,
    shortcuts: ShortcutBindings,
    /// Joypad profile shown in the dialog.
    profile: usize,
    focus: Option<ControlId>,
    toggles: ToggleGroup<ControlId>,
    page: Page,
    use_modifiers: bool,
    joystick_threshold: u16,
    event_sender: Sender<DialogEvent>,
    event_receiver: Receiver<DialogEvent>,
}

impl CaptureSession {
    /// Opens a session on a copy of the bindings in `config`.
    pub fn open(config: &BindingConfig) -> Self {
        Self::with_links(config, LinkTable::standard())
    }

    pub fn with_links(config: &BindingConfig, links: Arc<LinkTable>) -> Self {
        let mut pads = config.joypads.clone();
        pads.resize_with(NUM_JOYPADS, JoypadBinding::new);
        let (event_sender, event_receiver) = bounded(EVENT_BACKLOG);

        Self {
            links,
            pads,
            shortcuts: config.shortcuts.clone(),
            profile: 0,
            focus: None,
            toggles: ToggleGroup::new(),
            page: Page::default(),
            use_modifiers: config.use_modifiers,
            joystick_threshold: config.joystick_threshold,
            event_sender,
            event_receiver,
        }
    }

    /// Receiver for UI notifications.
    ///
    /// All receivers pop from one queue, so each event reaches exactly one of
    /// them. The host is expected to drain it; past [`EVENT_BACKLOG`] pending
    /// events the oldest ones are dropped.
    pub fn events(&self) -> Receiver<DialogEvent> {
        self.event_receiver.clone()
    }

    /// Takes every pending notification.
    pub fn drain_events(&self) -> Vec<DialogEvent> {
        self.event_receiver.try_iter().collect()
    }

    fn notify(&self, event: DialogEvent) {
        // The session holds a receiver, so the channel cannot be disconnected.
        if let Err(TrySendError::Full(event)) = self.event_sender.try_send(event) {
            if let Ok(dropped) = self.event_receiver.try_recv() {
                tracing::trace!("UI event backlog full, dropping {:?}", dropped);
            }
            let _ = self.event_sender.try_send(event);
        }
    }

    #[inline]
    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    #[inline]
    pub fn profile(&self) -> usize {
        self.profile
    }

    #[inline]
    pub fn focus(&self) -> Option<ControlId> {
        self.focus
    }

    #[inline]
    pub fn page(&self) -> Page {
        self.page
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    #[inline]
    pub fn use_modifiers(&self) -> bool {
        self.use_modifiers
    }

    pub fn set_use_modifiers(&mut self, use_modifiers: bool) {
        self.use_modifiers = use_modifiers;
    }

    #[inline]
    pub fn joystick_threshold(&self) -> u16 {
        self.joystick_threshold
    }

    pub fn set_joystick_threshold(&mut self, threshold: u16) {
        self.joystick_threshold = threshold;
    }

    /// Moves focus to a control, or to the cancel button with `None`.
    pub fn set_focus(&mut self, focus: Option<ControlId>) {
        if let Some(id) = focus {
            debug_assert!(id.index() < self.links.len());
        }
        self.focus = focus;
        tracing::trace!(
            "Focus on {}",
            focus.map_or("cancel", |id| self.links.name(id))
        );
        self.notify(DialogEvent::FocusChanged(focus));
    }

    pub fn focus_named(&mut self, name: &str) -> Result<ControlId, CaptureError> {
        let id = self.resolve(name)?;
        self.set_focus(Some(id));
        Ok(id)
    }

    /// Advances focus to the next control of the current group, or to the
    /// cancel button at a group boundary.
    pub fn focus_next(&mut self) {
        let next = self.links.next_focus(self.focus);
        self.set_focus(next);
    }

    fn resolve(&self, name: &str) -> Result<ControlId, CaptureError> {
        self.links
            .find(name)
            .ok_or_else(|| CaptureError::UnknownControl(name.to_string()))
    }

    /// Handles a key event delivered while the dialog has keyboard focus.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyHandling {
        let Some(focus) = self.focus else {
            return KeyHandling::Ignored;
        };

        match normalize(event, self.page, self.use_modifiers) {
            KeyAction::Ignore => KeyHandling::Ignored,
            KeyAction::Advance => {
                self.focus_next();
                KeyHandling::Consumed
            }
            KeyAction::ClearFocused => {
                self.store_binding(focus, Binding::None);
                KeyHandling::Consumed
            }
            KeyAction::Capture(binding) => {
                self.store_binding(focus, binding);
                KeyHandling::Consumed
            }
        }
    }

    /// Stores `binding` on `id`, clears every other control of the same pool
    /// bound to the same physical input, then advances focus.
    ///
    /// Joypad controls resolve to the profile currently shown; shortcuts to
    /// the shortcut pool. The two pools are never checked against each other.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this session's link table.
    pub fn store_binding(&mut self, id: ControlId, binding: Binding) {
        match self.links.slot(id) {
            Slot::Joypad(control) => {
                let cleared = self.pads[self.profile].store(control, binding);
                for other in cleared {
                    tracing::debug!(
                        "Cleared {} on joypad {} (now on {})",
                        other.name(),
                        self.profile,
                        control.name()
                    );
                }
            }
            Slot::Shortcut(shortcut) => {
                let cleared = self.shortcuts.store(shortcut, binding);
                for other in cleared {
                    tracing::debug!(
                        "Cleared shortcut {} (now on {})",
                        other.name(),
                        shortcut.name()
                    );
                }
            }
        }
        tracing::debug!("Bound {} to `{}`", self.links.name(id), binding);

        self.focus_next();
        self.notify(DialogEvent::BindingsChanged {
            profile: self.profile,
        });
    }

    pub fn store_binding_named(&mut self, name: &str, binding: Binding) -> Result<(), CaptureError> {
        let id = self.resolve(name)?;
        self.store_binding(id, binding);
        Ok(())
    }

    /// Binding currently shown for `id`.
    pub fn binding(&self, id: ControlId) -> &Binding {
        match self.links.slot(id) {
            Slot::Joypad(control) => self.pads[self.profile].get(control),
            Slot::Shortcut(shortcut) => self.shortcuts.get(shortcut),
        }
    }

    pub fn joypad(&self, profile: usize) -> Option<&JoypadBinding> {
        self.pads.get(profile)
    }

    pub fn shortcuts(&self) -> &ShortcutBindings {
        &self.shortcuts
    }

    /// Samples every joystick once and drains its queue, reading at most
    /// [`EVENT_QUEUE_CAPACITY`] events per device. The first press seen while
    /// a control is focused is bound to it and every other pending event is
    /// discarded.
    ///
    /// Returns the control that received a binding.
    pub fn poll_joysticks(&mut self, hub: &mut JoystickHub) -> Option<ControlId> {
        let mut captured = None;
        hub.update();

        'devices: for (index, device) in hub.devices_mut().iter_mut().enumerate() {
            let events = std::iter::from_fn(|| device.next_event()).take(EVENT_QUEUE_CAPACITY);
            for event in events {
                if event.is_press()
                    && let Some(focus) = self.focus
                    && let Ok(device_index) = u8::try_from(index)
                {
                    let binding =
                        Binding::joystick(device_index, event.param, self.joystick_threshold);
                    captured = Some((focus, binding));
                    break 'devices;
                }
            }
        }

        let (focus, binding) = captured?;
        self.store_binding(focus, binding);
        hub.flush();
        Some(focus)
    }

    /// Shows another joypad profile.
    pub fn select_profile(&mut self, profile: usize) -> Result<(), CaptureError> {
        self.check_profile(profile)?;
        self.profile = profile;
        self.notify(DialogEvent::ProfileSelected(profile));
        self.notify(DialogEvent::BindingsChanged { profile });
        Ok(())
    }

    /// Exchanges the bindings of two profiles as they are, then shows
    /// `source`.
    pub fn swap_profiles(&mut self, source: usize, dest: usize) -> Result<(), CaptureError> {
        self.check_profile(source)?;
        self.check_profile(dest)?;
        self.pads.swap(source, dest);
        tracing::debug!("Swapped joypad {} with joypad {}", source, dest);
        self.select_profile(source)
    }

    /// Unbinds every control of one profile.
    pub fn reset_profile(&mut self, profile: usize) -> Result<(), CaptureError> {
        self.check_profile(profile)?;
        self.pads[profile].clear_all();
        self.select_profile(profile)
    }

    fn check_profile(&self, profile: usize) -> Result<(), CaptureError> {
        if profile < self.pads.len() {
            Ok(())
        } else {
            Err(CaptureError::ProfileOutOfRange(profile))
        }
    }

    /// Text shown next to every control, for the current profile.
    pub fn binding_labels(&self) -> Vec<(&'static str, String)> {
        self.links
            .iter()
            .map(|(id, slot)| (slot.name(), self.binding(id).label()))
            .collect()
    }

    /// Applies a control toggle button state change.
    pub fn toggle_control(&mut self, id: ControlId, on: bool) -> Option<ControlId> {
        self.toggles.set(id, on)
    }

    #[inline]
    pub fn toggled(&self) -> Option<ControlId> {
        self.toggles.active()
    }

    /// Writes the staging bindings back to `config`.
    pub fn commit(&self, config: &mut BindingConfig) {
        config.joypads = self.pads.clone();
        config.shortcuts = self.shortcuts.clone();
        config.joystick_threshold = self.joystick_threshold;
        config.use_modifiers = self.use_modifiers;
        tracing::info!("Committed binding changes");
    }
}
