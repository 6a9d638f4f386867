//! Keyboard event normalization.

use crate::binding::{Binding, Modifiers, vk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Raw keyboard event as delivered by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub vk: u32,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn press(vk: u32, modifiers: Modifiers) -> Self {
        Self {
            vk,
            modifiers,
            state: KeyState::Pressed,
        }
    }

    pub fn release(vk: u32, modifiers: Modifiers) -> Self {
        Self {
            vk,
            modifiers,
            state: KeyState::Released,
        }
    }
}

/// Preferences page currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    General,
    Display,
    Sound,
    Emulation,
    Joypads,
    Shortcuts,
}

/// What a key press means to the capture logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Not for us; let the toolkit handle it.
    Ignore,
    /// Move focus to the next control without binding anything.
    Advance,
    /// Unbind the focused control.
    ClearFocused,
    Capture(Binding),
}

/// Turns a raw key event into a capture action.
///
/// Control, shift and alt are only bindable on their own while the joypad
/// page is shown with `use_modifiers` enabled. Escape advances focus; with
/// shift held it clears the focused binding instead.
pub fn normalize(event: &KeyEvent, page: Page, use_modifiers: bool) -> KeyAction {
    if event.state != KeyState::Pressed {
        return KeyAction::Ignore;
    }

    if vk::is_modifier(event.vk) && !(page == Page::Joypads && use_modifiers) {
        return KeyAction::Ignore;
    }

    if event.vk == vk::ESCAPE {
        return if event.modifiers.contains(Modifiers::SHIFT) {
            KeyAction::ClearFocused
        } else {
            KeyAction::Advance
        };
    }

    KeyAction::Capture(Binding::key(event.vk, event.modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_key_is_captured() {
        let event = KeyEvent::press(0x41, Modifiers::CTRL);
        assert_eq!(
            normalize(&event, Page::Joypads, false),
            KeyAction::Capture(Binding::key(0x41, Modifiers::CTRL))
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let event = KeyEvent::release(0x41, Modifiers::empty());
        assert_eq!(normalize(&event, Page::Joypads, true), KeyAction::Ignore);
    }

    #[test]
    fn test_modifiers_filtered_outside_joypad_page() {
        for vk in [vk::LSHIFT, vk::RSHIFT, vk::LCONTROL, vk::RCONTROL, vk::LMENU, vk::RMENU] {
            let event = KeyEvent::press(vk, Modifiers::empty());
            assert_eq!(normalize(&event, Page::Shortcuts, true), KeyAction::Ignore);
            assert_eq!(normalize(&event, Page::Joypads, false), KeyAction::Ignore);
        }
    }

    #[test]
    fn test_modifiers_bindable_on_joypad_page_when_enabled() {
        let event = KeyEvent::press(vk::LCONTROL, Modifiers::CTRL);
        assert_eq!(
            normalize(&event, Page::Joypads, true),
            KeyAction::Capture(Binding::key(vk::LCONTROL, Modifiers::empty()))
        );
    }

    #[test]
    fn test_escape() {
        let plain = KeyEvent::press(vk::ESCAPE, Modifiers::empty());
        let shifted = KeyEvent::press(vk::ESCAPE, Modifiers::SHIFT);
        let ctrl = KeyEvent::press(vk::ESCAPE, Modifiers::CTRL);

        assert_eq!(normalize(&plain, Page::Joypads, false), KeyAction::Advance);
        assert_eq!(normalize(&shifted, Page::Joypads, false), KeyAction::ClearFocused);
        assert_eq!(normalize(&ctrl, Page::Shortcuts, false), KeyAction::Advance);
    }
}
