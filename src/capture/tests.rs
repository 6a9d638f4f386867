//! Unit tests for capture module.

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use crate::binding::{AxisDirection, Binding, JoyParam, Modifiers, vk};
    use crate::capture::*;
    use crate::config::BindingConfig;
    use crate::controls::{JoypadControl, Shortcut};
    use crate::joystick::{
        ChannelJoystick, EVENT_QUEUE_CAPACITY, JoyEvent, JoystickDevice, JoystickHub,
    };
    use crate::links::{LinkTable, Slot};
    use crate::pools::JoypadBinding;

    fn empty_config() -> BindingConfig {
        BindingConfig {
            joystick_threshold: 16000,
            use_modifiers: false,
            shortcuts: Default::default(),
            joypads: Vec::new(),
        }
    }

    fn session() -> CaptureSession {
        CaptureSession::open(&empty_config())
    }

    fn key(vk: u32) -> Binding {
        Binding::key(vk, Modifiers::empty())
    }

    fn axis_up() -> Binding {
        Binding::joystick(
            0,
            JoyParam::Axis {
                axis: 1,
                direction: AxisDirection::Negative,
            },
            16000,
        )
    }

    fn id(session: &CaptureSession, name: &str) -> crate::links::ControlId {
        session.links().find(name).expect("known control")
    }

    /// Every control of the pool that `name` lives in, for the shown profile.
    fn pool_matches(session: &CaptureSession, name: &str, binding: &Binding) -> Vec<&'static str> {
        let target = session.links().slot(id(session, name));
        session
            .links()
            .iter()
            .filter(|(_, slot)| slot.is_joypad() == target.is_joypad())
            .filter(|(id, _)| session.binding(*id).matches(binding))
            .map(|(_, slot)| slot.name())
            .collect()
    }

    fn abcd_session() -> CaptureSession {
        let links = LinkTable::new(
            vec![
                Slot::Joypad(JoypadControl::A),
                Slot::Joypad(JoypadControl::B),
                Slot::Joypad(JoypadControl::X),
                Slot::Joypad(JoypadControl::Y),
            ],
            [4],
        );
        CaptureSession::with_links(&empty_config(), Arc::new(links))
    }

    #[test]
    fn test_open_pads_profiles() {
        let session = session();
        assert!(session.joypad(7).is_some());
        assert!(session.joypad(8).is_none());
        assert_eq!(session.profile(), 0);
        assert_eq!(session.focus(), None);
    }

    #[test]
    fn test_store_resolves_conflicts_in_pool() {
        let mut session = session();
        session.store_binding_named("up", axis_up()).unwrap();
        session.store_binding_named("down", axis_up()).unwrap();

        assert!(session.binding(id(&session, "up")).is_empty());
        assert_eq!(session.binding(id(&session, "down")), &axis_up());
        assert_eq!(pool_matches(&session, "down", &axis_up()), ["down"]);
    }

    #[test]
    fn test_store_leaves_one_binding_per_input() {
        let mut session = session();
        for name in ["a", "b", "x", "y", "turbo_a", "sticky_r"] {
            session.store_binding_named(name, key(0x4B)).unwrap();
            assert_eq!(pool_matches(&session, name, &key(0x4B)), [name]);
        }
    }

    #[test]
    fn test_profiles_are_separate_pools() {
        let mut session = session();
        session.store_binding_named("a", key(0x58)).unwrap();
        session.select_profile(1).unwrap();
        session.store_binding_named("b", key(0x58)).unwrap();

        assert_eq!(session.joypad(0).unwrap().get(JoypadControl::A), &key(0x58));
        assert_eq!(session.joypad(1).unwrap().get(JoypadControl::B), &key(0x58));
    }

    #[test]
    fn test_joypad_and_shortcuts_are_separate_pools() {
        let mut session = session();
        session.store_binding_named("start", key(vk::RETURN)).unwrap();
        session.store_binding_named("pause", key(vk::RETURN)).unwrap();

        assert_eq!(session.joypad(0).unwrap().get(JoypadControl::Start), &key(vk::RETURN));
        assert_eq!(session.shortcuts().get(Shortcut::Pause), &key(vk::RETURN));

        session.store_binding_named("select", key(vk::RETURN)).unwrap();
        assert!(session.joypad(0).unwrap().get(JoypadControl::Start).is_empty());
        assert_eq!(session.shortcuts().get(Shortcut::Pause), &key(vk::RETURN));
    }

    #[test]
    fn test_store_overwrites_unconditionally() {
        let mut session = session();
        session.store_binding_named("quit", key(0x51)).unwrap();
        session.store_binding_named("quit", key(0x51)).unwrap();
        assert_eq!(session.shortcuts().get(Shortcut::Quit), &key(0x51));

        session.store_binding_named("quit", key(0x52)).unwrap();
        assert_eq!(session.shortcuts().get(Shortcut::Quit), &key(0x52));
    }

    #[test]
    fn test_unknown_control_name() {
        let mut session = session();
        assert_eq!(
            session.store_binding_named("warp", key(0x41)),
            Err(CaptureError::UnknownControl("warp".to_string()))
        );
    }

    #[test]
    fn test_abcd_scenario() {
        let mut session = abcd_session();
        let c = session.links().id(2);
        session.set_focus(c);

        let handled = session.handle_key(&KeyEvent::press(0x4A, Modifiers::empty()));

        assert_eq!(handled, KeyHandling::Consumed);
        assert_eq!(session.binding(c.unwrap()), &key(0x4A));
        assert_eq!(session.focus(), session.links().id(3));

        session.handle_key(&KeyEvent::press(0x4B, Modifiers::empty()));
        assert_eq!(session.focus(), None);
    }

    #[test]
    fn test_store_advances_focus_within_group() {
        let mut session = session();
        let up = session.focus_named("up").unwrap();
        session.store_binding(up, key(vk::UP));
        assert_eq!(session.focus(), Some(id(&session, "down")));

        session.focus_named("select").unwrap();
        session.handle_key(&KeyEvent::press(vk::SPACE, Modifiers::empty()));
        assert_eq!(session.focus(), None);
    }

    #[test]
    fn test_key_without_focus_is_ignored() {
        let mut session = session();
        let handled = session.handle_key(&KeyEvent::press(0x41, Modifiers::empty()));
        assert_eq!(handled, KeyHandling::Ignored);
        assert!(session.joypad(0).unwrap().is_empty());
    }

    #[test]
    fn test_escape_advances_without_binding() {
        let mut session = session();
        session.store_binding_named("a", key(0x41)).unwrap();
        session.focus_named("a").unwrap();

        let handled = session.handle_key(&KeyEvent::press(vk::ESCAPE, Modifiers::empty()));

        assert_eq!(handled, KeyHandling::Consumed);
        assert_eq!(session.joypad(0).unwrap().get(JoypadControl::A), &key(0x41));
        assert_eq!(session.focus(), Some(id(&session, "b")));
    }

    #[test]
    fn test_shift_escape_clears_focused_binding() {
        let mut session = session();
        session.store_binding_named("a", key(0x41)).unwrap();
        session.store_binding_named("b", key(0x42)).unwrap();
        session.focus_named("a").unwrap();

        session.handle_key(&KeyEvent::press(vk::ESCAPE, Modifiers::SHIFT));

        let pad = session.joypad(0).unwrap();
        assert!(pad.get(JoypadControl::A).is_empty());
        assert_eq!(pad.get(JoypadControl::B), &key(0x42));
        assert_eq!(session.focus(), Some(id(&session, "b")));
    }

    #[test]
    fn test_modifier_keys_depend_on_page() {
        let mut session = session();
        session.focus_named("a").unwrap();
        let lshift = KeyEvent::press(vk::LSHIFT, Modifiers::SHIFT);

        session.set_page(Page::Joypads);
        assert_eq!(session.handle_key(&lshift), KeyHandling::Ignored);

        session.set_use_modifiers(true);
        assert_eq!(session.handle_key(&lshift), KeyHandling::Consumed);
        assert_eq!(session.joypad(0).unwrap().get(JoypadControl::A), &key(vk::LSHIFT));

        session.set_page(Page::Shortcuts);
        session.focus_named("pause").unwrap();
        assert_eq!(session.handle_key(&lshift), KeyHandling::Ignored);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut session = session();
        session.focus_named("a").unwrap();
        let handled = session.handle_key(&KeyEvent::release(0x41, Modifiers::empty()));
        assert_eq!(handled, KeyHandling::Ignored);
        assert_eq!(session.focus(), Some(id(&session, "a")));
    }

    #[test]
    fn test_joystick_press_is_captured_once() {
        let mut session = session();
        let mut hub = JoystickHub::new();
        let (idle, _idle_feeder) = ChannelJoystick::new("idle");
        let (pad, feeder) = ChannelJoystick::new("pad");
        hub.add(idle);
        hub.add(pad);

        feeder.release(JoyParam::Button(9));
        feeder.press(JoyParam::Button(2));
        feeder.press(JoyParam::Button(3));

        session.focus_named("a").unwrap();
        let bound = session.poll_joysticks(&mut hub);

        assert_eq!(bound, Some(id(&session, "a")));
        assert_eq!(
            session.joypad(0).unwrap().get(JoypadControl::A),
            &Binding::joystick(1, JoyParam::Button(2), 16000)
        );
        assert!(session.joypad(0).unwrap().get(JoypadControl::B).is_empty());
        assert_eq!(session.focus(), Some(id(&session, "b")));
        assert_eq!(session.poll_joysticks(&mut hub), None);
    }

    #[test]
    fn test_joystick_uses_configured_threshold() {
        let mut session = session();
        session.set_joystick_threshold(9000);
        let mut hub = JoystickHub::new();
        let (pad, feeder) = ChannelJoystick::new("pad");
        hub.add(pad);

        let up = JoyParam::Axis {
            axis: 1,
            direction: AxisDirection::Negative,
        };
        feeder.send(JoyEvent::press(up));
        session.focus_named("up").unwrap();
        session.poll_joysticks(&mut hub);

        assert_eq!(
            session.joypad(0).unwrap().get(JoypadControl::Up),
            &Binding::joystick(0, up, 9000)
        );
    }

    #[test]
    fn test_joystick_without_focus_is_discarded() {
        let mut session = session();
        let mut hub = JoystickHub::new();
        let (pad, feeder) = ChannelJoystick::new("pad");
        hub.add(pad);
        feeder.press(JoyParam::Button(0));

        assert_eq!(session.poll_joysticks(&mut hub), None);
        assert!(session.joypad(0).unwrap().is_empty());

        session.focus_named("a").unwrap();
        assert_eq!(session.poll_joysticks(&mut hub), None);
    }

    /// Device whose queue never runs dry, like a stick jittering around the
    /// threshold. Counters are shared so the test can read them back.
    #[derive(Default)]
    struct NoisyJoystick {
        reads: Rc<Cell<usize>>,
        updates: Rc<Cell<usize>>,
    }

    impl JoystickDevice for NoisyJoystick {
        fn name(&self) -> &str {
            "noisy"
        }

        fn update(&mut self) {
            self.updates.set(self.updates.get() + 1);
        }

        fn next_event(&mut self) -> Option<JoyEvent> {
            self.reads.set(self.reads.get() + 1);
            Some(JoyEvent::release(JoyParam::Button(0)))
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_joystick_pass_is_bounded() {
        let mut session = session();
        let mut hub = JoystickHub::new();
        let noisy = NoisyJoystick::default();
        let (reads, updates) = (noisy.reads.clone(), noisy.updates.clone());
        hub.add(noisy);
        session.focus_named("a").unwrap();

        assert_eq!(session.poll_joysticks(&mut hub), None);
        assert_eq!(reads.get(), EVENT_QUEUE_CAPACITY);
        assert_eq!(updates.get(), 1);

        session.poll_joysticks(&mut hub);
        assert_eq!(reads.get(), 2 * EVENT_QUEUE_CAPACITY);
        assert_eq!(updates.get(), 2);
        assert!(session.joypad(0).unwrap().is_empty());
    }

    #[test]
    fn test_event_backlog_keeps_newest() {
        let mut session = session();
        let a = id(&session, "a");
        let b = id(&session, "b");
        for _ in 0..EVENT_BACKLOG {
            session.set_focus(Some(a));
        }
        session.set_focus(Some(b));

        let events = session.drain_events();
        assert_eq!(events.len(), EVENT_BACKLOG);
        assert_eq!(events.last(), Some(&DialogEvent::FocusChanged(Some(b))));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_swap_profiles_is_a_plain_exchange() {
        let mut session = session();
        session.store_binding_named("a", key(0x41)).unwrap();
        session.select_profile(3).unwrap();
        session.store_binding_named("b", key(0x41)).unwrap();
        let before_zero = session.joypad(0).unwrap().clone();
        let before_three = session.joypad(3).unwrap().clone();

        session.swap_profiles(0, 3).unwrap();

        assert_eq!(session.joypad(0), Some(&before_three));
        assert_eq!(session.joypad(3), Some(&before_zero));
        assert_eq!(session.profile(), 0);
    }

    #[test]
    fn test_profile_range_is_checked() {
        let mut session = session();
        assert_eq!(
            session.select_profile(8),
            Err(CaptureError::ProfileOutOfRange(8))
        );
        assert_eq!(
            session.swap_profiles(0, 12),
            Err(CaptureError::ProfileOutOfRange(12))
        );
        assert_eq!(session.profile(), 0);
    }

    #[test]
    fn test_reset_profile() {
        let mut session = session();
        session.store_binding_named("a", key(0x41)).unwrap();
        session.store_binding_named("pause", key(0x50)).unwrap();

        session.reset_profile(0).unwrap();

        assert!(session.joypad(0).unwrap().is_empty());
        assert_eq!(session.shortcuts().get(Shortcut::Pause), &key(0x50));
    }

    #[test]
    fn test_events_are_reported() {
        let mut session = session();
        session.drain_events();
        let a = session.focus_named("a").unwrap();
        session.store_binding(a, key(0x41));

        let events = session.drain_events();
        let b = session.links().find("b");
        assert_eq!(
            events,
            [
                DialogEvent::FocusChanged(Some(a)),
                DialogEvent::FocusChanged(b),
                DialogEvent::BindingsChanged { profile: 0 },
            ]
        );
    }

    #[test]
    fn test_binding_labels_follow_profile() {
        let mut session = session();
        session.store_binding_named("up", key(vk::UP)).unwrap();

        let labels = session.binding_labels();
        assert_eq!(labels.len(), session.links().len());
        assert_eq!(labels[0], ("up", "UP".to_string()));

        session.select_profile(1).unwrap();
        assert_eq!(session.binding_labels()[0], ("up", "Unset".to_string()));
    }

    #[test]
    fn test_toggle_group() {
        let mut session = session();
        let a = id(&session, "a");
        let b = id(&session, "b");
        assert_eq!(session.toggle_control(a, true), None);
        assert_eq!(session.toggle_control(b, true), Some(a));
        assert_eq!(session.toggled(), Some(b));
    }

    #[test]
    fn test_commit_writes_staging_copy() {
        let mut config = empty_config();
        let mut session = CaptureSession::open(&config);
        session.store_binding_named("r", key(0x57)).unwrap();
        session.set_joystick_threshold(12000);

        assert!(config.joypads.is_empty());
        session.commit(&mut config);

        assert_eq!(config.joypads.len(), 8);
        assert_eq!(config.joypads[0].get(JoypadControl::R), &key(0x57));
        assert_eq!(config.joystick_threshold, 12000);
        assert_eq!(config.joypads[1], JoypadBinding::new());
    }
}
