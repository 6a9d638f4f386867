//! XInput controllers as joystick devices.
//!
//! Button parameters are the bit positions of the XInput button mask. Axes
//! are numbered left X, left Y, right X, right Y, left trigger, right
//! trigger. Triggers only report the positive direction.

use std::collections::VecDeque;

use smallvec::SmallVec;
use windows::Win32::UI::Input::XboxController::*;

use super::{EVENT_QUEUE_CAPACITY, JoyEvent, JoystickDevice};
use crate::binding::{AxisDirection, JoyParam};

const STICK_AXES: usize = 4;
const LEFT_TRIGGER_AXIS: u8 = 4;
const RIGHT_TRIGGER_AXIS: u8 = 5;

/// Joystick reading one XInput user slot.
pub struct XInputJoystick {
    user_index: u32,
    name: String,
    threshold: i32,
    centers: [i16; STICK_AXES],
    last_buttons: u16,
    last_axes: SmallVec<[JoyParam; 8]>,
    pending: VecDeque<JoyEvent>,
}

impl XInputJoystick {
    pub fn new(user_index: u32, threshold: u16) -> Self {
        Self {
            user_index,
            name: format!("XInput Controller {}", user_index + 1),
            threshold: i32::from(threshold),
            centers: [0; STICK_AXES],
            last_buttons: 0,
            last_axes: SmallVec::new(),
            pending: VecDeque::with_capacity(EVENT_QUEUE_CAPACITY),
        }
    }

    /// Every user slot that currently has a controller plugged in.
    pub fn connected(threshold: u16) -> Vec<Self> {
        (0..XUSER_MAX_COUNT)
            .filter(|&user_index| read_state(user_index).is_some())
            .map(|user_index| Self::new(user_index, threshold))
            .collect()
    }

    fn poll(&mut self) {
        let Some(gamepad) = read_state(self.user_index) else {
            return;
        };

        let buttons = gamepad.wButtons.0;
        let changed = buttons ^ self.last_buttons;
        for bit in 0..16u16 {
            let mask = 1u16 << bit;
            if changed & mask == 0 {
                continue;
            }
            let param = JoyParam::Button(bit);
            if buttons & mask != 0 {
                self.push(JoyEvent::press(param));
            } else {
                self.push(JoyEvent::release(param));
            }
        }
        self.last_buttons = buttons;

        let axes = self.active_axes(&gamepad);
        for param in &axes {
            if !self.last_axes.contains(param) {
                self.push(JoyEvent::press(*param));
            }
        }
        for index in 0..self.last_axes.len() {
            let param = self.last_axes[index];
            if !axes.contains(&param) {
                self.push(JoyEvent::release(param));
            }
        }
        self.last_axes = axes;
    }

    fn active_axes(&self, gamepad: &XINPUT_GAMEPAD) -> SmallVec<[JoyParam; 8]> {
        let sticks = [
            gamepad.sThumbLX,
            gamepad.sThumbLY,
            gamepad.sThumbRX,
            gamepad.sThumbRY,
        ];
        let mut active = SmallVec::new();

        for (axis, (&value, &center)) in sticks.iter().zip(self.centers.iter()).enumerate() {
            let offset = i32::from(value) - i32::from(center);
            let direction = if offset > self.threshold {
                AxisDirection::Positive
            } else if offset < -self.threshold {
                AxisDirection::Negative
            } else {
                continue;
            };
            active.push(JoyParam::Axis {
                axis: axis as u8,
                direction,
            });
        }

        for (axis, value) in [
            (LEFT_TRIGGER_AXIS, gamepad.bLeftTrigger),
            (RIGHT_TRIGGER_AXIS, gamepad.bRightTrigger),
        ] {
            // Scale 0..=255 onto the stick range so one threshold fits both.
            if i32::from(value) * 128 > self.threshold {
                active.push(JoyParam::Axis {
                    axis,
                    direction: AxisDirection::Positive,
                });
            }
        }

        active
    }

    fn push(&mut self, event: JoyEvent) {
        if self.pending.len() >= EVENT_QUEUE_CAPACITY {
            tracing::trace!("XInput queue full, dropping {:?}", event);
            return;
        }
        self.pending.push_back(event);
    }
}

impl JoystickDevice for XInputJoystick {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self) {
        self.poll();
    }

    fn next_event(&mut self) -> Option<JoyEvent> {
        self.pending.pop_front()
    }

    fn flush(&mut self) {
        // Sync with the hardware so held inputs do not fire again.
        self.poll();
        self.pending.clear();
    }

    fn register_centers(&mut self) {
        if let Some(gamepad) = read_state(self.user_index) {
            self.centers = [
                gamepad.sThumbLX,
                gamepad.sThumbLY,
                gamepad.sThumbRX,
                gamepad.sThumbRY,
            ];
            tracing::info!("Registered centers for {}: {:?}", self.name, self.centers);
        }
    }
}

fn read_state(user_index: u32) -> Option<XINPUT_GAMEPAD> {
    let mut state = XINPUT_STATE::default();
    match unsafe { XInputGetState(user_index, &mut state) } {
        0 => Some(state.Gamepad),
        _ => None,
    }
}
