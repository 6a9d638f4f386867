//! Joystick backed by a bounded channel.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use super::{JoyEvent, JoystickDevice};
use crate::binding::JoyParam;

/// Events a device holds before new ones are dropped.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Joystick whose events are pushed by a [`JoystickFeeder`], typically from
/// an input backend thread.
pub struct ChannelJoystick {
    name: String,
    receiver: Receiver<JoyEvent>,
}

/// Sending half of a [`ChannelJoystick`].
#[derive(Clone)]
pub struct JoystickFeeder {
    sender: Sender<JoyEvent>,
}

impl ChannelJoystick {
    pub fn new(name: impl Into<String>) -> (Self, JoystickFeeder) {
        Self::with_capacity(name, EVENT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> (Self, JoystickFeeder) {
        let (sender, receiver) = bounded(capacity);
        (
            Self {
                name: name.into(),
                receiver,
            },
            JoystickFeeder { sender },
        )
    }
}

impl JoystickDevice for ChannelJoystick {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_event(&mut self) -> Option<JoyEvent> {
        self.receiver.try_recv().ok()
    }

    fn flush(&mut self) {
        while self.receiver.try_recv().is_ok() {}
    }
}

impl JoystickFeeder {
    /// Queues an event. Returns false if the queue is full or the device is
    /// gone; the event is dropped in that case.
    pub fn send(&self, event: JoyEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::trace!("Joystick queue full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn press(&self, param: JoyParam) -> bool {
        self.send(JoyEvent::press(param))
    }

    pub fn release(&self, param: JoyParam) -> bool {
        self.send(JoyEvent::release(param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_come_out_in_order() {
        let (mut device, feeder) = ChannelJoystick::new("pad");
        assert!(feeder.press(JoyParam::Button(1)));
        assert!(feeder.release(JoyParam::Button(1)));

        assert_eq!(device.next_event(), Some(JoyEvent::press(JoyParam::Button(1))));
        assert_eq!(device.next_event(), Some(JoyEvent::release(JoyParam::Button(1))));
        assert_eq!(device.next_event(), None);
    }

    #[test]
    fn test_queue_is_bounded() {
        let (mut device, feeder) = ChannelJoystick::with_capacity("pad", 2);
        assert!(feeder.press(JoyParam::Button(0)));
        assert!(feeder.press(JoyParam::Button(1)));
        assert!(!feeder.press(JoyParam::Button(2)));

        device.flush();
        assert_eq!(device.next_event(), None);
        assert!(feeder.press(JoyParam::Button(3)));
    }

    #[test]
    fn test_send_after_device_dropped() {
        let (device, feeder) = ChannelJoystick::new("pad");
        drop(device);
        assert!(!feeder.press(JoyParam::Button(0)));
    }
}
