//! Preferences dialog lifecycle.
//!
//! The dialog edits a staging copy of the bindings, polls joysticks on a
//! fixed schedule while it is open, and writes the staging copy back only on
//! OK or Apply. The joystick grab lives inside the dialog value and is
//! released on the first closing response or when the dialog is dropped,
//! whichever comes first. A closed dialog neither polls nor commits.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::capture::CaptureSession;
use crate::config::BindingConfig;
use crate::joystick::{JoystickGrab, JoystickHub};
use crate::links::ControlId;

/// Interval between two joystick polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Button the user pressed to leave or confirm the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Ok,
    Apply,
    Cancel,
    Close,
    DeleteEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    KeepOpen,
    Close,
}

/// Fixed-interval schedule driven by the host loop's clock.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Instant,
}

impl PollSchedule {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Returns true once per elapsed interval. Missed intervals are not
    /// replayed.
    pub fn is_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}

pub struct PreferencesDialog<'a> {
    config: &'a mut BindingConfig,
    config_path: Option<PathBuf>,
    session: CaptureSession,
    /// `None` once the dialog has closed.
    joysticks: Option<JoystickGrab<'a>>,
    schedule: PollSchedule,
}

impl<'a> PreferencesDialog<'a> {
    /// Opens the dialog on `config`. With a `config_path`, confirmed changes
    /// are also saved to that file.
    pub fn open(
        config: &'a mut BindingConfig,
        hub: &'a mut JoystickHub,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self::open_at(config, hub, config_path, Instant::now())
    }

    pub fn open_at(
        config: &'a mut BindingConfig,
        hub: &'a mut JoystickHub,
        config_path: Option<PathBuf>,
        now: Instant,
    ) -> Self {
        let session = CaptureSession::open(config);
        let joysticks = JoystickGrab::new(hub);
        tracing::debug!("Preferences opened with {} joysticks", joysticks.len());

        Self {
            config,
            config_path,
            session,
            joysticks: Some(joysticks),
            schedule: PollSchedule::new(POLL_INTERVAL, now),
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CaptureSession {
        &mut self.session
    }

    /// The grabbed joysticks, while the dialog is open.
    pub fn joysticks(&self) -> Option<&JoystickHub> {
        self.joysticks.as_deref()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.joysticks.is_none()
    }

    /// Timer callback. Polls joysticks when the schedule is due and returns
    /// the control that received a binding, if any.
    pub fn tick(&mut self, now: Instant) -> Option<ControlId> {
        let joysticks = self.joysticks.as_mut()?;
        if !self.schedule.is_due(now) {
            return None;
        }
        self.session.poll_joysticks(joysticks)
    }

    /// Saves the current stick positions as their rest positions.
    pub fn calibrate(&mut self) {
        if let Some(joysticks) = self.joysticks.as_mut() {
            joysticks.register_centers();
            tracing::info!("Current joystick centers have been saved");
        }
    }

    /// Handles a dialog button. OK and Apply commit the staging copy and
    /// save it; every other response discards it. Once the dialog has
    /// closed, responses are ignored.
    pub fn respond(&mut self, response: DialogResponse) -> anyhow::Result<DialogOutcome> {
        if self.is_closed() {
            tracing::debug!("Ignoring {:?} on a closed dialog", response);
            return Ok(DialogOutcome::Close);
        }

        match response {
            DialogResponse::Ok => {
                self.apply()?;
                self.release();
                Ok(DialogOutcome::Close)
            }
            DialogResponse::Apply => {
                self.apply()?;
                Ok(DialogOutcome::KeepOpen)
            }
            DialogResponse::Cancel | DialogResponse::Close | DialogResponse::DeleteEvent => {
                tracing::debug!("Preferences dismissed with {:?}", response);
                self.release();
                Ok(DialogOutcome::Close)
            }
        }
    }

    fn apply(&mut self) -> anyhow::Result<()> {
        self.session.commit(self.config);
        if let Some(path) = &self.config_path {
            self.config.save_to_file(path)?;
            tracing::info!("Saved bindings to {}", path.display());
        }
        Ok(())
    }

    /// Stops polling and hands the joysticks back.
    fn release(&mut self) {
        self.joysticks = None;
    }

    /// Closes the dialog, releasing the joystick grab.
    pub fn close(self) {}
}
