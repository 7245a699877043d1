//! Completion-tied enable/disable of submit controls
//!
//! A control is disabled from the moment its action starts until the
//! [`ActionGuard`] returned by [`SubmitGate::begin`] is dropped, i.e. when the
//! action (and the refresh that follows a success) completes. There is no
//! timer anywhere in this path.

use std::collections::HashMap;

use parking_lot::Mutex;
use strum::{AsRefStr, EnumIter};
use tracing::trace;

use crate::errors::{Result, TerseError};

/// Controls that trigger remote actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Control {
    WriteForm,
    DeleteRow,
    DeleteSelected,
    DeleteAll,
    Export,
    Import,
    Search,
}

/// Lifecycle of one action: `Idle → Submitting → Refreshing → Idle`.
/// A failure goes straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlPhase {
    #[default]
    Idle,
    Submitting,
    Refreshing,
}

impl ControlPhase {
    pub fn is_idle(self) -> bool {
        self == ControlPhase::Idle
    }
}

#[derive(Debug, Default)]
pub struct SubmitGate {
    // 不在表中即为 Idle
    phases: Mutex<HashMap<Control, ControlPhase>>,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable `control` for the lifetime of the returned guard.
    ///
    /// Fails with `ControlBusy` while the control is already in flight, which
    /// is what a click on a disabled button amounts to.
    pub fn begin(&self, control: Control) -> Result<ActionGuard<'_>> {
        let mut phases = self.phases.lock();
        if let Some(phase) = phases.get(&control) {
            return Err(TerseError::control_busy(format!(
                "{} is busy ({:?})",
                control.as_ref(),
                phase
            )));
        }
        phases.insert(control, ControlPhase::Submitting);
        trace!("{} -> Submitting", control.as_ref());
        Ok(ActionGuard {
            gate: self,
            control,
        })
    }

    pub fn phase(&self, control: Control) -> ControlPhase {
        self.phases
            .lock()
            .get(&control)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.phase(control).is_idle()
    }

    fn set(&self, control: Control, phase: ControlPhase) {
        let mut phases = self.phases.lock();
        if phase.is_idle() {
            phases.remove(&control);
        } else {
            phases.insert(control, phase);
        }
        trace!("{} -> {:?}", control.as_ref(), phase);
    }
}

/// Keeps a control disabled until dropped
#[derive(Debug)]
pub struct ActionGuard<'a> {
    gate: &'a SubmitGate,
    control: Control,
}

impl ActionGuard<'_> {
    pub fn control(&self) -> Control {
        self.control
    }

    /// The action succeeded and the follow-up refresh is in flight
    pub fn refreshing(&self) {
        self.gate.set(self.control, ControlPhase::Refreshing);
    }
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        self.gate.set(self.control, ControlPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_busy_until_drop() {
        let gate = SubmitGate::new();
        let guard = gate.begin(Control::WriteForm).unwrap();
        assert_eq!(gate.phase(Control::WriteForm), ControlPhase::Submitting);

        let err = gate.begin(Control::WriteForm).unwrap_err();
        assert_eq!(err.code(), "T005");

        // Other controls are independent
        assert!(gate.begin(Control::Export).is_ok());

        guard.refreshing();
        assert_eq!(gate.phase(Control::WriteForm), ControlPhase::Refreshing);
        assert!(!gate.is_enabled(Control::WriteForm));

        drop(guard);
        assert!(gate.is_enabled(Control::WriteForm));
        assert!(gate.begin(Control::WriteForm).is_ok());
    }

    #[test]
    fn test_control_names() {
        assert_eq!(Control::DeleteSelected.as_ref(), "delete-selected");
        assert_eq!(Control::WriteForm.as_ref(), "write-form");
    }
}
