//! Ambient Display Pulse
//!
//! When the user has "pulse on notification" enabled, every slider change
//! should also wake the always-on display briefly. The setting is owned by
//! the host; the controller only asks whether it is on and fires the pulse.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Side-effect sink for ambient display pulses
pub trait AmbientNotifier {
    /// Whether the user enabled pulsing on notifications
    fn pulse_on_notification_enabled(&self) -> bool;

    /// Trigger the pulse (fire and forget)
    fn pulse(&self);

    /// Pulse if the setting allows it
    ///
    /// Returns whether a pulse was sent.
    fn pulse_if_enabled(&self) -> bool {
        if !self.pulse_on_notification_enabled() {
            return false;
        }
        self.pulse();
        true
    }
}

/// Shared, host-owned "pulse on notification" flag
///
/// Cloning shares the flag, so the host can flip it while the controller
/// holds a notifier reading it.
#[derive(Clone, Debug, Default)]
pub struct AmbientSetting(Arc<AtomicBool>);

impl AmbientSetting {
    /// Create the setting with an initial value
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Current value
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Change the value
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }
}
