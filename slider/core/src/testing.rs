//! In-Memory Collaborators
//!
//! Recording implementations of [`DialogFactory`], [`DialogResource`] and
//! [`AmbientNotifier`]. Every dialog call lands in a shared [`CallLog`], so
//! tests (and headless hosts) can assert on exactly what the controller did
//! without any rendering layer.
//!
//! The factory's rendering context is a [`ResourceSnapshot`] itself: the
//! "display" is whatever color and rotation the test says it is.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ambient::{AmbientNotifier, AmbientSetting};
use crate::dialog::{DialogError, DialogFactory, DialogResource};
use crate::events::{RingerMode, SliderPosition};
use crate::snapshot::ResourceSnapshot;

/// One observable effect on a dialog resource
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogCall {
    /// A resource was built
    Constructed {
        /// Resource id
        id: usize,
        /// Snapshot it was built with
        snapshot: ResourceSnapshot,
    },
    /// `show()` was called
    Show {
        /// Resource id
        id: usize,
    },
    /// `dismiss()` was called
    Dismiss {
        /// Resource id
        id: usize,
    },
    /// `set_state()` was called
    SetState {
        /// Resource id
        id: usize,
        /// Position applied
        position: SliderPosition,
        /// Mode applied
        mode: RingerMode,
    },
    /// The resource was dropped
    Discarded {
        /// Resource id
        id: usize,
    },
}

/// Shared, ordered log of dialog calls
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<DialogCall>>>);

impl CallLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call
    pub fn record(&self, call: DialogCall) {
        self.0.lock().push(call);
    }

    /// Copy of every call so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<DialogCall> {
        self.0.lock().clone()
    }

    /// Number of calls matching a predicate
    pub fn count(&self, predicate: impl Fn(&DialogCall) -> bool) -> usize {
        self.0.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Number of `show()` calls
    #[must_use]
    pub fn shows(&self) -> usize {
        self.count(|c| matches!(c, DialogCall::Show { .. }))
    }

    /// Number of `dismiss()` calls
    #[must_use]
    pub fn dismissals(&self) -> usize {
        self.count(|c| matches!(c, DialogCall::Dismiss { .. }))
    }

    /// Number of resources built
    #[must_use]
    pub fn constructions(&self) -> usize {
        self.count(|c| matches!(c, DialogCall::Constructed { .. }))
    }

    /// Number of resources dropped
    #[must_use]
    pub fn discards(&self) -> usize {
        self.count(|c| matches!(c, DialogCall::Discarded { .. }))
    }

    /// Last `set_state()` applied to any resource
    #[must_use]
    pub fn last_state(&self) -> Option<(SliderPosition, RingerMode)> {
        self.0.lock().iter().rev().find_map(|call| match call {
            DialogCall::SetState { position, mode, .. } => Some((*position, *mode)),
            _ => None,
        })
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Dialog resource that only records what happens to it
#[derive(Debug)]
pub struct RecordingDialog {
    id: usize,
    snapshot: ResourceSnapshot,
    log: CallLog,
}

impl RecordingDialog {
    /// Resource id, unique per factory
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl DialogResource for RecordingDialog {
    fn show(&mut self) {
        self.log.record(DialogCall::Show { id: self.id });
    }

    fn dismiss(&mut self) {
        self.log.record(DialogCall::Dismiss { id: self.id });
    }

    fn set_state(&mut self, position: SliderPosition, mode: RingerMode) {
        self.log.record(DialogCall::SetState {
            id: self.id,
            position,
            mode,
        });
    }

    fn snapshot(&self) -> ResourceSnapshot {
        self.snapshot
    }
}

impl Drop for RecordingDialog {
    fn drop(&mut self) {
        self.log.record(DialogCall::Discarded { id: self.id });
    }
}

#[derive(Debug, Default)]
struct FactoryState {
    next_id: AtomicUsize,
    fail_construct: AtomicBool,
    fail_snapshot: AtomicBool,
}

/// Factory producing [`RecordingDialog`]s
///
/// Clones share the log and the failure switches, so a test can keep one
/// clone while the controller owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingFactory {
    log: CallLog,
    state: Arc<FactoryState>,
}

impl RecordingFactory {
    /// Create a factory with an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared call log
    #[must_use]
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Make subsequent constructions fail (or succeed again)
    pub fn fail_construction(&self, fail: bool) {
        self.state.fail_construct.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent snapshot reads fail (or succeed again)
    pub fn fail_snapshot(&self, fail: bool) {
        self.state.fail_snapshot.store(fail, Ordering::SeqCst);
    }
}

impl DialogFactory for RecordingFactory {
    type Context = ResourceSnapshot;
    type Dialog = RecordingDialog;

    fn snapshot(&self, context: &ResourceSnapshot) -> Result<ResourceSnapshot, DialogError> {
        if self.state.fail_snapshot.load(Ordering::SeqCst) {
            return Err(DialogError::ResourceLookup(
                "theme color unavailable".to_string(),
            ));
        }
        Ok(*context)
    }

    fn construct(&self, context: &ResourceSnapshot) -> Result<RecordingDialog, DialogError> {
        if self.state.fail_construct.load(Ordering::SeqCst) {
            return Err(DialogError::Construction("layout inflation failed".to_string()));
        }
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.log.record(DialogCall::Constructed {
            id,
            snapshot: *context,
        });
        Ok(RecordingDialog {
            id,
            snapshot: *context,
            log: self.log.clone(),
        })
    }
}

/// Ambient notifier counting pulses
#[derive(Clone, Debug, Default)]
pub struct RecordingAmbient {
    setting: AmbientSetting,
    pulses: Arc<AtomicUsize>,
}

impl RecordingAmbient {
    /// Create a notifier with pulsing enabled or disabled
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            setting: AmbientSetting::new(enabled),
            pulses: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The shared setting
    #[must_use]
    pub fn setting(&self) -> &AmbientSetting {
        &self.setting
    }

    /// Pulses sent so far
    #[must_use]
    pub fn pulses(&self) -> usize {
        self.pulses.load(Ordering::SeqCst)
    }
}

impl AmbientNotifier for RecordingAmbient {
    fn pulse_on_notification_enabled(&self) -> bool {
        self.setting.is_enabled()
    }

    fn pulse(&self) {
        self.pulses.fetch_add(1, Ordering::SeqCst);
    }
}
