//! Controller Messages
//!
//! Everything the notification controller does happens in response to one of
//! these messages arriving in its inbox. Producers never touch controller
//! state directly; they enqueue a message through a
//! [`ControllerHandle`](crate::controller::ControllerHandle) and the actor
//! applies it in order.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::controller::ControllerError;
use crate::events::SliderEvent;
use crate::snapshot::ResourceSnapshot;

/// Reply channel for a recreation request
pub type RecreateReply = oneshot::Sender<Result<RecreateOutcome, ControllerError>>;

/// Messages processed by the notification controller
#[derive(Debug)]
pub enum ControllerMessage<C> {
    // ============================================
    // Visibility
    // ============================================
    /// The slider moved: update content, re-arm the timer, show
    Update(SliderEvent),

    /// Make the indicator visible if it is not already
    Show,

    /// Hide the indicator
    Dismiss(DismissOrigin),

    /// Re-arm the dismiss timer without touching visibility
    Reset,

    // ============================================
    // Resources
    // ============================================
    /// Check the context's snapshot and rebuild the dialog if it changed
    Recreate {
        /// Rendering context to evaluate
        context: C,
        /// Where to report the outcome (fire and forget if absent)
        reply: Option<RecreateReply>,
    },

    // ============================================
    // Lifecycle
    // ============================================
    /// Report the controller's current state
    Status {
        /// Reply channel
        reply: oneshot::Sender<ControllerStatus>,
    },

    /// Stop the actor
    Shutdown,
}

impl<C> ControllerMessage<C> {
    /// Short name of the message kind, for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Update(_) => "update",
            Self::Show => "show",
            Self::Dismiss(_) => "dismiss",
            Self::Reset => "reset",
            Self::Recreate { .. } => "recreate",
            Self::Status { .. } => "status",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Who asked for a dismissal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissOrigin {
    /// Explicit request from a producer
    Requested,
    /// The dismiss timer armed with this generation elapsed
    Timer {
        /// Generation the timer was armed with
        generation: u64,
    },
}

/// Result of a recreation request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecreateOutcome {
    /// Snapshot matched the baseline; nothing was rebuilt
    Unchanged,
    /// Snapshot matched the baseline of a resource previously marked stale,
    /// which is valid again
    Revalidated,
    /// A new dialog resource replaced the old one
    Rebuilt {
        /// Baseline of the discarded resource
        previous: ResourceSnapshot,
        /// Baseline of the new resource
        current: ResourceSnapshot,
    },
}

/// Counters of what the controller has done since start
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStats {
    /// Slider updates processed
    pub updates: u64,
    /// `show()` calls issued to the dialog
    pub shows: u64,
    /// `dismiss()` calls issued to the dialog
    pub dismissals: u64,
    /// Dialog resources rebuilt
    pub recreations: u64,
    /// Timer dismissals delivered (honored or stale)
    pub timers_fired: u64,
    /// Timer dismissals ignored because a newer timer superseded them
    pub stale_timers: u64,
}

/// Point-in-time view of the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    /// Whether the indicator is visible
    pub showing: bool,
    /// Whether a dismiss timer is outstanding
    pub timer_armed: bool,
    /// Generation of the most recently armed timer
    pub timer_generation: u64,
    /// Snapshot the live dialog resource was built with
    pub baseline: ResourceSnapshot,
    /// Whether the live resource failed to rebuild and is being held back
    pub resource_stale: bool,
    /// Last slider state received; applied to the dialog unless it is stale
    pub last_event: Option<SliderEvent>,
    /// Activity counters
    pub stats: ControllerStats,
}
