//! Notification Controller
//!
//! The controller is a single actor that owns the indicator. It decides when
//! the dialog is shown, when it goes away, and when its resources have to be
//! rebuilt. Producers (the slider event bridge, configuration listeners,
//! tests) only ever hold a [`ControllerHandle`] and submit messages; the
//! actor applies them one at a time, in the order they were accepted.
//!
//! # Timers
//!
//! Every arm of the dismiss timer bumps a generation counter and spawns a
//! task that sleeps for the timeout and then sends
//! `Dismiss(Timer { generation })`. Re-arming aborts the previous task, and
//! a timer dismissal whose generation is no longer current is ignored, so a
//! stale timer can never hide a dialog that was shown again in the meantime.
//!
//! Timer tasks only hold a weak sender. Once every handle is gone the inbox
//! closes and the actor stops, regardless of pending timers.

use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::ambient::AmbientNotifier;
use crate::dialog::{DialogError, DialogFactory, DialogResource};
use crate::events::{HostEvent, SliderEvent};
use crate::messages::{
    ControllerMessage, ControllerStats, ControllerStatus, DismissOrigin, RecreateOutcome,
};
use crate::snapshot::needs_recreate;

/// How long the indicator stays up after the last slider change
pub const DEFAULT_DISMISS_TIMEOUT: Duration = Duration::from_millis(3000);

/// Inbox capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Errors returned by controller operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// A dialog collaborator failed
    #[error(transparent)]
    Dialog(#[from] DialogError),

    /// The inbox is at capacity
    #[error("Controller inbox is full")]
    QueueFull,

    /// The controller has shut down
    #[error("Controller has shut down")]
    Closed,
}

/// Controller configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Inactivity period after which the indicator is dismissed
    pub dismiss_timeout: Duration,
    /// Maximum number of queued messages
    pub queue_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            dismiss_timeout: DEFAULT_DISMISS_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ControllerConfig {
    /// Set the dismiss timeout
    #[must_use]
    pub fn with_dismiss_timeout(mut self, timeout: Duration) -> Self {
        self.dismiss_timeout = timeout;
        self
    }

    /// Set the inbox capacity
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

struct PendingTimer {
    generation: u64,
    task: JoinHandle<()>,
}

/// The notification lifecycle actor
pub struct NotificationController<F: DialogFactory, A> {
    config: ControllerConfig,
    factory: F,
    ambient: A,
    /// The one live dialog resource
    dialog: F::Dialog,
    showing: bool,
    /// Set when a rebuild failed; the old resource is kept but not shown
    stale: bool,
    timer: Option<PendingTimer>,
    generation: u64,
    last_event: Option<SliderEvent>,
    stats: ControllerStats,
    // Declared after `dialog`: the resource is dropped before the inbox
    // closes, so `ControllerHandle::shutdown` returns after the release.
    inbox: mpsc::Receiver<ControllerMessage<F::Context>>,
    timer_tx: mpsc::WeakSender<ControllerMessage<F::Context>>,
}

impl<F, A> NotificationController<F, A>
where
    F: DialogFactory + Send + 'static,
    F::Dialog: Send + 'static,
    F::Context: Send + 'static,
    A: AmbientNotifier + Send + 'static,
{
    /// Build the initial dialog resource and the actor's inbox
    ///
    /// The actor does not run until [`run`](Self::run) is awaited; use
    /// [`spawn`](Self::spawn) to start it on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the first dialog resource cannot be built.
    pub fn new(
        factory: F,
        ambient: A,
        context: &F::Context,
        config: ControllerConfig,
    ) -> Result<(Self, ControllerHandle<F::Context>), ControllerError> {
        let dialog = factory.construct(context)?;
        let (tx, inbox) = mpsc::channel(config.queue_capacity.max(1));

        info!(baseline = %dialog.snapshot(), "Indicator resources created");

        let controller = Self {
            config,
            factory,
            ambient,
            dialog,
            showing: false,
            stale: false,
            timer: None,
            generation: 0,
            last_event: None,
            stats: ControllerStats::default(),
            inbox,
            timer_tx: tx.downgrade(),
        };
        Ok((controller, ControllerHandle { tx }))
    }

    /// Build the controller and run it on a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the first dialog resource cannot be built. No
    /// task is spawned in that case.
    pub fn spawn(
        factory: F,
        ambient: A,
        context: &F::Context,
        config: ControllerConfig,
    ) -> Result<ControllerHandle<F::Context>, ControllerError> {
        let (controller, handle) = Self::new(factory, ambient, context, config)?;
        tokio::spawn(controller.run());
        Ok(handle)
    }

    /// Process messages until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!(timeout = ?self.config.dismiss_timeout, "Notification controller started");

        while let Some(message) = self.inbox.recv().await {
            trace!(kind = message.kind(), "Processing message");
            if self.handle_message(message).is_break() {
                break;
            }
        }

        self.teardown();
        info!(stats = ?self.stats, "Notification controller stopped");
    }

    fn handle_message(&mut self, message: ControllerMessage<F::Context>) -> ControlFlow<()> {
        match message {
            ControllerMessage::Update(event) => self.handle_update(event),
            ControllerMessage::Show => self.handle_show(),
            ControllerMessage::Dismiss(origin) => self.handle_dismiss(origin),
            ControllerMessage::Reset => self.arm_timer(),
            ControllerMessage::Recreate { context, reply } => {
                let result = self.handle_recreate(&context);
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => {
                        if let Err(e) = result {
                            warn!(error = %e, "Indicator recreation failed");
                        }
                    }
                }
            }
            ControllerMessage::Status { reply } => {
                let _ = reply.send(self.status());
            }
            ControllerMessage::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn handle_update(&mut self, event: SliderEvent) {
        self.stats.updates += 1;
        self.last_event = Some(event);

        if self.stale {
            debug!(
                position = %event.position,
                mode = %event.mode,
                "Indicator resources are stale, not showing update"
            );
            return;
        }

        // The timer always restarts, even when the dialog is already up.
        self.arm_timer();
        self.ambient.pulse_if_enabled();
        self.dialog.set_state(event.position, event.mode);
        self.set_showing(true);
    }

    fn handle_show(&mut self) {
        if self.stale {
            debug!("Indicator resources are stale, ignoring show");
            return;
        }
        self.set_showing(true);
    }

    fn handle_dismiss(&mut self, origin: DismissOrigin) {
        if let DismissOrigin::Timer { generation } = origin {
            self.stats.timers_fired += 1;
            let current = self
                .timer
                .as_ref()
                .is_some_and(|timer| timer.generation == generation);
            if !current {
                self.stats.stale_timers += 1;
                debug!(generation, latest = self.generation, "Ignoring stale dismiss timer");
                return;
            }
            self.timer = None;
        }
        self.set_showing(false);
    }

    fn handle_recreate(
        &mut self,
        context: &F::Context,
    ) -> Result<RecreateOutcome, ControllerError> {
        let fresh = self.factory.snapshot(context)?;
        let baseline = self.dialog.snapshot();

        if !needs_recreate(&baseline, &fresh) {
            if self.stale {
                self.stale = false;
                self.apply_last_state();
                info!(baseline = %baseline, "Display back at baseline, indicator resources valid again");
                return Ok(RecreateOutcome::Revalidated);
            }
            debug!(baseline = %baseline, "Display configuration unchanged, keeping indicator");
            return Ok(RecreateOutcome::Unchanged);
        }

        info!(previous = %baseline, current = %fresh, "Recreating indicator resources");
        self.set_showing(false);

        let dialog = match self.factory.construct(context) {
            Ok(dialog) => dialog,
            Err(e) => {
                self.stale = true;
                warn!(error = %e, baseline = %baseline, "Keeping stale indicator resources");
                return Err(e.into());
            }
        };

        // Releases the previous resource
        self.dialog = dialog;
        self.stale = false;
        self.stats.recreations += 1;

        self.apply_last_state();

        Ok(RecreateOutcome::Rebuilt {
            previous: baseline,
            current: self.dialog.snapshot(),
        })
    }

    /// Bring the dialog's content up to the last recorded slider state
    fn apply_last_state(&mut self) {
        if let Some(event) = self.last_event {
            self.dialog.set_state(event.position, event.mode);
        }
    }

    /// Move visibility to `value`, issuing exactly one show or dismiss on change
    fn set_showing(&mut self, value: bool) {
        if self.showing == value {
            trace!(showing = value, "Visibility unchanged");
            return;
        }

        self.cancel_timer();
        if value {
            self.arm_timer();
            self.ambient.pulse_if_enabled();
            self.dialog.show();
            self.stats.shows += 1;
        } else {
            self.dialog.dismiss();
            self.stats.dismissals += 1;
        }
        self.showing = value;
        debug!(showing = value, "Indicator visibility changed");
    }

    fn arm_timer(&mut self) {
        self.cancel_timer();
        self.generation += 1;
        let generation = self.generation;
        let delay = self.config.dismiss_timeout;
        let tx = self.timer_tx.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx
                    .send(ControllerMessage::Dismiss(DismissOrigin::Timer { generation }))
                    .await;
            }
        });
        self.timer = Some(PendingTimer { generation, task });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.task.abort();
        }
    }

    /// Current state of the actor
    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            showing: self.showing,
            timer_armed: self.timer.is_some(),
            timer_generation: self.generation,
            baseline: self.dialog.snapshot(),
            resource_stale: self.stale,
            last_event: self.last_event,
            stats: self.stats,
        }
    }

    fn teardown(&mut self) {
        self.cancel_timer();
        if self.showing {
            self.dialog.dismiss();
            self.stats.dismissals += 1;
            self.showing = false;
        }
    }
}

/// Producer side of the controller
///
/// Cheap to clone; every clone feeds the same inbox. The non-async methods
/// never wait and can be called from any thread.
pub struct ControllerHandle<C> {
    tx: mpsc::Sender<ControllerMessage<C>>,
}

impl<C> Clone for ControllerHandle<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<C> fmt::Debug for ControllerHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<C> ControllerHandle<C> {
    /// Forward a host event
    ///
    /// Slider events without a valid mode are dropped here and never reach
    /// the controller. Returns whether a message was enqueued.
    ///
    /// # Errors
    ///
    /// Returns an error if the inbox is full or closed.
    pub fn submit(&self, event: HostEvent<C>) -> Result<bool, ControllerError> {
        match event {
            HostEvent::SliderChanged { position, mode } => {
                let Some(event) = SliderEvent::from_raw(position, mode) else {
                    debug!(?position, ?mode, "Dropping slider event without a valid mode");
                    return Ok(false);
                };
                self.update(event)?;
            }
            HostEvent::ConfigurationChanged { context } => self.request_recreate(context)?,
        }
        Ok(true)
    }

    /// Report a validated slider change
    ///
    /// # Errors
    ///
    /// Returns an error if the inbox is full or closed.
    pub fn update(&self, event: SliderEvent) -> Result<(), ControllerError> {
        self.enqueue(ControllerMessage::Update(event))
    }

    /// Ask for the indicator to be shown
    ///
    /// # Errors
    ///
    /// Returns an error if the inbox is full or closed.
    pub fn show(&self) -> Result<(), ControllerError> {
        self.enqueue(ControllerMessage::Show)
    }

    /// Ask for the indicator to be hidden
    ///
    /// # Errors
    ///
    /// Returns an error if the inbox is full or closed.
    pub fn dismiss(&self) -> Result<(), ControllerError> {
        self.enqueue(ControllerMessage::Dismiss(DismissOrigin::Requested))
    }

    /// Restart the dismiss timer
    ///
    /// # Errors
    ///
    /// Returns an error if the inbox is full or closed.
    pub fn reset(&self) -> Result<(), ControllerError> {
        self.enqueue(ControllerMessage::Reset)
    }

    /// Queue a recreation check without waiting for its outcome
    ///
    /// Failures are logged by the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the inbox is full or closed.
    pub fn request_recreate(&self, context: C) -> Result<(), ControllerError> {
        self.enqueue(ControllerMessage::Recreate {
            context,
            reply: None,
        })
    }

    /// Run a recreation check and wait for its outcome
    ///
    /// # Errors
    ///
    /// Returns the dialog error if the snapshot or the new resource could not
    /// be obtained, or [`ControllerError::Closed`] if the controller stopped.
    pub async fn recreate(&self, context: C) -> Result<RecreateOutcome, ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ControllerMessage::Recreate {
                context,
                reply: Some(reply),
            })
            .await
            .map_err(|_| ControllerError::Closed)?;
        rx.await.map_err(|_| ControllerError::Closed)?
    }

    /// Fetch the controller's state
    ///
    /// The reply is produced after every previously accepted message.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Closed`] if the controller stopped.
    pub async fn status(&self) -> Result<ControllerStatus, ControllerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ControllerMessage::Status { reply })
            .await
            .map_err(|_| ControllerError::Closed)?;
        rx.await.map_err(|_| ControllerError::Closed)
    }

    /// Stop the controller and wait until it has released the dialog
    ///
    /// Pending timers are abandoned. Calling this on a stopped controller
    /// returns immediately.
    pub async fn shutdown(&self) {
        if self.tx.send(ControllerMessage::Shutdown).await.is_err() {
            return;
        }
        self.tx.closed().await;
    }

    /// Whether the controller has stopped
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn enqueue(&self, message: ControllerMessage<C>) -> Result<(), ControllerError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(message) => {
                warn!(kind = message.kind(), "Controller inbox full, dropping message");
                ControllerError::QueueFull
            }
            TrySendError::Closed(_) => ControllerError::Closed,
        })
    }
}
