//! Slider Core - Headless Alert Slider Indicator Controller
//!
//! This crate owns the lifecycle of the transient indicator that appears when
//! the three-position alert slider changes state. It is independent of any
//! widget toolkit: the host supplies a dialog factory and an ambient display
//! notifier, and the controller decides when to call them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐         ┌──────────────────────────────────────┐
//! │        Host          │         │       NotificationController         │
//! │  slider driver  ─────┼─submit─▶│  inbox ─▶ Update / Show / Dismiss    │
//! │  config changes ─────┼────────▶│           Reset / Recreate           │
//! └──────────────────────┘         │     │                  │             │
//!                                  │     ▼                  ▼             │
//!                                  │  dismiss timer   snapshot diff       │
//!                                  └─────┬──────────────────┬─────────────┘
//!                                        ▼                  ▼
//!                                 DialogResource      DialogFactory
//!                                 AmbientNotifier
//! ```
//!
//! # Key Types
//!
//! - [`NotificationController`]: the actor owning visibility, the dismiss
//!   timer and the live dialog resource
//! - [`ControllerHandle`]: cloneable producer side used by the host
//! - [`HostEvent`]: what the host reports (slider moved, configuration changed)
//! - [`ResourceSnapshot`]: theme color and rotation a dialog was built with
//!
//! # Quick Start
//!
//! ```ignore
//! use slider_core::{ControllerConfig, HostEvent, NotificationController};
//!
//! let handle = NotificationController::spawn(factory, ambient, &context, ControllerConfig::default())?;
//!
//! // From the slider driver callback, on any thread:
//! handle.submit(HostEvent::SliderChanged { position: Some(0), mode: Some(0) })?;
//!
//! // When the theme or rotation changes:
//! handle.submit(HostEvent::ConfigurationChanged { context })?;
//! ```
//!
//! # Module Overview
//!
//! - [`ambient`]: ambient display pulse seam and its shared setting
//! - [`config`]: TOML / environment / CLI configuration loading
//! - [`controller`]: the notification actor and its handle
//! - [`dialog`]: dialog resource and factory traits
//! - [`events`]: host events and slider value validation
//! - [`messages`]: controller inbox messages and status reports
//! - [`snapshot`]: resource snapshots and the staleness check
//! - [`testing`]: recording collaborators for tests and headless hosts

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ambient;
pub mod config;
pub mod controller;
pub mod dialog;
pub mod events;
pub mod messages;
pub mod snapshot;
pub mod testing;

// Re-exports for convenience
pub use ambient::{AmbientNotifier, AmbientSetting};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, SliderConfig, SliderToml,
};
pub use controller::{
    ControllerConfig, ControllerError, ControllerHandle, NotificationController,
    DEFAULT_DISMISS_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
};
pub use dialog::{DialogError, DialogFactory, DialogResource};
pub use events::{HostEvent, RingerMode, SliderEvent, SliderPosition, MODE_NONE};
pub use messages::{
    ControllerMessage, ControllerStats, ControllerStatus, DismissOrigin, RecreateOutcome,
};
pub use snapshot::{needs_recreate, ResourceSnapshot, Rotation, ThemeColor};
