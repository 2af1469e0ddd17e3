//! Dialog Resource Traits
//!
//! Trait definitions for the on-screen indicator. The controller never draws
//! anything itself; it drives a [`DialogResource`] built by a
//! [`DialogFactory`]. This keeps the lifecycle logic independent of whatever
//! widget toolkit the host renders with, and lets tests substitute recording
//! fakes.
//!
//! # Design Philosophy
//!
//! A dialog resource is built for one display configuration and never
//! mutated structurally afterwards. When the theme color or rotation
//! changes, the controller asks the factory for a brand new resource and
//! drops the old one.

use thiserror::Error;

use crate::events::{RingerMode, SliderPosition};
use crate::snapshot::ResourceSnapshot;

/// Errors raised by dialog collaborators
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    /// A theme or layout resource could not be resolved
    #[error("Resource lookup failed: {0}")]
    ResourceLookup(String),

    /// The dialog could not be built
    #[error("Dialog construction failed: {0}")]
    Construction(String),
}

/// A live on-screen indicator
///
/// Only the controller may call these; they are instantaneous and must not
/// call back into the controller.
pub trait DialogResource {
    /// Make the indicator visible
    fn show(&mut self);

    /// Hide the indicator
    fn dismiss(&mut self);

    /// Update the indicator's content
    fn set_state(&mut self, position: SliderPosition, mode: RingerMode);

    /// Theme color and rotation this resource was built with
    fn snapshot(&self) -> ResourceSnapshot;
}

/// Builds dialog resources from a host rendering context
pub trait DialogFactory {
    /// Host rendering context (theme, display, resources)
    type Context;

    /// Resource type produced by this factory
    type Dialog: DialogResource;

    /// Read the theme color and rotation a dialog built now would use
    ///
    /// # Errors
    ///
    /// Returns an error if the theme or display cannot be queried.
    fn snapshot(&self, context: &Self::Context) -> Result<ResourceSnapshot, DialogError>;

    /// Build a new dialog resource for the given context
    ///
    /// # Errors
    ///
    /// Returns an error if a resource lookup fails or the dialog cannot be
    /// built. No partially built resource is ever returned.
    fn construct(&self, context: &Self::Context) -> Result<Self::Dialog, DialogError>;
}
