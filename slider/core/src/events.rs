//! Host Events
//!
//! Events delivered by the host to the notification controller. These are the
//! only two things the outside world ever tells us: the slider moved, or the
//! display configuration changed.
//!
//! # Raw vs Validated
//!
//! Hosts report the slider as raw integers (the same values the switch driver
//! broadcasts). [`SliderEvent::from_raw`] turns them into typed values and
//! rejects anything malformed. A missing or sentinel mode is not an error:
//! it simply means there is nothing to show, so the event is dropped before
//! it ever reaches the controller's inbox.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw ringer mode value meaning "no mode reported"
pub const MODE_NONE: i32 = -1;

/// Physical position of the three-position switch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderPosition {
    /// Switch pushed all the way up
    Top,
    /// Switch in the middle detent
    Middle,
    /// Switch pushed all the way down
    #[default]
    Bottom,
}

impl SliderPosition {
    /// Map the driver's raw position value
    ///
    /// Returns `None` for values the switch cannot report.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Top),
            1 => Some(Self::Middle),
            2 => Some(Self::Bottom),
            _ => None,
        }
    }

    /// Raw driver value for this position
    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Top => 0,
            Self::Middle => 1,
            Self::Bottom => 2,
        }
    }
}

impl fmt::Display for SliderPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Middle => write!(f, "middle"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// Ringer mode the slider switched to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingerMode {
    /// No sound, no vibration
    Silent,
    /// Vibrate only
    Vibrate,
    /// Ring normally
    Normal,
}

impl RingerMode {
    /// Map the host's raw ringer mode value
    ///
    /// Returns `None` for [`MODE_NONE`] and for any value outside the known
    /// modes.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Silent),
            1 => Some(Self::Vibrate),
            2 => Some(Self::Normal),
            _ => None,
        }
    }

    /// Raw host value for this mode
    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Silent => 0,
            Self::Vibrate => 1,
            Self::Normal => 2,
        }
    }
}

impl fmt::Display for RingerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Vibrate => write!(f, "vibrate"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// A validated slider change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SliderEvent {
    /// Where the switch ended up
    pub position: SliderPosition,
    /// Which ringer mode that position selects
    pub mode: RingerMode,
}

impl SliderEvent {
    /// Create a slider event from typed values
    #[must_use]
    pub fn new(position: SliderPosition, mode: RingerMode) -> Self {
        Self { position, mode }
    }

    /// Validate a raw report from the switch driver
    ///
    /// An absent position defaults to [`SliderPosition::Bottom`]. An absent,
    /// sentinel or unknown mode, or an unknown position, yields `None` and
    /// the event must be discarded.
    #[must_use]
    pub fn from_raw(position: Option<i32>, mode: Option<i32>) -> Option<Self> {
        let mode = mode.filter(|m| *m != MODE_NONE).and_then(RingerMode::from_raw)?;
        let position = match position {
            Some(raw) => SliderPosition::from_raw(raw)?,
            None => SliderPosition::default(),
        };
        Some(Self { position, mode })
    }
}

/// Events from the host to the controller
///
/// `C` is the host's rendering context, handed to the dialog factory when a
/// configuration change asks for the resources to be checked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent<C> {
    /// The hardware switch changed state
    SliderChanged {
        /// Raw position value (absent means bottom)
        #[serde(default)]
        position: Option<i32>,
        /// Raw ringer mode value (absent or -1 means nothing to show)
        #[serde(default)]
        mode: Option<i32>,
    },

    /// Theme, rotation or other display configuration changed
    ConfigurationChanged {
        /// Rendering context to evaluate for the next snapshot comparison
        context: C,
    },
}

impl<C> HostEvent<C> {
    /// Build a slider event from typed values
    #[must_use]
    pub fn slider(position: SliderPosition, mode: RingerMode) -> Self {
        Self::SliderChanged {
            position: Some(position.as_raw()),
            mode: Some(mode.as_raw()),
        }
    }

    /// Short name of the event kind, for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SliderChanged { .. } => "slider_changed",
            Self::ConfigurationChanged { .. } => "configuration_changed",
        }
    }
}
