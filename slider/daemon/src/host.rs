//! Log-backed host collaborators
//!
//! The daemon has no screen, so its dialog and ambient notifier write what
//! they would have drawn to the log. The rendering context is a theme name
//! plus a display rotation, resolved against a fixed palette.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::info;

use slider_core::{
    AmbientNotifier, AmbientSetting, DialogError, DialogFactory, DialogResource, HostEvent,
    ResourceSnapshot, RingerMode, Rotation, SliderPosition, ThemeColor,
};

/// Accent colors the indicator can be drawn with
const PALETTE: &[(&str, ThemeColor)] = &[
    ("light", ThemeColor::from_argb(0xFF1A_73E8)),
    ("dark", ThemeColor::from_argb(0xFF8A_B4F8)),
];

/// What the daemon knows about the display
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayContext {
    /// Palette entry name
    pub theme: String,
    /// Current display rotation
    #[serde(default)]
    pub rotation: Rotation,
}

impl DisplayContext {
    /// Context for a palette entry at a given rotation
    pub fn new(theme: impl Into<String>, rotation: Rotation) -> Self {
        Self {
            theme: theme.into(),
            rotation,
        }
    }
}

/// Look up a palette entry by name (case-insensitive)
pub fn theme_color(theme: &str) -> Result<ThemeColor, DialogError> {
    PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(theme))
        .map(|(_, color)| *color)
        .ok_or_else(|| DialogError::ResourceLookup(format!("unknown theme '{theme}'")))
}

/// Parse one input line
///
/// Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<HostEvent<DisplayContext>>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Dialog that logs instead of drawing
#[derive(Debug)]
pub struct LogDialog {
    id: usize,
    snapshot: ResourceSnapshot,
}

impl DialogResource for LogDialog {
    fn show(&mut self) {
        info!(dialog = self.id, "Indicator shown");
    }

    fn dismiss(&mut self) {
        info!(dialog = self.id, "Indicator dismissed");
    }

    fn set_state(&mut self, position: SliderPosition, mode: RingerMode) {
        info!(dialog = self.id, %position, %mode, "Indicator state");
    }

    fn snapshot(&self) -> ResourceSnapshot {
        self.snapshot
    }
}

impl Drop for LogDialog {
    fn drop(&mut self) {
        info!(dialog = self.id, "Indicator resources released");
    }
}

/// Builds [`LogDialog`]s from a [`DisplayContext`]
#[derive(Debug, Default)]
pub struct LogDialogFactory {
    next_id: Cell<usize>,
}

impl DialogFactory for LogDialogFactory {
    type Context = DisplayContext;
    type Dialog = LogDialog;

    fn snapshot(&self, context: &DisplayContext) -> Result<ResourceSnapshot, DialogError> {
        Ok(ResourceSnapshot::new(
            theme_color(&context.theme)?,
            context.rotation,
        ))
    }

    fn construct(&self, context: &DisplayContext) -> Result<LogDialog, DialogError> {
        let snapshot = self.snapshot(context)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        info!(dialog = id, %snapshot, theme = %context.theme, "Indicator resources built");
        Ok(LogDialog { id, snapshot })
    }
}

/// Ambient notifier that logs pulses
#[derive(Clone, Debug)]
pub struct LogAmbient {
    setting: AmbientSetting,
}

impl LogAmbient {
    /// Notifier gated by a shared setting
    pub fn new(setting: AmbientSetting) -> Self {
        Self { setting }
    }
}

impl AmbientNotifier for LogAmbient {
    fn pulse_on_notification_enabled(&self) -> bool {
        self.setting.is_enabled()
    }

    fn pulse(&self) {
        info!("Ambient display pulse");
    }
}
