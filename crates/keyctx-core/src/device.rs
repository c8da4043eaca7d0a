//! Device and host capability values mirrored into the context.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceType {
    Phone,
    Pad,
    Mac,
    Tv,
    Watch,
    Vision,
    Other,
}

impl DeviceType {
    /// Device family of the running build target.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Phone
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "tvos") {
            Self::Tv
        } else if cfg!(target_os = "watchos") {
            Self::Watch
        } else if cfg!(target_os = "visionos") {
            Self::Vision
        } else {
            Self::Other
        }
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        Self::current()
    }
}

/// Screen size in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyboardAppearance {
    #[default]
    Default,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// The host's active text input mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextInputMode {
    pub primary_language: Option<String>,
}

/// Opaque handle to a host-owned text document proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyHandle(pub u64);
