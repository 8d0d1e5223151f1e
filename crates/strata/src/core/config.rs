//! Service-wide defaults, fixed when a [`Strata`](crate::Strata) is built.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which body box side absorbs the width of a hidden scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollbarGutter {
    /// Compensate with `padding-right`.
    #[default]
    Padding,
    /// Compensate with `margin-right`.
    Margin,
}

impl ScrollbarGutter {
    /// The inline style property that receives the compensation.
    pub fn property(self) -> &'static str {
        match self {
            Self::Padding => "padding-right",
            Self::Margin => "margin-right",
        }
    }
}

/// The phase of an outside pointer interaction that dismisses a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DismissOn {
    /// Dismiss as soon as the pointer goes down outside.
    #[default]
    PointerDown,
    /// Dismiss only when a press and release both land outside.
    Click,
}

/// Configuration for a [`Strata`](crate::Strata) service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Custom property on the body exposing the hidden scrollbar width.
    pub scrollbar_width_property: String,
    /// Where scrollbar compensation goes.
    pub scrollbar_gutter: ScrollbarGutter,
    /// Compensate for the scrollbar at all. When false only `overflow: hidden`
    /// is applied.
    pub prevent_scrollbar_shift: bool,
    /// Let two-finger touch and ctrl-wheel gestures through scroll locks.
    pub allow_pinch_zoom: bool,
    /// Default for restoring the window scroll position on unlock.
    pub restore_scroll_position: bool,
    /// Default dismissal phase for layers.
    pub dismiss_on: DismissOn,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrollbar_width_property: "--scrollbar-width".into(),
            scrollbar_gutter: ScrollbarGutter::default(),
            prevent_scrollbar_shift: true,
            allow_pinch_zoom: true,
            restore_scroll_position: true,
            dismiss_on: DismissOn::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
