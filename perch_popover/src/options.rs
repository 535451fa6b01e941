// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-popover configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::position::Direction;

/// Configuration of one popover instance.
///
/// Every field has a default, so hosts can deserialize partial objects:
///
/// ```rust
/// use perch_popover::{Direction, PopoverOptions};
///
/// let options: PopoverOptions =
///     serde_json::from_str(r#"{ "preferred": "top", "keepPosition": true }"#).unwrap();
/// assert_eq!(options.preferred, Direction::Top);
/// assert!(options.keep_position);
/// assert!(!options.allow_scroll_to_fit);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PopoverOptions {
    /// Side of the anchor to try first.
    pub preferred: Direction,
    /// Ignore click and arrow-key recomputes, and keep the first chosen
    /// internal position for the lifetime of the instance.
    pub keep_position: bool,
    /// Ask the host to scroll the page so the panel fits (never for hover-opened popovers).
    pub allow_scroll_to_fit: bool,
    /// Allow the panel to extend past the viewport vertically.
    pub allow_vertical_overflow: bool,
    /// The panel is rendered in a portal and is not clipped by its container.
    pub render_with_portal: bool,
    /// Arrow base width.
    pub arrow_width: f64,
    /// Arrow height, which is also the gap between anchor and panel.
    pub arrow_height: f64,
}

impl PopoverOptions {
    /// Arrow size as a [`Size`].
    pub fn arrow(&self) -> Size {
        Size::new(self.arrow_width, self.arrow_height)
    }
}

impl Default for PopoverOptions {
    fn default() -> Self {
        Self {
            preferred: Direction::Right,
            keep_position: false,
            allow_scroll_to_fit: false,
            allow_vertical_overflow: false,
            render_with_portal: false,
            arrow_width: 20.0,
            arrow_height: 10.0,
        }
    }
}
