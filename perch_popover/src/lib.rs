// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perch Popover: keep a floating panel attached to an anchor and inside the viewport.
//!
//! The crate has two layers.
//!
//! - [`calculate_position`] is a pure function. Given the anchor's box, the
//!   panel's size and the boundary, it picks one of ten [`InternalPosition`]s
//!   and returns a [`Placement`]. Candidates are tried in a fixed
//!   [`priority`] order for the preferred [`Direction`]; the first one that
//!   fits wins, otherwise the one showing the most of the panel.
//! - [`PopoverPosition`] is the per-instance state machine. It decides which
//!   [`Trigger`]s recompute immediately and which wait for the next
//!   animation frame, and it keeps the last placement when the anchor is not
//!   mounted. [`MountedPopover`] adds the window listeners
//!   ([`ListenerSet`]) that a live popover needs and releases them on drop.
//!
//! Hosts describe anchors with the [`Anchor`] trait and the rest of the
//! layout with [`LayoutSource`]. Behavior is configured per instance with
//! [`PopoverOptions`], which can be deserialized from JSON.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use perch_popover::{Direction, Layout, PopoverOptions, PopoverPosition};
//!
//! let options = PopoverOptions { preferred: Direction::Bottom, ..PopoverOptions::default() };
//! let anchor = || Some(Rect::new(380.0, 40.0, 420.0, 60.0));
//! let layout = Layout::new(anchor, Size::new(240.0, 120.0), Rect::new(0.0, 0.0, 800.0, 600.0));
//!
//! let mut popover: PopoverPosition<()> = PopoverPosition::new(options);
//! popover.mount(&layout);
//! let placement = popover.placement().unwrap();
//! assert_eq!(placement.rect, Rect::new(280.0, 70.0, 520.0, 190.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod anchor;
mod calculate;
mod listeners;
mod options;
mod position;
mod tracker;

pub use anchor::{Anchor, ElementAnchor, containing_block_rect, probed_containing_block_rect};
pub use calculate::{
    ARROW_OFFSET, ArrowPlacement, Edge, Placement, PlacementInput, calculate_position,
    candidate_rect,
};
pub use listeners::{GlobalEvent, Key, ListenerSet, MountedPopover, WindowEvent, WindowEvents};
pub use options::PopoverOptions;
pub use position::{Direction, InternalPosition, priority};
pub use tracker::{
    Layout, LayoutSource, PopoverPosition, PositionState, Reaction, ScrollRequest, Trigger,
};
