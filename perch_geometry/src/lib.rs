// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perch Geometry: DOM-neutral geometry primitives for floating panels.
//!
//! Popovers, tooltips and annotation bubbles all need the same handful of
//! answers from the page they float over:
//!
//! - Where is an element, in client coordinates? ([`ElementTree::bounding_rect`])
//! - Which HTML ancestor satisfies some condition, ignoring SVG subtrees in
//!   between? ([`find_ancestor_matching`])
//! - Which ancestor is the containing block of a `position: fixed` panel?
//!   ([`find_containing_block`], [`supports_containing_block_positioning`])
//! - How large are scrollbar gutters on this platform? ([`measure_scrollbar_size`])
//! - What literal color does a `var(--token, fallback)` value resolve to when
//!   custom properties are unavailable? ([`css_variable_fallback`])
//!
//! Hosts expose their element tree through the [`ElementTree`] trait and their
//! layout probes through [`ProbeHost`]. [`Document`] implements both as an
//! in-memory arena, which is what tests and headless hosts use.
//!
//! Every query is total. A missing element, a stale id or a host without a
//! document yields `None`, [`Size::ZERO`](kurbo::Size::ZERO) or `false`; nothing here panics
//! on absent geometry.
//!
//! ## Process-wide probes
//!
//! Platform properties cannot change without a reload, so
//! [`measure_scrollbar_size`] and [`supports_containing_block_positioning`]
//! run their probe at most once per process and keep the answer in a [`Memo`].
//! A failed probe is not cached.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod ancestor;
mod css;
mod document;
mod probe;
mod types;
mod util;

pub use ancestor::{ElementTree, find_ancestor_matching, find_containing_block};
pub use css::css_variable_fallback;
pub use document::{Document, Platform};
pub use probe::{
    Memo, ProbeHost, ProbeMetrics, measure_scrollbar_size, probe_scrollbar_size,
    supports_containing_block_positioning,
};
pub use types::{ElementId, ElementKind, LocalElement, StyleFlags};
pub use util::{clamp_x_into, clamp_y_into, fits_within, fits_within_x, visible_area};
