// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perch Annotation: a guided-tour state machine over hotspots.
//!
//! A [`Tutorial`] is a list of tasks, each a list of steps, and every step is
//! pinned to a *hotspot*: a named spot in the application that may or may
//! not be on screen right now. [`AnnotationContext`] tracks which step is
//! current, which hotspots are mounted, and what each hotspot should render
//! ([`AnnotationContext::get_content_for_id`]).
//!
//! ## Render passes
//!
//! Hotspots call [`register_hotspot`](AnnotationContext::register_hotspot)
//! and [`unregister_hotspot`](AnnotationContext::unregister_hotspot) as they
//! mount and unmount. These write a synchronous mirror and are idempotent.
//! Once per render pass the host calls [`commit`](AnnotationContext::commit),
//! which publishes the mirror and, if the current step's hotspot is no
//! longer present, moves the tour to the nearest one that is. A hotspot
//! that flickers out and back in within one pass is never noticed.
//!
//! ## Notifications
//!
//! [`on_step_change`](AnnotationContext::on_step_change) receives a
//! [`StepChange`] for every transition and
//! [`on_finish`](AnnotationContext::on_finish) fires when the finish control
//! is used. Transitions complete whether or not anyone listens.
//!
//! User-facing text comes from an [`AnnotationStrings`] provider, English by default.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod content;
mod context;
mod error;
mod i18n;
mod registry;
mod tutorial;

pub use content::{AnnotationLabels, ClosedHotspot, HotspotContent, OpenAnnotation};
pub use context::{AnnotationContext, StepChange, StepChangeReason, StepCursor};
pub use error::{Error, Result};
pub use i18n::{AnnotationStrings, DefaultStrings};
pub use registry::HotspotRegistry;
pub use tutorial::{HotspotIndex, Step, StepRef, Task, Tutorial};
