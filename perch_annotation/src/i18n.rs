// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-facing strings.

use alloc::format;
use alloc::string::{String, ToString};

/// Text the annotation bubbles show. Every method has an English default.
///
/// Indices passed in are 0-based; implementations decide how to display them.
pub trait AnnotationStrings {
    /// Counter under the bubble title, for example "Step 2 of 5".
    fn step_counter(&self, local_index: usize, local_count: usize) -> String {
        format!("Step {} of {}", local_index + 1, local_count)
    }

    /// Task heading shown in the bubble.
    fn task_title(&self, task_index: usize, title: &str) -> String {
        format!("Task {}: {}", task_index + 1, title)
    }

    /// Accessible name of a closed hotspot icon.
    fn hotspot_label(&self, step_index: usize) -> String {
        format!("Open annotation for step {}", step_index + 1)
    }

    /// Label of the next-step control.
    fn next_button(&self) -> String {
        "Next".to_string()
    }

    /// Label of the previous-step control.
    fn previous_button(&self) -> String {
        "Previous".to_string()
    }

    /// Label of the finish control.
    fn finish_button(&self) -> String {
        "Finish".to_string()
    }

    /// Accessible name of the dismiss control.
    fn dismiss_label(&self) -> String {
        "Dismiss annotation".to_string()
    }
}

/// The English defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStrings;

impl AnnotationStrings for DefaultStrings {}
