// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a hotspot should render.

use alloc::string::String;

use perch_popover::{Direction, PopoverOptions};

use crate::context::AnnotationContext;

/// Render description for one hotspot.
#[derive(Debug)]
pub enum HotspotContent<'a, C> {
    /// A collapsed icon the user can click to open the step.
    Closed(ClosedHotspot),
    /// The expanded bubble of the current step.
    Open(OpenAnnotation<'a, C>),
}

/// A collapsed hotspot icon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosedHotspot {
    /// Step the icon opens when clicked (the hotspot's first step).
    pub step_index: usize,
    /// Accessible name.
    pub label: String,
}

/// Labels for the bubble's controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationLabels {
    /// Next-step control.
    pub next: String,
    /// Previous-step control.
    pub previous: String,
    /// Finish control.
    pub finish: String,
    /// Dismiss control.
    pub dismiss: String,
}

/// An expanded annotation bubble.
#[derive(Debug)]
pub struct OpenAnnotation<'a, C> {
    /// Global step index.
    pub step_index: usize,
    /// Step title.
    pub title: &'a str,
    /// Step body.
    pub content: &'a C,
    /// Optional warning.
    pub warning: Option<&'a C>,
    /// Formatted task heading.
    pub task_title: String,
    /// Formatted step counter.
    pub step_counter: String,
    /// Index of the step inside its task.
    pub local_index: usize,
    /// Number of steps in the task.
    pub local_count: usize,
    /// The previous control is enabled.
    pub previous_enabled: bool,
    /// The next control is enabled.
    pub next_enabled: bool,
    /// Show the finish control instead of next.
    pub show_finish: bool,
    /// Control labels.
    pub labels: AnnotationLabels,
    /// Options for anchoring the bubble to the hotspot.
    pub popover: PopoverOptions,
}

impl<C> AnnotationContext<C> {
    /// Describe what the hotspot `id` should render, pointing its bubble towards `direction`.
    ///
    /// Returns `None` without a tutorial, for a completed tutorial, or for an
    /// id the tutorial does not use.
    pub fn get_content_for_id(
        &self,
        id: &str,
        direction: Direction,
    ) -> Option<HotspotContent<'_, C>> {
        let tutorial = self.tutorial()?;
        if tutorial.completed {
            return None;
        }
        let first = self.hotspot_index(id)?;
        let strings = self.strings();

        let current = self
            .cursor()
            .filter(|cursor| cursor.open)
            .and_then(|_| self.current())
            .filter(|current| current.step.hotspot_id == id);
        let Some(current) = current else {
            return Some(HotspotContent::Closed(ClosedHotspot {
                step_index: first,
                label: strings.hotspot_label(first),
            }));
        };

        let local_count = current.task.steps.len();
        let show_finish = self.is_last_step();
        Some(HotspotContent::Open(OpenAnnotation {
            step_index: current.global_index,
            title: &current.step.title,
            content: &current.step.content,
            warning: current.step.warning.as_ref(),
            task_title: strings.task_title(current.task_index, &current.task.title),
            step_counter: strings.step_counter(current.local_index, local_count),
            local_index: current.local_index,
            local_count,
            previous_enabled: self.previous_hotspot_available(),
            next_enabled: !show_finish && self.next_hotspot_available(),
            show_finish,
            labels: AnnotationLabels {
                next: strings.next_button(),
                previous: strings.previous_button(),
                finish: strings.finish_button(),
                dismiss: strings.dismiss_label(),
            },
            popover: PopoverOptions {
                preferred: direction,
                allow_vertical_overflow: true,
                allow_scroll_to_fit: true,
                ..PopoverOptions::default()
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::tests::tutorial;

    fn ctx() -> AnnotationContext<String> {
        let mut ctx = AnnotationContext::new();
        ctx.set_tutorial(Some(tutorial(&[&["a"], &["b", "c"]])));
        for id in ["a", "b", "c"] {
            ctx.register_hotspot(id);
        }
        ctx.commit();
        ctx
    }

    #[test]
    fn unknown_or_completed_yields_nothing() {
        let ctx = ctx();
        assert!(ctx.get_content_for_id("zzz", Direction::Top).is_none());

        let mut t = tutorial(&[&["a"]]);
        t.completed = true;
        let mut done = AnnotationContext::new();
        done.set_tutorial(Some(t));
        assert!(done.get_content_for_id("a", Direction::Top).is_none());

        let empty: AnnotationContext<String> = AnnotationContext::new();
        assert!(empty.get_content_for_id("a", Direction::Top).is_none());
    }

    #[test]
    fn other_hotspots_are_closed() {
        let ctx = ctx();
        match ctx.get_content_for_id("c", Direction::Right) {
            Some(HotspotContent::Closed(closed)) => {
                assert_eq!(closed.step_index, 2);
                assert_eq!(closed.label, "Open annotation for step 3");
            }
            other => panic!("expected a closed hotspot, got {other:?}"),
        }
    }

    #[test]
    fn current_hotspot_is_open_until_dismissed() {
        let mut ctx = ctx();
        ctx.open_next_step();
        let Some(HotspotContent::Open(open)) = ctx.get_content_for_id("b", Direction::Left) else {
            panic!("expected an open bubble");
        };
        assert_eq!(open.step_index, 1);
        assert_eq!(open.task_title, "Task 2: Task 1");
        assert_eq!(open.step_counter, "Step 1 of 2");
        assert_eq!((open.local_index, open.local_count), (0, 2));
        assert!(open.previous_enabled);
        assert!(open.next_enabled);
        assert!(!open.show_finish);
        assert_eq!(open.popover.preferred, Direction::Left);
        assert!(open.popover.allow_vertical_overflow);
        assert!(open.popover.allow_scroll_to_fit);

        ctx.dismiss();
        assert!(matches!(
            ctx.get_content_for_id("b", Direction::Left),
            Some(HotspotContent::Closed(_))
        ));
    }

    #[test]
    fn last_step_shows_finish() {
        let mut ctx = ctx();
        ctx.open_at_index(2);
        let Some(HotspotContent::Open(open)) = ctx.get_content_for_id("c", Direction::Top) else {
            panic!("expected an open bubble");
        };
        assert!(open.show_finish);
        assert!(!open.next_enabled);
        assert_eq!(open.labels.finish, "Finish");
    }
}
