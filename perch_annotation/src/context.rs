// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tutorial state machine.

use alloc::boxed::Box;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::{AnnotationStrings, DefaultStrings};
use crate::registry::HotspotRegistry;
use crate::tutorial::{HotspotIndex, Step, StepRef, Tutorial};

/// Current step and whether its bubble is expanded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCursor {
    /// Global step index, always below the tutorial's step count.
    pub index: usize,
    /// The bubble is open.
    pub open: bool,
}

/// Why the current step changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepChangeReason {
    /// The next-step control.
    Next,
    /// The previous-step control.
    Previous,
    /// A closed hotspot was clicked, or a step was opened by index.
    Open,
    /// The current hotspot disappeared and the nearest mounted one took over.
    AutoFallback,
}

/// Payload of the step-change notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepChange {
    /// New global step index.
    pub step: usize,
    /// What caused the change.
    pub reason: StepChangeReason,
}

type StepChangeHook = Box<dyn FnMut(StepChange)>;
type FinishHook = Box<dyn FnMut()>;

/// Drives one guided tour over a set of hotspots that mount and unmount.
///
/// All transitions are total. Without a tutorial, or with an empty one,
/// they do nothing and derived values read as zero or `None`.
///
/// ```rust
/// use perch_annotation::{AnnotationContext, StepChangeReason, Tutorial};
///
/// let tutorial: Tutorial<String> = Tutorial::from_json(r#"{"tasks": [
///     {"title": "One", "steps": [{"hotspotId": "first", "content": ""}]},
///     {"title": "Two", "steps": [{"hotspotId": "second", "content": ""}]}
/// ]}"#).unwrap();
///
/// let mut ctx = AnnotationContext::new();
/// ctx.set_tutorial(Some(tutorial));
/// ctx.register_hotspot("first");
/// ctx.register_hotspot("second");
/// ctx.commit();
///
/// // The first hotspot goes away; the tour follows to the next one.
/// ctx.unregister_hotspot("first");
/// let change = ctx.commit().unwrap();
/// assert_eq!(change.reason, StepChangeReason::AutoFallback);
/// assert_eq!(ctx.current_step().unwrap().hotspot_id, "second");
/// ```
pub struct AnnotationContext<C> {
    tutorial: Option<Tutorial<C>>,
    index: HotspotIndex,
    registry: HotspotRegistry,
    cursor: StepCursor,
    strings: Box<dyn AnnotationStrings>,
    on_step_change: Option<StepChangeHook>,
    on_finish: Option<FinishHook>,
}

impl<C> Default for AnnotationContext<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> AnnotationContext<C> {
    /// A context with no tutorial and English strings.
    pub fn new() -> Self {
        Self {
            tutorial: None,
            index: HotspotIndex::default(),
            registry: HotspotRegistry::new(),
            cursor: StepCursor {
                index: 0,
                open: true,
            },
            strings: Box::new(DefaultStrings),
            on_step_change: None,
            on_finish: None,
        }
    }

    /// Replace the string provider.
    #[must_use]
    pub fn with_strings(mut self, strings: impl AnnotationStrings + 'static) -> Self {
        self.strings = Box::new(strings);
        self
    }

    /// Called with every step change.
    pub fn on_step_change(&mut self, hook: impl FnMut(StepChange) + 'static) {
        self.on_step_change = Some(Box::new(hook));
    }

    /// Called when the finish control is activated.
    pub fn on_finish(&mut self, hook: impl FnMut() + 'static) {
        self.on_finish = Some(Box::new(hook));
    }

    /// Install a tutorial, or clear it with `None`.
    ///
    /// Always restarts at step 0 with the bubble open. Mounted hotspots stay
    /// registered, and those the new tutorial references count from now on.
    pub fn set_tutorial(&mut self, tutorial: Option<Tutorial<C>>) {
        self.index = tutorial
            .as_ref()
            .map(HotspotIndex::build)
            .unwrap_or_default();
        self.cursor = StepCursor {
            index: 0,
            open: true,
        };
        tracing::debug!(
            steps = tutorial.as_ref().map_or(0, Tutorial::total_step_count),
            "tutorial replaced"
        );
        self.tutorial = tutorial;
    }

    /// The installed tutorial.
    pub fn tutorial(&self) -> Option<&Tutorial<C>> {
        self.tutorial.as_ref()
    }

    /// String provider.
    pub fn strings(&self) -> &dyn AnnotationStrings {
        &*self.strings
    }

    /// Raw mount state, including ids the current tutorial does not use.
    pub fn registry(&self) -> &HotspotRegistry {
        &self.registry
    }

    /// Whether `id` is part of the tutorial and mounted right now.
    pub fn is_hotspot_mounted(&self, id: &str) -> bool {
        self.index.contains(id) && self.registry.is_mounted(id)
    }

    /// First global index of `id` in the current tutorial.
    pub fn hotspot_index(&self, id: &str) -> Option<usize> {
        self.index.get(id)
    }

    /// Step cursor, or `None` without a tutorial.
    pub fn cursor(&self) -> Option<StepCursor> {
        self.tutorial.as_ref().map(|_| self.cursor)
    }

    /// Sum of all tasks' step counts.
    pub fn total_step_count(&self) -> usize {
        self.tutorial.as_ref().map_or(0, Tutorial::total_step_count)
    }

    /// The current step with its task and indices.
    pub fn current(&self) -> Option<StepRef<'_, C>> {
        self.tutorial.as_ref()?.step_at(self.cursor.index)
    }

    /// The current step.
    pub fn current_step(&self) -> Option<&Step<C>> {
        self.current().map(|current| current.step)
    }

    /// Index of the task holding the current step.
    pub fn current_task_index(&self) -> Option<usize> {
        self.current().map(|current| current.task_index)
    }

    /// Whether the step before the current one has a published hotspot.
    pub fn previous_hotspot_available(&self) -> bool {
        self.cursor
            .index
            .checked_sub(1)
            .is_some_and(|index| self.step_is_published(index))
    }

    /// Whether the step after the current one has a published hotspot.
    pub fn next_hotspot_available(&self) -> bool {
        self.step_is_published(self.cursor.index + 1)
    }

    /// Whether the current step is the last one of the tutorial.
    pub fn is_last_step(&self) -> bool {
        let total = self.total_step_count();
        total > 0 && self.cursor.index + 1 == total
    }

    /// Advance one step, stopping at the last one.
    pub fn open_next_step(&mut self) {
        let Some(last) = self.last_index() else {
            return;
        };
        let index = (self.cursor.index + 1).min(last);
        self.go_to(index, StepChangeReason::Next);
    }

    /// Go back one step, stopping at the first one.
    pub fn open_previous_step(&mut self) {
        if self.last_index().is_none() {
            return;
        }
        let index = self.cursor.index.saturating_sub(1);
        self.go_to(index, StepChangeReason::Previous);
    }

    /// Open the step at `index`, clamped into the tutorial.
    pub fn open_at_index(&mut self, index: usize) {
        let Some(last) = self.last_index() else {
            return;
        };
        self.go_to(index.min(last), StepChangeReason::Open);
    }

    /// A closed hotspot icon was clicked.
    ///
    /// If `id` hosts the current step, that step is reopened. Otherwise the
    /// tour jumps to the first step on `id`. Unknown ids do nothing.
    pub fn open_hotspot(&mut self, id: &str) {
        if self.current_step().is_some_and(|step| step.hotspot_id == id) {
            self.open_at_index(self.cursor.index);
            return;
        }
        match self.index.get(id) {
            Some(index) => self.open_at_index(index),
            None => tracing::debug!(id, "open_hotspot: id is not part of the tutorial"),
        }
    }

    /// Collapse the current bubble.
    pub fn dismiss(&mut self) {
        if self.tutorial.is_some() {
            self.cursor.open = false;
        }
    }

    /// The finish control was activated.
    pub fn finish(&mut self) {
        tracing::debug!(step = self.cursor.index, "tutorial finished");
        if let Some(hook) = &mut self.on_finish {
            hook();
        }
    }

    /// A hotspot mounted. Returns whether the registry changed.
    ///
    /// The mount is recorded even for ids the current tutorial does not
    /// reference, so a later tutorial that uses them sees them mounted.
    /// Until then they have no effect on navigation or content.
    pub fn register_hotspot(&mut self, id: &str) -> bool {
        let changed = self.registry.register(id);
        if changed {
            tracing::debug!(id, known = self.index.contains(id), "hotspot registered");
        }
        changed
    }

    /// A hotspot unmounted. Returns whether the registry changed.
    pub fn unregister_hotspot(&mut self, id: &str) -> bool {
        let changed = self.registry.unregister(id);
        if changed {
            tracing::debug!(id, known = self.index.contains(id), "hotspot unregistered");
        }
        changed
    }

    /// End of a render pass: publish registry writes, then recover the cursor
    /// if its hotspot is gone.
    pub fn commit(&mut self) -> Option<StepChange> {
        if self.registry.publish() {
            tracing::trace!(
                mounted = self.registry.mounted_count(),
                "registry published"
            );
        }
        self.auto_fallback()
    }

    fn auto_fallback(&mut self) -> Option<StepChange> {
        let tutorial = self.tutorial.as_ref()?;
        if tutorial.completed {
            return None;
        }
        let current = tutorial.step_at(self.cursor.index)?;
        if self.registry.is_published(&current.step.hotspot_id) {
            return None;
        }
        let target = nearest_published(&self.index, &self.registry, self.cursor.index)?;
        tracing::debug!(
            from = self.cursor.index,
            to = target,
            missing = current.step.hotspot_id.as_str(),
            "current hotspot is gone; falling back"
        );
        Some(self.go_to(target, StepChangeReason::AutoFallback))
    }

    fn go_to(&mut self, index: usize, reason: StepChangeReason) -> StepChange {
        self.cursor = StepCursor { index, open: true };
        let change = StepChange {
            step: index,
            reason,
        };
        tracing::debug!(step = index, ?reason, "step changed");
        if let Some(hook) = &mut self.on_step_change {
            hook(change);
        }
        change
    }

    fn last_index(&self) -> Option<usize> {
        self.total_step_count().checked_sub(1)
    }

    fn step_is_published(&self, index: usize) -> bool {
        self.tutorial
            .as_ref()
            .and_then(|tutorial| tutorial.step_at(index))
            .is_some_and(|step| self.registry.is_published(&step.step.hotspot_id))
    }
}

/// First index of the published hotspot closest to `current`. Ties go to
/// the earlier hotspot in tutorial order.
fn nearest_published(
    index: &HotspotIndex,
    registry: &HotspotRegistry,
    current: usize,
) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (id, first) in index.iter() {
        if !registry.is_published(id) {
            continue;
        }
        let distance = first.abs_diff(current);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((first, distance));
        }
    }
    best.map(|(first, _)| first)
}

impl<C: fmt::Debug> fmt::Debug for AnnotationContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationContext")
            .field("tutorial", &self.tutorial)
            .field("cursor", &self.cursor)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
