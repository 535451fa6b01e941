// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tutorial data: tasks of steps, each step pinned to a hotspot.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A guided tour. `C` is the host's content type (markup, a widget handle, plain text).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial<C> {
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// A completed tutorial shows no hotspots.
    #[serde(default)]
    pub completed: bool,
    /// Tasks in order.
    pub tasks: Vec<Task<C>>,
}

/// A titled group of steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task<C> {
    /// Display title.
    pub title: String,
    /// Steps in order.
    pub steps: Vec<Step<C>>,
}

/// One annotation bubble.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step<C> {
    /// Bubble title.
    #[serde(default)]
    pub title: String,
    /// Key of the hotspot this step is shown on.
    pub hotspot_id: String,
    /// Bubble body.
    pub content: C,
    /// Optional warning shown under the body.
    pub warning: Option<C>,
}

/// A step together with where it sits in the tutorial.
#[derive(Debug)]
pub struct StepRef<'a, C> {
    /// The step.
    pub step: &'a Step<C>,
    /// The task containing it.
    pub task: &'a Task<C>,
    /// Index of the task.
    pub task_index: usize,
    /// Index of the step inside its task.
    pub local_index: usize,
    /// Flattened index across all tasks.
    pub global_index: usize,
}

impl<C> Clone for StepRef<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for StepRef<'_, C> {}

impl<C> Tutorial<C> {
    /// Sum of the step counts of all tasks.
    pub fn total_step_count(&self) -> usize {
        self.tasks.iter().map(|task| task.steps.len()).sum()
    }

    /// Every step in global order.
    pub fn steps(&self) -> impl Iterator<Item = StepRef<'_, C>> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .flat_map(|(task_index, task)| {
                task.steps
                    .iter()
                    .enumerate()
                    .map(move |(local, step)| (task_index, task, local, step))
            })
            .enumerate()
            .map(|(global_index, (task_index, task, local_index, step))| StepRef {
                step,
                task,
                task_index,
                local_index,
                global_index,
            })
    }

    /// The step at a global index.
    pub fn step_at(&self, index: usize) -> Option<StepRef<'_, C>> {
        let mut start = 0;
        for (task_index, task) in self.tasks.iter().enumerate() {
            let len = task.steps.len();
            if index < start + len {
                let local_index = index - start;
                return Some(StepRef {
                    step: &task.steps[local_index],
                    task,
                    task_index,
                    local_index,
                    global_index: index,
                });
            }
            start += len;
        }
        None
    }
}

impl<C: DeserializeOwned> Tutorial<C> {
    /// Parse a tutorial from JSON.
    ///
    /// ```rust
    /// use perch_annotation::Tutorial;
    ///
    /// let tutorial: Tutorial<String> = Tutorial::from_json(
    ///     r#"{
    ///         "title": "Getting started",
    ///         "tasks": [
    ///             { "title": "Create", "steps": [
    ///                 { "title": "Name it", "hotspotId": "name", "content": "Pick a name." }
    ///             ] }
    ///         ]
    ///     }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(tutorial.total_step_count(), 1);
    /// assert!(Tutorial::<String>::from_json("{").is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// First global index of every hotspot id, fixed per tutorial.
#[derive(Clone, Debug, Default)]
pub struct HotspotIndex {
    order: Vec<(String, usize)>,
    by_id: HashMap<String, usize>,
}

impl HotspotIndex {
    /// Build the map for `tutorial`. Later steps reusing an id do not move its entry.
    pub fn build<C>(tutorial: &Tutorial<C>) -> Self {
        let mut index = Self::default();
        for step in tutorial.steps() {
            let id = &step.step.hotspot_id;
            if !index.by_id.contains_key(id.as_str()) {
                index.by_id.insert(id.clone(), step.global_index);
                index.order.push((id.clone(), step.global_index));
            }
        }
        index
    }

    /// First global index of `id`.
    pub fn get(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Whether the tutorial references `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ids and their first indices, in tutorial order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order.iter().map(|(id, index)| (id.as_str(), *index))
    }

    /// Number of distinct hotspots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no hotspot is referenced.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
