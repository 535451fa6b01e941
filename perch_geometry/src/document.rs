// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element tree for headless hosts and tests.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::ancestor::ElementTree;
use crate::probe::{ProbeHost, ProbeMetrics};
use crate::types::{ElementId, ElementKind, LocalElement, StyleFlags};

/// Platform behavior a [`Document`] reports to layout probes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    /// Gutter size a scroll container reserves for its scrollbars.
    pub scrollbar: Size,
    /// Whether transformed ancestors become the containing block of fixed descendants.
    pub transform_contains_fixed: bool,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            scrollbar: Size::new(15.0, 15.0),
            transform_contains_fixed: true,
        }
    }
}

/// A generational arena of elements with a scrollable viewport.
///
/// Element rects are stored in page coordinates. [`ElementTree::bounding_rect`]
/// reports them in client coordinates, i.e. shifted by the current page scroll,
/// which is what the positioning engine reads.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Rect, Size, Vec2};
/// use perch_geometry::{Document, ElementTree, LocalElement};
///
/// let mut doc = Document::new(Size::new(800.0, 600.0));
/// let button = doc.insert(
///     None,
///     LocalElement {
///         rect: Rect::new(10.0, 900.0, 110.0, 930.0),
///         ..LocalElement::default()
///     },
/// );
///
/// doc.scroll_by(Vec2::new(0.0, 500.0));
/// assert_eq!(doc.bounding_rect(button), Some(Rect::new(10.0, 400.0, 110.0, 430.0)));
/// ```
#[derive(Clone, Debug)]
pub struct Document {
    /// slots
    elements: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    viewport: Size,
    scroll: Vec2,
    platform: Platform,
}

#[derive(Clone, Debug)]
struct Element {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    local: LocalElement,
}

impl Document {
    /// Create an empty document with a viewport of the given size and default [`Platform`].
    pub fn new(viewport: Size) -> Self {
        Self::with_platform(viewport, Platform::default())
    }

    /// Create an empty document with explicit platform behavior.
    pub fn with_platform(viewport: Size, platform: Platform) -> Self {
        Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            viewport,
            scroll: Vec2::ZERO,
            platform,
        }
    }

    /// Insert a new element as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the element as a root.
    pub fn insert(&mut self, parent: Option<ElementId>, local: LocalElement) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(Element::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(Element::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId stores 32-bit slot indices."
            )]
            ((self.elements.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove an element and its subtree. Stale ids are ignored.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.element(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.element(id).children.clone();
        for child in children {
            self.remove(child);
        }
        self.elements[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` under `new_parent` (or make it a root).
    ///
    /// Moving an element under itself or one of its descendants is ignored.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) {
        if !self.is_alive(id) {
            return;
        }
        if new_parent.is_some_and(|p| self.is_self_or_ancestor(id, p)) {
            return;
        }
        if let Some(parent) = self.element(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
    }

    fn is_self_or_ancestor(&self, ancestor: ElementId, mut node: ElementId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent_of(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Update the page-space rect of an element.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(e) = self.element_opt_mut(id) {
            e.local.rect = rect;
        }
    }

    /// Update the computed style bits of an element.
    pub fn set_style(&mut self, id: ElementId, style: StyleFlags) {
        if let Some(e) = self.element_opt_mut(id) {
            e.local.style = style;
        }
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.elements
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .is_some_and(|e| e.generation == id.1)
    }

    /// Parent of a live element; `None` for roots and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element_opt(id)?.parent
    }

    /// Children of a live element; empty for stale ids.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.element_opt(id).map_or(&[], |e| &e.children)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|e| e.is_some()).count()
    }

    /// Returns `true` if the document has no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Client area of the viewport, in client coordinates (origin at zero).
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.viewport)
    }

    /// Resize the viewport.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Current page scroll offset.
    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    /// Scroll the page by `delta`. The offset never goes negative.
    pub fn scroll_by(&mut self, delta: Vec2) {
        let next = self.scroll + delta;
        self.scroll = Vec2::new(next.x.max(0.0), next.y.max(0.0));
    }

    /// Inner size of an element: its border box minus scrollbar gutters.
    pub fn client_size(&self, id: ElementId) -> Option<Size> {
        let e = self.element_opt(id)?;
        let size = e.local.rect.size();
        if e.local.style.contains(StyleFlags::OVERFLOW_SCROLL) {
            let bar = self.platform.scrollbar;
            Some(Size::new(
                (size.width - bar.width).max(0.0),
                (size.height - bar.height).max(0.0),
            ))
        } else {
            Some(size)
        }
    }

    fn element(&self, id: ElementId) -> &Element {
        self.elements[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn element_opt(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|e| e.generation == id.1)
    }

    fn element_opt_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|e| e.generation == id.1)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(e) = self.element_opt_mut(id) {
            e.parent = Some(parent);
        }
        if let Some(p) = self.element_opt_mut(parent) {
            p.children.push(id);
        }
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.element_opt_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(e) = self.element_opt_mut(id) {
            e.parent = None;
        }
    }
}

impl Element {
    fn new(generation: u32, local: LocalElement) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl ElementTree for Document {
    type Id = ElementId;

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent_of(id)
    }

    fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.element_opt(id).map(|e| e.local.kind)
    }

    fn style(&self, id: ElementId) -> StyleFlags {
        self.element_opt(id)
            .map(|e| e.local.style)
            .unwrap_or_default()
    }

    fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.element_opt(id).map(|e| e.local.rect - self.scroll)
    }
}

/// Side length of the offscreen scroll probe.
const PROBE_EXTENT: f64 = 100.0;

impl ProbeHost for Document {
    type Probe = ElementId;

    fn append_scroll_probe(&mut self) -> Option<ElementId> {
        let rect = Rect::from_origin_size(
            Point::new(-9999.0, -9999.0),
            Size::new(PROBE_EXTENT, PROBE_EXTENT),
        );
        Some(self.insert(
            None,
            LocalElement {
                kind: ElementKind::Html,
                rect,
                style: StyleFlags::OVERFLOW_SCROLL,
            },
        ))
    }

    fn probe_metrics(&self, probe: &ElementId) -> Option<ProbeMetrics> {
        let offset = self.element_opt(*probe)?.local.rect.size();
        let client = self.client_size(*probe)?;
        Some(ProbeMetrics { offset, client })
    }

    fn remove_probe(&mut self, probe: ElementId) {
        self.remove(probe);
    }

    fn probe_containing_block(&mut self) -> Option<bool> {
        Some(self.platform.transform_contains_fixed)
    }
}
