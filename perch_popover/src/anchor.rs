// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracked-element contract.

use kurbo::Rect;
use perch_geometry::{ElementTree, find_containing_block, supports_containing_block_positioning};

/// Something a floating panel stays attached to.
///
/// The engine never owns or caches an anchor; it reads [`Anchor::bounding_rect`]
/// on every recompute. `None` means the anchor is not mounted (yet), which is
/// not an error: the engine simply keeps its previous placement.
pub trait Anchor {
    /// Current border box in client coordinates.
    fn bounding_rect(&self) -> Option<Rect>;
}

impl<F> Anchor for F
where
    F: Fn() -> Option<Rect>,
{
    fn bounding_rect(&self) -> Option<Rect> {
        self()
    }
}

impl Anchor for Option<Rect> {
    fn bounding_rect(&self) -> Option<Rect> {
        *self
    }
}

/// An element of a host tree, tracked by id.
pub struct ElementAnchor<'a, T: ElementTree + ?Sized> {
    /// Tree the element lives in.
    pub tree: &'a T,
    /// Tracked element.
    pub element: T::Id,
}

impl<'a, T: ElementTree + ?Sized> ElementAnchor<'a, T> {
    /// Track `element` inside `tree`.
    pub fn new(tree: &'a T, element: T::Id) -> Self {
        Self { tree, element }
    }
}

impl<T> core::fmt::Debug for ElementAnchor<'_, T>
where
    T: ElementTree + ?Sized,
    T::Id: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementAnchor")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl<T: ElementTree + ?Sized> Anchor for ElementAnchor<'_, T> {
    fn bounding_rect(&self) -> Option<Rect> {
        self.tree.bounding_rect(self.element)
    }
}

/// Client rect of the containing block a fixed panel at `element` is positioned against.
///
/// `None` means the viewport. When the platform does not let transformed
/// ancestors capture fixed descendants (`supported == false`), the viewport is
/// always the containing block.
pub fn containing_block_rect<T>(tree: &T, element: T::Id, supported: bool) -> Option<Rect>
where
    T: ElementTree + ?Sized,
{
    if !supported {
        return None;
    }
    let block = find_containing_block(tree, element)?;
    tree.bounding_rect(block)
}

/// [`containing_block_rect`] for a host that is also a probe host, using the
/// memoized platform probe.
pub fn probed_containing_block_rect<T>(tree: &mut T, element: T::Id) -> Option<Rect>
where
    T: ElementTree + perch_geometry::ProbeHost,
{
    let supported = supports_containing_block_positioning(tree);
    containing_block_rect(tree, element, supported)
}
