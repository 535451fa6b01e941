// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for element trees: identifiers, kinds, style flags, and local data.

use kurbo::Rect;

/// Identifier for an element in a [`Document`](crate::Document) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The namespace an element belongs to.
///
/// Ancestor walks only consult HTML elements. Other kinds (for example the
/// nodes of an inline SVG subtree hosting a `foreignObject`) are stepped over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A regular HTML element.
    #[default]
    Html,
    /// An element inside a vector-graphics subtree.
    Svg,
    /// Anything else the host exposes (math markup, custom namespaces).
    Other,
}

bitflags::bitflags! {
    /// Computed style bits that matter for positioning.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        /// `transform` is set to something other than `none`.
        const TRANSFORM             = 0b0000_0001;
        /// `perspective` is set to something other than `none`.
        const PERSPECTIVE           = 0b0000_0010;
        /// `will-change: transform`.
        const WILL_CHANGE_TRANSFORM = 0b0000_0100;
        /// `contain: paint` (or `layout`/`strict`/`content`).
        const CONTAIN_PAINT         = 0b0000_1000;
        /// `filter` is set to something other than `none`.
        const FILTER                = 0b0001_0000;
        /// `overflow: scroll` on both axes; the element reserves scrollbar gutters.
        const OVERFLOW_SCROLL       = 0b0010_0000;

        /// Any style that makes the element the containing block of fixed descendants.
        const CONTAINING_BLOCK = Self::TRANSFORM.bits()
            | Self::PERSPECTIVE.bits()
            | Self::WILL_CHANGE_TRANSFORM.bits()
            | Self::CONTAIN_PAINT.bits()
            | Self::FILTER.bits();
    }
}

impl StyleFlags {
    /// Whether these styles establish a containing block for `position: fixed` descendants.
    pub fn establishes_containing_block(self) -> bool {
        self.intersects(Self::CONTAINING_BLOCK)
    }
}

/// Host-supplied data for one element.
#[derive(Clone, Debug, Default)]
pub struct LocalElement {
    /// Namespace of the element.
    pub kind: ElementKind,
    /// Border box in page coordinates (unaffected by page scroll).
    pub rect: Rect,
    /// Computed style bits.
    pub style: StyleFlags,
}
