// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor-chain queries over any [`ElementTree`].

use kurbo::Rect;

use crate::types::{ElementKind, StyleFlags};

/// Read-only view of a host element tree.
///
/// This is the only surface the positioning code needs from a DOM: parent
/// pointers, a namespace check, computed style bits, and a client-space
/// bounding box. Every query is total; stale or unknown ids answer `None`
/// (or empty styles) instead of panicking.
pub trait ElementTree {
    /// Element handle.
    type Id: Copy + Eq;

    /// Parent element, or `None` at a root or for a stale id.
    fn parent(&self, id: Self::Id) -> Option<Self::Id>;

    /// Namespace of the element, or `None` for a stale id.
    fn kind(&self, id: Self::Id) -> Option<ElementKind>;

    /// Computed style bits of the element.
    fn style(&self, id: Self::Id) -> StyleFlags;

    /// Border box in client (viewport) coordinates, or `None` if not rendered.
    fn bounding_rect(&self, id: Self::Id) -> Option<Rect>;
}

/// Walk from `node` towards the root and return the first HTML element that
/// satisfies `predicate`.
///
/// The walk starts at `node` itself. Non-HTML ancestors are stepped over
/// without consulting `predicate`, so a component mounted inside an SVG
/// `foreignObject` still finds its HTML ancestors.
///
/// ```rust
/// use kurbo::Rect;
/// use perch_geometry::{Document, ElementKind, LocalElement, find_ancestor_matching};
///
/// let mut doc = Document::new(kurbo::Size::new(800.0, 600.0));
/// let root = doc.insert(None, LocalElement::default());
/// let svg = doc.insert(
///     Some(root),
///     LocalElement { kind: ElementKind::Svg, ..LocalElement::default() },
/// );
/// let leaf = doc.insert(Some(svg), LocalElement::default());
///
/// // The SVG node never reaches the predicate.
/// let found = find_ancestor_matching(&doc, leaf, |id| id != leaf);
/// assert_eq!(found, Some(root));
/// ```
pub fn find_ancestor_matching<T, F>(tree: &T, node: T::Id, mut predicate: F) -> Option<T::Id>
where
    T: ElementTree + ?Sized,
    F: FnMut(T::Id) -> bool,
{
    let mut current = Some(node);
    while let Some(id) = current {
        let is_html = tree.kind(id)? == ElementKind::Html;
        if is_html && predicate(id) {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

/// Nearest ancestor of `element` that is the containing block for fixed descendants.
///
/// The search starts at the parent: an element never contains itself. Returns
/// `None` when the viewport is the containing block.
pub fn find_containing_block<T>(tree: &T, element: T::Id) -> Option<T::Id>
where
    T: ElementTree + ?Sized,
{
    let parent = tree.parent(element)?;
    find_ancestor_matching(tree, parent, |id| {
        tree.style(id).establishes_containing_block()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, LocalElement};
    use kurbo::Size;

    fn doc() -> Document {
        Document::new(Size::new(1000.0, 800.0))
    }

    #[test]
    fn starts_at_node_itself() {
        let mut doc = doc();
        let root = doc.insert(None, LocalElement::default());
        let child = doc.insert(Some(root), LocalElement::default());
        assert_eq!(find_ancestor_matching(&doc, child, |_| true), Some(child));
    }

    #[test]
    fn returns_none_at_root() {
        let mut doc = doc();
        let root = doc.insert(None, LocalElement::default());
        let child = doc.insert(Some(root), LocalElement::default());
        assert_eq!(find_ancestor_matching(&doc, child, |_| false), None);
    }

    #[test]
    fn skips_svg_ancestors() {
        let mut doc = doc();
        let root = doc.insert(None, LocalElement::default());
        let svg = doc.insert(
            Some(root),
            LocalElement {
                kind: ElementKind::Svg,
                style: StyleFlags::TRANSFORM,
                ..LocalElement::default()
            },
        );
        let g = doc.insert(
            Some(svg),
            LocalElement {
                kind: ElementKind::Svg,
                ..LocalElement::default()
            },
        );
        let foreign = doc.insert(Some(g), LocalElement::default());

        let mut seen = alloc::vec::Vec::new();
        let found = find_ancestor_matching(&doc, foreign, |id| {
            seen.push(id);
            false
        });
        assert_eq!(found, None);
        assert_eq!(
            seen,
            alloc::vec![foreign, root],
            "svg nodes must be skipped"
        );
    }

    #[test]
    fn stale_node_is_not_found() {
        let mut doc = doc();
        let root = doc.insert(None, LocalElement::default());
        doc.remove(root);
        assert_eq!(find_ancestor_matching(&doc, root, |_| true), None);
    }

    #[test]
    fn containing_block_is_nearest_transformed_ancestor() {
        let mut doc = doc();
        let root = doc.insert(None, LocalElement::default());
        let outer = doc.insert(
            Some(root),
            LocalElement {
                style: StyleFlags::PERSPECTIVE,
                ..LocalElement::default()
            },
        );
        let inner = doc.insert(
            Some(outer),
            LocalElement {
                style: StyleFlags::TRANSFORM,
                ..LocalElement::default()
            },
        );
        let popover = doc.insert(
            Some(inner),
            LocalElement {
                style: StyleFlags::TRANSFORM,
                ..LocalElement::default()
            },
        );
        // The popover's own transform does not count.
        assert_eq!(find_containing_block(&doc, popover), Some(inner));
        assert_eq!(find_containing_block(&doc, inner), Some(outer));
        assert_eq!(find_containing_block(&doc, outer), None);
    }

    #[test]
    fn containing_block_ignores_overflow_and_svg() {
        let mut doc = doc();
        let root = doc.insert(None, LocalElement::default());
        let scroller = doc.insert(
            Some(root),
            LocalElement {
                style: StyleFlags::OVERFLOW_SCROLL,
                ..LocalElement::default()
            },
        );
        let svg = doc.insert(
            Some(scroller),
            LocalElement {
                kind: ElementKind::Svg,
                style: StyleFlags::TRANSFORM,
                ..LocalElement::default()
            },
        );
        let leaf = doc.insert(Some(svg), LocalElement::default());
        assert_eq!(find_containing_block(&doc, leaf), None);
        assert_eq!(find_containing_block(&doc, root), None);
    }
}
