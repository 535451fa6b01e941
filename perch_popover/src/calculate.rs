// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The placement algorithm: pick an internal position and a rect for the panel.

use kurbo::{Point, Rect, Size, Vec2};
use perch_geometry::{clamp_x_into, clamp_y_into, fits_within, fits_within_x, visible_area};

use crate::position::{Direction, InternalPosition, priority};

/// Distance between the arrow and the near corner of the panel, for the
/// non-centered alignments.
pub const ARROW_OFFSET: f64 = 12.0;

/// Everything the algorithm reads. All rects are in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementInput {
    /// Anchor bounding box.
    pub trigger: Rect,
    /// Intrinsic size of the floating panel.
    pub body: Size,
    /// Arrow size: `width` along the attached edge, `height` as the gap to the anchor.
    pub arrow: Size,
    /// Visible viewport.
    pub viewport: Rect,
    /// Clipping container the panel must also stay inside, unless portal-rendered.
    pub container: Option<Rect>,
    /// Containing block of a fixed panel; offsets are reported relative to it.
    pub containing_block: Option<Rect>,
    /// Tolerate vertical clipping; only the inline axis has to fit.
    pub allow_vertical_overflow: bool,
    /// Skip the search and use this position.
    pub fixed_position: Option<InternalPosition>,
}

/// Edge of the panel the arrow is drawn on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Top edge (panel below the anchor).
    Top,
    /// Right edge (panel left of the anchor).
    Right,
    /// Bottom edge (panel above the anchor).
    Bottom,
    /// Left edge (panel right of the anchor).
    Left,
}

/// Where the arrow goes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrowPlacement {
    /// Edge facing the anchor.
    pub edge: Edge,
    /// Distance from the start of that edge to the start of the arrow.
    pub offset: f64,
}

/// A placement decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// The chosen internal position.
    pub internal_position: InternalPosition,
    /// Panel box in client coordinates, after any shifting and clipping.
    pub rect: Rect,
    /// Panel origin relative to the containing block (or the viewport).
    pub offset: Point,
    /// The block size was reduced to fit; the panel body has to scroll.
    pub scrollable: bool,
    /// Arrow placement.
    pub arrow: ArrowPlacement,
}

impl Placement {
    /// Size of the panel after clipping.
    pub fn size(&self) -> Size {
        self.rect.size()
    }
}

/// Rect for `position` before any boundary adjustment.
pub fn candidate_rect(position: InternalPosition, trigger: Rect, body: Size, arrow: Size) -> Rect {
    let center = trigger.center();
    let align = ARROW_OFFSET + arrow.width / 2.0;
    let above = trigger.y0 - body.height - arrow.height;
    let below = trigger.y1 + arrow.height;
    let right = trigger.x1 + arrow.height;
    let left = trigger.x0 - body.width - arrow.height;

    let origin = match position {
        InternalPosition::TopCenter => Point::new(center.x - body.width / 2.0, above),
        InternalPosition::TopRight => Point::new(center.x - align, above),
        InternalPosition::TopLeft => Point::new(center.x + align - body.width, above),
        InternalPosition::BottomCenter => Point::new(center.x - body.width / 2.0, below),
        InternalPosition::BottomRight => Point::new(center.x - align, below),
        InternalPosition::BottomLeft => Point::new(center.x + align - body.width, below),
        InternalPosition::RightTop => Point::new(right, center.y - align),
        InternalPosition::RightBottom => Point::new(right, center.y + align - body.height),
        InternalPosition::LeftTop => Point::new(left, center.y - align),
        InternalPosition::LeftBottom => Point::new(left, center.y + align - body.height),
    };
    Rect::from_origin_size(origin, body)
}

/// Choose where the panel goes.
///
/// Candidates are tried in [`priority`] order for `preferred` and the first
/// one that lies entirely inside the boundary wins (only horizontally, with
/// [`PlacementInput::allow_vertical_overflow`]). The boundary is the viewport,
/// intersected with the container when one is given. When nothing fits, the
/// candidate with the largest visible area is taken. Earlier candidates win
/// ties. It is shifted back into the boundary horizontally, and clipped
/// vertically unless vertical overflow is allowed.
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use perch_popover::{Direction, InternalPosition, PlacementInput, calculate_position};
///
/// let input = PlacementInput {
///     trigger: Rect::new(400.0, 10.0, 420.0, 30.0),
///     body: Size::new(200.0, 100.0),
///     arrow: Size::new(20.0, 10.0),
///     viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
///     container: None,
///     containing_block: None,
///     allow_vertical_overflow: false,
///     fixed_position: None,
/// };
///
/// // No room above the anchor, so the panel flips below it.
/// let placement = calculate_position(Direction::Top, &input);
/// assert_eq!(placement.internal_position, InternalPosition::BottomCenter);
/// assert!(!placement.scrollable);
/// ```
pub fn calculate_position(preferred: Direction, input: &PlacementInput) -> Placement {
    let boundary = match input.container {
        Some(container) => input.viewport.intersect(container),
        None => input.viewport,
    };
    let fits = |rect: Rect| {
        if input.allow_vertical_overflow {
            fits_within_x(rect, boundary)
        } else {
            fits_within(rect, boundary)
        }
    };

    let candidates: &[InternalPosition] = match &input.fixed_position {
        Some(fixed) => core::slice::from_ref(fixed),
        None => priority(preferred),
    };

    let mut best: Option<(InternalPosition, Rect, f64)> = None;
    for &position in candidates {
        let rect = candidate_rect(position, input.trigger, input.body, input.arrow);
        if fits(rect) {
            return finish(position, rect, false, input);
        }
        let area = visible_area(rect, boundary);
        if best.is_none_or(|(_, _, best_area)| area > best_area) {
            best = Some((position, rect, area));
        }
    }

    let (position, rect) = match best {
        Some((position, rect, _)) => (position, rect),
        // `candidates` is never empty; this arm only keeps the function total.
        None => {
            let position = priority(preferred)[0];
            let rect = candidate_rect(position, input.trigger, input.body, input.arrow);
            (position, rect)
        }
    };
    let (rect, scrollable) = constrain(position, rect, boundary, input.allow_vertical_overflow);
    tracing::trace!(
        ?position,
        scrollable,
        "no candidate fits; constrained best candidate"
    );
    finish(position, rect, scrollable, input)
}

/// Shift a non-fitting rect into `boundary` and clip what still overflows vertically.
fn constrain(
    position: InternalPosition,
    rect: Rect,
    boundary: Rect,
    allow_vertical_overflow: bool,
) -> (Rect, bool) {
    let rect = clamp_x_into(rect, boundary);
    if allow_vertical_overflow || (rect.y0 >= boundary.y0 && rect.y1 <= boundary.y1) {
        return (rect, false);
    }

    if position.is_vertical() {
        // Keep the side facing the anchor; shrink the far side.
        let clipped = Rect::new(
            rect.x0,
            rect.y0.max(boundary.y0),
            rect.x1,
            rect.y1.min(boundary.y1),
        );
        if clipped.height() > 0.0 {
            return (clipped, clipped.height() < rect.height());
        }
    }

    let shifted = clamp_y_into(rect, boundary);
    if shifted.y1 > boundary.y1 {
        let clipped = Rect::new(shifted.x0, shifted.y0, shifted.x1, boundary.y1);
        (clipped, true)
    } else {
        (shifted, false)
    }
}

fn finish(
    position: InternalPosition,
    rect: Rect,
    scrollable: bool,
    input: &PlacementInput,
) -> Placement {
    let origin = input
        .containing_block
        .map_or(Vec2::ZERO, |block| block.origin().to_vec2());
    Placement {
        internal_position: position,
        rect,
        offset: rect.origin() - origin,
        scrollable,
        arrow: arrow_placement(position, rect, input.trigger, input.arrow),
    }
}

/// Center the arrow on the anchor, clamped to the panel edge it sits on.
fn arrow_placement(
    position: InternalPosition,
    rect: Rect,
    trigger: Rect,
    arrow: Size,
) -> ArrowPlacement {
    let center = trigger.center();
    let (edge, start, along, extent) = match position.direction() {
        Direction::Top => (Edge::Bottom, rect.x0, center.x, rect.width()),
        Direction::Bottom => (Edge::Top, rect.x0, center.x, rect.width()),
        Direction::Right => (Edge::Left, rect.y0, center.y, rect.height()),
        Direction::Left => (Edge::Right, rect.y0, center.y, rect.height()),
    };
    let max = (extent - arrow.width).max(0.0);
    let offset = (along - start - arrow.width / 2.0).clamp(0.0, max);
    ArrowPlacement { edge, offset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);
    const ARROW: Size = Size::new(20.0, 10.0);

    fn input(trigger: Rect, body: Size) -> PlacementInput {
        PlacementInput {
            trigger,
            body,
            arrow: ARROW,
            viewport: VIEWPORT,
            container: None,
            containing_block: None,
            allow_vertical_overflow: false,
            fixed_position: None,
        }
    }

    #[test]
    fn preferred_direction_wins_when_it_fits() {
        let trigger = Rect::new(480.0, 380.0, 520.0, 420.0);
        let body = Size::new(200.0, 100.0);
        for (dir, expected) in [
            (Direction::Top, InternalPosition::TopCenter),
            (Direction::Bottom, InternalPosition::BottomCenter),
            (Direction::Right, InternalPosition::RightTop),
            (Direction::Left, InternalPosition::LeftTop),
        ] {
            let p = calculate_position(dir, &input(trigger, body));
            assert_eq!(p.internal_position, expected, "preferred {dir:?}");
            assert!(fits_within(p.rect, VIEWPORT));
        }
    }

    #[test]
    fn candidate_geometry() {
        let trigger = Rect::new(100.0, 100.0, 140.0, 120.0);
        let body = Size::new(60.0, 30.0);
        assert_eq!(
            candidate_rect(InternalPosition::TopCenter, trigger, body, ARROW),
            Rect::new(90.0, 60.0, 150.0, 90.0)
        );
        assert_eq!(
            candidate_rect(InternalPosition::BottomRight, trigger, body, ARROW),
            Rect::new(98.0, 130.0, 158.0, 160.0)
        );
        assert_eq!(
            candidate_rect(InternalPosition::BottomLeft, trigger, body, ARROW),
            Rect::new(82.0, 130.0, 142.0, 160.0)
        );
        assert_eq!(
            candidate_rect(InternalPosition::RightTop, trigger, body, ARROW),
            Rect::new(150.0, 88.0, 210.0, 118.0)
        );
        assert_eq!(
            candidate_rect(InternalPosition::LeftBottom, trigger, body, ARROW),
            Rect::new(30.0, 102.0, 90.0, 132.0)
        );
    }

    #[test]
    fn flips_to_opposite_side_on_same_axis() {
        // Anchor at the right edge: right placement does not fit, left does.
        let trigger = Rect::new(950.0, 400.0, 990.0, 420.0);
        let p = calculate_position(Direction::Right, &input(trigger, Size::new(200.0, 100.0)));
        assert_eq!(p.internal_position, InternalPosition::LeftTop);
    }

    #[test]
    fn alignment_variant_used_near_edge() {
        // Centered above would cross the left viewport edge; right-extending fits.
        let trigger = Rect::new(30.0, 400.0, 50.0, 420.0);
        let p = calculate_position(Direction::Top, &input(trigger, Size::new(200.0, 100.0)));
        assert_eq!(p.internal_position, InternalPosition::TopRight);
    }

    #[test]
    fn container_restricts_boundary() {
        let trigger = Rect::new(480.0, 380.0, 520.0, 420.0);
        let mut inp = input(trigger, Size::new(200.0, 100.0));
        // Container ends right above the anchor: top cannot fit inside it.
        inp.container = Some(Rect::new(0.0, 370.0, 1000.0, 800.0));
        let p = calculate_position(Direction::Top, &inp);
        assert_eq!(p.internal_position, InternalPosition::BottomCenter);
    }

    #[test]
    fn nothing_fits_picks_largest_area_and_clips() {
        // A body taller than the viewport never fits. It is also too wide for
        // the sides, so below the anchor shows the most of it.
        let trigger = Rect::new(480.0, 100.0, 520.0, 120.0);
        let p = calculate_position(Direction::Bottom, &input(trigger, Size::new(900.0, 1000.0)));
        assert_eq!(p.internal_position, InternalPosition::BottomCenter);
        assert!(p.scrollable);
        assert!(fits_within(p.rect, VIEWPORT));
        assert_eq!(p.rect.y0, 130.0, "panel keeps the edge next to the anchor");
        assert_eq!(p.rect.y1, 800.0);
    }

    #[test]
    fn vertical_overflow_is_tolerated_when_allowed() {
        let trigger = Rect::new(480.0, 700.0, 520.0, 720.0);
        let mut inp = input(trigger, Size::new(200.0, 300.0));
        inp.allow_vertical_overflow = true;
        let p = calculate_position(Direction::Bottom, &inp);
        assert_eq!(p.internal_position, InternalPosition::BottomCenter);
        assert!(!p.scrollable);
        assert!(p.rect.y1 > VIEWPORT.y1);
    }

    #[test]
    fn fixed_position_skips_search() {
        let trigger = Rect::new(480.0, 5.0, 520.0, 25.0);
        let mut inp = input(trigger, Size::new(200.0, 100.0));
        inp.fixed_position = Some(InternalPosition::TopCenter);
        let p = calculate_position(Direction::Bottom, &inp);
        assert_eq!(p.internal_position, InternalPosition::TopCenter);
        // It still gets constrained into the viewport.
        assert!(p.rect.y0 >= 0.0);
    }

    #[test]
    fn offset_is_relative_to_containing_block() {
        let trigger = Rect::new(480.0, 380.0, 520.0, 420.0);
        let mut inp = input(trigger, Size::new(200.0, 100.0));
        inp.containing_block = Some(Rect::new(100.0, 50.0, 900.0, 750.0));
        let p = calculate_position(Direction::Top, &inp);
        assert_eq!(p.offset, Point::new(p.rect.x0 - 100.0, p.rect.y0 - 50.0));
    }

    #[test]
    fn arrow_points_at_anchor_center() {
        let trigger = Rect::new(480.0, 380.0, 520.0, 420.0);
        let p = calculate_position(Direction::Top, &input(trigger, Size::new(200.0, 100.0)));
        assert_eq!(p.arrow.edge, Edge::Bottom);
        assert_eq!(p.rect.x0 + p.arrow.offset + ARROW.width / 2.0, 500.0);

        let p = calculate_position(Direction::Right, &input(trigger, Size::new(200.0, 100.0)));
        assert_eq!(p.arrow.edge, Edge::Left);
        assert_eq!(p.rect.y0 + p.arrow.offset + ARROW.width / 2.0, 400.0);
    }

    proptest! {
        #[test]
        fn chooses_a_fitting_direction_when_one_exists(
            ax in 0.0..960.0_f64,
            ay in 0.0..760.0_f64,
            aw in 1.0..40.0_f64,
            ah in 1.0..40.0_f64,
            bw in 10.0..400.0_f64,
            bh in 10.0..300.0_f64,
            dir in prop_oneof![
                Just(Direction::Top),
                Just(Direction::Right),
                Just(Direction::Bottom),
                Just(Direction::Left),
            ],
        ) {
            let trigger = Rect::new(ax, ay, ax + aw, ay + ah);
            let body = Size::new(bw, bh);
            let any_fits = InternalPosition::ALL
                .iter()
                .map(|&p| candidate_rect(p, trigger, body, ARROW))
                .any(|rect| fits_within(rect, VIEWPORT));
            let placement = calculate_position(dir, &input(trigger, body));
            if any_fits {
                prop_assert!(!placement.scrollable);
                prop_assert_eq!(
                    placement.rect,
                    candidate_rect(placement.internal_position, trigger, body, ARROW)
                );
            }
            // Without vertical overflow the result never leaves the viewport vertically.
            prop_assert!(placement.rect.y0 >= VIEWPORT.y0 - 1e-9);
            prop_assert!(placement.rect.y1 <= VIEWPORT.y1 + 1e-9);
        }
    }
}
