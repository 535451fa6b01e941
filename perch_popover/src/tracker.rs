// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance placement state machine.
//!
//! [`PopoverPosition`] owns one popover's last [`Placement`] and decides, for
//! each incoming [`Trigger`], whether to recompute now, defer to the next
//! animation frame, or do nothing.
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use perch_popover::{Layout, PopoverOptions, PopoverPosition, PositionState, Reaction, Trigger};
//!
//! let layout = Layout::new(
//!     Some(Rect::new(100.0, 100.0, 140.0, 120.0)),
//!     Size::new(200.0, 80.0),
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//! );
//! let mut popover: PopoverPosition<u32> = PopoverPosition::new(PopoverOptions::default());
//! popover.mount(&layout);
//! assert_eq!(popover.state(), PositionState::Positioned);
//!
//! // Window resizes are batched into one frame.
//! assert_eq!(popover.handle(Trigger::WindowResize, &layout), Reaction::FrameScheduled);
//! assert_eq!(popover.handle(Trigger::Scroll, &layout), Reaction::FramePending);
//! popover.on_animation_frame(&layout);
//! assert_eq!(popover.state(), PositionState::Positioned);
//! ```

use kurbo::{Rect, Size, Vec2};

use crate::anchor::Anchor;
use crate::calculate::{Placement, PlacementInput, calculate_position};
use crate::options::PopoverOptions;
use crate::position::InternalPosition;

/// Everything a recompute reads from the host, queried fresh each time.
pub trait LayoutSource {
    /// Anchor bounding box in client coordinates, or `None` if not mounted.
    fn anchor_rect(&self) -> Option<Rect>;
    /// Intrinsic size of the floating panel's content.
    fn body_size(&self) -> Size;
    /// Visible viewport.
    fn viewport(&self) -> Rect;
    /// Clipping container of the panel, if any.
    fn container(&self) -> Option<Rect> {
        None
    }
    /// Containing block for a fixed panel, if it is not the viewport.
    fn containing_block(&self) -> Option<Rect> {
        None
    }
}

/// A plain [`LayoutSource`] built from an [`Anchor`] and fixed measurements.
#[derive(Clone, Debug)]
pub struct Layout<A> {
    /// Tracked anchor.
    pub anchor: A,
    /// Panel content size.
    pub body: Size,
    /// Visible viewport.
    pub viewport: Rect,
    /// Clipping container.
    pub container: Option<Rect>,
    /// Containing block for fixed positioning.
    pub containing_block: Option<Rect>,
}

impl<A: Anchor> Layout<A> {
    /// A layout with no container and the viewport as containing block.
    pub fn new(anchor: A, body: Size, viewport: Rect) -> Self {
        Self {
            anchor,
            body,
            viewport,
            container: None,
            containing_block: None,
        }
    }

    /// Set the clipping container.
    #[must_use]
    pub fn with_container(mut self, container: Rect) -> Self {
        self.container = Some(container);
        self
    }

    /// Set the containing block.
    #[must_use]
    pub fn with_containing_block(mut self, block: Rect) -> Self {
        self.containing_block = Some(block);
        self
    }
}

impl<A: Anchor> LayoutSource for Layout<A> {
    fn anchor_rect(&self) -> Option<Rect> {
        self.anchor.bounding_rect()
    }

    fn body_size(&self) -> Size {
        self.body
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn container(&self) -> Option<Rect> {
        self.container
    }

    fn containing_block(&self) -> Option<Rect> {
        self.containing_block
    }
}

/// Lifecycle of one popover instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PositionState {
    /// Nothing computed yet (not mounted, or the anchor never showed up).
    Uninitialized,
    /// A placement is current.
    Positioned,
    /// A recompute is scheduled for the next animation frame.
    Recomputing,
}

/// Why a recompute may be needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger<K> {
    /// The panel's content box changed size.
    ContentResize,
    /// The window was resized.
    WindowResize,
    /// Something scrolled (captured anywhere in the document).
    Scroll,
    /// A click somewhere in the window.
    Click {
        /// The click landed on the anchor itself.
        on_anchor: bool,
    },
    /// An arrow key moved focus.
    ArrowKey,
    /// The caller's track key. A different value means the logical anchor changed.
    TrackKey(K),
}

/// A block-axis scroll the host should perform on the next animation frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRequest {
    /// Amount to scroll the page by.
    pub delta: Vec2,
}

/// What [`PopoverPosition::handle`] did with a trigger.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reaction {
    /// Nothing happened.
    Ignored,
    /// The placement was recomputed now, possibly asking for a scroll.
    Recomputed(Option<ScrollRequest>),
    /// A recompute was scheduled; call [`PopoverPosition::on_animation_frame`].
    FrameScheduled,
    /// A recompute was already scheduled; this trigger joins it.
    FramePending,
}

/// Placement state for one popover.
#[derive(Clone, Debug)]
pub struct PopoverPosition<K> {
    options: PopoverOptions,
    state: PositionState,
    placement: Option<Placement>,
    track_key: Option<K>,
    frame_pending: bool,
    opened_by_hover: bool,
    kept_position: Option<InternalPosition>,
}

impl<K: PartialEq> PopoverPosition<K> {
    /// A fresh, unmounted instance.
    pub fn new(options: PopoverOptions) -> Self {
        Self {
            options,
            state: PositionState::Uninitialized,
            placement: None,
            track_key: None,
            frame_pending: false,
            opened_by_hover: false,
            kept_position: None,
        }
    }

    /// Options this instance was created with.
    pub fn options(&self) -> &PopoverOptions {
        &self.options
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Latest placement, if any was ever computed.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Whether an animation-frame recompute is outstanding.
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Mark whether the popover is currently open only because of hover.
    ///
    /// Hover-opened popovers never ask for scroll-to-fit.
    pub fn set_opened_by_hover(&mut self, hover: bool) {
        self.opened_by_hover = hover;
    }

    /// Compute the initial placement synchronously, before the first paint.
    pub fn mount(&mut self, source: &dyn LayoutSource) -> Option<ScrollRequest> {
        self.frame_pending = false;
        self.recompute(source)
    }

    /// Forget the placement and any pending frame.
    ///
    /// A kept internal position survives, since it belongs to the instance.
    pub fn unmount(&mut self) {
        self.state = PositionState::Uninitialized;
        self.placement = None;
        self.frame_pending = false;
    }

    /// React to one trigger.
    pub fn handle(&mut self, trigger: Trigger<K>, source: &dyn LayoutSource) -> Reaction {
        match trigger {
            Trigger::ContentResize => Reaction::Recomputed(self.recompute(source)),
            Trigger::TrackKey(key) => {
                if self.track_key.as_ref() == Some(&key) {
                    return Reaction::Ignored;
                }
                self.track_key = Some(key);
                Reaction::Recomputed(self.recompute(source))
            }
            Trigger::Click { on_anchor: true } => Reaction::Ignored,
            Trigger::Click { on_anchor: false } | Trigger::ArrowKey => {
                if self.options.keep_position {
                    return Reaction::Ignored;
                }
                self.schedule_frame()
            }
            Trigger::WindowResize | Trigger::Scroll => self.schedule_frame(),
        }
    }

    /// Run the recompute scheduled by earlier triggers, reading the newest geometry.
    pub fn on_animation_frame(&mut self, source: &dyn LayoutSource) -> Option<ScrollRequest> {
        if !self.frame_pending {
            return None;
        }
        self.frame_pending = false;
        self.recompute(source)
    }

    fn schedule_frame(&mut self) -> Reaction {
        if self.frame_pending {
            return Reaction::FramePending;
        }
        self.frame_pending = true;
        if self.placement.is_some() {
            self.state = PositionState::Recomputing;
        }
        Reaction::FrameScheduled
    }

    fn recompute(&mut self, source: &dyn LayoutSource) -> Option<ScrollRequest> {
        let Some(trigger) = source.anchor_rect() else {
            tracing::debug!("popover anchor is not mounted; keeping previous placement");
            self.state = self.settled_state();
            return None;
        };
        let viewport = source.viewport();
        let input = PlacementInput {
            trigger,
            body: source.body_size(),
            arrow: self.options.arrow(),
            viewport,
            container: if self.options.render_with_portal {
                None
            } else {
                source.container()
            },
            containing_block: source.containing_block(),
            allow_vertical_overflow: self.options.allow_vertical_overflow,
            fixed_position: if self.options.keep_position {
                self.kept_position
            } else {
                None
            },
        };
        let placement = calculate_position(self.options.preferred, &input);
        if self.options.keep_position && self.kept_position.is_none() {
            self.kept_position = Some(placement.internal_position);
        }
        tracing::trace!(
            position = ?placement.internal_position,
            rect = ?placement.rect,
            scrollable = placement.scrollable,
            "popover recomputed"
        );
        self.placement = Some(placement);
        self.state = self.settled_state();

        if self.options.allow_scroll_to_fit && !self.opened_by_hover {
            scroll_to_fit(placement.rect, viewport)
        } else {
            None
        }
    }

    fn settled_state(&self) -> PositionState {
        if self.frame_pending {
            PositionState::Recomputing
        } else if self.placement.is_some() {
            PositionState::Positioned
        } else {
            PositionState::Uninitialized
        }
    }
}

/// Smallest block scroll that brings `rect` into `viewport`, keeping its top edge visible.
fn scroll_to_fit(rect: Rect, viewport: Rect) -> Option<ScrollRequest> {
    let dy = if rect.y1 > viewport.y1 {
        (rect.y1 - viewport.y1).min(rect.y0 - viewport.y0)
    } else if rect.y0 < viewport.y0 {
        rect.y0 - viewport.y0
    } else {
        0.0
    };
    (dy != 0.0).then_some(ScrollRequest {
        delta: Vec2::new(0.0, dy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Direction;
    use core::cell::Cell;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    struct Moving {
        anchor: Cell<Option<Rect>>,
        body: Size,
    }

    impl LayoutSource for Moving {
        fn anchor_rect(&self) -> Option<Rect> {
            self.anchor.get()
        }
        fn body_size(&self) -> Size {
            self.body
        }
        fn viewport(&self) -> Rect {
            VIEWPORT
        }
    }

    fn layout(anchor: Option<Rect>) -> Layout<Option<Rect>> {
        Layout::new(anchor, Size::new(200.0, 80.0), VIEWPORT)
    }

    #[test]
    fn mount_positions_synchronously() {
        let mut p: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        assert_eq!(p.state(), PositionState::Uninitialized);
        let scroll = p.mount(&layout(Some(Rect::new(100.0, 100.0, 140.0, 120.0))));
        assert_eq!(scroll, None);
        assert_eq!(p.state(), PositionState::Positioned);
        assert_eq!(
            p.placement().map(|pl| pl.internal_position),
            Some(InternalPosition::RightTop)
        );
    }

    #[test]
    fn absent_anchor_is_a_no_op() {
        let mut p: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        p.mount(&layout(None));
        assert_eq!(p.state(), PositionState::Uninitialized);
        assert!(p.placement().is_none());

        p.mount(&layout(Some(Rect::new(100.0, 100.0, 140.0, 120.0))));
        let before = p.placement().copied();
        assert_eq!(
            p.handle(Trigger::ContentResize, &layout(None)),
            Reaction::Recomputed(None)
        );
        assert_eq!(p.placement().copied(), before);
        assert_eq!(p.state(), PositionState::Positioned);
    }

    #[test]
    fn window_triggers_coalesce_and_newest_geometry_wins() {
        let src = Moving {
            anchor: Cell::new(Some(Rect::new(100.0, 100.0, 140.0, 120.0))),
            body: Size::new(200.0, 80.0),
        };
        let mut p: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        p.mount(&src);

        assert_eq!(
            p.handle(Trigger::WindowResize, &src),
            Reaction::FrameScheduled
        );
        assert_eq!(p.state(), PositionState::Recomputing);
        assert_eq!(p.handle(Trigger::Scroll, &src), Reaction::FramePending);
        assert_eq!(
            p.handle(Trigger::Click { on_anchor: false }, &src),
            Reaction::FramePending
        );

        src.anchor.set(Some(Rect::new(300.0, 200.0, 340.0, 220.0)));
        p.on_animation_frame(&src);
        assert_eq!(p.state(), PositionState::Positioned);
        assert_eq!(p.placement().map(|pl| pl.rect.x0), Some(350.0));

        // A second frame with nothing scheduled does nothing.
        src.anchor.set(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(p.on_animation_frame(&src), None);
        assert_eq!(p.placement().map(|pl| pl.rect.x0), Some(350.0));
    }

    #[test]
    fn content_resize_recomputes_immediately() {
        let src = Moving {
            anchor: Cell::new(Some(Rect::new(100.0, 100.0, 140.0, 120.0))),
            body: Size::new(200.0, 80.0),
        };
        let mut p: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        p.mount(&src);
        src.anchor.set(Some(Rect::new(110.0, 100.0, 150.0, 120.0)));
        assert_eq!(
            p.handle(Trigger::ContentResize, &src),
            Reaction::Recomputed(None)
        );
        assert_eq!(p.placement().map(|pl| pl.rect.x0), Some(160.0));
        assert!(!p.frame_pending());
    }

    #[test]
    fn anchor_click_is_ignored() {
        let l = layout(Some(Rect::new(100.0, 100.0, 140.0, 120.0)));
        let mut p: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        p.mount(&l);
        assert_eq!(
            p.handle(Trigger::Click { on_anchor: true }, &l),
            Reaction::Ignored
        );
        assert!(!p.frame_pending());
    }

    #[test]
    fn keep_position_suppresses_heuristics_and_pins_position() {
        let options = PopoverOptions {
            keep_position: true,
            ..PopoverOptions::default()
        };
        let src = Moving {
            anchor: Cell::new(Some(Rect::new(100.0, 100.0, 140.0, 120.0))),
            body: Size::new(200.0, 80.0),
        };
        let mut p: PopoverPosition<()> = PopoverPosition::new(options);
        p.mount(&src);
        assert_eq!(
            p.handle(Trigger::Click { on_anchor: false }, &src),
            Reaction::Ignored
        );
        assert_eq!(p.handle(Trigger::ArrowKey, &src), Reaction::Ignored);

        // Near the right edge the search would flip to the left; the kept position stays.
        src.anchor.set(Some(Rect::new(700.0, 100.0, 740.0, 120.0)));
        assert_eq!(
            p.handle(Trigger::WindowResize, &src),
            Reaction::FrameScheduled
        );
        p.on_animation_frame(&src);
        assert_eq!(
            p.placement().map(|pl| pl.internal_position),
            Some(InternalPosition::RightTop)
        );
    }

    #[test]
    fn track_key_change_recomputes_once() {
        let l = layout(Some(Rect::new(100.0, 100.0, 140.0, 120.0)));
        let mut p: PopoverPosition<u32> = PopoverPosition::new(PopoverOptions::default());
        p.mount(&l);
        assert!(matches!(
            p.handle(Trigger::TrackKey(1), &l),
            Reaction::Recomputed(_)
        ));
        assert_eq!(p.handle(Trigger::TrackKey(1), &l), Reaction::Ignored);
        assert!(matches!(
            p.handle(Trigger::TrackKey(2), &l),
            Reaction::Recomputed(_)
        ));
    }

    #[test]
    fn scroll_to_fit_respects_hover() {
        let options = PopoverOptions {
            preferred: Direction::Bottom,
            allow_scroll_to_fit: true,
            allow_vertical_overflow: true,
            ..PopoverOptions::default()
        };
        // Bottom-center fits horizontally and vertical overflow is tolerated.
        let l = Layout::new(
            Some(Rect::new(380.0, 560.0, 420.0, 580.0)),
            Size::new(760.0, 100.0),
            VIEWPORT,
        );
        let mut p: PopoverPosition<()> = PopoverPosition::new(options);
        let scroll = p.mount(&l);
        // Panel spans 590..690, so scrolling by 90 reveals it.
        assert_eq!(
            scroll,
            Some(ScrollRequest {
                delta: Vec2::new(0.0, 90.0)
            })
        );

        p.set_opened_by_hover(true);
        assert_eq!(
            p.handle(Trigger::ContentResize, &l),
            Reaction::Recomputed(None)
        );
    }

    #[test]
    fn scroll_never_pushes_top_out_of_view() {
        let tall = Rect::new(0.0, 100.0, 10.0, 900.0);
        assert_eq!(
            scroll_to_fit(tall, VIEWPORT),
            Some(ScrollRequest {
                delta: Vec2::new(0.0, 100.0)
            })
        );
        let above = Rect::new(0.0, -40.0, 10.0, 20.0);
        assert_eq!(
            scroll_to_fit(above, VIEWPORT),
            Some(ScrollRequest {
                delta: Vec2::new(0.0, -40.0)
            })
        );
        assert_eq!(
            scroll_to_fit(Rect::new(0.0, 10.0, 10.0, 20.0), VIEWPORT),
            None
        );
    }

    #[test]
    fn portal_rendering_ignores_container() {
        let container = Rect::new(0.0, 0.0, 300.0, 600.0);
        let anchor = Some(Rect::new(200.0, 100.0, 240.0, 120.0));
        let l = Layout::new(anchor, Size::new(200.0, 80.0), VIEWPORT).with_container(container);

        let mut clipped: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        clipped.mount(&l);
        let mut portal: PopoverPosition<()> = PopoverPosition::new(PopoverOptions {
            render_with_portal: true,
            ..PopoverOptions::default()
        });
        portal.mount(&l);

        assert_eq!(
            portal.placement().map(|pl| pl.internal_position),
            Some(InternalPosition::RightTop)
        );
        assert_ne!(
            clipped.placement().map(|pl| pl.internal_position),
            Some(InternalPosition::RightTop)
        );
    }

    #[test]
    fn unmount_resets() {
        let l = layout(Some(Rect::new(100.0, 100.0, 140.0, 120.0)));
        let mut p: PopoverPosition<()> = PopoverPosition::new(PopoverOptions::default());
        p.mount(&l);
        p.handle(Trigger::Scroll, &l);
        p.unmount();
        assert_eq!(p.state(), PositionState::Uninitialized);
        assert!(!p.frame_pending());
        assert!(p.placement().is_none());
    }
}
