// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Preferred directions, internal positions, and their priority order.

use serde::{Deserialize, Serialize};

/// Side of the anchor the caller would like the panel on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Above the anchor.
    Top,
    /// Right of the anchor.
    #[default]
    Right,
    /// Below the anchor.
    Bottom,
    /// Left of the anchor.
    Left,
}

/// One of the ten normalized direction + alignment values a placement can take.
///
/// The first word is the side of the anchor the panel sits on. The second is
/// the direction the panel extends along that side, away from the arrow:
/// `TopRight` sits above the anchor and grows to the right, `RightBottom`
/// sits right of the anchor and grows downwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InternalPosition {
    /// Right of the anchor, extending downwards.
    RightTop,
    /// Right of the anchor, extending upwards.
    RightBottom,
    /// Left of the anchor, extending downwards.
    LeftTop,
    /// Left of the anchor, extending upwards.
    LeftBottom,
    /// Above the anchor, centered.
    TopCenter,
    /// Above the anchor, extending to the right.
    TopRight,
    /// Above the anchor, extending to the left.
    TopLeft,
    /// Below the anchor, centered.
    BottomCenter,
    /// Below the anchor, extending to the right.
    BottomRight,
    /// Below the anchor, extending to the left.
    BottomLeft,
}

impl InternalPosition {
    /// Every internal position.
    pub const ALL: [Self; 10] = [
        Self::RightTop,
        Self::RightBottom,
        Self::LeftTop,
        Self::LeftBottom,
        Self::TopCenter,
        Self::TopRight,
        Self::TopLeft,
        Self::BottomCenter,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Side of the anchor this position sits on.
    pub fn direction(self) -> Direction {
        match self {
            Self::RightTop | Self::RightBottom => Direction::Right,
            Self::LeftTop | Self::LeftBottom => Direction::Left,
            Self::TopCenter | Self::TopRight | Self::TopLeft => Direction::Top,
            Self::BottomCenter | Self::BottomRight | Self::BottomLeft => Direction::Bottom,
        }
    }

    /// Whether the panel sits above or below the anchor.
    pub fn is_vertical(self) -> bool {
        matches!(self.direction(), Direction::Top | Direction::Bottom)
    }
}

use InternalPosition as P;

const TOP: [InternalPosition; 10] = [
    P::TopCenter,
    P::TopRight,
    P::TopLeft,
    P::BottomCenter,
    P::BottomRight,
    P::BottomLeft,
    P::RightTop,
    P::RightBottom,
    P::LeftTop,
    P::LeftBottom,
];

const BOTTOM: [InternalPosition; 10] = [
    P::BottomCenter,
    P::BottomRight,
    P::BottomLeft,
    P::TopCenter,
    P::TopRight,
    P::TopLeft,
    P::RightTop,
    P::RightBottom,
    P::LeftTop,
    P::LeftBottom,
];

const RIGHT: [InternalPosition; 10] = [
    P::RightTop,
    P::RightBottom,
    P::LeftTop,
    P::LeftBottom,
    P::BottomCenter,
    P::TopCenter,
    P::BottomLeft,
    P::TopLeft,
    P::BottomRight,
    P::TopRight,
];

const LEFT: [InternalPosition; 10] = [
    P::LeftTop,
    P::LeftBottom,
    P::RightTop,
    P::RightBottom,
    P::BottomCenter,
    P::TopCenter,
    P::BottomLeft,
    P::TopLeft,
    P::BottomRight,
    P::TopRight,
];

/// Candidate order tried for a preferred direction.
///
/// The preferred side comes first, then the opposite side on the same axis,
/// then the cross axis. This is what makes ties favor the preferred axis.
pub fn priority(direction: Direction) -> &'static [InternalPosition; 10] {
    match direction {
        Direction::Top => &TOP,
        Direction::Bottom => &BOTTOM,
        Direction::Right => &RIGHT,
        Direction::Left => &LEFT,
    }
}
