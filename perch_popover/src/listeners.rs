// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global window listeners tied to a popover's mount lifetime.

use core::fmt;

use smallvec::SmallVec;

use crate::options::PopoverOptions;
use crate::tracker::{LayoutSource, PopoverPosition, Reaction, ScrollRequest, Trigger};

/// Window-level events a mounted popover listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GlobalEvent {
    /// Window resize.
    Resize,
    /// Any scroll, observed in the capture phase.
    Scroll,
    /// Any click.
    Click,
    /// Any key press.
    KeyDown,
}

impl GlobalEvent {
    /// The events one popover registers, with their capture flag.
    pub const MOUNTED: [(Self, bool); 4] = [
        (Self::Resize, false),
        (Self::Scroll, true),
        (Self::Click, false),
        (Self::KeyDown, false),
    ];
}

/// Host hook for adding and removing window listeners.
///
/// Methods take `&self`; hosts are expected to use interior mutability, as a
/// browser window does.
pub trait WindowEvents {
    /// Opaque registration handle.
    type Handle;

    /// Start delivering `event` to the popover.
    fn add_listener(&self, event: GlobalEvent, capture: bool) -> Self::Handle;

    /// Stop delivering the event registered under `handle`.
    fn remove_listener(&self, handle: Self::Handle);
}

/// The listeners registered for one mounted popover.
///
/// Dropping the set removes exactly the listeners it added, also when the
/// drop happens during unwinding.
pub struct ListenerSet<'w, W: WindowEvents + ?Sized> {
    window: &'w W,
    handles: SmallVec<[W::Handle; 4]>,
}

impl<'w, W: WindowEvents + ?Sized> ListenerSet<'w, W> {
    /// Register every event in [`GlobalEvent::MOUNTED`].
    pub fn register(window: &'w W) -> Self {
        let handles = GlobalEvent::MOUNTED
            .iter()
            .map(|&(event, capture)| window.add_listener(event, capture))
            .collect();
        Self { window, handles }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<W: WindowEvents + ?Sized> Drop for ListenerSet<'_, W> {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            self.window.remove_listener(handle);
        }
    }
}

impl<W: WindowEvents + ?Sized> fmt::Debug for ListenerSet<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("registered", &self.handles.len())
            .finish_non_exhaustive()
    }
}

/// A key as far as repositioning is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Anything else.
    Other,
}

impl Key {
    /// Whether this is one of the four arrow keys.
    pub fn is_arrow(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// An event delivered by one of the registered window listeners.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window resized.
    Resize,
    /// Something scrolled.
    Scroll,
    /// A click.
    Click {
        /// Whether the click target is the anchor.
        on_anchor: bool,
    },
    /// A key press.
    KeyDown(Key),
}

/// A [`PopoverPosition`] together with its window listeners.
pub struct MountedPopover<'w, W: WindowEvents + ?Sized, K> {
    position: PopoverPosition<K>,
    listeners: ListenerSet<'w, W>,
}

impl<'w, W: WindowEvents + ?Sized, K: PartialEq> MountedPopover<'w, W, K> {
    /// Register listeners on `window` and compute the first placement.
    pub fn mount(
        window: &'w W,
        options: PopoverOptions,
        source: &dyn LayoutSource,
    ) -> (Self, Option<ScrollRequest>) {
        let listeners = ListenerSet::register(window);
        let mut position = PopoverPosition::new(options);
        let scroll = position.mount(source);
        (
            Self {
                position,
                listeners,
            },
            scroll,
        )
    }

    /// Placement state.
    pub fn position(&self) -> &PopoverPosition<K> {
        &self.position
    }

    /// Mutable placement state, for hover tracking and direct triggers.
    pub fn position_mut(&mut self) -> &mut PopoverPosition<K> {
        &mut self.position
    }

    /// Listener registrations held by this popover.
    pub fn listeners(&self) -> &ListenerSet<'w, W> {
        &self.listeners
    }

    /// Translate a window event into a trigger and handle it.
    pub fn on_window_event(&mut self, event: WindowEvent, source: &dyn LayoutSource) -> Reaction {
        let trigger = match event {
            WindowEvent::Resize => Trigger::WindowResize,
            WindowEvent::Scroll => Trigger::Scroll,
            WindowEvent::Click { on_anchor } => Trigger::Click { on_anchor },
            WindowEvent::KeyDown(key) if key.is_arrow() => Trigger::ArrowKey,
            WindowEvent::KeyDown(_) => return Reaction::Ignored,
        };
        self.position.handle(trigger, source)
    }

    /// Forward a trigger that does not come from the window.
    pub fn handle(&mut self, trigger: Trigger<K>, source: &dyn LayoutSource) -> Reaction {
        self.position.handle(trigger, source)
    }

    /// Run a scheduled recompute.
    pub fn on_animation_frame(&mut self, source: &dyn LayoutSource) -> Option<ScrollRequest> {
        self.position.on_animation_frame(source)
    }

    /// Remove the listeners and return the unmounted placement state.
    pub fn unmount(self) -> PopoverPosition<K> {
        let Self {
            mut position,
            listeners,
        } = self;
        drop(listeners);
        position.unmount();
        position
    }
}

impl<W: WindowEvents + ?Sized, K: fmt::Debug> fmt::Debug for MountedPopover<'_, W, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedPopover")
            .field("position", &self.position)
            .field("listeners", &self.listeners)
            .finish()
    }
}
