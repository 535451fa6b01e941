// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout probes whose answers never change for the lifetime of the process.
//!
//! Scrollbar gutter size and whether transformed ancestors capture fixed
//! descendants are properties of the platform, not of any page. Both are
//! measured at most once and then served from a process-wide [`Memo`].

use alloc::boxed::Box;
use kurbo::Size;
use once_cell::race::OnceBox;

/// Offset and client box of a probe element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeMetrics {
    /// Border-box size.
    pub offset: Size,
    /// Inner size, excluding scrollbar gutters.
    pub client: Size,
}

/// Host capable of running layout probes.
///
/// Hosts without a document (for example while rendering on a server) return
/// `None` from the probe methods; callers then fall back to neutral values.
pub trait ProbeHost {
    /// Handle to an appended probe element.
    type Probe;

    /// Append an offscreen element with `overflow: scroll` on both axes.
    fn append_scroll_probe(&mut self) -> Option<Self::Probe>;

    /// Measure a probe appended by [`ProbeHost::append_scroll_probe`].
    fn probe_metrics(&self, probe: &Self::Probe) -> Option<ProbeMetrics>;

    /// Remove a probe element.
    fn remove_probe(&mut self, probe: Self::Probe);

    /// Whether a transformed ancestor becomes the containing block of a fixed descendant.
    fn probe_containing_block(&mut self) -> Option<bool>;
}

/// A compute-once cell.
///
/// The first successful probe wins and is kept forever; a failed probe caches
/// nothing, so a later call with a capable host can still fill it.
pub struct Memo<T>(OnceBox<T>);

impl<T: core::fmt::Debug> core::fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Memo").field(&self.get()).finish()
    }
}

impl<T> Memo<T> {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self(OnceBox::new())
    }

    /// Cached value, if any probe has succeeded.
    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    /// Return the cached value, running `probe` only while the cell is empty.
    pub fn get_or_probe(&self, probe: impl FnOnce() -> Option<T>) -> Option<&T> {
        self.0
            .get_or_try_init(|| probe().map(Box::new).ok_or(()))
            .ok()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

static SCROLLBAR_SIZE: Memo<Size> = Memo::new();
static CONTAINING_BLOCK_SUPPORT: Memo<bool> = Memo::new();

/// Measure scrollbar gutters once per process.
///
/// Returns [`Size::ZERO`] when the host cannot probe.
pub fn measure_scrollbar_size<H: ProbeHost + ?Sized>(host: &mut H) -> Size {
    SCROLLBAR_SIZE
        .get_or_probe(|| probe_scrollbar_size(host))
        .copied()
        .unwrap_or(Size::ZERO)
}

/// Whether transformed ancestors capture fixed descendants, probed once per process.
///
/// Returns `false` when the host cannot probe.
pub fn supports_containing_block_positioning<H: ProbeHost + ?Sized>(host: &mut H) -> bool {
    CONTAINING_BLOCK_SUPPORT
        .get_or_probe(|| host.probe_containing_block())
        .copied()
        .unwrap_or(false)
}

/// Run the scrollbar probe without consulting the cache.
///
/// The probe element is always removed again, even when it cannot be measured.
pub fn probe_scrollbar_size<H: ProbeHost + ?Sized>(host: &mut H) -> Option<Size> {
    let probe = host.append_scroll_probe()?;
    let metrics = host.probe_metrics(&probe);
    host.remove_probe(probe);
    let ProbeMetrics { offset, client } = metrics?;
    let size = Size::new(
        (offset.width - client.width).max(0.0),
        (offset.height - client.height).max(0.0),
    );
    tracing::trace!(
        width = size.width,
        height = size.height,
        "measured scrollbar size"
    );
    Some(size)
}
