// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A popover following its anchor through scrolling and resizing.
//!
//! This example shows how to combine:
//! - `perch_geometry::Document` as an in-memory page with a transformed frame,
//! - the memoized platform probes (scrollbar size, containing-block support),
//! - `perch_popover::MountedPopover` driven by window events.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p perch_demos --example popover_placement`

use std::cell::{Cell, RefCell};

use kurbo::{Rect, Size, Vec2};
use perch_geometry::{
    Document, ElementId, ElementTree, LocalElement, StyleFlags, measure_scrollbar_size,
    supports_containing_block_positioning,
};
use perch_popover::{
    Direction, ElementAnchor, GlobalEvent, Key, Layout, MountedPopover, PopoverOptions,
    WindowEvent, WindowEvents, containing_block_rect,
};
use tracing_subscriber::EnvFilter;

/// A window that just records its listeners.
#[derive(Default)]
struct LoggingWindow {
    next: Cell<u32>,
    live: RefCell<Vec<(u32, GlobalEvent)>>,
}

impl WindowEvents for LoggingWindow {
    type Handle = u32;

    fn add_listener(&self, event: GlobalEvent, capture: bool) -> u32 {
        let id = self.next.get();
        self.next.set(id + 1);
        println!("  + listener {id}: {event:?} (capture: {capture})");
        self.live.borrow_mut().push((id, event));
        id
    }

    fn remove_listener(&self, handle: u32) {
        println!("  - listener {handle}");
        self.live.borrow_mut().retain(|(id, _)| *id != handle);
    }
}

fn layout(
    doc: &Document,
    button: ElementId,
    frame: ElementId,
    transform_support: bool,
) -> Layout<ElementAnchor<'_, Document>> {
    let mut layout = Layout::new(
        ElementAnchor::new(doc, button),
        Size::new(240.0, 120.0),
        doc.viewport(),
    );
    if let Some(block) = containing_block_rect(doc, button, transform_support) {
        layout = layout.with_containing_block(block);
    }
    if let Some(container) = doc.bounding_rect(frame) {
        layout = layout.with_container(container);
    }
    layout
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new(Size::new(1024.0, 768.0));
    let frame = doc.insert(
        None,
        LocalElement {
            rect: Rect::new(40.0, 40.0, 984.0, 2000.0),
            style: StyleFlags::TRANSFORM,
            ..LocalElement::default()
        },
    );
    let button = doc.insert(
        Some(frame),
        LocalElement {
            rect: Rect::new(860.0, 300.0, 940.0, 332.0),
            ..LocalElement::default()
        },
    );

    println!("scrollbar size: {:?}", measure_scrollbar_size(&mut doc));
    let transform_support = supports_containing_block_positioning(&mut doc);
    println!("transformed ancestors contain fixed panels: {transform_support}");

    let window = LoggingWindow::default();
    let options = PopoverOptions {
        preferred: Direction::Right,
        ..PopoverOptions::default()
    };

    println!("mount:");
    let (mut popover, _) = {
        let layout = layout(&doc, button, frame, transform_support);
        MountedPopover::<_, ()>::mount(&window, options, &layout)
    };
    if let Some(placement) = popover.position().placement() {
        println!(
            "  {:?} at {:?}, offset {:?}",
            placement.internal_position, placement.rect, placement.offset
        );
    }

    for step in 1..=3 {
        doc.scroll_by(Vec2::new(0.0, 120.0));
        let layout = layout(&doc, button, frame, transform_support);
        let first = popover.on_window_event(WindowEvent::Scroll, &layout);
        let second = popover.on_window_event(WindowEvent::KeyDown(Key::ArrowDown), &layout);
        println!("scroll {step}: {first:?}, then {second:?}");
        popover.on_animation_frame(&layout);
        if let Some(placement) = popover.position().placement() {
            println!(
                "  {:?} at {:?} (scrollable: {})",
                placement.internal_position, placement.rect, placement.scrollable
            );
        }
    }

    println!("click on the anchor:");
    let layout_now = layout(&doc, button, frame, transform_support);
    println!(
        "  {:?}",
        popover.on_window_event(WindowEvent::Click { on_anchor: true }, &layout_now)
    );

    println!("unmount:");
    let position = popover.unmount();
    println!("  state after unmount: {:?}", position.state());
    println!("live listeners left: {}", window.live.borrow().len());
}
