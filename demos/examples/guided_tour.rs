// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A guided tour whose hotspots come and go with client-side navigation.
//!
//! The tutorial is loaded from JSON. Pages mount their hotspots, the host
//! commits once per render pass, and the tour follows the hotspots around.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p perch_demos --example guided_tour`

use std::cell::RefCell;
use std::rc::Rc;

use perch_annotation::{AnnotationContext, HotspotContent, Tutorial};
use perch_popover::Direction;
use tracing_subscriber::EnvFilter;

const TUTORIAL: &str = r#"{
    "title": "Launch an instance",
    "tasks": [
        {
            "title": "Configure",
            "steps": [
                { "title": "Name", "hotspotId": "name-field", "content": "Give the instance a name." },
                { "title": "Size", "hotspotId": "size-select", "content": "Pick a size.",
                  "warning": "Large sizes are billed hourly." }
            ]
        },
        {
            "title": "Review",
            "steps": [
                { "title": "Launch", "hotspotId": "launch-button", "content": "Launch it." }
            ]
        }
    ]
}"#;

fn show(ctx: &AnnotationContext<String>, ids: &[&str]) {
    for id in ids {
        match ctx.get_content_for_id(id, Direction::Right) {
            Some(HotspotContent::Open(open)) => println!(
                "  [{id}] open: {} | {} | {} | {}{}",
                open.task_title,
                open.step_counter,
                open.title,
                open.content,
                open.warning.map(|w| format!(" (warning: {w})")).unwrap_or_default()
            ),
            Some(HotspotContent::Closed(closed)) => println!("  [{id}] closed: {}", closed.label),
            None => println!("  [{id}] nothing"),
        }
    }
}

fn main() -> Result<(), perch_annotation::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tutorial: Tutorial<String> = Tutorial::from_json(TUTORIAL)?;
    tracing::info!(
        title = tutorial.title.as_str(),
        steps = tutorial.total_step_count(),
        "tutorial loaded"
    );
    let mut ctx = AnnotationContext::new();
    ctx.set_tutorial(Some(tutorial));

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    ctx.on_step_change(move |change| sink.borrow_mut().push(change));
    ctx.on_finish(|| println!("  tutorial finished"));

    let form = ["name-field", "size-select"];
    let review = ["launch-button"];

    println!("form page mounts:");
    for id in form {
        ctx.register_hotspot(id);
    }
    ctx.commit();
    show(&ctx, &form);

    println!("next:");
    ctx.open_next_step();
    show(&ctx, &form);

    println!("navigate to the review page:");
    for id in form {
        ctx.unregister_hotspot(id);
    }
    for id in review {
        ctx.register_hotspot(id);
    }
    if let Some(change) = ctx.commit() {
        println!("  recovered: {change:?}");
    }
    show(&ctx, &review);

    println!("finish:");
    if ctx.is_last_step() {
        ctx.finish();
    }

    println!("step changes: {:?}", changes.borrow());
    Ok(())
}
