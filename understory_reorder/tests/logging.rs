// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics emitted through `tracing`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use kurbo::Point;
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use understory_reorder::memory::MemoryList;
use understory_reorder::{
    DragController, DragDropMachine, DragEvent, InputEvent, InputSource, ReorderConfig,
};

#[derive(Clone, Debug)]
struct Captured {
    level: Level,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Captured>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let message = fields.0.remove("message").unwrap_or_default();
        self.0.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message,
            fields: fields.0,
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<Captured> {
    let layer = Capture::default();
    let events = layer.0.clone();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

fn find<'a>(events: &'a [Captured], message: &str) -> &'a Captured {
    events
        .iter()
        .find(|e| e.message == message)
        .unwrap_or_else(|| panic!("no {message:?} event in {events:#?}"))
}

#[test]
fn invalid_setup_warns_with_the_error() {
    let events = capture(|| {
        assert!(DragController::<MemoryList>::new(ReorderConfig::new("  ")).is_none());
    });
    let event = find(&events, "reorderable list disabled");
    assert_eq!(event.level, Level::WARN);
    assert_eq!(event.fields["err"], "expected a non-empty list item selector");
}

#[test]
fn second_init_warns() {
    let events = capture(|| {
        let mut list = MemoryList::new(100.0);
        list.push(".item", 10.0);
        let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
        dnd.init(&mut list);
        dnd.init(&mut list);
    });
    let event = find(&events, "reorderable list already initialized");
    assert_eq!(event.level, Level::WARN);
}

#[test]
fn press_outside_an_item_warns() {
    let events = capture(|| {
        let mut list = MemoryList::new(100.0);
        list.push(".item", 10.0);
        let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
        dnd.init(&mut list);
        let target = list.detached_node();
        dnd.handle(
            &mut list,
            InputEvent::Down {
                source: InputSource::Pointer(1),
                target,
                position: Point::new(5.0, 5.0),
            },
        );
    });
    let event = find(&events, "drag target is not inside a list item");
    assert_eq!(event.level, Level::WARN);
}

#[test]
fn commits_are_logged_at_debug() {
    let events = capture(|| {
        let mut list = MemoryList::new(100.0);
        let a = list.push(".item", 10.0);
        list.push(".item", 10.0);
        let mut machine = DragDropMachine::new(ReorderConfig::new(".item"));
        let target = list.node(a);
        machine.send(
            &mut list,
            DragEvent::Drag {
                pointer: Point::new(50.0, 5.0),
                target,
            },
        );
        machine.send(
            &mut list,
            DragEvent::Move {
                pointer: Point::new(50.0, 12.0),
            },
        );
    });
    let commit = find(&events, "committed reorder");
    assert_eq!(commit.level, Level::DEBUG);
    assert_eq!(commit.fields["from"], "0");
    assert_eq!(commit.fields["to"], "1");
    assert_eq!(commit.fields["shifted"], "1");
}

#[test]
fn ignored_events_name_the_state_and_event() {
    let events = capture(|| {
        let mut list = MemoryList::new(100.0);
        let mut machine = DragDropMachine::<MemoryList>::new(ReorderConfig::new(".item"));
        machine.send(&mut list, DragEvent::Drop);
    });
    let ignored = find(&events, "event ignored");
    assert_eq!(ignored.fields["state"], "idle");
    assert_eq!(ignored.fields["event"], "DROP");
}
