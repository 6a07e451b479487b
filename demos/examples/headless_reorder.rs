// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless drag-to-reorder.
//!
//! Drives a [`DragController`] over an in-memory list with scripted pointer
//! and touch gestures, printing the list after every event that changes it.
//!
//! Run:
//! - `cargo run -p understory_reorder_demos --example headless_reorder`
//! - `RUST_LOG=understory_reorder=debug cargo run -p understory_reorder_demos --example headless_reorder`

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use understory_reorder::memory::{HANDLE_WIDTH, MemoryList, MemoryNode};
use understory_reorder::{DragController, HostCommand, InputEvent, InputSource, ReorderConfig};
use understory_reorder_demos::{LabeledList, drag_path};

const ROW: f64 = 24.0;

fn row_center(index: usize) -> f64 {
    ROW * index as f64 + ROW / 2.0
}

fn gesture(
    rows: &mut LabeledList,
    dnd: &mut DragController<MemoryList>,
    source: InputSource,
    label: &str,
    to_row: usize,
) {
    let Some(id) = rows.id(label) else {
        println!("no row labeled {label:?}");
        return;
    };
    let Some(from_row) = rows.list.order().iter().position(|&i| i == id) else {
        return;
    };
    let grab = Point::new(HANDLE_WIDTH / 2.0, row_center(from_row));
    let drop = Point::new(grab.x, row_center(to_row));
    println!("\n{source:?}: drag {label:?} from row {from_row} to row {to_row}");

    let target = rows.list.handle(id);
    let commands = dnd.handle(
        &mut rows.list,
        InputEvent::Down {
            source,
            target,
            position: grab,
        },
    );
    print_commands(&commands);
    println!("  {}", rows.render());

    let mut last = rows.render();
    for position in drag_path(grab, drop, 12) {
        dnd.handle(&mut rows.list, InputEvent::Move { source, position });
        let now = rows.render();
        if now != last {
            println!("  {now}");
            last = now;
        }
        // One animation frame per move.
        rows.list.run_frame();
    }

    let commands = dnd.handle(&mut rows.list, InputEvent::Up { source });
    print_commands(&commands);
    println!("  {}", rows.render());
}

fn print_commands(commands: &[HostCommand<MemoryNode>]) {
    for command in commands {
        println!("  -> {command:?}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rows = LabeledList::with_handles(
        ".task",
        ".grip",
        320.0,
        ROW,
        &["inbox", "draft", "review", "ship", "celebrate"],
    );
    let config = ReorderConfig::new(".task").with_handle(".grip");
    let Some(mut dnd) = DragController::new(config) else {
        return;
    };

    let wiring = dnd.init(&mut rows.list);
    println!("wired {} handles", wiring.len());
    println!("  {}", rows.render());

    gesture(&mut rows, &mut dnd, InputSource::Pointer(1), "inbox", 3);
    gesture(&mut rows, &mut dnd, InputSource::Touch, "celebrate", 0);

    println!(
        "\nfinal order: {:?} after {} commits",
        rows.labels(),
        dnd.machine().commits()
    );
}
