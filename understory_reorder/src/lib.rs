// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reorder --heading-base-level=0

//! Understory Reorder: drag-to-reorder for lists.
//!
//! A user presses on an item (or its handle), drags it across neighbors and
//! releases it. Every time the dragged item meets a neighbor, the list is
//! reordered immediately, one slot at a time, and the neighbors that moved are
//! animated into place with FLIP compensation. The order at release is final.
//!
//! The crate is split along the seams of that interaction:
//!
//! - [`DragDropMachine`]: the core. An `idle → dragging` machine whose
//!   `dragging` state runs two regions in parallel: a pointer region that keeps
//!   the live offset current, and an element region (`normal ⇄ intersecting`)
//!   that decides when to commit a reorder. See the [`machine`] module.
//! - [`reorder`]: the sequence-shift commit, plus [`reorder_slice`] to mirror a
//!   commit into application data.
//! - [`flip`]: first/last/invert/play compensation for relocated items.
//! - [`geometry`]: midpoints and offset-chain positions.
//! - [`DragController`]: turns pointer and touch input into machine events and
//!   returns [`HostCommand`]s for listener wiring and pointer capture.
//! - [`ListHost`]: the capability trait over the element tree. The machine
//!   never talks to a document directly, which keeps it testable with
//!   [`memory::MemoryList`].
//!
//! ## Visual contract
//!
//! Hosts expose drag feedback to styling through:
//!
//! - the state path on the list root (`idle`, `dragging.element.normal`,
//!   `dragging.element.intersecting`),
//! - a dragging marker on the dragged item,
//! - `--x`/`--y` offset properties on the dragged item (restricted by
//!   [`OffsetAxes`]).
//!
//! ## Minimal example
//!
//! Drag the first of four rows down until it reaches the third row's slot:
//!
//! ```rust
//! use kurbo::Point;
//! use understory_reorder::memory::MemoryList;
//! use understory_reorder::{DragController, InputEvent, InputSource, ReorderConfig};
//!
//! let mut list = MemoryList::new(100.0);
//! let [a, b, c, d] = [(); 4].map(|()| list.push(".item", 10.0));
//!
//! let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
//! dnd.init(&mut list);
//!
//! let source = InputSource::Pointer(7);
//! let target = list.node(a);
//! dnd.handle(&mut list, InputEvent::Down { source, target, position: Point::new(50.0, 5.0) });
//! for y in [8.0, 12.0, 16.0, 22.0, 25.0] {
//!     dnd.handle(&mut list, InputEvent::Move { source, position: Point::new(50.0, y) });
//! }
//! dnd.handle(&mut list, InputEvent::Up { source });
//!
//! assert_eq!(list.order(), vec![b, c, a, d]);
//! assert_eq!(dnd.machine().commits(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod error;
pub mod flip;
pub mod geometry;
pub mod host;
pub mod id;
pub mod machine;
pub mod memory;
pub mod pointer;
pub mod reorder;
pub mod session;

pub use config::{AnchorPolicy, HitPoint, OffsetAxes, ReorderConfig, Selectors};
pub use controller::{Commands, DragController, HostCommand, InputEvent, InputSource};
pub use error::SetupError;
pub use host::{HitItems, ListHost};
pub use id::{ItemId, ItemIdGen};
pub use machine::{DragDropMachine, DragEvent, ElementState, EventKind, MachineState, Transition};
pub use reorder::{CommitReport, reorder_slice};
pub use session::{Direction, DragSession, Intersection};
