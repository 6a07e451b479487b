// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reorder_web --heading-base-level=0

//! DOM host for `understory_reorder`.
//!
//! When targeting `wasm32`, this crate provides `WebList`, a `ListHost` over
//! a DOM subtree, and `Reorderable`, which wires browser listeners to a
//! `DragController` and executes the commands it returns.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn setup() {
//!     use understory_reorder::ReorderConfig;
//!
//!     let config = ReorderConfig::new(".js-item").with_handle(".js-handle");
//!     if let Some(list) = understory_reorder_web::create_dnd(".js-list", config) {
//!         list.init();
//!         // Keep `list` alive for as long as the list should stay reorderable.
//!         core::mem::forget(list);
//!     }
//! }
//! ```
//!
//! Notes:
//! - Items and handles get a `data-reorder-id` attribute the first time they
//!   are seen. Ids are stable for the element's lifetime.
//! - The list root's `data-state` carries the state path; the dragged item
//!   gets `data-state="dragging"` and `--x`/`--y` custom properties.
//! - Pointer sessions capture the pointer on the dragged item and listen
//!   there. Touch sessions listen on the document.
//! - FLIP compensation is an inline `transform` with transitions disabled,
//!   removed on the next animation frame so stylesheet transitions take over.
//!
//! The [`style`] module is target independent.

#![no_std]

extern crate alloc;

pub mod style;

#[cfg(target_arch = "wasm32")]
mod list;
#[cfg(target_arch = "wasm32")]
mod wiring;

#[cfg(target_arch = "wasm32")]
pub use list::WebList;
#[cfg(target_arch = "wasm32")]
pub use wiring::{Reorderable, create_dnd};
