// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag controller: raw pointer and touch input in, machine events and host
//! commands out.
//!
//! The controller sits between a host's input plumbing and the
//! [`DragDropMachine`]. It owns the bookkeeping for listeners and pointer
//! capture, but never touches them directly; instead it returns
//! [`HostCommand`]s for the host to execute. Every command that acquires a
//! resource has a matching release that the controller emits on every path
//! that ends a session:
//!
//! | Acquired on drag start                     | Released on up, cancel and [`abort`] |
//! |--------------------------------------------|----------------------------------------|
//! | [`HostCommand::CapturePointer`] (pointer)  | [`HostCommand::ReleasePointer`]        |
//! | [`HostCommand::ListenSession`]             | [`HostCommand::UnlistenSession`]       |
//!
//! Pointer sessions listen on the dragged item (which holds the capture);
//! touch sessions listen on the document. Touch starts always ask the host to
//! prevent the default action so the page does not scroll under the drag.
//!
//! [`DragController::update`] wires new start targets with
//! [`HostCommand::ListenStart`] and releases nodes that left the list with
//! [`HostCommand::UnlistenStart`].
//!
//! After every transition that changes state, the controller writes the new
//! state path onto the list root through [`ListHost::set_list_state`].
//!
//! [`abort`]: DragController::abort
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_reorder::memory::MemoryList;
//! use understory_reorder::{DragController, HostCommand, InputEvent, InputSource, ReorderConfig};
//!
//! let mut list = MemoryList::new(100.0);
//! let a = list.push(".item", 10.0);
//! let b = list.push(".item", 10.0);
//!
//! let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
//! let wiring = dnd.init(&mut list);
//! assert_eq!(wiring.len(), 2);
//! assert_eq!(list.list_state(), "idle");
//!
//! let source = InputSource::Pointer(1);
//! let node = list.node(a);
//! let down = dnd.handle(&mut list, InputEvent::Down { source, target: node, position: Point::new(50.0, 5.0) });
//! assert!(down.contains(&HostCommand::CapturePointer { node, pointer_id: 1 }));
//!
//! dnd.handle(&mut list, InputEvent::Move { source, position: Point::new(50.0, 15.0) });
//! let up = dnd.handle(&mut list, InputEvent::Up { source });
//! assert!(up.contains(&HostCommand::ReleasePointer { node, pointer_id: 1 }));
//! assert_eq!(list.order(), vec![b, a]);
//! ```

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;
use kurbo::Point;
use smallvec::SmallVec;

use crate::config::ReorderConfig;
use crate::error::SetupError;
use crate::host::ListHost;
use crate::machine::{DragDropMachine, DragEvent, Transition};

/// Which device drives a drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// A pointer-events pointer, by id.
    Pointer(u32),
    /// The first touch point of a touch sequence.
    Touch,
}

/// Raw input, already reduced to a position and a source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent<N> {
    /// Pointer down or touch start on a wired node.
    Down {
        /// Device.
        source: InputSource,
        /// Node that received the press.
        target: N,
        /// Position in viewport coordinates.
        position: Point,
    },
    /// Pointer or touch move.
    Move {
        /// Device.
        source: InputSource,
        /// Position in viewport coordinates.
        position: Point,
    },
    /// Pointer up or touch end.
    Up {
        /// Device.
        source: InputSource,
    },
    /// Pointer cancel, lost capture or touch cancel.
    Cancel {
        /// Device.
        source: InputSource,
    },
}

/// Work the host performs on the controller's behalf.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostCommand<N> {
    /// Listen for pointer down and touch start on `node`.
    ListenStart {
        /// Handle or item.
        node: N,
    },
    /// Stop listening on a node that left the list.
    UnlistenStart {
        /// Handle or item previously passed to [`HostCommand::ListenStart`].
        node: N,
    },
    /// Listen for move and release events for the active session.
    ListenSession {
        /// Device driving the session.
        source: InputSource,
        /// Dragged item.
        node: N,
    },
    /// Stop listening for the session's move and release events.
    UnlistenSession {
        /// Device driving the session.
        source: InputSource,
        /// Dragged item.
        node: N,
    },
    /// Route all events of `pointer_id` to `node`.
    CapturePointer {
        /// Dragged item.
        node: N,
        /// Captured pointer.
        pointer_id: u32,
    },
    /// Undo [`HostCommand::CapturePointer`].
    ReleasePointer {
        /// Dragged item.
        node: N,
        /// Captured pointer.
        pointer_id: u32,
    },
    /// Prevent the default action of the event being handled.
    PreventDefault,
}

/// Commands produced by one input.
pub type Commands<N> = SmallVec<[HostCommand<N>; 4]>;

#[derive(Copy, Clone, Debug)]
struct ActiveInput<N> {
    source: InputSource,
    node: N,
}

/// Translates input into machine events and host commands for one list.
pub struct DragController<H: ListHost> {
    machine: DragDropMachine<H>,
    wired: HashSet<H::Node>,
    started: bool,
    active: Option<ActiveInput<H::Node>>,
}

impl<H: ListHost> fmt::Debug for DragController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragController")
            .field("machine", &self.machine)
            .field("wired", &self.wired.len())
            .field("started", &self.started)
            .field("active", &self.active)
            .finish()
    }
}

impl<H: ListHost> DragController<H> {
    /// Creates a controller, or logs a warning and returns `None` for invalid
    /// configuration.
    #[must_use]
    pub fn new(config: ReorderConfig) -> Option<Self> {
        match Self::try_new(config) {
            Ok(controller) => Some(controller),
            Err(err) => {
                tracing::warn!(%err, "reorderable list disabled");
                None
            }
        }
    }

    /// Creates a controller.
    ///
    /// # Errors
    ///
    /// Returns the [`SetupError`] from [`ReorderConfig::validate`].
    pub fn try_new(config: ReorderConfig) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            machine: DragDropMachine::new(config),
            wired: HashSet::new(),
            started: false,
            active: None,
        })
    }

    /// The underlying machine.
    #[must_use]
    pub fn machine(&self) -> &DragDropMachine<H> {
        &self.machine
    }

    /// Whether [`init`](Self::init) has run.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Wires start listeners and starts accepting input.
    ///
    /// Calling it again is ignored with a warning.
    pub fn init(&mut self, host: &mut H) -> Vec<HostCommand<H::Node>> {
        if self.started {
            tracing::warn!("reorderable list already initialized");
            return Vec::new();
        }
        self.started = true;
        host.set_list_state(self.machine.state().path());
        self.update(host)
    }

    /// Wires start listeners on nodes added since the last call and unwires
    /// nodes that are no longer start targets.
    pub fn update(&mut self, host: &H) -> Vec<HostCommand<H::Node>> {
        let selectors = &self.machine.config().selectors;
        let targets = host.start_targets(&selectors.item, selectors.handle.as_deref());
        let current: HashSet<H::Node> = targets.iter().copied().collect();

        let mut out = Vec::new();
        self.wired.retain(|&node| {
            let keep = current.contains(&node);
            if !keep {
                out.push(HostCommand::UnlistenStart { node });
            }
            keep
        });
        if !out.is_empty() {
            tracing::debug!(count = out.len(), "unwired stale start targets");
        }
        let fresh = targets
            .into_iter()
            .filter(|&node| self.wired.insert(node))
            .map(|node| HostCommand::ListenStart { node });
        out.extend(fresh);
        out
    }

    /// Handles one input event.
    pub fn handle(&mut self, host: &mut H, input: InputEvent<H::Node>) -> Commands<H::Node> {
        let mut out = Commands::new();
        if !self.started {
            return out;
        }
        match input {
            InputEvent::Down {
                source,
                target,
                position,
            } => {
                if source == InputSource::Touch {
                    out.push(HostCommand::PreventDefault);
                }
                if self.active.is_some() {
                    tracing::debug!(?source, "press ignored during an active drag");
                    return out;
                }
                self.send(
                    host,
                    DragEvent::Drag {
                        pointer: position,
                        target,
                    },
                );
                let Some(session) = self.machine.session() else {
                    return out;
                };
                let node = host.item_node(session.dragged_item());
                if let InputSource::Pointer(pointer_id) = source {
                    out.push(HostCommand::CapturePointer { node, pointer_id });
                }
                out.push(HostCommand::ListenSession { source, node });
                self.active = Some(ActiveInput { source, node });
            }
            InputEvent::Move { source, position } => {
                if self.owns(source) {
                    self.send(host, DragEvent::Move { pointer: position });
                }
            }
            InputEvent::Up { source } | InputEvent::Cancel { source } => {
                if self.owns(source) {
                    out = self.end_session(host);
                }
            }
        }
        out
    }

    /// Ends the active session as if it had been dropped.
    ///
    /// Use this when the list goes away or the host must bail out; it releases
    /// everything the session acquired.
    pub fn abort(&mut self, host: &mut H) -> Commands<H::Node> {
        if self.active.is_some() {
            return self.end_session(host);
        }
        if self.machine.state().is_dragging() {
            self.send(host, DragEvent::Drop);
        }
        Commands::new()
    }

    fn owns(&self, source: InputSource) -> bool {
        self.active.is_some_and(|a| a.source == source)
    }

    fn end_session(&mut self, host: &mut H) -> Commands<H::Node> {
        let mut out = Commands::new();
        self.send(host, DragEvent::Drop);
        if let Some(ActiveInput { source, node }) = self.active.take() {
            if let InputSource::Pointer(pointer_id) = source {
                out.push(HostCommand::ReleasePointer { node, pointer_id });
            }
            out.push(HostCommand::UnlistenSession { source, node });
        }
        out
    }

    fn send(&mut self, host: &mut H, event: DragEvent<H::Node>) -> Transition {
        let transition = self.machine.send(host, event);
        if transition.changed() {
            host.set_list_state(transition.to.path());
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryList;
    use alloc::vec;

    #[test]
    fn empty_item_selector_disables_the_list() {
        assert!(DragController::<MemoryList>::new(ReorderConfig::new("")).is_none());
        assert_eq!(
            DragController::<MemoryList>::try_new(ReorderConfig::new(" ")).err(),
            Some(SetupError::EmptyItemSelector)
        );
    }

    #[test]
    fn input_before_init_is_ignored() {
        let mut list = MemoryList::new(100.0);
        let a = list.push(".item", 10.0);
        let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
        let target = list.node(a);
        let out = dnd.handle(
            &mut list,
            InputEvent::Down {
                source: InputSource::Pointer(1),
                target,
                position: Point::new(1.0, 1.0),
            },
        );
        assert!(out.is_empty());
        assert!(!dnd.machine().state().is_dragging());
    }

    #[test]
    fn second_init_wires_nothing() {
        let mut list = MemoryList::new(100.0);
        list.push(".item", 10.0);
        let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
        assert_eq!(dnd.init(&mut list).len(), 1);
        assert!(dnd.init(&mut list).is_empty());
        assert!(dnd.is_started());
    }

    #[test]
    fn update_unwires_removed_nodes() {
        let mut list = MemoryList::new(100.0);
        let a = list.push(".item", 10.0);
        let b = list.push(".item", 10.0);
        let mut dnd = DragController::new(ReorderConfig::new(".item")).unwrap();
        dnd.init(&mut list);

        list.remove(a);
        let c = list.push(".item", 10.0);
        assert_eq!(
            dnd.update(&list),
            vec![
                HostCommand::UnlistenStart { node: list.node(a) },
                HostCommand::ListenStart { node: list.node(c) },
            ]
        );
        assert!(dnd.update(&list).is_empty());

        // Adding a handle moves wiring from the rows to the handles.
        let d = list.push_with_handle(".item", 10.0, ".grip");
        let mut handled =
            DragController::new(ReorderConfig::new(".item").with_handle(".grip")).unwrap();
        handled.init(&mut list);
        assert!(handled.update(&list).is_empty());
        list.remove(d);
        let rewired = handled.update(&list);
        assert_eq!(rewired[0], HostCommand::UnlistenStart { node: list.handle(d) });
        assert_eq!(
            rewired[1..],
            [
                HostCommand::ListenStart { node: list.node(b) },
                HostCommand::ListenStart { node: list.node(c) },
            ]
        );
    }
}
