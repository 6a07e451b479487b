// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-drop state machine.
//!
//! ```text
//! idle ──DRAG──▶ dragging ─────────────────────────────────────┐
//!  ▲             ├─ pointer:  MOVE → update offset            │
//!  │             └─ element:  normal ──MOVE [hit]──▶ intersecting
//!  │                            ▲      (commit)        │  MOVE [hit]: stay
//!  │                            └──── MOVE [no hit] ───┘
//!  └──────────────────────────DROP─────────────────────────────┘
//! ```
//!
//! `dragging` has two regions that see every `MOVE`. The pointer region always
//! updates the live offset. The element region owns the reorder guard: only the
//! `normal → intersecting` edge commits, so a neighbor that stays under the hit
//! point is committed at most once, and the guard re-arms as soon as a move finds
//! no neighbor. There is no debouncing; every qualifying edge commits.
//!
//! `DROP` leaves both regions at once and always runs cleanup. Events that have
//! no transition in the current state are ignored. Resolution failures (target
//! outside an item, item missing from the snapshot, no geometry) turn the event
//! into a no-op and are reported through `tracing`.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_reorder::memory::MemoryList;
//! use understory_reorder::{DragDropMachine, DragEvent, ReorderConfig};
//!
//! let mut list = MemoryList::new(100.0);
//! let a = list.push(".item", 10.0);
//! let b = list.push(".item", 10.0);
//!
//! let mut machine = DragDropMachine::new(ReorderConfig::new(".item"));
//! let target = list.node(a);
//! machine.send(&mut list, DragEvent::Drag { pointer: Point::new(50.0, 5.0), target });
//! assert_eq!(machine.state().path(), "dragging.element.normal");
//!
//! let step = machine.send(&mut list, DragEvent::Move { pointer: Point::new(50.0, 15.0) });
//! assert!(step.commit.is_some());
//! assert_eq!(list.order(), vec![b, a]);
//!
//! machine.send(&mut list, DragEvent::Drop);
//! assert!(machine.session().is_none());
//! ```

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::config::{HitPoint, ReorderConfig};
use crate::geometry::rect_mid;
use crate::host::ListHost;
use crate::pointer::PointerTrack;
use crate::reorder::{self, CommitReport};
use crate::session::DragSession;

/// State of the element region while dragging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// No neighbor has been committed against since the guard last failed.
    Normal,
    /// A neighbor was committed and the hit point still finds one.
    Intersecting,
}

/// Top-level machine state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MachineState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging(ElementState),
}

impl MachineState {
    /// Dotted state path written onto the list root for styling.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(ElementState::Normal) => "dragging.element.normal",
            Self::Dragging(ElementState::Intersecting) => "dragging.element.intersecting",
        }
    }

    /// Every active state node, parents first, parallel regions included.
    #[must_use]
    pub fn to_strings(self) -> SmallVec<[&'static str; 4]> {
        let mut out = SmallVec::new();
        match self {
            Self::Idle => out.push("idle"),
            Self::Dragging(element) => {
                out.push("dragging");
                out.push("dragging.element");
                out.push(Self::Dragging(element).path());
                out.push("dragging.pointer");
            }
        }
        out
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

/// Event kinds, as named in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Drag start.
    Drag,
    /// Pointer move.
    Move,
    /// Release.
    Drop,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Drag => "DRAG",
            Self::Move => "MOVE",
            Self::Drop => "DROP",
        })
    }
}

/// Input to the machine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragEvent<N> {
    /// Press on an item or handle.
    Drag {
        /// Pointer position in viewport coordinates.
        pointer: Point,
        /// The node that received the press.
        target: N,
    },
    /// Pointer moved.
    Move {
        /// Pointer position in viewport coordinates.
        pointer: Point,
    },
    /// Pointer released.
    Drop,
}

impl<N: Copy> DragEvent<N> {
    /// The event's kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Drag { .. } => EventKind::Drag,
            Self::Move { .. } => EventKind::Move,
            Self::Drop => EventKind::Drop,
        }
    }

    /// Asserts that this event is of kind `expected`.
    ///
    /// # Panics
    ///
    /// Panics on mismatch. A mismatch means the caller and the machine are out
    /// of sync, which is a bug rather than a runtime condition.
    #[track_caller]
    pub fn assert_kind(&self, expected: EventKind) {
        let got = self.kind();
        assert!(
            got == expected,
            "invalid event: expected \"{expected}\", got \"{got}\""
        );
    }

    #[track_caller]
    fn expect_drag(&self) -> (Point, N) {
        self.assert_kind(EventKind::Drag);
        match *self {
            Self::Drag { pointer, target } => (pointer, target),
            _ => unreachable!(),
        }
    }

    #[track_caller]
    fn expect_move(&self) -> Point {
        self.assert_kind(EventKind::Move);
        match *self {
            Self::Move { pointer } => pointer,
            _ => unreachable!(),
        }
    }
}

/// What one [`DragDropMachine::send`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State before the event.
    pub from: MachineState,
    /// State after the event.
    pub to: MachineState,
    /// The reorder commit this event triggered, if any.
    pub commit: Option<CommitReport>,
}

impl Transition {
    /// Whether the state changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    fn stay(state: MachineState) -> Self {
        Self {
            from: state,
            to: state,
            commit: None,
        }
    }
}

/// Drag-drop state machine over a [`ListHost`].
///
/// The machine does not own the host; every [`send`](Self::send) borrows it
/// for the duration of one synchronous transition.
pub struct DragDropMachine<H: ListHost> {
    config: ReorderConfig,
    state: MachineState,
    session: Option<DragSession<H::Item, H::Node>>,
    commits: u64,
}

impl<H: ListHost> fmt::Debug for DragDropMachine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropMachine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("session", &self.session)
            .field("commits", &self.commits)
            .finish()
    }
}

impl<H: ListHost> DragDropMachine<H> {
    /// Creates an idle machine.
    #[must_use]
    pub fn new(config: ReorderConfig) -> Self {
        Self {
            config,
            state: MachineState::Idle,
            session: None,
            commits: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MachineState {
        self.state
    }

    /// The active session, present exactly while dragging.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<H::Item, H::Node>> {
        self.session.as_ref()
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Total number of commits since the machine was created.
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Feeds one event through the machine.
    pub fn send(&mut self, host: &mut H, event: DragEvent<H::Node>) -> Transition {
        let from = self.state;
        match (from, event) {
            (MachineState::Idle, DragEvent::Drag { .. }) => {
                if self.set_dragging(host, &event) {
                    self.state = MachineState::Dragging(ElementState::Normal);
                }
                Transition {
                    from,
                    to: self.state,
                    commit: None,
                }
            }
            (MachineState::Dragging(element), DragEvent::Move { .. }) => {
                let intersecting = self.update_coords(host, &event);
                let (next, commit) = match (element, intersecting) {
                    (ElementState::Normal, true) => {
                        (ElementState::Intersecting, self.commit_reorder(host))
                    }
                    (ElementState::Intersecting, true) => (ElementState::Intersecting, None),
                    (_, false) => (ElementState::Normal, None),
                };
                self.state = MachineState::Dragging(next);
                Transition {
                    from,
                    to: self.state,
                    commit,
                }
            }
            (MachineState::Dragging(_), DragEvent::Drop) => {
                self.clear_dragging(host);
                self.state = MachineState::Idle;
                Transition {
                    from,
                    to: self.state,
                    commit: None,
                }
            }
            (state, event) => {
                tracing::debug!(state = state.path(), event = %event.kind(), "event ignored");
                Transition::stay(state)
            }
        }
    }

    /// `DRAG` action: resolve the item, snapshot the list, anchor the pointer.
    ///
    /// Returns `false` when the drag cannot start.
    fn set_dragging(&mut self, host: &mut H, event: &DragEvent<H::Node>) -> bool {
        let (pointer, target) = event.expect_drag();
        let selectors = self.config.selectors.clone();

        let Some(item) = host.closest_item(target, &selectors.item) else {
            tracing::warn!(?target, "drag target is not inside a list item");
            return false;
        };
        // Items without a handle are wired as their own start targets.
        let reference = selectors
            .handle
            .as_deref()
            .and_then(|handle| host.find_handle(item, handle))
            .unwrap_or_else(|| host.item_node(item));
        let ordered_items = host.items(&selectors.item);
        let Some(dragged_index) = ordered_items.iter().position(|&i| i == item) else {
            tracing::warn!(?item, "dragged item is not part of the list");
            return false;
        };
        let Some(mid) = rect_mid(host.layout_rect(reference)) else {
            tracing::warn!(?reference, "drag reference has no geometry");
            return false;
        };

        let track = PointerTrack::start(pointer, mid, self.config.anchor);
        let offset = track.offset();
        host.set_drag_marker(item, true);
        host.set_drag_offset(item, Some(self.config.axes.mask(offset)), self.config.axes);
        tracing::debug!(?item, dragged_index, "drag started");

        self.session = Some(DragSession {
            dragged_item: item,
            reference,
            track,
            current_offset: offset,
            ordered_items,
            dragged_index,
            intersecting: None,
            last_target: None,
            selectors,
        });
        true
    }

    /// `MOVE` action for both regions. Returns the guard.
    fn update_coords(&mut self, host: &mut H, event: &DragEvent<H::Node>) -> bool {
        let pointer = event.expect_move();
        let axes = self.config.axes;
        let hit_point = self.config.hit_point;
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let offset = session.track.update(pointer);
        session.current_offset = offset;
        host.set_drag_offset(session.dragged_item, Some(axes.mask(offset)), axes);

        let probe = match hit_point {
            HitPoint::Pointer => Some(pointer),
            HitPoint::ItemCenter => {
                rect_mid(host.layout_rect(host.item_node(session.dragged_item)))
                    .map(|mid| mid + offset)
            }
        };
        let Some(probe) = probe else {
            session.intersecting = None;
            return false;
        };
        let hits = host.items_at(probe, &session.selectors.item);
        session.observe_hits(&hits).is_some()
    }

    fn commit_reorder(&mut self, host: &mut H) -> Option<CommitReport> {
        let session = self.session.as_mut()?;
        let report = reorder::commit(host, session, &self.config)?;
        self.commits += 1;
        Some(report)
    }

    /// `DROP` action: clear the visual contract and forget the session.
    fn clear_dragging(&mut self, host: &mut H) {
        if let Some(session) = self.session.take() {
            host.set_drag_offset(session.dragged_item, None, self.config.axes);
            host.set_drag_marker(session.dragged_item, false);
            tracing::debug!(
                item = ?session.dragged_item,
                index = session.dragged_index,
                "drag dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_paths() {
        assert_eq!(MachineState::Idle.path(), "idle");
        assert_eq!(
            MachineState::Dragging(ElementState::Intersecting).path(),
            "dragging.element.intersecting"
        );
        assert!(!MachineState::default().is_dragging());
    }

    #[test]
    fn to_strings_lists_parallel_regions() {
        let strings = MachineState::Dragging(ElementState::Normal).to_strings();
        assert_eq!(
            strings.as_slice(),
            &[
                "dragging",
                "dragging.element",
                "dragging.element.normal",
                "dragging.pointer"
            ]
        );
        assert_eq!(MachineState::Idle.to_strings().as_slice(), &["idle"]);
    }

    #[test]
    fn assert_kind_accepts_matching_events() {
        DragEvent::<u32>::Move {
            pointer: Point::ZERO,
        }
        .assert_kind(EventKind::Move);
    }

    #[test]
    #[should_panic(expected = "invalid event: expected \"MOVE\", got \"DROP\"")]
    fn assert_kind_rejects_mismatched_events() {
        DragEvent::<u32>::Drop.assert_kind(EventKind::Move);
    }
}
