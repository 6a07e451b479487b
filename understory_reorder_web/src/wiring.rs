// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser listeners around a [`DragController`].

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Point;
use understory_reorder::{
    DragController, HostCommand, InputEvent, InputSource, ItemId, ListHost, ReorderConfig,
    SetupError,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget, MouseEvent, PointerEvent, TouchEvent};

use crate::list::WebList;

/// An attached event listener, removed on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Option<Self> {
        match target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target,
                kind,
                callback,
            }),
            Err(_) => {
                tracing::warn!(kind, "failed to add event listener");
                None
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Which input a listener reports.
#[derive(Copy, Clone, Debug)]
enum Phase {
    Down(ItemId),
    Move,
    Up,
    Cancel,
}

const POINTER_SESSION: [(&str, Phase); 4] = [
    ("pointermove", Phase::Move),
    ("pointerup", Phase::Up),
    ("pointercancel", Phase::Cancel),
    ("lostpointercapture", Phase::Cancel),
];

const TOUCH_SESSION: [(&str, Phase); 3] = [
    ("touchmove", Phase::Move),
    ("touchend", Phase::Up),
    ("touchcancel", Phase::Cancel),
];

fn source_of(event: &Event) -> Option<InputSource> {
    if let Some(pointer) = event.dyn_ref::<PointerEvent>() {
        return u32::try_from(pointer.pointer_id())
            .ok()
            .map(InputSource::Pointer);
    }
    event.is_instance_of::<TouchEvent>().then_some(InputSource::Touch)
}

fn position_of(event: &Event) -> Option<Point> {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let first = touch.touches().get(0)?;
        return Some(Point::new(
            f64::from(first.client_x()),
            f64::from(first.client_y()),
        ));
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point::new(
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
    ))
}

fn input_of(event: &Event, phase: Phase) -> Option<InputEvent<ItemId>> {
    let source = source_of(event)?;
    Some(match phase {
        Phase::Down(target) => InputEvent::Down {
            source,
            target,
            position: position_of(event)?,
        },
        Phase::Move => InputEvent::Move {
            source,
            position: position_of(event)?,
        },
        Phase::Up => InputEvent::Up { source },
        Phase::Cancel => InputEvent::Cancel { source },
    })
}

struct Shared {
    list: WebList,
    controller: DragController<WebList>,
    start: HashMap<ItemId, Vec<Listener>>,
    session: Vec<Listener>,
    // Listeners detached while one of them was running; dropped on the next event.
    retired: Vec<Listener>,
}

impl Shared {
    fn listen(
        this: &Weak<RefCell<Self>>,
        target: EventTarget,
        kind: &'static str,
        phase: Phase,
    ) -> Option<Listener> {
        let this = this.clone();
        let callback = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
            dispatch(&this, &event, phase);
        }));
        Listener::attach(target, kind, callback)
    }

    fn run(
        &mut self,
        this: &Weak<RefCell<Self>>,
        commands: impl IntoIterator<Item = HostCommand<ItemId>>,
        event: Option<&Event>,
    ) {
        for command in commands {
            match command {
                HostCommand::ListenStart { node } => {
                    let Some(el) = self.list.element(node) else {
                        continue;
                    };
                    let listeners = self.start.entry(node).or_default();
                    for kind in ["pointerdown", "touchstart"] {
                        let target = el.clone().into();
                        if let Some(listener) = Self::listen(this, target, kind, Phase::Down(node)) {
                            listeners.push(listener);
                        }
                    }
                }
                HostCommand::UnlistenStart { node } => {
                    if let Some(mut listeners) = self.start.remove(&node) {
                        self.retired.append(&mut listeners);
                    }
                }
                HostCommand::ListenSession { source, node } => {
                    // Pointer sessions follow the captured item; touches are tracked document-wide.
                    let (target, kinds): (Option<EventTarget>, &[(&str, Phase)]) = match source {
                        InputSource::Pointer(_) => {
                            (self.list.element(node).map(Into::into), &POINTER_SESSION)
                        }
                        InputSource::Touch => {
                            (Some(self.list.document().clone().into()), &TOUCH_SESSION)
                        }
                    };
                    let Some(target) = target else {
                        continue;
                    };
                    for &(kind, phase) in kinds {
                        if let Some(listener) = Self::listen(this, target.clone(), kind, phase) {
                            self.session.push(listener);
                        }
                    }
                }
                HostCommand::UnlistenSession { .. } => {
                    self.retired.append(&mut self.session);
                }
                HostCommand::CapturePointer { node, pointer_id } => {
                    let captured = self
                        .list
                        .element(node)
                        .zip(i32::try_from(pointer_id).ok())
                        .is_some_and(|(el, id)| el.set_pointer_capture(id).is_ok());
                    if !captured {
                        tracing::debug!(%node, pointer_id, "pointer capture unavailable");
                    }
                }
                HostCommand::ReleasePointer { node, pointer_id } => {
                    let element = self.list.element(node);
                    if let (Some(el), Ok(id)) = (element, i32::try_from(pointer_id)) {
                        let _ = el.release_pointer_capture(id);
                    }
                }
                HostCommand::PreventDefault => {
                    if let Some(event) = event {
                        event.prevent_default();
                    }
                }
            }
        }
    }
}

fn dispatch(this: &Weak<RefCell<Shared>>, event: &Event, phase: Phase) {
    let Some(shared) = this.upgrade() else {
        return;
    };
    // Releasing capture can fire `lostpointercapture` synchronously.
    let Ok(mut guard) = shared.try_borrow_mut() else {
        return;
    };
    let state = &mut *guard;
    state.retired.clear();
    let Some(input) = input_of(event, phase) else {
        return;
    };
    let commands = state.controller.handle(&mut state.list, input);
    state.run(this, commands, Some(event));
}

/// A reorderable list wired to the browser.
///
/// Dropping it removes every listener it attached.
pub struct Reorderable {
    shared: Rc<RefCell<Shared>>,
}

impl fmt::Debug for Reorderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Reorderable")
            .field("list", &shared.list)
            .field("controller", &shared.controller)
            .field("start_nodes", &shared.start.len())
            .field("session_listeners", &shared.session.len())
            .finish_non_exhaustive()
    }
}

impl Reorderable {
    /// Wraps `list` with a controller for `config`.
    ///
    /// # Errors
    ///
    /// Returns the configuration's [`SetupError`].
    pub fn new(list: WebList, config: ReorderConfig) -> Result<Self, SetupError> {
        let controller = DragController::try_new(config)?;
        Ok(Self {
            shared: Rc::new(RefCell::new(Shared {
                list,
                controller,
                start: HashMap::new(),
                session: Vec::new(),
                retired: Vec::new(),
            })),
        })
    }

    /// Writes the idle state and starts listening on handles (or items).
    pub fn init(&self) {
        self.with(|state| state.controller.init(&mut state.list));
    }

    /// Starts listening on handles or items added since the last call, and
    /// releases listeners and elements that left the list.
    pub fn update(&self) {
        self.with(|state| {
            state.list.prune();
            state.controller.update(&state.list)
        });
    }

    /// Ends an active drag as if it had been dropped.
    pub fn abort(&self) {
        self.with(|state| state.controller.abort(&mut state.list).into_vec());
    }

    /// Current item order.
    #[must_use]
    pub fn order(&self) -> Vec<ItemId> {
        let state = self.shared.borrow();
        let selector = &state.controller.machine().config().selectors.item;
        state.list.items(selector)
    }

    fn with(&self, f: impl FnOnce(&mut Shared) -> Vec<HostCommand<ItemId>>) {
        let this = Rc::downgrade(&self.shared);
        let Ok(mut guard) = self.shared.try_borrow_mut() else {
            tracing::warn!("reorderable list is busy handling an event");
            return;
        };
        guard.retired.clear();
        let commands = f(&mut *guard);
        guard.run(&this, commands, None);
    }
}

/// Sets up a reorderable list under the element matching `root_selector`.
///
/// Invalid setup is logged as a warning and yields `None`. Call
/// [`Reorderable::init`] on the result to start listening.
#[must_use]
pub fn create_dnd(root_selector: &str, config: ReorderConfig) -> Option<Reorderable> {
    let created =
        WebList::from_selector(root_selector).and_then(|list| Reorderable::new(list, config));
    match created {
        Ok(reorderable) => Some(reorderable),
        Err(err) => {
            tracing::warn!(%err, "reorderable list disabled");
            None
        }
    }
}
