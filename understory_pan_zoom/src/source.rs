// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events and the event-source capability listeners attach to.
//!
//! [`InputEventSource`] is the seam between the host's event loop and
//! [`PanZoom`](crate::PanZoom). Hosts wrap whatever delivers their pointer
//! input; [`LocalEventSource`] is an in-memory implementation that the host
//! (or a test) feeds by calling [`LocalEventSource::dispatch`].

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::Point;

/// Pointer or wheel input, with positions in the host's coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A pointer button was pressed.
    PointerDown(Point),
    /// The pointer moved.
    PointerMove(Point),
    /// A pointer button was released.
    PointerUp(Point),
    /// The wheel turned while the pointer was at `position`.
    Wheel {
        /// Pointer position.
        position: Point,
        /// Vertical wheel delta; negative values scroll up/away.
        delta_y: f64,
    },
}

impl InputEvent {
    /// The kind listeners subscribe to for this event.
    #[must_use]
    pub fn kind(&self) -> InputEventKind {
        match self {
            Self::PointerDown(_) => InputEventKind::PointerDown,
            Self::PointerMove(_) => InputEventKind::PointerMove,
            Self::PointerUp(_) => InputEventKind::PointerUp,
            Self::Wheel { .. } => InputEventKind::Wheel,
        }
    }

    /// Pointer position carried by the event.
    #[must_use]
    pub fn position(&self) -> Point {
        match *self {
            Self::PointerDown(p) | Self::PointerMove(p) | Self::PointerUp(p) => p,
            Self::Wheel { position, .. } => position,
        }
    }

    /// Multiplies the position by `ratio`. Wheel deltas are left alone.
    #[must_use]
    pub fn scaled(self, ratio: f64) -> Self {
        let scale = |p: Point| Point::new(p.x * ratio, p.y * ratio);
        match self {
            Self::PointerDown(p) => Self::PointerDown(scale(p)),
            Self::PointerMove(p) => Self::PointerMove(scale(p)),
            Self::PointerUp(p) => Self::PointerUp(scale(p)),
            Self::Wheel { position, delta_y } => Self::Wheel {
                position: scale(position),
                delta_y,
            },
        }
    }
}

/// Event type a listener is registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputEventKind {
    /// [`InputEvent::PointerDown`].
    PointerDown,
    /// [`InputEvent::PointerMove`].
    PointerMove,
    /// [`InputEvent::PointerUp`].
    PointerUp,
    /// [`InputEvent::Wheel`].
    Wheel,
}

/// Per-registration listener options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// A passive listener promises not to cancel the default action; its
    /// [`EventResponse::PreventDefault`] is ignored.
    pub passive: bool,
}

/// What a listener asks the host to do with the event's default action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventResponse {
    /// Let the host perform its default handling (e.g. page scrolling).
    #[default]
    Continue,
    /// Suppress the host's default handling.
    PreventDefault,
}

/// Handle for one registration on an [`InputEventSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback invoked for each matching event.
pub type Listener = Rc<dyn Fn(&InputEvent) -> EventResponse>;

/// Something listeners can be attached to and detached from.
///
/// Methods take `&self`: implementations are handles onto a shared target,
/// in the same way a DOM `EventTarget` is.
pub trait InputEventSource {
    /// Registers `listener` for events of `kind`.
    fn add_listener(
        &self,
        kind: InputEventKind,
        listener: Listener,
        options: ListenerOptions,
    ) -> ListenerId;

    /// Removes a registration. Unknown or already-removed ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// A record of one registration, kept so it can be torn down later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerRegistration {
    /// Event type the listener was registered for.
    pub kind: InputEventKind,
    /// Id returned by the source.
    pub id: ListenerId,
    /// Options the listener was registered with.
    pub options: ListenerOptions,
}

struct Entry {
    id: ListenerId,
    kind: InputEventKind,
    listener: Listener,
    options: ListenerOptions,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// In-memory event source.
///
/// Clones share the same listener list. Listeners run in registration order.
#[derive(Clone, Default)]
pub struct LocalEventSource {
    registry: Rc<RefCell<Registry>>,
}

impl LocalEventSource {
    /// Creates a source with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The calling thread's shared source.
    ///
    /// This stands in for a document-level event target: every call on the
    /// same thread returns a handle onto the same listener list.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn ambient() -> Self {
        std::thread_local! {
            static AMBIENT: LocalEventSource = LocalEventSource::new();
        }
        AMBIENT.with(|source| source.clone())
    }

    /// Delivers `event` to every listener registered for its kind.
    ///
    /// Returns [`EventResponse::PreventDefault`] if any non-passive listener
    /// asked for it.
    pub fn dispatch(&self, event: &InputEvent) -> EventResponse {
        let kind = event.kind();
        // Snapshot first so listeners may add or remove registrations.
        let targets: Vec<(Listener, ListenerOptions)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| (entry.listener.clone(), entry.options))
            .collect();

        let mut response = EventResponse::Continue;
        for (listener, options) in targets {
            if listener(event) == EventResponse::PreventDefault && !options.passive {
                response = EventResponse::PreventDefault;
            }
        }
        response
    }

    /// Total number of live registrations.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Number of live registrations for `kind`.
    #[must_use]
    pub fn listener_count_for(&self, kind: InputEventKind) -> usize {
        self.registry
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }
}

impl InputEventSource for LocalEventSource {
    fn add_listener(
        &self,
        kind: InputEventKind,
        listener: Listener,
        options: ListenerOptions,
    ) -> ListenerId {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            kind,
            listener,
            options,
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.registry
            .borrow_mut()
            .entries
            .retain(|entry| entry.id != id);
    }
}

impl fmt::Debug for LocalEventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventSource")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
