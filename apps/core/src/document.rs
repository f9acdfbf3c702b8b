//! Document-level pointer listeners for mounted controls.
//!
//! Listeners live exactly as long as the [`ListenerGuard`] returned at
//! registration. Dropping the guard removes the listener, so every unmount
//! path releases it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    SearchInput,
    SuggestionList,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub region: Region,
}

impl PointerEvent {
    pub fn at(region: Region) -> Self {
        Self { region }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

type Handler = Rc<dyn Fn(&PointerEvent)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Phase, Handler)>,
}

#[derive(Clone, Default)]
pub struct Document {
    listeners: Rc<RefCell<Listeners>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pointer_listener(
        &self,
        phase: Phase,
        handler: impl Fn(&PointerEvent) + 'static,
    ) -> ListenerGuard {
        let mut listeners = self.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, phase, Rc::new(handler)));

        ListenerGuard {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    /// Runs capture listeners before bubble listeners, each in registration order.
    pub fn dispatch_pointer(&self, event: &PointerEvent) {
        let ordered: Vec<Handler> = {
            let listeners = self.listeners.borrow();
            let capture = listeners
                .entries
                .iter()
                .filter(|(_, phase, _)| *phase == Phase::Capture);
            let bubble = listeners
                .entries
                .iter()
                .filter(|(_, phase, _)| *phase == Phase::Bubble);
            capture.chain(bubble).map(|(_, _, handler)| Rc::clone(handler)).collect()
        };

        for handler in ordered {
            handler(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

#[must_use = "dropping the guard removes the listener"]
pub struct ListenerGuard {
    listeners: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.try_borrow_mut() {
                listeners.entries.retain(|(id, _, _)| *id != self.id);
            }
        }
    }
}
