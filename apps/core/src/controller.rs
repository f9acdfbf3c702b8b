use std::cell::{Ref, RefCell, RefMut};
use std::fmt::Display;
use std::rc::Rc;

use log::{debug, warn};

use crate::contract::SearchHandoff;
use crate::document::{Document, ListenerGuard, Phase, PointerEvent, Region};
use crate::model::SearchResultPayload;
use crate::query::{should_suggest, submittable_term};
use crate::suggestions::suggest;
use crate::ticket::{SearchTicket, TicketIssuer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Typing,
    SuggestionsVisible,
    Submitting,
    ResultsHandedOff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The payload belongs to the latest submission and goes to navigation.
    HandedOff(SearchHandoff),
    /// The latest submission failed; the message is shown inline.
    Failed(String),
    /// A newer submission superseded this one.
    Stale,
}

#[derive(Debug)]
pub struct SearchController {
    state: InteractionState,
    query: String,
    suggestions: Vec<String>,
    pool: Vec<String>,
    limit: usize,
    inline_error: Option<String>,
    tickets: TicketIssuer,
}

impl SearchController {
    pub fn new(pool: Vec<String>, limit: usize) -> Self {
        Self {
            state: InteractionState::Idle,
            query: String::new(),
            suggestions: Vec::new(),
            pool,
            limit,
            inline_error: None,
            tickets: TicketIssuer::default(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Suggestions to display; empty whenever the dropdown is closed.
    pub fn suggestions(&self) -> &[String] {
        if self.is_dropdown_open() {
            &self.suggestions
        } else {
            &[]
        }
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.state == InteractionState::SuggestionsVisible
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == InteractionState::Submitting
    }

    pub fn on_input(&mut self, value: &str) {
        let was_open = self.is_dropdown_open();
        self.query = value.to_string();
        self.inline_error = None;

        if should_suggest(&self.query) {
            self.suggestions = suggest(&self.query, &self.pool, self.limit);
        } else {
            self.suggestions.clear();
        }

        // An open dropdown whose list empties closes back to Idle.
        self.state = match (self.suggestions.is_empty(), was_open) {
            (false, _) => InteractionState::SuggestionsVisible,
            (true, true) => InteractionState::Idle,
            (true, false) => InteractionState::Typing,
        };
    }

    /// Hides the dropdown and keeps the typed query.
    pub fn dismiss(&mut self) -> bool {
        if self.state != InteractionState::SuggestionsVisible {
            return false;
        }
        self.suggestions.clear();
        self.state = InteractionState::Idle;
        true
    }

    pub fn on_escape(&mut self) -> bool {
        self.dismiss()
    }

    pub fn on_pointer(&mut self, event: &PointerEvent) -> bool {
        match event.region {
            Region::SearchInput | Region::SuggestionList => false,
            Region::Elsewhere => self.dismiss(),
        }
    }

    /// Returns the ticket to search with, or `None` when the query is blank.
    pub fn submit(&mut self) -> Option<SearchTicket> {
        let term = submittable_term(&self.query)?.to_string();
        let ticket = self.tickets.issue(&term);
        debug!("submitting search #{} for '{term}'", ticket.id());

        self.suggestions.clear();
        self.inline_error = None;
        self.state = InteractionState::Submitting;
        Some(ticket)
    }

    pub fn select_suggestion(&mut self, index: usize) -> Option<SearchTicket> {
        if !self.is_dropdown_open() {
            return None;
        }
        let picked = self.suggestions.get(index)?.clone();
        self.query = picked;
        self.submit()
    }

    pub fn complete<E: Display>(
        &mut self,
        ticket: SearchTicket,
        result: Result<SearchResultPayload, E>,
    ) -> Completion {
        if !self.tickets.is_current(&ticket) {
            debug!(
                "discarding stale search #{} for '{}'",
                ticket.id(),
                ticket.term()
            );
            return Completion::Stale;
        }
        // Each ticket settles once.
        self.tickets.invalidate();

        match result {
            Ok(payload) => {
                self.query.clear();
                self.suggestions.clear();
                self.inline_error = None;
                self.state = InteractionState::ResultsHandedOff;
                Completion::HandedOff(SearchHandoff::new(ticket.term(), payload))
            }
            Err(error) => {
                warn!("search for '{}' failed: {error}", ticket.term());
                let message = format!("Search failed: {error}. Submit again to retry.");
                self.inline_error = Some(message.clone());
                self.state = InteractionState::Idle;
                Completion::Failed(message)
            }
        }
    }
}

/// A controller bound to a document for as long as it stays mounted.
pub struct MountedSearchControl {
    controller: Rc<RefCell<SearchController>>,
    _outside_click: ListenerGuard,
}

impl MountedSearchControl {
    pub fn mount(document: &Document, controller: SearchController) -> Self {
        let controller = Rc::new(RefCell::new(controller));
        let weak = Rc::downgrade(&controller);
        let outside_click = document.add_pointer_listener(Phase::Capture, move |event| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            let Ok(mut controller) = controller.try_borrow_mut() else {
                return;
            };
            controller.on_pointer(event);
        });

        Self {
            controller,
            _outside_click: outside_click,
        }
    }

    pub fn controller(&self) -> Ref<'_, SearchController> {
        self.controller.borrow()
    }

    pub fn controller_mut(&self) -> RefMut<'_, SearchController> {
        self.controller.borrow_mut()
    }

    pub fn unmount(self) -> Option<SearchController> {
        let Self {
            controller,
            _outside_click,
        } = self;
        drop(_outside_click);
        Rc::try_unwrap(controller).ok().map(RefCell::into_inner)
    }
}
