//! Collection state for widgets that manage a list of entities
//!
//! `EntityStore` owns a `CollectionState` snapshot. Every mutation builds a
//! complete new state and swaps it in, so a snapshot handed to the renderer
//! never changes underneath it.

use super::user::Entity;
use crate::validation::{validate, Rules, ValidationResult};
use std::rc::Rc;

/// In-memory state of a collection-managing widget
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<E> {
    /// Records in display order
    pub records: Vec<E>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Record currently open in the edit form
    pub editing_record: Option<E>,
}

impl<E> Default for CollectionState<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            is_loading: false,
            error: None,
            editing_record: None,
        }
    }
}

/// Result of `EntityStore::apply_edit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub accepted: bool,
    pub result: ValidationResult,
}

/// Holds a collection's state and applies validated transitions
pub struct EntityStore<E: Entity> {
    state: Rc<CollectionState<E>>,
    rules: Rules,
    revision: u64,
}

impl<E: Entity> EntityStore<E> {
    pub fn new(rules: Rules) -> Self {
        Self {
            state: Rc::new(CollectionState::default()),
            rules,
            revision: 0,
        }
    }

    /// Current state; cheap to clone and never mutated in place
    pub fn snapshot(&self) -> Rc<CollectionState<E>> {
        Rc::clone(&self.state)
    }

    pub fn state(&self) -> &CollectionState<E> {
        &self.state
    }

    /// Incremented on every state replacement
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn replace(&mut self, next: CollectionState<E>) {
        self.state = Rc::new(next);
        self.revision += 1;
    }

    /// Validate `candidate` and commit it when it passes
    ///
    /// An accepted candidate replaces the record with the same id, or is
    /// appended when no such record exists. A rejected candidate leaves the
    /// records alone and becomes the editing record so the form can show
    /// what was entered.
    pub fn apply_edit(&mut self, candidate: E) -> EditOutcome {
        let result = validate(&candidate, &self.rules);
        let current = &*self.state;

        if !result.is_valid() {
            tracing::debug!(
                id = ?candidate.id(),
                failing = result.errors().len(),
                "edit rejected"
            );
            let next = CollectionState {
                records: current.records.clone(),
                is_loading: current.is_loading,
                error: current.error.clone(),
                editing_record: Some(candidate),
            };
            self.replace(next);
            return EditOutcome {
                accepted: false,
                result,
            };
        }

        let mut records = current.records.clone();
        match records.iter().position(|r| r.id() == candidate.id()) {
            Some(index) => records[index] = candidate,
            None => records.push(candidate),
        }
        tracing::debug!(count = records.len(), "edit committed");

        let next = CollectionState {
            records,
            is_loading: current.is_loading,
            error: None,
            editing_record: None,
        };
        self.replace(next);

        EditOutcome {
            accepted: true,
            result,
        }
    }

    /// Open `record` for editing, discarding any uncommitted edit
    pub fn begin_edit(&mut self, record: E) {
        let current = &*self.state;
        if let Some(previous) = &current.editing_record {
            tracing::debug!(id = ?previous.id(), "discarding uncommitted edit");
        }
        let next = CollectionState {
            editing_record: Some(record),
            ..current.clone()
        };
        self.replace(next);
    }

    pub fn cancel_edit(&mut self) {
        if self.state.editing_record.is_none() {
            return;
        }
        let next = CollectionState {
            editing_record: None,
            ..(*self.state).clone()
        };
        self.replace(next);
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        let next = CollectionState {
            is_loading,
            ..(*self.state).clone()
        };
        self.replace(next);
    }

    pub fn set_error(&mut self, error: Option<String>) {
        let next = CollectionState {
            error,
            ..(*self.state).clone()
        };
        self.replace(next);
    }

    /// Replace the whole record list with one delivered by a data source
    pub fn replace_records(&mut self, records: Vec<E>) {
        let next = CollectionState {
            records,
            ..(*self.state).clone()
        };
        self.replace(next);
    }
}
