//! Clock and id shims whose next value can be staged from outside.
//!
//! A [`Staging`] owns the two cells; [`StagedClock`] and [`StagedIds`] hold
//! shared handles and are handed to the domain as its sources of
//! non-determinism. Reading a staged value does not clear it; staging the next
//! value simply overwrites it.

use crate::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Staging {
    id: Rc<RefCell<Option<String>>>,
    now: Rc<Cell<Option<DateTime<Utc>>>>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_id(&self, id: impl Into<String>) {
        *self.id.borrow_mut() = Some(id.into());
    }

    pub fn stage_now(&self, now: DateTime<Utc>) {
        self.now.set(Some(now));
    }

    pub fn staged_id(&self) -> Option<String> {
        self.id.borrow().clone()
    }

    pub fn staged_now(&self) -> Option<DateTime<Utc>> {
        self.now.get()
    }

    /// Drop both staged values so the shims fall back to real sources.
    pub fn clear(&self) {
        self.id.borrow_mut().take();
        self.now.set(None);
    }

    pub fn clock(&self) -> StagedClock {
        StagedClock {
            now: Rc::clone(&self.now),
        }
    }

    pub fn ids(&self) -> StagedIds {
        StagedIds {
            id: Rc::clone(&self.id),
        }
    }
}

/// Returns the staged timestamp, or real time when nothing is staged.
#[derive(Debug, Clone)]
pub struct StagedClock {
    now: Rc<Cell<Option<DateTime<Utc>>>>,
}

impl Clock for StagedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get().unwrap_or_else(|| SystemClock.now())
    }
}

/// Returns the staged id, or a random one when nothing is staged.
#[derive(Debug, Clone)]
pub struct StagedIds {
    id: Rc<RefCell<Option<String>>>,
}

impl IdGenerator for StagedIds {
    fn next_id(&self) -> String {
        self.id
            .borrow()
            .clone()
            .unwrap_or_else(|| RandomIds.next_id())
    }
}
