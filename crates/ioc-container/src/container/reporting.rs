//! Progress reporting for nested resolves without a callback
//!
//! A constructor may resolve through the container itself, for instance by
//! calling `Deferred::get`. Those resolves carry no progress callback, so
//! the components they construct are buffered here and reported by the
//! nearest enclosing construction that has one.

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static PENDING: RefCell<Vec<Vec<String>>> = const { RefCell::new(Vec::new()) };
}

/// Buffer for constructions reported while it is the innermost one, closed on drop
pub(super) struct Collector {
    _not_send: PhantomData<*const ()>,
}

impl Collector {
    pub(super) fn open() -> Self {
        PENDING.with(|pending| pending.borrow_mut().push(Vec::new()));
        Self {
            _not_send: PhantomData,
        }
    }

    /// Names buffered so far, in construction order
    pub(super) fn drain(&self) -> Vec<String> {
        PENDING.with(|pending| {
            pending
                .borrow_mut()
                .last_mut()
                .map(std::mem::take)
                .unwrap_or_default()
        })
    }
}

impl Drop for Collector {
    fn drop(&mut self) {
        PENDING.with(|pending| {
            pending.borrow_mut().pop();
        });
    }
}

/// Buffer a construction for the innermost open collector, if any
pub(super) fn record(component: &str) {
    PENDING.with(|pending| {
        if let Some(names) = pending.borrow_mut().last_mut() {
            names.push(component.to_string());
        }
    });
}
