//! Resolve-once signal with ordered continuations
//!
//! Every operation touching the map engine is chained on one of these. While
//! the signal is pending, continuations queue up in call order; resolving it
//! runs them first-in first-out, and anything chained afterwards runs on the
//! spot.

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

type Continuation = Box<dyn FnOnce()>;

enum State {
    Pending(VecDeque<Continuation>),
    Resolved,
}

/// Shared handle to the engine-ready signal; clones observe the same signal
#[derive(Clone)]
pub struct ReadySignal {
    state: Rc<RefCell<State>>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Pending(VecDeque::new()))),
        }
    }

    /// Runs `continuation` once the signal has resolved, after every
    /// continuation chained before it.
    pub fn then<F>(&self, continuation: F)
    where
        F: FnOnce() + 'static,
    {
        let mut state = self.state.borrow_mut();
        if let State::Pending(queue) = &mut *state {
            queue.push_back(Box::new(continuation));
            return;
        }

        drop(state);
        continuation();
    }

    /// Resolves the signal and drains the queue. Later calls do nothing.
    pub fn resolve(&self) {
        loop {
            // The borrow must end before the continuation runs: it may chain more work
            let next = match &mut *self.state.borrow_mut() {
                State::Pending(queue) => queue.pop_front(),
                State::Resolved => return,
            };

            match next {
                Some(continuation) => continuation(),
                None => break,
            }
        }

        *self.state.borrow_mut() = State::Resolved;
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.state.borrow(), State::Resolved)
    }

    /// Number of continuations waiting for the signal
    pub fn pending(&self) -> usize {
        match &*self.state.borrow() {
            State::Pending(queue) => queue.len(),
            State::Resolved => 0,
        }
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadySignal")
            .field("resolved", &self.is_resolved())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let push = move |n: u32| {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(n)) as Box<dyn FnOnce()>
        };
        (log, push)
    }

    #[test]
    fn test_continuations_run_in_chain_order() {
        let (log, push) = recorder();
        let signal = ReadySignal::new();

        signal.then(push(1));
        signal.then(push(2));
        signal.then(push(3));
        assert!(log.borrow().is_empty());
        assert_eq!(signal.pending(), 3);

        signal.resolve();
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert!(signal.is_resolved());
    }

    #[test]
    fn test_after_resolution_runs_immediately() {
        let (log, push) = recorder();
        let signal = ReadySignal::new();
        signal.resolve();

        signal.then(push(7));
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn test_resolves_at_most_once() {
        let (log, push) = recorder();
        let signal = ReadySignal::new();
        signal.then(push(1));

        signal.resolve();
        signal.resolve();
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn test_chaining_during_drain_keeps_order() {
        let (log, push) = recorder();
        let signal = ReadySignal::new();

        let inner = signal.clone();
        let late = push(3);
        let first = push(1);
        signal.then(move || {
            first();
            inner.then(late);
        });
        signal.then(push(2));

        signal.resolve();
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unresolved_signal_keeps_work_pending() {
        let (log, push) = recorder();
        let signal = ReadySignal::new();
        signal.then(push(1));

        assert!(!signal.is_resolved());
        assert!(log.borrow().is_empty());
        assert_eq!(signal.pending(), 1);
    }
}
