//! Single-flight coordination for the token refresh.
//!
//! The first caller that finds the coordinator idle becomes the leader and
//! performs the refresh; everyone arriving while it runs gets a receiver that
//! resolves with the leader's outcome. Waiters are flushed in arrival order.

use futures::channel::oneshot;
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

/// `Some(token)` on success, `None` when the refresh failed
pub type RefreshOutcome = Option<String>;

#[derive(Default)]
enum RefreshState {
    #[default]
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    state: Rc<RefCell<RefreshState>>,
}

pub enum RefreshTicket {
    Leader(RefreshLease),
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Held by the leader. Completing or dropping it returns the coordinator to idle.
pub struct RefreshLease {
    state: Rc<RefCell<RefreshState>>,
    finished: bool,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self) -> RefreshTicket {
        let mut state = self.state.borrow_mut();
        if let RefreshState::Refreshing(waiters) = &mut *state {
            let (tx, rx) = oneshot::channel();
            waiters.push(tx);
            return RefreshTicket::Waiter(rx);
        }
        *state = RefreshState::Refreshing(Vec::new());
        RefreshTicket::Leader(RefreshLease {
            state: Rc::clone(&self.state),
            finished: false,
        })
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.state.borrow(), RefreshState::Refreshing(_))
    }

    pub fn waiting(&self) -> usize {
        match &*self.state.borrow() {
            RefreshState::Refreshing(waiters) => waiters.len(),
            RefreshState::Idle => 0,
        }
    }
}

impl RefreshLease {
    /// Resolves every queued waiter with `outcome`; returns how many there were
    pub fn complete(mut self, outcome: RefreshOutcome) -> usize {
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: RefreshOutcome) -> usize {
        self.finished = true;
        let previous = mem::take(&mut *self.state.borrow_mut());
        let waiters = match previous {
            RefreshState::Refreshing(waiters) => waiters,
            RefreshState::Idle => Vec::new(),
        };
        let count = waiters.len();
        for waiter in waiters {
            // receiver may have been dropped with its request
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}

impl Drop for RefreshLease {
    fn drop(&mut self) {
        if !self.finished {
            self.finish(None);
        }
    }
}
