//! Loading / ready / failed state for one resolver slot, and the generation guard that
//! keeps a superseded request from overwriting a newer result.
//!
//! A slot hands out a [`Ticket`] per request. The ticket carries the generation that was
//! current when it was issued; when the request finishes (on any thread) the ticket sends
//! its outcome back over a channel. [`Slot::poll`] applies an outcome only if its generation
//! is still the latest one, so issuing B after A and finishing A last leaves B's result visible.

use crate::error::DataError;
use std::sync::mpsc::{self, Receiver, Sender};

/// Visible status of one resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchState<U> {
        match self {
            FetchState::Loading => FetchState::Loading,
            FetchState::Ready(v) => FetchState::Ready(f(v)),
            FetchState::Failed(msg) => FetchState::Failed(msg),
        }
    }
}

impl<T> From<Result<T, DataError>> for FetchState<T> {
    fn from(r: Result<T, DataError>) -> Self {
        match r {
            Ok(v) => FetchState::Ready(v),
            Err(e) => FetchState::Failed(e.to_string()),
        }
    }
}

/// Reported when a ticket is dropped without an outcome (e.g. its worker panicked).
pub const ABANDONED: &str = "The request ended without a result.";

/// Handle for one in-flight request. Consumed by [`Ticket::complete`]; dropping it
/// unfinished reports [`ABANDONED`] so the slot never stays loading forever.
#[derive(Debug)]
pub struct Ticket<T> {
    generation: u64,
    tx: Sender<(u64, FetchState<T>)>,
    done: bool,
}

impl<T> Ticket<T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver the outcome. Sending never fails the caller: a dropped slot just means
    /// nobody is listening anymore.
    pub fn complete(mut self, outcome: impl Into<FetchState<T>>) {
        let _ = self.tx.send((self.generation, outcome.into()));
        self.done = true;
    }
}

impl<T> Drop for Ticket<T> {
    fn drop(&mut self) {
        if !self.done {
            log::warn!("request {} finished without an outcome", self.generation);
            let _ = self
                .tx
                .send((self.generation, FetchState::Failed(ABANDONED.into())));
        }
    }
}

/// One resolver's exclusively-owned state plus its supersession guard.
#[derive(Debug)]
pub struct Slot<T> {
    generation: u64,
    state: FetchState<T>,
    tx: Sender<(u64, FetchState<T>)>,
    rx: Receiver<(u64, FetchState<T>)>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generation: 0,
            state: FetchState::Loading,
            tx,
            rx,
        }
    }

    /// Start a new request: bumps the generation (invalidating every older ticket) and
    /// moves the visible state to `Loading`.
    pub fn begin(&mut self) -> Ticket<T> {
        self.generation += 1;
        self.state = FetchState::Loading;
        Ticket {
            generation: self.generation,
            tx: self.tx.clone(),
            done: false,
        }
    }

    /// Drain finished requests. Returns true when the visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, outcome)) = self.rx.try_recv() {
            if generation == self.generation {
                self.state = outcome;
                changed = true;
            } else {
                log::debug!(
                    "discarding stale result (generation {} < {})",
                    generation,
                    self.generation
                );
            }
        }
        changed
    }

    /// Block until the current generation has an outcome. Stale outcomes arriving first are
    /// discarded as in [`Slot::poll`].
    pub fn wait(&mut self) -> &FetchState<T> {
        while self.state.is_loading() {
            match self.rx.recv() {
                Ok((generation, outcome)) if generation == self.generation => {
                    self.state = outcome;
                }
                Ok(_) => {}
                // Unreachable while `self.tx` is alive; bail out instead of spinning.
                Err(_) => break,
            }
        }
        &self.state
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
