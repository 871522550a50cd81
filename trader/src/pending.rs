use std::{
    collections::HashMap,
    fmt::Display,
    io::{Error, ErrorKind},
    sync::{
        mpsc::{channel, Receiver, RecvTimeoutError, Sender},
        Arc,
    },
    time::{Duration, Instant},
};

use log::{debug, log_enabled, warn, Level};

use crate::prelude::{asserted_short_name, Reply, RequestId, RspError};

/// Kind of request waiting for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Authenticate,
    UserLogin,
    UserLogout,
}

#[derive(Debug)]
struct Waiter {
    kind: RequestKind,
    submitted_at: Instant,
    tx: Sender<Reply>,
}

/// Table of requests submitted but not yet answered with an `is_last` reply, keyed by [RequestId].
#[derive(Debug, Default)]
pub struct PendingRequests {
    waiters: spin::Mutex<HashMap<RequestId, Waiter>>,
}
impl PendingRequests {
    pub fn new_ref() -> Arc<Self> {
        Arc::new(Self::default())
    }
    /// Registers interest in replies to `request_id` and returns the [Ticket] that receives them.
    /// Must happen before the request reaches the transport so an early reply is never missed.
    pub fn register(self: &Arc<Self>, request_id: RequestId, kind: RequestKind) -> Ticket {
        let (tx, rx) = channel();
        let submitted_at = Instant::now();
        if self.waiters.lock().insert(request_id, Waiter { kind, submitted_at, tx }).is_some() && log_enabled!(Level::Warn) {
            warn!("{} replaced waiter for request_id: {}", asserted_short_name!("PendingRequests", Self), request_id);
        }
        Ticket {
            request_id,
            kind,
            submitted_at,
            rx,
            pending: self.clone(),
        }
    }
    /// Routes `reply` to its waiter and drops the waiter once the `is_last` part is delivered.
    /// Returns `false` when nobody waits for `reply.request_id`.
    pub fn complete(&self, reply: &Reply) -> bool {
        let mut waiters = self.waiters.lock();
        let delivered = match waiters.get(&reply.request_id) {
            Some(waiter) => {
                // receiver gone means the ticket was dropped, nothing left to deliver to
                waiter.tx.send(reply.clone()).is_ok()
            }
            None => return false,
        };
        if reply.is_last || !delivered {
            waiters.remove(&reply.request_id);
        }
        delivered
    }
    pub fn forget(&self, request_id: RequestId) -> bool {
        self.waiters.lock().remove(&request_id).is_some()
    }
    /// Requests submitted more than `age` ago that are still unanswered.
    pub fn older_than(&self, age: Duration) -> Vec<(RequestId, RequestKind)> {
        let mut stale = self.waiters.lock().iter().filter(|(_, w)| w.submitted_at.elapsed() > age).map(|(id, w)| (*id, w.kind)).collect::<Vec<_>>();
        stale.sort_by_key(|(id, _)| *id);
        stale
    }
    /// Drops every waiter, their tickets observe [ErrorKind::ConnectionAborted].
    pub fn clear(&self) -> usize {
        let mut waiters = self.waiters.lock();
        let len = waiters.len();
        waiters.clear();
        len
    }
    pub fn len(&self) -> usize {
        self.waiters.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.waiters.lock().is_empty()
    }
}
impl Display for PendingRequests {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{}>", asserted_short_name!("PendingRequests", Self), self.len())
    }
}

/// Caller side handle of a submitted request, receives every part of its reply.
///
/// # Important
/// Dropping a [Ticket] only stops waiting locally, nothing is sent to the transport.
#[derive(Debug)]
pub struct Ticket {
    request_id: RequestId,
    kind: RequestKind,
    submitted_at: Instant,
    rx: Receiver<Reply>,
    pending: Arc<PendingRequests>,
}
impl Ticket {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
    pub fn elapsed(&self) -> Duration {
        self.submitted_at.elapsed()
    }
    /// Collects reply parts until the one flagged `is_last` arrives.
    ///
    /// # Errors
    /// * [ErrorKind::TimedOut] if the last part did not arrive within `timeout`
    /// * [ErrorKind::Other] wrapping [RspError] if any part carries a non zero error id
    /// * [ErrorKind::ConnectionAborted] if the client was released while waiting
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Vec<Reply>, Error> {
        let start = Instant::now();
        let mut parts = vec![];
        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            match self.rx.recv_timeout(remaining) {
                Ok(reply) => {
                    if log_enabled!(Level::Debug) {
                        debug!("{} received {}", self, reply);
                    }
                    if let Some(info) = reply.error() {
                        return Err(RspError { request_id: self.request_id, info: info.clone() }.into());
                    }
                    let is_last = reply.is_last;
                    parts.push(reply);
                    if is_last {
                        return Ok(parts);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(Error::new(ErrorKind::TimedOut, format!("{} no complete reply after {:?}, parts received: {}", self, timeout, parts.len())));
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::new(ErrorKind::ConnectionAborted, format!("{} abandoned, parts received: {}", self, parts.len())));
                }
            }
        }
    }
    /// Same as [Ticket::wait_timeout] but returns only the last part.
    pub fn wait_last_timeout(&self, timeout: Duration) -> Result<Reply, Error> {
        self.wait_timeout(timeout)?.pop().ok_or_else(|| Error::new(ErrorKind::UnexpectedEof, format!("{} completed without parts", self)))
    }
}
impl Drop for Ticket {
    fn drop(&mut self) {
        self.pending.forget(self.request_id);
    }
}
impl Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<{:?}, request_id: {}>", asserted_short_name!("Ticket", Self), self.kind, self.request_id)
    }
}
