use std::{
    fmt::Display,
    sync::atomic::{AtomicI32, Ordering},
};

use crate::asserted_short_name;

/// Client assigned integer correlating an outbound request with its asynchronous responses.
pub type RequestId = i32;

/// Monotonic source of [RequestId]s owned by a single client. Starts at `0` and is never reset.
///
/// # Important
/// Safe to share between threads, every call to [RequestIdSequence::next_id] observes a distinct id.
#[derive(Debug, Default)]
pub struct RequestIdSequence {
    next: AtomicI32,
}
impl RequestIdSequence {
    pub fn new() -> Self {
        Self::default()
    }
    /// Reserves and returns the next id.
    #[inline(always)]
    pub fn next_id(&self) -> RequestId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
    /// Id that the next call to [RequestIdSequence::next_id] will return.
    #[inline(always)]
    pub fn peek(&self) -> RequestId {
        self.next.load(Ordering::SeqCst)
    }
}
impl Display for RequestIdSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}<next: {}>", asserted_short_name!("RequestIdSequence", Self), self.peek())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::unittest::setup;
    use log::info;
    use more_asserts::assert_lt;
    use std::{collections::HashSet, sync::Arc, thread};

    #[test]
    fn test_sequence_starts_at_zero() {
        setup::log::configure();
        let seq = RequestIdSequence::new();
        assert_eq!(seq.peek(), 0);
        let ids = (0..5).map(|_| seq.next_id()).collect::<Vec<_>>();
        info!("seq: {}, ids: {:?}", seq, ids);
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(seq.peek(), 5);
    }

    #[test]
    fn test_sequence_unique_across_threads() {
        setup::log::configure();
        const THREADS: usize = 4;
        const N: usize = 1_000;
        let seq = Arc::new(RequestIdSequence::new());
        let handles = (0..THREADS)
            .map(|_| {
                let seq = seq.clone();
                thread::spawn(move || (0..N).map(|_| seq.next_id()).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();
        let mut all = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert_lt!(id as usize, THREADS * N);
                assert!(all.insert(id), "duplicate id: {}", id);
            }
        }
        assert_eq!(all.len(), THREADS * N);
        assert_eq!(seq.peek() as usize, THREADS * N);
    }
}
