//! Per-user serialization of conversation transitions.
//!
//! Telegram delivers one logical conversation per user, but two
//! near-simultaneous messages would otherwise interleave the profile
//! read-modify-write and race on `state`. Each user gets one mutex; the
//! guard is held for the whole transition. Different users proceed in
//! parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SessionLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one user, creating it on first contact.
    /// Lock entries are never removed; the per-user footprint is tiny and
    /// bounded by the user population.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn same_user_transitions_are_serialized() {
        let locks = Arc::new(SessionLocks::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_flight = in_flight.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("alice").await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst);
                assert_eq!(now, 0, "two transitions for one user overlapped");
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_users_do_not_block_each_other() {
        let locks = SessionLocks::new();
        let _alice = locks.acquire("alice").await;
        // Must not deadlock while alice's guard is held.
        let _bob = locks.acquire("bob").await;
    }
}
