//! In-memory store and queue backends
//!
//! `MemoryStore` and `MemoryQueue` back tests and single-process local mode.
//! The queue models at-least-once delivery: received messages move to an
//! in-flight map keyed by ack token, and anything not deleted can be made
//! visible again with [`MemoryQueue::requeue_inflight`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use relief_core::{ReliefError, Result};

use crate::queue::{QueueMessage, WorkQueue};
use crate::store::ArtifactStore;

/// Mutex-guarded map of key -> bytes
#[derive(Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| ReliefError::Store(e.to_string()))?;
        Ok(blobs.contains_key(key))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|e| ReliefError::Store(e.to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|e| ReliefError::Store(e.to_string()))?;
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Internal queue state protected by Mutex
#[derive(Default)]
struct QueueState {
    visible: VecDeque<String>,
    inflight: HashMap<String, String>,
    next_token: u64,
}

/// In-memory at-least-once queue.
///
/// `receive` blocks on a `Condvar` with a bounded wait until at least one
/// message is visible or the wait elapses, mirroring a long-poll receive.
#[derive(Default)]
pub struct MemoryQueue {
    state: Mutex<QueueState>,
    condvar: Condvar,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, QueueState>> {
        self.state
            .lock()
            .map_err(|e| ReliefError::Queue(e.to_string()))
    }

    /// Make all in-flight messages visible again.
    ///
    /// Simulates redelivery of messages whose consumer crashed before
    /// deleting them.
    pub fn requeue_inflight(&self) -> Result<()> {
        let mut state = self.lock()?;
        let bodies: Vec<String> = state.inflight.drain().map(|(_, body)| body).collect();
        for body in bodies {
            state.visible.push_back(body);
        }
        self.condvar.notify_all();
        Ok(())
    }

    /// Number of messages currently visible (not in flight)
    pub fn visible_len(&self) -> Result<usize> {
        Ok(self.lock()?.visible.len())
    }

    /// Number of messages currently in flight
    pub fn inflight_len(&self) -> Result<usize> {
        Ok(self.lock()?.inflight.len())
    }
}

impl WorkQueue for MemoryQueue {
    fn send(&self, body: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.visible.push_back(body.to_string());
        self.condvar.notify_all();
        Ok(())
    }

    fn receive(&self, max_messages: usize, wait: Duration) -> Result<Vec<QueueMessage>> {
        let deadline = Instant::now() + wait;
        let mut state = self.lock()?;

        while state.visible.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return Ok(Vec::new());
            }
            let (guard, _timeout) = self
                .condvar
                .wait_timeout(state, deadline - now)
                .map_err(|e| ReliefError::Queue(e.to_string()))?;
            state = guard;
        }

        let mut messages = Vec::new();
        while messages.len() < max_messages {
            let Some(body) = state.visible.pop_front() else {
                break;
            };
            state.next_token += 1;
            let ack_token = format!("ack-{}", state.next_token);
            state.inflight.insert(ack_token.clone(), body.clone());
            messages.push(QueueMessage { body, ack_token });
        }
        Ok(messages)
    }

    fn delete(&self, ack_token: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.inflight.remove(ack_token);
        Ok(())
    }
}
