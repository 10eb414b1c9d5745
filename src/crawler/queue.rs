//! Retry-once work queue shared by the crawl workers
//!
//! The queue owns both the pending targets and the set of hostnames that
//! have already failed once. Both live behind a single mutex so that "pop",
//! "has this failed before" and "push it back" can never interleave badly
//! between workers.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Why a domain was selected for crawling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlSource {
    /// The domain aliases another hostname
    Cname(String),

    /// The domain has A or AAAA records
    Address,
}

/// A hostname to probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Fully-qualified hostname; the target's identity
    pub host: String,

    /// Username of the domain owner
    pub owner: String,

    pub source: CrawlSource,
}

impl Target {
    /// Creates a target with no owner information
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: String::new(),
            source: CrawlSource::Address,
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Vec<Target>,
    failed_once: HashSet<String>,
}

/// Pending targets plus the record of which ones already used their retry
///
/// Targets are taken most-recently-pushed first.
#[derive(Debug)]
pub struct WorkQueue {
    state: Mutex<QueueState>,
}

impl WorkQueue {
    /// Seeds the queue with every target to crawl
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: targets,
                failed_once: HashSet::new(),
            }),
        }
    }

    /// Removes and returns the next target, or `None` once drained
    pub fn pop(&self) -> Option<Target> {
        self.lock().pending.pop()
    }

    /// Puts a target back after its first failure
    ///
    /// Hands the target back as `Err`, leaving the queue untouched, when it
    /// has already failed once; the caller must then finalize it.
    pub fn push_retry(&self, target: Target) -> Result<(), Target> {
        let mut state = self.lock();
        if !state.failed_once.insert(target.host.clone()) {
            return Err(target);
        }
        state.pending.push(target);
        Ok(())
    }

    /// Number of targets waiting to be popped
    pub fn remaining(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // Every critical section leaves the state consistent, so a panic in
        // another worker does not invalidate it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
