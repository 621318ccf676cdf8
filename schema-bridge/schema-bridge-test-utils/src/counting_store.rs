use std::{
    sync::{
        Mutex,
        atomic::{AtomicI64, Ordering},
    },
    thread::{Thread, ThreadId},
};

/// A side-effect target for mutation resolvers.
///
/// Counts the writes, and remembers which thread performed each of them.
#[derive(Default)]
pub struct CountingStore {
    count: AtomicI64,
    writers: Mutex<Vec<Thread>>,
}

impl CountingStore {
    /// Add one and return the new count.
    pub fn increment(&self) -> i64 {
        self.writers
            .lock()
            .unwrap()
            .push(std::thread::current());
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn writer_threads(&self) -> Vec<ThreadId> {
        self.writers.lock().unwrap().iter().map(Thread::id).collect()
    }

    pub fn writer_thread_names(&self) -> Vec<Option<String>> {
        self.writers
            .lock()
            .unwrap()
            .iter()
            .map(|thread| thread.name().map(str::to_string))
            .collect()
    }
}
