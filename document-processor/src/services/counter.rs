use std::sync::atomic::{AtomicU64, Ordering};

/// Count of documents that were processed successfully.
pub trait DocumentCounter: Send + Sync {
    fn increment(&self);

    fn snapshot(&self) -> u64;
}

/// Lock-free [`DocumentCounter`] owned by the application state.
#[derive(Debug, Default)]
pub struct AtomicDocumentCounter {
    processed: AtomicU64,
}

impl AtomicDocumentCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentCounter for AtomicDocumentCounter {
    fn increment(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_at_zero() {
        assert_eq!(AtomicDocumentCounter::new().snapshot(), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let counter = Arc::new(AtomicDocumentCounter::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        counter.increment();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.snapshot(), 8_000);
    }
}
