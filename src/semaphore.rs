use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A counting semaphore that blocks the calling thread while no permits are available.
#[derive(Debug)]
pub(super) struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    pub(super) fn new(permits: usize) -> Self {
        Semaphore {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    // The counter is never left in an invalid state, so a poisoned lock is still usable.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes one permit, blocking until one is available.
    pub(super) fn acquire(&self) {
        let mut permits = self.lock();

        if *permits == 0 {
            tracing::trace!("waiting for a permit");
            permits = self
                .available
                .wait_while(permits, |p| *p == 0)
                .unwrap_or_else(PoisonError::into_inner);
        }

        *permits -= 1;
    }

    /// Takes one permit if one is available right away.
    pub(super) fn try_acquire(&self) -> bool {
        let mut permits = self.lock();

        if *permits > 0 {
            *permits -= 1;
            true
        } else {
            false
        }
    }

    /// Returns one permit, waking up one waiting thread if there is any.
    pub(super) fn release(&self) {
        *self.lock() += 1;
        self.available.notify_one();
    }

    #[inline]
    pub(super) fn available(&self) -> usize {
        *self.lock()
    }
}
