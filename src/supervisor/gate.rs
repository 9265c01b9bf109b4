//! Bounded admission gate.
//!
//! Concurrency is one OS process per in-flight execution; without a gate it
//! is limited only by host process/fd capacity. The gate holds a fixed pool
//! of permits in a bounded channel: acquiring blocks until a permit frees,
//! capping concurrent executions at the configured width.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Token pool capping concurrent executions.
pub struct AdmissionGate {
    permits: Receiver<()>,
    returns: Sender<()>,
}

/// Held admission slot; returning it on drop wakes one blocked acquirer.
pub struct Permit {
    returns: Sender<()>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        let _ = self.returns.send(());
    }
}

impl AdmissionGate {
    /// A gate with `capacity` permits. Capacity 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (returns, permits) = bounded(capacity);
        for _ in 0..capacity {
            returns.send(()).expect("fresh gate channel cannot be full");
        }
        AdmissionGate { permits, returns }
    }

    /// Block until a permit is available.
    pub fn acquire(&self) -> Permit {
        // Both channel ends live in self, so recv can only fail if the gate
        // itself is being torn down mid-acquire.
        self.permits.recv().expect("admission gate disconnected");
        Permit {
            returns: self.returns.clone(),
        }
    }

    /// Take a permit without blocking, if one is free.
    pub fn try_acquire(&self) -> Option<Permit> {
        match self.permits.try_recv() {
            Ok(()) => Some(Permit {
                returns: self.returns.clone(),
            }),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_caps_concurrent_permits() {
        let gate = AdmissionGate::new(2);
        let first = gate.acquire();
        let second = gate.acquire();
        assert!(gate.try_acquire().is_none());
        drop(first);
        let third = gate.try_acquire();
        assert!(third.is_some());
        drop(second);
        drop(third);
        assert_eq!(gate.available(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let gate = AdmissionGate::new(0);
        let permit = gate.try_acquire();
        assert!(permit.is_some());
    }

    #[test]
    fn dropping_a_permit_unblocks_a_waiter() {
        use std::sync::Arc;
        let gate = Arc::new(AdmissionGate::new(1));
        let permit = gate.acquire();

        let waiter = {
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || {
                let _permit = gate.acquire();
            })
        };

        drop(permit);
        waiter.join().unwrap();
        assert_eq!(gate.available(), 1);
    }
}
