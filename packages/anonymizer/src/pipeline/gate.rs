use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{AnonymizerError, Result};

/// Admission gate in front of the entity detector.
///
/// A counting semaphore: at most `width` detector calls run at once across
/// every fragment and every request sharing the gate. Clones share the same
/// semaphore. Width 1 (the default) treats the model as an exclusively held
/// resource.
#[derive(Debug, Clone)]
pub struct DetectionGate {
    semaphore: Arc<Semaphore>,
    width: usize,
}

impl DetectionGate {
    /// Create a gate admitting `width` concurrent calls (minimum 1).
    pub fn new(width: usize) -> Self {
        let width = width.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(width)),
            width,
        }
    }

    /// A gate admitting one call at a time.
    pub fn exclusive() -> Self {
        Self::new(1)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a permit; the call is admitted while the permit lives.
    ///
    /// The permit owns its share of the gate, so it can move into the task
    /// that runs the detector and outlive the request that asked for it.
    pub async fn acquire_owned(&self) -> Result<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| AnonymizerError::GateClosed)
    }

    /// Refuse all further admissions; waiters fail with `GateClosed`.
    pub fn close(&self) {
        self.semaphore.close();
    }
}

impl Default for DetectionGate {
    fn default() -> Self {
        Self::exclusive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permits_are_shared_between_clones() {
        let gate = DetectionGate::new(2);
        let other = gate.clone();

        let _a = gate.acquire_owned().await.unwrap();
        assert_eq!(other.available(), 1);
        let _b = other.acquire_owned().await.unwrap();
        assert_eq!(gate.available(), 0);
    }

    #[tokio::test]
    async fn test_closed_gate_rejects() {
        let gate = DetectionGate::exclusive();
        gate.close();

        let err = gate.acquire_owned().await.unwrap_err();
        assert!(matches!(err, AnonymizerError::GateClosed));
    }

    #[tokio::test]
    async fn test_permit_outlives_borrow_of_gate() {
        let (permit, gate) = {
            let gate = DetectionGate::exclusive();
            let permit = gate.acquire_owned().await.unwrap();
            (permit, gate.clone())
        };

        assert_eq!(gate.available(), 0);
        drop(permit);
        assert_eq!(gate.available(), 1);
    }

    #[test]
    fn test_zero_width_is_clamped() {
        assert_eq!(DetectionGate::new(0).width(), 1);
    }
}
