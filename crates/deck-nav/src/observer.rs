#![forbid(unsafe_code)]

//! Viewport observer: turns intersection batches into entered flags and
//! active-index updates.
//!
//! The host pushes [`IntersectionBatch`]es into an [`IntersectionSink`]; the
//! observer drains them on the UI thread, in delivery order, whenever the
//! caller pumps it. Within a batch every entering section is applied in
//! sequence, so the last entering entry determines the active index.
//! Leaving entries only clear the section's visibility.
//!
//! After each drain a pending command scroll whose target is visible is
//! settled, even when no batch arrived.

use std::sync::mpsc::{self, TryRecvError};

use crate::controller::NavigationController;
use crate::host::{IntersectionBatch, IntersectionEntry, IntersectionSink, ViewportHost};

/// What a drain of the observer changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserverReport {
    /// Positions whose entered flag flipped to `true`, in application order.
    pub newly_entered: Vec<usize>,
    /// Last position applied to the controller, if any.
    pub active: Option<usize>,
    /// Number of batches drained.
    pub batches: usize,
}

impl ObserverReport {
    /// Check if no batch was drained.
    ///
    /// A drain of leaving entries only is not empty even though it sets no
    /// active index; see [`ObserverReport::changed_active`].
    pub fn is_empty(&self) -> bool {
        self.batches == 0
    }

    /// Check if the drain wrote the active index.
    pub fn changed_active(&self) -> bool {
        self.active.is_some()
    }

    fn merge(&mut self, other: ObserverReport) {
        self.newly_entered.extend(other.newly_entered);
        if other.active.is_some() {
            self.active = other.active;
        }
        self.batches += other.batches;
    }
}

/// Receives intersection batches for every registered section.
#[derive(Debug)]
pub struct ViewportObserver {
    receiver: Option<mpsc::Receiver<IntersectionBatch>>,
    threshold: f32,
}

impl ViewportObserver {
    /// Start observing every section in the controller's registry.
    pub fn connect<H: ViewportHost + ?Sized>(
        host: &mut H,
        controller: &NavigationController,
        threshold: f32,
    ) -> Self {
        let (sink, receiver) = IntersectionSink::channel();
        let sections = controller.registry().ids();
        tracing::debug!(sections = sections.len(), threshold, "observer connected");
        host.observe(&sections, threshold, sink);
        Self {
            receiver: Some(receiver),
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_connected(&self) -> bool {
        self.receiver.is_some()
    }

    /// Drain every pending batch in delivery order.
    pub fn pump(&mut self, controller: &mut NavigationController) -> ObserverReport {
        let mut report = ObserverReport::default();
        let Some(receiver) = &self.receiver else {
            return report;
        };
        loop {
            match receiver.try_recv() {
                Ok(batch) => report.merge(Self::apply_batch(&batch, controller)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::trace!("intersection source hung up");
                    break;
                }
            }
        }
        controller.settle();
        report
    }

    /// Apply one batch to the controller.
    ///
    /// Every entry updates its section's visibility. For each entering entry,
    /// in order: mark the section entered, then make it active. Unknown
    /// handles are skipped.
    pub fn apply_batch(
        batch: &[IntersectionEntry],
        controller: &mut NavigationController,
    ) -> ObserverReport {
        let mut report = ObserverReport {
            batches: 1,
            ..ObserverReport::default()
        };
        for entry in batch {
            let Some(index) = controller.registry().position_of(entry.section) else {
                tracing::trace!(section = entry.section.get(), "entry for unknown section ignored");
                continue;
            };
            controller
                .registry_mut()
                .set_visible(index, entry.is_intersecting);
            if !entry.is_intersecting {
                continue;
            }
            if controller.registry_mut().mark_entered(index) {
                report.newly_entered.push(index);
            }
            controller.observe_visible(index);
            report.active = Some(index);
        }
        controller.settle();
        report
    }

    /// Stop observation. Pending batches are discarded.
    pub fn disconnect<H: ViewportHost + ?Sized>(&mut self, host: &mut H) {
        if self.receiver.take().is_some() {
            host.disconnect();
            tracing::debug!("observer disconnected");
        }
    }
}
