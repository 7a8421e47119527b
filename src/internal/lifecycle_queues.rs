//! Initialize and dispose queues filled during resolution.

use std::mem;
use std::sync::Arc;

use crate::traits::{Dispose, Initializable};

/// Instances awaiting the start and teardown signals, in construction order.
#[derive(Default)]
pub(crate) struct LifecycleQueues {
    initializables: Vec<Arc<dyn Initializable>>,
    disposables: Vec<Arc<dyn Dispose>>,
}

impl LifecycleQueues {
    pub(crate) fn push_initializable(&mut self, instance: Arc<dyn Initializable>) {
        self.initializables.push(instance);
    }

    pub(crate) fn push_disposable(&mut self, instance: Arc<dyn Dispose>) {
        self.disposables.push(instance);
    }

    /// Empties the initialize queue, handing its entries to the caller.
    pub(crate) fn take_initializables(&mut self) -> Vec<Arc<dyn Initializable>> {
        mem::take(&mut self.initializables)
    }

    /// Empties the dispose queue, handing its entries to the caller.
    pub(crate) fn take_disposables(&mut self) -> Vec<Arc<dyn Dispose>> {
        mem::take(&mut self.disposables)
    }

    pub(crate) fn pending_initializables(&self) -> usize {
        self.initializables.len()
    }

    pub(crate) fn pending_disposables(&self) -> usize {
        self.disposables.len()
    }

    /// Runs a taken queue front to back; returns how many hooks ran.
    pub(crate) fn initialize_all(queue: Vec<Arc<dyn Initializable>>) -> usize {
        let count = queue.len();
        for instance in queue {
            instance.initialize();
        }
        count
    }

    /// Runs a taken queue front to back; returns how many hooks ran.
    pub(crate) fn dispose_all(queue: Vec<Arc<dyn Dispose>>) -> usize {
        let count = queue.len();
        for instance in queue {
            instance.dispose();
        }
        count
    }
}
