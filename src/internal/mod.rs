//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod lifecycle_queues;

pub(crate) use circular::{ResolutionStack, StackGuard};
pub(crate) use lifecycle_queues::LifecycleQueues;
