//! Profile lifecycle events.
//!
//! Mutations publish to registered observers after they commit, so external
//! listeners (audit logs, theme cache purges) can react without the store
//! knowing about them.

/// An event describing a completed profile mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    Created { id: i64, name: String },
    Updated { id: i64, name: String },
    Deleted { id: i64, name: String },
}

impl ProfileEvent {
    pub fn profile_id(&self) -> i64 {
        match self {
            Self::Created { id, .. } | Self::Updated { id, .. } | Self::Deleted { id, .. } => *id,
        }
    }
}

/// A listener for profile lifecycle events.
#[cfg_attr(test, mockall::automock)]
pub trait ProfileObserver {
    fn on_event(&self, event: &ProfileEvent);
}

/// Holds registered observers and fans events out to them.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn ProfileObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn ProfileObserver>) {
        self.observers.push(observer);
    }

    pub fn publish(&self, event: &ProfileEvent) {
        log::debug!("Publishing profile event: {:?}", event);
        for observer in &self.observers {
            observer.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
