//! `NetworkMember`: the named endpoint every koon and flock is built on.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::trace;
use uuid::Uuid;

use crate::message::{Message, Payload, Receiver};

struct Subscription<P> {
    receiver: Weak<dyn Receiver<P>>,
    namespace: String,
}

/// A named endpoint with a list of subscribers.
pub struct NetworkMember<P> {
    name: String,
    uuid: Uuid,
    subscribers: RwLock<Vec<Subscription<P>>>,
}

impl<P: Payload> NetworkMember<P> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), uuid: Uuid::new_v4(), subscribers: RwLock::new(Vec::new()) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Register `receiver` for broadcasts whose namespace matches `namespace`.
    ///
    /// An empty namespace is a wildcard. Otherwise the filter matches the
    /// exact namespace or any dotted child of it (`"physics"` matches
    /// `"physics.body.create"` but not `"physicsx"`).
    ///
    /// Only a weak reference is kept; the caller owns the receiver.
    pub fn subscribe<R: Receiver<P> + 'static>(&self, receiver: &Arc<R>, namespace: impl Into<String>) {
        let weak: Weak<dyn Receiver<P>> = Arc::downgrade(receiver) as Weak<dyn Receiver<P>>;
        let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        subs.push(Subscription { receiver: weak, namespace: namespace.into() });
    }

    /// Number of subscribers whose receivers are still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let subs = self.subscribers.read().unwrap_or_else(PoisonError::into_inner);
        subs.iter().filter(|s| s.receiver.strong_count() > 0).count()
    }

    /// Deliver `message` to every matching subscriber.
    ///
    /// Returns `false` without delivering when this endpoint has already
    /// broadcast the message. Otherwise the message is tagged with this
    /// endpoint's name before delivery, and the namespace is passed
    /// through unchanged.
    pub fn broadcast(&self, message: &mut Message<P>, namespace: &str) -> bool {
        if message.has_passed(&self.name) {
            trace!(member = %self.name, namespace, "dropping echo");
            return false;
        }
        message.tag(&self.name);

        // Snapshot under the lock, deliver outside it: receivers re-enter
        // the fabric and may subscribe new members while we iterate.
        let targets: Vec<Arc<dyn Receiver<P>>> = {
            let mut subs = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
            subs.retain(|s| s.receiver.strong_count() > 0);
            subs.iter()
                .filter(|s| namespace_matches(&s.namespace, namespace))
                .filter_map(|s| s.receiver.upgrade())
                .collect()
        };

        trace!(member = %self.name, namespace, targets = targets.len(), "broadcast");
        for target in targets {
            target.receive_message(message, namespace);
        }
        true
    }
}

impl<P> std::fmt::Debug for NetworkMember<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkMember").field("name", &self.name).field("uuid", &self.uuid).finish_non_exhaustive()
    }
}

/// Whether a subscription filter accepts a broadcast namespace.
#[must_use]
pub fn namespace_matches(filter: &str, namespace: &str) -> bool {
    if filter.is_empty() || filter == namespace {
        return true;
    }
    namespace
        .strip_prefix(filter)
        .is_some_and(|rest| rest.starts_with('.'))
}
