//! Koon (leaf endpoint) and Flock (hub).

use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::{debug, trace};
use uuid::Uuid;

use crate::member::NetworkMember;
use crate::message::{Message, Payload, Receiver};

// =============================================================================
// KOON
// =============================================================================

/// A named leaf endpoint.
///
/// On receipt a koon stamps itself as the message's `_sender` and relays the
/// message to its own subscribers. Primitive payloads are not relayed.
#[derive(Debug)]
pub struct Koon<P> {
    member: NetworkMember<P>,
}

impl<P: Payload> Koon<P> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { member: NetworkMember::new(name) })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.member.name()
    }

    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.member.uuid()
    }

    pub fn subscribe<R: Receiver<P> + 'static>(&self, receiver: &Arc<R>, namespace: impl Into<String>) {
        self.member.subscribe(receiver, namespace);
    }

    /// Broadcast from this endpoint. See [`NetworkMember::broadcast`].
    pub fn broadcast(&self, message: &mut Message<P>, namespace: &str) -> bool {
        self.member.broadcast(message, namespace)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.member.subscriber_count()
    }
}

impl<P: Payload> Receiver<P> for Koon<P> {
    fn receive_message(&self, message: &mut Message<P>, namespace: &str) {
        if !message.payload.is_structured() {
            trace!(koon = %self.name(), namespace, "ignoring primitive payload");
            return;
        }
        message.set_sender(self.name());
        self.member.broadcast(message, namespace);
    }
}

// =============================================================================
// FLOCK
// =============================================================================

/// A hub that relays every broadcast among its registered koons.
#[derive(Debug)]
pub struct Flock<P> {
    member: NetworkMember<P>,
    koons: RwLock<Vec<Weak<Koon<P>>>>,
}

impl<P: Payload> Flock<P> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { member: NetworkMember::new(name), koons: RwLock::new(Vec::new()) })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.member.name()
    }

    /// Join `koon` to the flock.
    ///
    /// Subscribes the flock to the koon and the koon to the flock, so
    /// anything either side broadcasts reaches the other.
    pub fn register(self: &Arc<Self>, koon: &Arc<Koon<P>>) {
        koon.subscribe(self, "");
        self.member.subscribe(koon, "");
        let mut koons = self.koons.write().unwrap_or_else(PoisonError::into_inner);
        koons.push(Arc::downgrade(koon));
        debug!(flock = %self.name(), koon = %koon.name(), "koon registered");
    }

    /// Names of the live koons registered with this flock.
    #[must_use]
    pub fn members(&self) -> Vec<String> {
        let koons = self.koons.read().unwrap_or_else(PoisonError::into_inner);
        koons.iter().filter_map(Weak::upgrade).map(|k| k.name().to_owned()).collect()
    }

    /// Subscribe an arbitrary receiver directly to the hub.
    pub fn subscribe<R: Receiver<P> + 'static>(&self, receiver: &Arc<R>, namespace: impl Into<String>) {
        self.member.subscribe(receiver, namespace);
    }

    /// Broadcast into the flock. Every member koon receives the message once.
    pub fn broadcast(&self, message: &mut Message<P>, namespace: &str) -> bool {
        self.member.broadcast(message, namespace)
    }
}

impl<P: Payload> Receiver<P> for Flock<P> {
    fn receive_message(&self, message: &mut Message<P>, namespace: &str) {
        self.member.broadcast(message, namespace);
    }
}
