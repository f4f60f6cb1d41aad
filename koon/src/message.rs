//! Message envelope, payload contract and the receiver trait.

use serde::{Deserialize, Serialize};

/// What the fabric needs to know about a payload.
pub trait Payload: Send + Sync + 'static {
    /// Whether the payload is a structured message. Koons only relay
    /// structured payloads; primitives stop at the first koon.
    fn is_structured(&self) -> bool;
}

impl Payload for serde_json::Value {
    fn is_structured(&self) -> bool {
        self.is_object() || self.is_array()
    }
}

/// Anything that can be subscribed to a [`crate::NetworkMember`].
///
/// `receive_message` gets the same mutable envelope the broadcaster holds,
/// so sender tags added downstream are visible to later subscribers.
pub trait Receiver<P>: Send + Sync {
    fn receive_message(&self, message: &mut Message<P>, namespace: &str);
}

/// A payload plus the routing tags accumulated while it travels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<P> {
    /// The carried payload.
    pub payload: P,
    /// Names of every endpoint that has already broadcast this message.
    #[serde(rename = "_senders", default)]
    senders: Vec<String>,
    /// Name of the last koon that relayed this message.
    #[serde(rename = "_sender", default, skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
}

impl<P> Message<P> {
    /// Wrap a payload in a fresh, untagged envelope.
    pub fn new(payload: P) -> Self {
        Self { payload, senders: Vec::new(), sender: None }
    }

    /// Endpoints this message has passed through, in order.
    #[must_use]
    pub fn senders(&self) -> &[String] {
        &self.senders
    }

    /// The last koon that relayed this message, if any.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Whether the endpoint called `name` has already broadcast this message.
    #[must_use]
    pub fn has_passed(&self, name: &str) -> bool {
        self.senders.iter().any(|s| s == name)
    }

    /// Unwrap the payload, discarding routing tags.
    pub fn into_payload(self) -> P {
        self.payload
    }

    pub(crate) fn tag(&mut self, name: &str) {
        self.senders.push(name.to_owned());
    }

    pub(crate) fn set_sender(&mut self, name: &str) {
        self.sender = Some(name.to_owned());
    }
}
