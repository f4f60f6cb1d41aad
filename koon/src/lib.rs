//! Loop-safe publish/subscribe fabric shared by the render core and the
//! physics bridge.
//!
//! ARCHITECTURE
//! ============
//! Every endpoint is a [`NetworkMember`]: a name, a UUID and a list of
//! subscribed [`Receiver`]s. Broadcasting a [`Message`] tags it with the
//! member's name and hands it to every subscriber whose namespace filter
//! matches. Two endpoint flavours sit on top:
//!
//! | Type | Role |
//! |------|------|
//! | [`Koon`] | Leaf endpoint. Re-broadcasts structured payloads it receives to its own subscribers. |
//! | [`Flock`] | Hub. Registering a koon wires flock and koon to each other, giving many-to-many delivery. |
//!
//! DESIGN
//! ======
//! - A message is delivered to each named endpoint at most once. The
//!   `_senders` list on the message is the only loop guard, so cyclic
//!   subscriptions (flock <-> koon) never storm.
//! - Subscriptions hold `Weak` references. Dropping the owning `Arc` is the
//!   unsubscribe; dead entries are pruned on the next broadcast.
//! - Payloads are generic. The fabric only asks whether a payload is
//!   structured (see [`Payload`]); routing by kind is the receivers' job.

pub mod endpoint;
pub mod member;
pub mod message;

pub use endpoint::{Flock, Koon};
pub use member::NetworkMember;
pub use message::{Message, Payload, Receiver};
