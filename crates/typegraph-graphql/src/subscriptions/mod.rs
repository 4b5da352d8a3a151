//! Subscription support: the event bus and the subscription root type.

pub mod events;
pub(crate) mod fields;

pub use events::{EVENT_BUFFER_SIZE, PubSub, PublishedEvent};
