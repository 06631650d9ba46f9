//! Newtype identifiers carried in webhook request headers.
//!
//! Both identifiers arrive as plain header strings. Wrapping them keeps the
//! routing key ([`EventType`]) from being confused with the correlation id
//! ([`DeliveryId`]) as they travel from the endpoint through the dispatcher
//! into handler diagnostics.

use gitee::GiteeEvent;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Routing key taken from the `X-Gitee-Event` header (e.g. `"note"`).
    ///
    /// The dispatcher treats this as an opaque key; only the handler registry
    /// knows which values have a handler behind them.
    EventType
}

impl EventType {
    /// Returns the event type a typed Gitee event is delivered under.
    pub fn of<E: GiteeEvent>() -> Self {
        Self(E::EVENT_TYPE.to_string())
    }
}

string_id! {
    /// Correlation id taken from the `X-Gitee-Timestamp` header.
    ///
    /// Used only to tie log lines for one delivery together.
    DeliveryId
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
