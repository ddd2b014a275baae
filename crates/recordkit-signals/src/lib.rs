//! # recordkit-signals
//!
//! Signal dispatcher for recordkit. Lets observers hear about record types
//! being declared, record instances being constructed, and field writes being
//! rejected, without the record layer knowing who is listening.
//!
//! ## Usage
//!
//! ```
//! use recordkit_signals::{InstanceCreated, Signal};
//! use std::sync::Arc;
//!
//! let signal: Signal<InstanceCreated> = Signal::new();
//!
//! signal.connect("printer", Arc::new(|event: &InstanceCreated| {
//!     println!("Record {} new instance", event.model);
//! }));
//!
//! signal.send(&InstanceCreated { model: "user" });
//! assert_eq!(signal.receiver_count(), 1);
//! ```

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

/// The type signature for a signal receiver callback.
///
/// Receivers observe a reference to the signal payload.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Each signal carries a payload type `T`. Receivers are called in the order
/// they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// If a receiver with the same ID is already connected, it is replaced.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().expect("signal lock poisoned");

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().expect("signal lock poisoned");
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers.
    ///
    /// The receiver list is snapshotted first, so a receiver may connect or
    /// disconnect receivers on the same signal without deadlocking.
    pub fn send(&self, payload: &T) {
        let receivers: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .expect("signal lock poisoned")
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in &receivers {
            callback(payload);
        }
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().expect("signal lock poisoned").len()
    }
}

// ── Payloads ─────────────────────────────────────────────────────────

/// Sent once when a record type's schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDeclared {
    /// The record type name.
    pub model: &'static str,
    /// Declared field names in schema order.
    pub fields: Vec<&'static str>,
}

/// Sent after a record instance has been constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceCreated {
    /// The record type name.
    pub model: &'static str,
}

/// Sent when a field write is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRejected {
    /// The record type name.
    pub model: &'static str,
    /// The field the write targeted.
    pub field: String,
    /// The rejected value, rendered for display.
    pub value: String,
    /// Short code for the reason (`"unknown_field"`, `"invalid_value"`).
    pub reason: &'static str,
}

// ── Global signal registry ───────────────────────────────────────────

/// A global registry holding the well-known record signals.
pub struct SignalRegistry {
    /// Fired when a record type is declared.
    pub model_declared: Signal<ModelDeclared>,
    /// Fired when a record instance is constructed.
    pub instance_created: Signal<InstanceCreated>,
    /// Fired when a field write is refused.
    pub field_rejected: Signal<FieldRejected>,
}

impl SignalRegistry {
    fn new() -> Self {
        Self {
            model_declared: Signal::new(),
            instance_created: Signal::new(),
            field_rejected: Signal::new(),
        }
    }
}

/// The global signal registry instance.
///
/// # Examples
///
/// ```
/// use recordkit_signals::{ModelDeclared, SIGNALS};
/// use std::sync::Arc;
///
/// SIGNALS.model_declared.connect("my_handler", Arc::new(|event: &ModelDeclared| {
///     println!("Creating new record type: {}", event.model);
/// }));
/// ```
pub static SIGNALS: Lazy<SignalRegistry> = Lazy::new(SignalRegistry::new);

/// Receiver id used by [`connect_logging_receivers`].
pub const LOGGING_RECEIVER: &str = "recordkit.logging";

/// Connects receivers that log every declaration, construction and rejection.
///
/// Calling this more than once replaces the previous logging receivers.
pub fn connect_logging_receivers() {
    SIGNALS.model_declared.connect(
        LOGGING_RECEIVER,
        Arc::new(|event: &ModelDeclared| {
            tracing::info!(model = event.model, fields = ?event.fields, "Creating new record type");
        }),
    );
    SIGNALS.instance_created.connect(
        LOGGING_RECEIVER,
        Arc::new(|event: &InstanceCreated| {
            tracing::info!(model = event.model, "Record new instance");
        }),
    );
    SIGNALS.field_rejected.connect(
        LOGGING_RECEIVER,
        Arc::new(|event: &FieldRejected| {
            tracing::warn!(
                model = event.model,
                field = %event.field,
                value = %event.value,
                reason = event.reason,
                "Rejected field write"
            );
        }),
    );
}

/// Disconnects the receivers installed by [`connect_logging_receivers`].
pub fn disconnect_logging_receivers() {
    SIGNALS.model_declared.disconnect(LOGGING_RECEIVER);
    SIGNALS.instance_created.disconnect(LOGGING_RECEIVER);
    SIGNALS.field_rejected.disconnect(LOGGING_RECEIVER);
}
