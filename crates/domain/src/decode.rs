//! Typed decode targets for response bodies.
//!
//! A call may register a [`DecodeTarget`]; the runner decodes the response
//! body into it before checkers run. [`Captured`] is the standard target: a
//! cloneable slot the test keeps to read the typed value after the run.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;

/// A type-erased decoded response, shared between the target and checkers.
pub type Decoded = Arc<dyn Any + Send + Sync>;

/// Receives the typed decode of a response body.
pub trait DecodeTarget: Send + Sync {
    /// Decodes `body`, keeps the result and returns it type-erased.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not decode into the target type.
    fn decode(&self, body: &[u8]) -> Result<Decoded, serde_json::Error>;
}

/// Shared slot holding the last value decoded into it.
pub struct Captured<T> {
    slot: Arc<Mutex<Option<Arc<T>>>>,
}

impl<T> Captured<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the decoded value, if the call has run and decoded.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.lock().clone()
    }

    /// Returns true once a value has been decoded into this slot.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T> Clone for Captured<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Captured<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Captured<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captured")
            .field("value", &*self.slot.lock())
            .finish()
    }
}

impl<T> DecodeTarget for Captured<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    fn decode(&self, body: &[u8]) -> Result<Decoded, serde_json::Error> {
        let value = Arc::new(serde_json::from_slice::<T>(body)?);
        *self.slot.lock() = Some(Arc::clone(&value));
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_captured_starts_empty() {
        let captured = Captured::<Item>::new();
        assert!(!captured.is_set());
        assert!(captured.get().is_none());
    }

    #[test]
    fn test_decode_fills_every_clone() {
        let captured = Captured::<Item>::new();
        let handle = captured.clone();

        let decoded = captured.decode(br#"{"id": 7}"#).unwrap();

        assert_eq!(decoded.downcast_ref::<Item>(), Some(&Item { id: 7 }));
        assert_eq!(*handle.get().unwrap(), Item { id: 7 });
    }

    #[test]
    fn test_decode_failure_leaves_slot_untouched() {
        let captured = Captured::<Item>::new();
        assert!(captured.decode(b"not json").is_err());
        assert!(!captured.is_set());
    }
}
