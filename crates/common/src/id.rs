//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// Generator for externally visible identifiers.
///
/// Rows use auto-increment keys; these ids are what customers and payment
/// records see.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a booking confirmation code such as `VY-7K3Q9XPA`.
    ///
    /// Uses the random tail of a ULID so codes from the same millisecond
    /// still differ.
    #[must_use]
    pub fn booking_reference(&self) -> String {
        let ulid = Ulid::new().to_string();
        format!("VY-{}", &ulid[ulid.len() - 8..])
    }

    /// Generate a payment transaction reference.
    #[must_use]
    pub fn transaction_ref(&self) -> String {
        format!("txn_{}", Uuid::new_v4().simple())
    }
}
