//! Idempotency keys for POST requests.

use uuid::Uuid;

/// Header carrying the idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Produces the value of the `Idempotency-Key` header.
pub trait IdempotencyKeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl IdempotencyKeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Always returns the same key. Useful for replaying a request that may or
/// may not have reached the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedKeyGenerator(pub String);

impl IdempotencyKeyGenerator for FixedKeyGenerator {
    fn generate(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_keys_are_unique() {
        let generator = UuidKeyGenerator;
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn fixed_key_repeats() {
        let generator = FixedKeyGenerator("retry-1".to_string());
        assert_eq!(generator.generate(), "retry-1");
        assert_eq!(generator.generate(), "retry-1");
    }
}
