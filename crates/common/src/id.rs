//! ID generation utilities.

use uuid::Uuid;

/// ID generator for rows and bearer tokens.
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

    /// Generate a new row ID.
    ///
    /// UUID v7 is time-ordered, so primary keys stay roughly sorted by
    /// creation time.
    #[must_use]
    pub fn generate(&self) -> String {
        Uuid::now_v7().to_string()
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component in session tokens
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_v7() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 36);
        assert_ne!(id1, id2);
        assert_eq!(Uuid::parse_str(&id1).unwrap().get_version_num(), 7);
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
        assert_ne!(token, id_gen.generate_token());
    }
}
