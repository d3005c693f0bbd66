//! Registry of survey-capable page kinds.
//!
//! Built explicitly at startup and carried in application state, so the
//! authorization and listing queries are scoped without a process-wide
//! memoized global. Hosts embedding additional survey page kinds register
//! them here before the server starts.

/// Page kind marker for the standard anonymous survey page.
pub const KIND_STANDARD: &str = "standard";

/// Page kind marker for surveys that record the submitting user and accept
/// one submission per user.
pub const KIND_PER_USER: &str = "per_user";

#[derive(Debug, Clone)]
pub struct SurveyKindRegistry {
    kinds: Vec<String>,
}

impl SurveyKindRegistry {
    /// Registry with the two built-in page kinds.
    pub fn with_defaults() -> Self {
        Self {
            kinds: vec![KIND_STANDARD.to_string(), KIND_PER_USER.to_string()],
        }
    }

    /// Register an additional survey-capable page kind. Idempotent.
    pub fn register(&mut self, kind: impl Into<String>) {
        let kind = kind.into();
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    /// All registered kind codes, in registration order.
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_builtin_kinds() {
        let registry = SurveyKindRegistry::with_defaults();
        assert!(registry.contains(KIND_STANDARD));
        assert!(registry.contains(KIND_PER_USER));
        assert!(!registry.contains("newsletter"));
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = SurveyKindRegistry::with_defaults();
        registry.register("quiz");
        registry.register("quiz");
        assert_eq!(registry.kinds().len(), 3);
        assert!(registry.contains("quiz"));
    }
}
