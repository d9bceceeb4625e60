//! Artifact naming convention.
//!
//! The zip archive written by the packaging step and the object-storage key
//! referenced by the apply phase must be computed from the same function —
//! the key is the join point between upload and create/update.

/// Object key for the deploy artifact: `{revision}-{stage}.zip`.
pub fn artifact_key(revision: &str, stage: &str) -> String {
    format!("{revision}-{stage}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_revision_and_stage() {
        assert_eq!(artifact_key("ab12cd3", "staging"), "ab12cd3-staging.zip");
        assert_eq!(
            artifact_key("ab12cd3", "production"),
            "ab12cd3-production.zip"
        );
    }
}
