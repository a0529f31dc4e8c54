use serde::{Deserialize, Serialize};

use crate::model::ids::LearnerId;

/// Identity of the signed-in learner.
///
/// Serialized the way the login flow stores it (`{"username": ...}`); any
/// other profile fields in the stored document are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(rename = "username")]
    learner: LearnerId,
}

impl SessionContext {
    #[must_use]
    pub fn new(learner: impl Into<LearnerId>) -> Self {
        Self {
            learner: learner.into(),
        }
    }

    #[must_use]
    pub fn learner(&self) -> &LearnerId {
        &self.learner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_stored_user_document() {
        let ctx: SessionContext =
            serde_json::from_str(r#"{"username": "ada", "email": "ada@example.com", "role": "learner"}"#)
                .unwrap();
        assert_eq!(ctx.learner().as_str(), "ada");
        assert_eq!(
            serde_json::to_string(&ctx).unwrap(),
            r#"{"username":"ada"}"#
        );
    }
}
