use serde::{Deserialize, Serialize};

/// Actor information carried by the authenticated session.
///
/// Role strings are kept raw; normalization into closed roles happens in the
/// domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    subject: String,
    display_name: String,
    roles: Vec<String>,
}

impl ActorIdentity {
    /// Creates an actor identity from authentication data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            roles,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current actor.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the raw role strings attached to the session.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.roles.as_slice()
    }
}
