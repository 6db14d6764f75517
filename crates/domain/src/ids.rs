use std::fmt::{Display, Formatter};
use std::str::FromStr;

use orbit_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
                    AppError::Validation(format!("invalid {} '{value}': {error}", $label))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of an application registered in a workspace.
    ApplicationId,
    "application id"
);
uuid_identifier!(
    /// Identifier of a virtual cluster owned by an application.
    VirtualClusterId,
    "virtual cluster id"
);
uuid_identifier!(
    /// Identifier of a Kafka topic.
    TopicId,
    "topic id"
);
uuid_identifier!(
    /// Identifier of a cross-workspace topic share.
    TopicShareId,
    "topic share id"
);
uuid_identifier!(
    /// Identifier of a share auto-approval policy.
    SharePolicyId,
    "share policy id"
);
uuid_identifier!(
    /// Identifier of an application service account.
    ServiceAccountId,
    "service account id"
);

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::TopicId;

    #[test]
    fn identifier_parses_its_display_value() {
        let topic_id = TopicId::new();
        let parsed = TopicId::from_str(topic_id.to_string().as_str());
        assert_eq!(parsed.ok(), Some(topic_id));
    }

    #[test]
    fn malformed_identifier_is_rejected() {
        assert!(TopicId::from_str("not-a-uuid").is_err());
    }
}
