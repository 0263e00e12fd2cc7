//! Opaque identities for games and players.
//!
//! Identities come from outside the core (a uuid generator, the credential
//! service, a persisted file). The core never parses them; it only compares
//! them, hashes them and prints them.
//!
//! ```
//! use turnworks::core::{GameId, PlayerId};
//!
//! let game = GameId::new("0b6f2c");
//! let player = PlayerId::from("alice");
//!
//! assert_eq!(game.as_str(), "0b6f2c");
//! assert_eq!(player.to_string(), "alice");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the id is the empty string.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifies one game. Unique across the registry.
    GameId
);

string_id!(
    /// Identifies a player within one game.
    PlayerId
);

string_id!(
    /// Identifies the user account that owns a player.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_compare_by_value() {
        assert_eq!(PlayerId::new("a"), PlayerId::from("a"));
        assert_ne!(PlayerId::new("a"), PlayerId::new("b"));
        assert!(PlayerId::default().is_empty());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = GameId::new("T");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"T\"");
        let back: GameId = serde_json::from_str("\"T\"").unwrap();
        assert_eq!(back, id);
    }
}
