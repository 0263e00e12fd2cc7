//! The vocabulary exchanged between callers and engines.
//!
//! - [`Choice`]: something the acting player may do right now.
//! - [`Action`]: the choice a player actually made. This is the unit
//!   recorded in the action log.
//! - [`Event`]: a description of what just happened.
//!
//! All three are identified by an abbreviation (`abbr`) and may carry a
//! [`Payload`] of JSON data for the client's presentation.
//!
//! ```
//! use turnworks::core::{Action, Choice};
//!
//! let choices = vec![Choice::new("A", "Act"), Choice::new("P", "Pass")];
//! let action = Action::new("P");
//!
//! assert!(action.matches(&choices[1]));
//! assert!(!action.matches(&choices[0]));
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// JSON text carried alongside a choice, action, event or player.
///
/// Stored as text rather than a parsed tree so the game aggregate encodes
/// identically with self-describing and non-self-describing formats.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    /// Wrap JSON text without checking it.
    pub fn raw(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    /// Encode any serializable value.
    pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_string(value).map(Self)
    }

    /// Decode the payload into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.0)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self(value.to_string())
    }
}

/// A move the acting player may choose.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Choice {
    /// Unique among the choices offered in one state.
    pub abbr: String,

    /// Human-readable description (used in console mode).
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Payload>,
}

impl Choice {
    pub fn new(abbr: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            abbr: abbr.into(),
            text: text.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: Payload) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Build the action that selects this choice.
    #[must_use]
    pub fn to_action(&self) -> Action {
        Action::new(self.abbr.clone())
    }
}

/// The move a player made.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Abbreviation of the selected [`Choice`].
    pub abbr: String,

    /// Always written, even when empty, so the log also encodes in
    /// non-self-describing formats.
    #[serde(default)]
    pub detail: Option<Payload>,
}

impl Action {
    pub fn new(abbr: impl Into<String>) -> Self {
        Self {
            abbr: abbr.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: Payload) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Does this action select `choice`? Abbreviations compare exactly.
    #[must_use]
    pub fn matches(&self, choice: &Choice) -> bool {
        self.abbr == choice.abbr
    }
}

/// Something that happened, shown to every player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Event type; may be empty for plain announcements.
    #[serde(default)]
    pub abbr: String,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Payload>,
}

impl Event {
    pub fn new(abbr: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            abbr: abbr.into(),
            text: text.into(),
            detail: None,
        }
    }

    /// An event with no abbreviation.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new("", text)
    }

    #[must_use]
    pub fn with_detail(mut self, detail: Payload) -> Self {
        self.detail = Some(detail);
        self
    }
}
