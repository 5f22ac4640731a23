use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Identifier of a risk. Random v4 UUID, immutable once generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RiskId(Uuid);

#[allow(clippy::new_without_default)]
impl RiskId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the canonical hyphenated textual form.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        s.parse()
    }
}

impl From<Uuid> for RiskId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl FromStr for RiskId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Uuid::parse_str also accepts simple, braced and urn forms; only the
        // 36-char hyphenated form round-trips through Display.
        if s.len() != 36 {
            return Err(ModelError::MalformedIdentifier(s.to_string()));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::MalformedIdentifier(s.to_string()))
    }
}

impl TryFrom<String> for RiskId {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RiskId> for String {
    fn from(id: RiskId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for RiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// States a risk is allowed to be in. `as_str` is the only place their names are spelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskState {
    Open,
    Closed,
    Accepted,
    Investigating,
}

impl RiskState {
    pub const ALL: [RiskState; 4] = [
        RiskState::Open,
        RiskState::Closed,
        RiskState::Accepted,
        RiskState::Investigating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskState::Open => "open",
            RiskState::Closed => "closed",
            RiskState::Accepted => "accepted",
            RiskState::Investigating => "investigating",
        }
    }
}

impl FromStr for RiskState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ModelError::InvalidState(s.to_string()))
    }
}

impl fmt::Display for RiskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a risk. Has no identity of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAttributes {
    pub state: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl RiskAttributes {
    pub fn new(state: RiskState) -> Self {
        Self { state: state.as_str().to_string(), ..Default::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check that `state` names one of [`RiskState::ALL`].
    ///
    /// Called by the transport layer; the service layer trusts what it is given.
    pub fn validate(&self) -> Result<RiskState, ModelError> {
        self.state.parse()
    }
}

/// A stored risk: id plus attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub id: RiskId,
    #[serde(flatten)]
    pub attributes: RiskAttributes,
}

impl Risk {
    pub fn new(id: RiskId, attributes: RiskAttributes) -> Self {
        Self { id, attributes }
    }
}
