//! User profile model

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Display profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

impl UserProfile {
    /// Create a profile from user input; the name is trimmed and must not be empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("Please enter your name"));
        }
        Ok(Self { name })
    }
}

/// Whether the signed-in user has set up a profile yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    Absent,
    Present(UserProfile),
}

impl ProfileState {
    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Absent => None,
            Self::Present(profile) => Some(profile),
        }
    }

    #[must_use]
    pub fn into_option(self) -> Option<UserProfile> {
        match self {
            Self::Absent => None,
            Self::Present(profile) => Some(profile),
        }
    }
}

impl From<Option<UserProfile>> for ProfileState {
    fn from(value: Option<UserProfile>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}
