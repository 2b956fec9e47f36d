use serde::{Deserialize, Serialize};

use crate::CharsetDecodeError;

/// How a lazily read package part presents itself to the model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "part", rename_all = "snake_case")]
pub enum PartState<T> {
    Loaded(T),
    #[default]
    Missing,
    /// The part exists but its bytes could not be decoded.
    Undecodable(CharsetDecodeError),
}

impl<T> PartState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            PartState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            PartState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// `Ok(None)` for a missing part, the decode error for an undecodable one.
    pub fn read(&self) -> Result<Option<&T>, CharsetDecodeError> {
        match self {
            PartState::Loaded(value) => Ok(Some(value)),
            PartState::Missing => Ok(None),
            PartState::Undecodable(err) => Err(err.clone()),
        }
    }
}

impl<T> From<T> for PartState<T> {
    fn from(value: T) -> Self {
        PartState::Loaded(value)
    }
}
