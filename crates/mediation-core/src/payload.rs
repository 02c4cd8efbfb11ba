//! Serialized request and response bodies

use crate::error::{MediationError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A serialized body together with the name of the type it was encoded from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payload {
    body: String,
    type_name: String,
}

impl Payload {
    /// Payload from an already serialized body
    pub fn raw(body: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            type_name: type_name.into(),
        }
    }

    /// Encode `value` as JSON.
    ///
    /// Encoding is deterministic for equal values of types whose `Serialize`
    /// impl is, which is what makes replay lookups by request body work.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let type_name = std::any::type_name::<T>();
        let body = serde_json::to_string(value)
            .map_err(|source| MediationError::Encode { type_name, source })?;
        Ok(Self::raw(body, type_name))
    }

    /// Decode the body as `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|source| MediationError::Decode {
            stored_type: self.type_name.clone(),
            type_name: std::any::type_name::<T>(),
            source,
        })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// Result of a downstream call: a returned value or a raised error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "snake_case")]
pub enum Outcome {
    Success(Payload),
    Failure(Payload),
}

impl Outcome {
    /// Encode a call result
    pub fn from_result<T, E>(result: &std::result::Result<T, E>) -> Result<Self>
    where
        T: Serialize,
        E: Serialize,
    {
        match result {
            Ok(value) => Payload::json(value).map(Outcome::Success),
            Err(err) => Payload::json(err).map(Outcome::Failure),
        }
    }

    /// Decode back into the call's result type
    pub fn decode<T, E>(&self) -> Result<std::result::Result<T, E>>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        match self {
            Outcome::Success(payload) => payload.decode().map(Ok),
            Outcome::Failure(payload) => payload.decode().map(Err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn payload(&self) -> &Payload {
        match self {
            Outcome::Success(payload) | Outcome::Failure(payload) => payload,
        }
    }
}
