/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Caller-facing result envelope.
//!
//! Every engine operation can be wrapped into a [`Response`], which
//! serializes either as `{"data": ...}` or as
//! `{"error": {"kind": ..., "message": ...}}`.

use crate::error::{ErrorKind, RegistrationError};
use serde::{Deserialize, Serialize};

/// The failure half of a [`Response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Coarse error class.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl From<&RegistrationError> for Failure {
    fn from(err: &RegistrationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Success with data, or failure with a kind and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response<T> {
    /// The operation succeeded.
    Success {
        /// Operation result.
        data: T,
    },
    /// The operation failed.
    Failure {
        /// What went wrong.
        error: Failure,
    },
}

impl<T> Response<T> {
    /// Returns `true` for a success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Failure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

impl<T: Serialize> Response<T> {
    /// Serializes the envelope to a JSON string.
    ///
    /// # Errors
    ///
    /// Fails only if `T`'s own serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<T> From<Result<T, RegistrationError>> for Response<T> {
    fn from(result: Result<T, RegistrationError>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(err) => Self::Failure {
                error: Failure::from(&err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegistrationId;

    #[test]
    fn test_success_envelope() {
        let response: Response<u32> = Ok(7).into();
        assert!(response.is_ok());
        assert_eq!(response.data(), Some(&7));
    }

    #[test]
    fn test_failure_envelope_carries_kind() {
        let response: Response<u32> =
            Err(RegistrationError::RegistrationNotFound(RegistrationId::from(3))).into();
        let error = response.error().unwrap();
        assert_eq!(error.kind, ErrorKind::NotFound);
        assert_eq!(error.message, "registration 3 not found");
    }

    #[test]
    fn test_success_to_json() {
        let response: Response<Vec<u32>> = Ok(vec![1, 2]).into();
        assert_eq!(response.to_json().unwrap(), r#"{"data":[1,2]}"#);
    }

    #[test]
    fn test_failure_serializes_with_kind_and_message() {
        let response: Response<()> =
            Err(RegistrationError::InvalidInput("seat limit".to_string())).into();
        let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["error"]["kind"], "invalid_input");
        assert_eq!(value["error"]["message"], "invalid input: seat limit");
        assert!(value.get("data").is_none());
    }
}
