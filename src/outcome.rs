use crate::error::TranscodeError;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// ホスト（UI）に返す処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { value: String },
    Failure { error: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Outcome::Success { value } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error } => Some(error),
        }
    }
}

impl From<Result<String, TranscodeError>> for Outcome {
    fn from(result: Result<String, TranscodeError>) -> Self {
        match result {
            Ok(value) => Outcome::Success { value },
            Err(e) => Outcome::Failure {
                error: e.to_string(),
            },
        }
    }
}

// {"success": bool, "value"|"error": string} の形で出力する
impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Success { value } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("value", value)?;
            }
            Outcome::Failure { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
