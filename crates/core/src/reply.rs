//! Adapter for analysis JSON received from the upload endpoint, so one
//! renderer can consume server and local results alike.

use serde::Deserialize;

use crate::analyzer::AnalysisResult;
use crate::error::CoreError;

/// Body of an analysis response: either a result or an `{ "error": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AnalysisReply {
    Failed {
        error: String,
        #[serde(default)]
        code: Option<String>,
    },
    Analysis(Box<AnalysisResult>),
}

impl AnalysisReply {
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        serde_json::from_str(body)
            .map_err(|e| CoreError::Validation(format!("Malformed analysis response: {e}")))
    }

    pub fn into_result(self) -> Result<AnalysisResult, String> {
        match self {
            Self::Analysis(result) => Ok(*result),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
