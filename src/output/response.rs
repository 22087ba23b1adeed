//! The JSON envelope every command prints, and the exit code that goes
//! with it.

use item_input::error::Hint;
use item_input::{Error, ErrorCode, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// `{"success": true, "data": ..}` or `{"success": false, "error": ..}`.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code.as_str(),
            message: err.message.clone(),
            details: err.details.clone(),
            hints: err.hints.clone(),
        }
    }
}

/// A finished command: what to print and how to exit.
#[derive(Debug)]
pub struct Reply {
    pub envelope: Envelope,
    pub exit_code: u8,
}

impl Reply {
    /// Wrap a handler's result. Handler exit codes are clamped to `0..=255`;
    /// errors get the code of their category.
    pub fn from_cmd<T: Serialize>(result: Result<(T, i32)>) -> Self {
        let result = result.and_then(|(data, exit_code)| {
            serde_json::to_value(data)
                .map(|data| (data, exit_code))
                .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))
        });
        match result {
            Ok((data, exit_code)) => Self {
                envelope: Envelope {
                    success: true,
                    data: Some(data),
                    error: None,
                },
                exit_code: exit_code.clamp(0, 255) as u8,
            },
            Err(err) => Self {
                exit_code: exit_code_for_error(err.code),
                envelope: Envelope {
                    success: false,
                    data: None,
                    error: Some(ErrorBody::from(&err)),
                },
            },
        }
    }

    /// Pretty-print the envelope on stdout. A closed pipe is ignored.
    pub fn print(&self) -> Result<()> {
        let payload = serde_json::to_string_pretty(&self.envelope)
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))?;
        match writeln!(io::stdout().lock(), "{}", payload) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                Err(Error::internal_io(e.to_string(), Some("write stdout".to_string())))
            }
            _ => Ok(()),
        }
    }
}

fn exit_code_for_error(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::ValidationInvalidJson => 2,

        ErrorCode::DefinitionInvalid | ErrorCode::DefinitionChoicesUnavailable => 3,

        ErrorCode::PromptScriptExhausted | ErrorCode::PromptUnexpectedAnswer => 4,

        ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}
