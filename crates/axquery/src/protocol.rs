//! JSON command protocol: request envelopes and responses.

use crate::errors::AutomationError;
use crate::formatter::AttributeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::formatter::OutputFormat;
pub use crate::locator::Locator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandType {
    Query,
    GetAttributes,
    DescribeElement,
    GetFocusedElement,
    PerformAction,
    ExtractText,
    CollectAll,
    Batch,
    Ping,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Query => "query",
            CommandType::GetAttributes => "getAttributes",
            CommandType::DescribeElement => "describeElement",
            CommandType::GetFocusedElement => "getFocusedElement",
            CommandType::PerformAction => "performAction",
            CommandType::ExtractText => "extractText",
            CommandType::CollectAll => "collectAll",
            CommandType::Batch => "batch",
            CommandType::Ping => "ping",
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(default)]
    pub command_id: String,
    pub command: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_hint: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_elements: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_commands: Option<Vec<CommandEnvelope>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_logging: Option<bool>,
}

impl CommandEnvelope {
    pub fn new(command_id: impl Into<String>, command: CommandType) -> Self {
        Self {
            command_id: command_id.into(),
            command,
            application: None,
            locator: None,
            path_hint: None,
            attributes: None,
            max_elements: None,
            max_depth: None,
            output_format: None,
            action_name: None,
            action_value: None,
            sub_commands: None,
            debug_logging: None,
        }
    }

    pub fn application(mut self, application: &str) -> Self {
        self.application = Some(application.to_string());
        self
    }

    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn attributes(mut self, attributes: &[&str]) -> Self {
        self.attributes = Some(attributes.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn action(mut self, name: &str, value: Option<Value>) -> Self {
        self.action_name = Some(name.to_string());
        self.action_value = value;
        self
    }

    pub fn sub_commands(mut self, commands: Vec<CommandEnvelope>) -> Self {
        self.sub_commands = Some(commands);
        self
    }

    /// Decode one request line.
    pub fn from_json(line: &str) -> Result<Self, AutomationError> {
        serde_json::from_str(line)
            .map_err(|e| AutomationError::InvalidRequest(format!("malformed command: {e}")))
    }
}

/// The externally visible shape of one resolved element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultElement {
    pub attributes: AttributeMap,
    /// Brief descriptions from the element up to its application (or the
    /// search root), both included.
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingStatus {
    pub message: String,
    pub version: String,
    pub permissions_granted: bool,
}

/// Payload of a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Element(ResultElement),
    Elements {
        elements: Vec<ResultElement>,
        count: usize,
    },
    Batch {
        results: Vec<CommandResponse>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element: Option<ResultElement>,
    },
    Status(PingStatus),
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub command_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log: Option<Vec<String>>,
}

impl CommandResponse {
    pub fn ok(command_id: &str, data: ResponseData) -> Self {
        Self {
            command_id: command_id.to_string(),
            success: true,
            data: Some(data),
            error: None,
            debug_log: None,
        }
    }

    pub fn failure(command_id: &str, error: &AutomationError) -> Self {
        Self {
            command_id: command_id.to_string(),
            success: false,
            data: None,
            error: Some(error.to_string()),
            debug_log: None,
        }
    }

    pub fn with_debug_log(mut self, log: Option<Vec<String>>) -> Self {
        self.debug_log = log;
        self
    }

    pub fn element(&self) -> Option<&ResultElement> {
        match self.data.as_ref()? {
            ResponseData::Element(element) => Some(element),
            ResponseData::Text { element, .. } => element.as_ref(),
            _ => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"command_id":{},"success":false,"error":{}}}"#,
                Value::String(self.command_id.clone()),
                Value::String(format!("failed to encode response: {e}"))
            )
        })
    }
}
