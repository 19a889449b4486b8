//! Command dispatch.
//!
//! [`Dispatcher::dispatch`] maps one envelope to its handler and turns the
//! outcome into a [`CommandResponse`]. Handlers return
//! `Result<ResponseData, AutomationError>`; every error becomes the `error`
//! string of that one response.

mod action;
mod batch;
mod collect;
mod query;
mod resolve;
mod text;

use crate::config::AxConfig;
use crate::context::DebugLog;
use crate::errors::AutomationError;
use crate::platforms::AccessibilityEngine;
use crate::protocol::{CommandEnvelope, CommandResponse, CommandType, PingStatus, ResponseData};
use tracing::{info, instrument, warn};

pub use text::harvest_text;

const PERMISSION_HINT: &str =
    "grant access in System Settings > Privacy & Security > Accessibility and restart the client";

pub struct Dispatcher {
    engine: Box<dyn AccessibilityEngine>,
    config: AxConfig,
}

impl Dispatcher {
    pub fn new(engine: Box<dyn AccessibilityEngine>, config: AxConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &AxConfig {
        &self.config
    }

    pub fn engine(&self) -> &dyn AccessibilityEngine {
        self.engine.as_ref()
    }

    /// Run one command. Never panics on live data and never fails as a
    /// whole: errors are reported inside the response.
    #[instrument(skip_all, fields(command = %envelope.command, id = %envelope.command_id))]
    pub fn dispatch(&self, envelope: &CommandEnvelope) -> CommandResponse {
        let mut log = DebugLog::new(envelope.debug_logging.unwrap_or(self.config.debug_logging));

        let response = match self.route(envelope, &mut log) {
            Ok(data) => {
                info!("{} {} succeeded", envelope.command, envelope.command_id);
                CommandResponse::ok(&envelope.command_id, data)
            }
            Err(e) => {
                if e.is_absence() {
                    info!("{} {} failed: {}", envelope.command, envelope.command_id, e);
                } else {
                    warn!("{} {} failed: {}", envelope.command, envelope.command_id, e);
                }
                log.push(format!("error ({}): {e}", e.kind().as_str()));
                CommandResponse::failure(&envelope.command_id, &e)
            }
        };
        response.with_debug_log(log.into_entries())
    }

    fn route(
        &self,
        envelope: &CommandEnvelope,
        log: &mut DebugLog,
    ) -> Result<ResponseData, AutomationError> {
        if envelope.command != CommandType::Ping && !self.engine.has_permissions() {
            return Err(AutomationError::PermissionDenied(PERMISSION_HINT.to_string()));
        }

        match envelope.command {
            CommandType::Query | CommandType::GetAttributes => {
                query::handle_query(self, envelope, log)
            }
            CommandType::DescribeElement => query::handle_describe(self, envelope, log),
            CommandType::GetFocusedElement => query::handle_focused(self, envelope, log),
            CommandType::PerformAction => action::handle_perform_action(self, envelope, log),
            CommandType::ExtractText => text::handle_extract_text(self, envelope, log),
            CommandType::CollectAll => collect::handle_collect_all(self, envelope, log),
            CommandType::Batch => batch::handle_batch(self, envelope, log),
            CommandType::Ping => Ok(ResponseData::Status(PingStatus {
                message: "pong".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                permissions_granted: self.engine.has_permissions(),
            })),
        }
    }
}
