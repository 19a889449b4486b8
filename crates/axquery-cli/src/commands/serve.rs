use super::{command_id_hint, render};
use anyhow::{Context, Result};
use axquery::protocol::{CommandEnvelope, CommandResponse};
use axquery::AxThread;
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

#[derive(Debug, Default, Args)]
pub struct ServeCommand {
    /// Stop after this many commands
    #[arg(long)]
    limit: Option<usize>,
}

impl ServeCommand {
    /// One JSON envelope per stdin line, one response per stdout line.
    /// Returns when stdin closes or the limit is reached.
    pub async fn execute(&self, ax: &AxThread) -> Result<i32> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();
        let mut handled = 0usize;

        info!("Waiting for commands on stdin");
        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match CommandEnvelope::from_json(line) {
                Ok(envelope) => {
                    debug!("Received {} {}", envelope.command, envelope.command_id);
                    ax.execute(envelope).await?
                }
                Err(e) => CommandResponse::failure(&command_id_hint(line), &e),
            };

            let mut out = render(&response, false);
            out.push('\n');
            stdout
                .write_all(out.as_bytes())
                .await
                .context("failed to write response")?;
            stdout.flush().await.context("failed to flush stdout")?;

            handled += 1;
            if self.limit.is_some_and(|limit| handled >= limit) {
                break;
            }
        }

        info!("Served {} commands", handled);
        Ok(0)
    }
}
