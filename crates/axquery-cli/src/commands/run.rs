use super::{command_id_hint, render};
use anyhow::{anyhow, Context, Result};
use axquery::protocol::{CommandEnvelope, CommandResponse};
use axquery::AxThread;
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Command envelope as inline JSON
    json: Option<String>,

    /// Read the command envelope from a file
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

impl RunCommand {
    /// Exit code 1 when the command itself failed.
    pub async fn execute(&self, ax: &AxThread) -> Result<i32> {
        let source = self.source()?;
        let response = match CommandEnvelope::from_json(&source) {
            Ok(envelope) => ax.execute(envelope).await?,
            Err(e) => CommandResponse::failure(&command_id_hint(&source), &e),
        };
        println!("{}", render(&response, self.pretty));
        Ok(if response.success { 0 } else { 1 })
    }

    fn source(&self) -> Result<String> {
        match (&self.json, &self.file) {
            (Some(_), Some(_)) => Err(anyhow!(
                "give the command either inline or with --file, not both"
            )),
            (Some(json), None) => Ok(json.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            (None, None) => Err(anyhow!("no command given; pass JSON inline or use --file")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn run(json: Option<&str>, file: Option<PathBuf>) -> RunCommand {
        RunCommand {
            json: json.map(str::to_string),
            file,
            pretty: false,
        }
    }

    #[test]
    fn test_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"command":"ping"}"#).unwrap();
        let source = run(None, Some(file.path().to_path_buf())).source().unwrap();
        assert_eq!(source, r#"{"command":"ping"}"#);
    }

    #[test]
    fn test_conflicting_sources_are_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = run(Some("{}"), Some(file.path().to_path_buf()))
            .source()
            .unwrap_err();
        assert!(err.to_string().contains("not both"));
        assert!(run(None, None).source().is_err());
    }
}
