//! The interactive prompt
// (c) 2026 ftpc contributors

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::debug;

use super::styles::{error, success, warning};
use crate::client::{Dispatcher, Outcome, Report};
use crate::protocol::Channel;

/// Shown when we are ready for a command
pub const PROMPT: &str = "ftp> ";

fn style_for(report: &Report) -> anstyle::Style {
    match report {
        Report::Uploaded {
            accepted: false, ..
        }
        | Report::Usage(_) => warning(),
        Report::Uploaded { .. } | Report::Downloaded { .. } => success(),
        Report::Failed { .. } => error(),
        Report::Listing(_) | Report::Nothing => anstyle::Style::new(),
    }
}

/// Reads command lines from `input` and dispatches them until the session ends.
///
/// End of input behaves like `quit`.
pub async fn run<S, I, O>(dispatcher: &mut Dispatcher<S>, input: I, mut output: O) -> Result<()>
where
    S: Channel,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let line = if let Some(line) = lines.next_line().await? {
            line
        } else {
            debug!("end of input");
            output.write_all(b"\n").await?;
            String::from("quit")
        };

        match dispatcher.dispatch(&line).await {
            Outcome::Continue(Report::Nothing) => (),
            Outcome::Continue(report) => {
                let style = style_for(&report);
                let text = format!("{style}{report}{style:#}\n");
                output.write_all(text.as_bytes()).await?;
            }
            Outcome::Terminated => {
                output.write_all(b"Closing now\n").await?;
                output.flush().await?;
                return Ok(());
            }
        }
    }
}
