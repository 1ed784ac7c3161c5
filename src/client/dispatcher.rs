//! Command dispatch: one command line in, one exchange with the server
// (c) 2026 ftpc contributors

use std::fmt::Display;

use tracing::{debug, trace, warn};

use crate::control::{ControlChannel, EphemeralFactory};
use crate::protocol::{Channel, Command, InvalidCommand};
use crate::session::{Get, List, Put, TransferCommand as _};
use crate::{Error, Result};

/// Where the dispatcher is in an exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum State {
    /// Waiting for a command
    Idle,
    /// Command sent; waiting for the server to name an ephemeral port
    AwaitingPort,
    /// Data is moving over an ephemeral channel
    InTransfer,
    /// Upload done; waiting for the server's verdict
    AwaitingAck,
    /// Download done; telling the server how it went
    SendingAck,
    /// The session is over
    Terminated,
}

/// What happened as a result of one command line
#[derive(Debug)]
pub enum Report {
    /// A file was uploaded
    Uploaded {
        /// Local filename
        filename: String,
        /// Payload bytes sent
        bytes: u64,
        /// Whether the server said it received the file
        accepted: bool,
    },
    /// A file was downloaded
    Downloaded {
        /// Local filename
        filename: String,
        /// Bytes written
        bytes: u64,
    },
    /// The remote directory listing
    Listing(Vec<String>),
    /// The exchange failed. The session continues.
    Failed {
        /// The command that was attempted
        command: Command,
        /// What went wrong
        error: Error,
    },
    /// The command line was refused without contacting the server
    Usage(InvalidCommand),
    /// Nothing to report (blank line)
    Nothing,
}

impl Report {
    /// Did the command achieve what the user asked for?
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Report::Uploaded { accepted, .. } => *accepted,
            Report::Downloaded { .. } | Report::Listing(_) | Report::Nothing => true,
            Report::Failed { .. } | Report::Usage(_) => false,
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Uploaded {
                filename,
                bytes,
                accepted: true,
            } => write!(
                f,
                "Uploaded {filename} ({bytes} bytes); server successfully received file"
            ),
            Report::Uploaded {
                filename,
                bytes,
                accepted: false,
            } => write!(
                f,
                "Uploaded {filename} ({bytes} bytes); server was unable to receive the file"
            ),
            Report::Downloaded { filename, bytes } => {
                write!(f, "Downloaded {filename} ({bytes} bytes)")
            }
            Report::Listing(names) => {
                write!(f, "Files on server:")?;
                for name in names {
                    write!(f, "\n    {name}")?;
                }
                Ok(())
            }
            Report::Failed { command, error } => write!(f, "{command}: {error}"),
            Report::Usage(e) => write!(f, "{e}"),
            Report::Nothing => Ok(()),
        }
    }
}

/// Result of [`Dispatcher::dispatch`]
#[derive(Debug)]
pub enum Outcome {
    /// Ready for another command
    Continue(Report),
    /// The session has ended
    Terminated,
}

/// Owns the session with the server and runs one exchange at a time
#[derive(Debug)]
pub struct Dispatcher<S: Channel> {
    control: Option<ControlChannel<S>>,
    ephemeral: EphemeralFactory,
    state: State,
}

impl<S: Channel> Dispatcher<S> {
    /// Constructor
    pub fn new(control: ControlChannel<S>, ephemeral: EphemeralFactory) -> Self {
        Self {
            control: Some(control),
            ephemeral,
            state: State::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Handles one line of user input.
    ///
    /// Invalid input is refused without touching the network.
    /// A failed exchange is reported; the session remains usable.
    pub async fn dispatch(&mut self, line: &str) -> Outcome {
        if self.state == State::Terminated {
            return Outcome::Terminated;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Outcome::Continue(Report::Nothing);
        }
        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(e) => {
                trace!("refused {line:?}: {e:?}");
                return Outcome::Continue(Report::Usage(e));
            }
        };

        if command == Command::Quit {
            self.quit(line).await;
            return Outcome::Terminated;
        }

        let report = match self.exchange(&command, line).await {
            Ok(report) => report,
            Err(error) => {
                debug!("{command} failed in state {}: {error}", self.state);
                Report::Failed { command, error }
            }
        };
        self.state = State::Idle;
        Outcome::Continue(report)
    }

    async fn quit(&mut self, line: &str) {
        self.state = State::Terminated;
        let Some(mut control) = self.control.take() else {
            return;
        };
        if let Err(e) = control.send_command_line(line).await {
            warn!("while sending quit: {e}");
        }
        if let Err(e) = control.close().await {
            debug!("while closing control channel: {e}");
        }
    }

    async fn exchange(&mut self, command: &Command, line: &str) -> Result<Report> {
        let control = self
            .control
            .as_mut()
            .ok_or_else(|| Error::desync("session has ended"))?;
        let encoding = control.encoding();

        control.send_command_line(line).await?;
        self.state = State::AwaitingPort;
        let port = control.receive_port_number().await?;

        match command {
            Command::Put(filename) => {
                let channel = self.ephemeral.open(&port).await?;
                self.state = State::InTransfer;
                let put = Put::new(channel, filename, encoding);
                debug!("{command}: {} via port {port}", put.direction());
                let result = put.run().await;
                if let Err(Error::FileOpen { .. }) = result {
                    warn!("upload abandoned; the server may still send a status for it");
                }
                let bytes = result?;
                self.state = State::AwaitingAck;
                let accepted = control.receive_status_byte().await?;
                Ok(Report::Uploaded {
                    filename: filename.clone(),
                    bytes,
                    accepted,
                })
            }
            Command::Get(filename) => {
                self.state = State::InTransfer;
                let result = match self.ephemeral.open(&port).await {
                    Ok(channel) => {
                        let get = Get::new(channel, filename, encoding);
                        debug!("{command}: {} via port {port}", get.direction());
                        get.run().await
                    }
                    Err(e) => Err(e),
                };
                self.state = State::SendingAck;
                let ack = control.send_status_byte(result.is_ok()).await;
                let bytes = result?;
                ack?;
                Ok(Report::Downloaded {
                    filename: filename.clone(),
                    bytes,
                })
            }
            Command::List => {
                let channel = self.ephemeral.open(&port).await?;
                self.state = State::InTransfer;
                let list = List::new(channel);
                debug!("{command}: {} via port {port}", list.direction());
                Ok(Report::Listing(list.run().await?))
            }
            Command::Quit => Err(Error::desync("quit is not an exchange")),
        }
    }
}
