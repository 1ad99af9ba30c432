//! The console adapter.
//!
//! # Configuration-Based Usage
//!
//! ```rust,ignore
//! use obot_runtime::ObotRuntime;
//! use obot_adapter_console::ConsoleAdapter;
//!
//! let mut runtime = ObotRuntime::new();
//! // Built from [adapters.console], or defaults
//! runtime.register_adapter::<ConsoleAdapter>()?;
//! runtime.run().await?;
//! ```
//!
//! # Programmatic Usage
//!
//! ```rust,ignore
//! let reader = tokio::fs::File::open("session.txt").await?;
//! let adapter = ConsoleAdapter::with_io(reader, tokio::io::stderr()).with_config(config);
//! ```

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use obot_core::{
    Adapter, BoxedMessage, ConfigurableAdapter, Connection, PlatformError, PlatformResult,
};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::ConsoleConfig;
use crate::message::{BoxedWriter, ConsoleChannel, ConsoleClient, ConsoleMessage, Output};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type LineReceiver = mpsc::Receiver<io::Result<String>>;

/// Where input lines come from.
enum Input {
    /// The process stdin, read on a dedicated thread once connected.
    Stdin,
    /// Any async byte stream.
    Stream(BoxedReader),
    /// Lines already produced elsewhere.
    Lines(LineReceiver),
}

/// Turns input lines into messages and writes replies as output lines.
///
/// The adapter can be connected once; the input is consumed by `connect`.
pub struct ConsoleAdapter {
    config: ConsoleConfig,
    input: Mutex<Option<Input>>,
    output: Output,
    shutdown: CancellationToken,
}

impl ConsoleAdapter {
    /// Reads from stdin and writes to stdout.
    ///
    /// Stdin is read on a detached thread, so a pending read does not keep
    /// the process alive once the runtime has stopped.
    pub fn stdio() -> Self {
        Self::from_input(Input::Stdin, tokio::io::stdout())
    }

    /// Uses arbitrary byte streams for input and output.
    pub fn with_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: tokio::io::AsyncWrite + Send + Unpin + 'static,
    {
        Self::from_input(Input::Stream(Box::new(reader)), writer)
    }

    fn from_input<W>(input: Input, writer: W) -> Self
    where
        W: tokio::io::AsyncWrite + Send + Unpin + 'static,
    {
        let writer: BoxedWriter = Box::new(writer);
        Self {
            config: ConsoleConfig::default(),
            input: Mutex::new(Some(input)),
            output: Output::new(writer),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: ConsoleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

#[async_trait]
impl Adapter for ConsoleAdapter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn connect(&self, buffer: usize) -> PlatformResult<Connection> {
        let input = self
            .input
            .lock()
            .take()
            .ok_or(PlatformError::AlreadyConnected(Self::NAME))?;

        let lines = match input {
            Input::Stdin => LineSource::Thread(spawn_stdin_reader(buffer)),
            Input::Stream(reader) => LineSource::Stream(BufReader::new(reader).lines()),
            Input::Lines(receiver) => LineSource::Thread(receiver),
        };

        let (tx, inbound) = mpsc::channel(buffer.max(1));
        let config = self.config.clone();
        let output = self.output.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(read_lines(lines, tx, config, output, shutdown));

        info!(user = %self.config.user, channel = %self.config.channel, "Console connected");
        Ok(Connection {
            client: Arc::new(ConsoleClient::new(self.config.user.clone())),
            inbound,
        })
    }

    async fn disconnect(&self) -> PlatformResult<()> {
        self.shutdown.cancel();
        self.output.flush().await?;
        debug!("Console disconnected");
        Ok(())
    }
}

impl ConfigurableAdapter for ConsoleAdapter {
    type Config = ConsoleConfig;

    const NAME: &'static str = "console";

    fn from_config(config: ConsoleConfig) -> PlatformResult<Self> {
        Ok(Self::stdio().with_config(config))
    }
}

enum LineSource {
    Stream(Lines<BufReader<BoxedReader>>),
    Thread(LineReceiver),
}

impl LineSource {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        match self {
            Self::Stream(lines) => lines.next_line().await,
            Self::Thread(receiver) => receiver.recv().await.transpose(),
        }
    }
}

/// Reads stdin lines on a detached thread. The thread ends at EOF, on a read
/// error, or on the first line after the receiver is dropped.
fn spawn_stdin_reader(buffer: usize) -> LineReceiver {
    let (tx, rx) = mpsc::channel(buffer.max(1));

    let spawned = thread::Builder::new()
        .name("obot-console-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });

    // On failure the sender is dropped with the closure; the reader sees EOF.
    if let Err(e) = spawned {
        warn!(error = %e, "Failed to spawn stdin reader thread");
    }
    rx
}

/// Forwards non-blank lines until EOF, a read error, cancellation, or the
/// receiver going away. Dropping `tx` closes the inbound stream.
async fn read_lines(
    mut lines: LineSource,
    tx: mpsc::Sender<BoxedMessage>,
    config: ConsoleConfig,
    output: Output,
    shutdown: CancellationToken,
) {
    let mut next_id: u64 = 1;

    loop {
        let line = tokio::select! {
            () = shutdown.cancelled() => {
                debug!("Console reader cancelled");
                break;
            }
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                trace!(id = next_id, line = %line, "Console input");

                let channel = ConsoleChannel::new(config.channel.clone(), output.clone());
                let message: BoxedMessage = Arc::new(ConsoleMessage::new(
                    next_id,
                    line,
                    config.user.clone(),
                    channel,
                ));
                next_id += 1;

                if tx.send(message).await.is_err() {
                    debug!("Inbound receiver dropped, stopping console reader");
                    break;
                }
            }
            Ok(None) => {
                info!("Console input closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read console input");
                break;
            }
        }
    }
}
