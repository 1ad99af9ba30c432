//! Runtime lifecycle: connect, start hooks, dispatch loop, shutdown hooks.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use obot_runtime::ObotRuntime;
//!
//! // Auto-loads obot.toml from the current directory
//! let mut runtime = ObotRuntime::new();
//!
//! runtime.router_mut().register("nasa", Apod::new(), Some("NASA Astronomy Picture Of the Day"))?;
//! runtime.register_adapter::<ConsoleAdapter>()?;
//! runtime.run().await?;
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,ignore
//! let runtime = ObotRuntime::builder()
//!     .config_file("config/obot.toml")
//!     .profile("production")
//!     .build()?;
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use obot_core::{BoxedAdapter, ConfigurableAdapter, Connection};
use obot_framework::{DispatchStatus, Router};
use tokio::signal;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, ConfigResult, ObotConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Owns the configuration, the router being populated, and the adapter.
///
/// Everything is registered before [`run`](Self::run); once running, the
/// router is frozen behind an `Arc` and shared read-only by every dispatch.
pub struct ObotRuntime {
    config: ObotConfig,
    router: Router,
    adapter: Option<BoxedAdapter>,
}

impl ObotRuntime {
    /// Creates a runtime from `obot.toml` in the current directory.
    ///
    /// If the configuration cannot be loaded, default settings are used.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                ObotConfig::default()
            });

        Self::from_config(config)
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Initializes logging and an empty router (built-ins only) using the
    /// configured prefix.
    pub fn from_config(config: ObotConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            prefix = %config.router.prefix,
            "Runtime initialized from configuration"
        );

        let router = Router::with_options(config.router.clone());
        Self {
            config,
            router,
            adapter: None,
        }
    }

    pub fn config(&self) -> &ObotConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Mutable access for registering actions and shortcuts before `run`.
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// Builds an adapter from its `adapters.<A::NAME>` config section
    /// (defaults when absent) and installs it.
    pub fn register_adapter<A>(&mut self) -> RuntimeResult<()>
    where
        A: ConfigurableAdapter,
    {
        if !self.config.adapters.contains_key(A::NAME) {
            debug!(adapter = A::NAME, "No configuration found for adapter, using default");
        }

        let config: A::Config =
            self.config
                .adapter_config(A::NAME)
                .map_err(|e| RuntimeError::AdapterConfig {
                    adapter: A::NAME,
                    reason: e.to_string(),
                })?;

        let adapter = A::from_config(config)?;
        self.set_adapter(Box::new(adapter));
        Ok(())
    }

    /// Installs an adapter, replacing any previous one.
    pub fn set_adapter(&mut self, adapter: BoxedAdapter) {
        if let Some(previous) = &self.adapter {
            warn!(previous = previous.name(), adapter = adapter.name(), "Replacing adapter");
        } else {
            info!(adapter = adapter.name(), "Registered adapter");
        }
        self.adapter = Some(adapter);
    }

    /// Runs until Ctrl+C (or SIGTERM on Unix), or until the adapter closes
    /// its inbound stream.
    pub async fn run(self) -> RuntimeResult<()> {
        info!("obot is now running. Press Ctrl+C to stop.");
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` resolves or the inbound stream ends.
    ///
    /// Each inbound message is dispatched on its own task. On exit, in-flight
    /// dispatches get `runtime.shutdown_grace_ms` to finish; any still running
    /// afterwards are detached, not cancelled. Shutdown hooks then run and the
    /// adapter is disconnected.
    pub async fn run_until<F>(self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let Self {
            config,
            router,
            adapter,
        } = self;
        let adapter = adapter.ok_or(RuntimeError::NoAdapter)?;

        let Connection {
            client,
            mut inbound,
        } = adapter.connect(config.runtime.inbound_buffer).await?;
        info!(
            adapter = adapter.name(),
            client = client.id(),
            "Adapter connected"
        );

        let router = Arc::new(router);

        let failed = router.run_start_hooks().await;
        if failed > 0 {
            warn!(failed, "Some start hooks failed");
        }

        let mut tasks: JoinSet<DispatchStatus> = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                received = inbound.recv() => match received {
                    Some(message) => {
                        let router = Arc::clone(&router);
                        let client = Arc::clone(&client);
                        tasks.spawn(async move { router.dispatch(client, message).await });
                    }
                    None => {
                        info!("Inbound stream closed");
                        break;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => log_joined(joined),
            }
        }
        drop(inbound);

        drain(&mut tasks, config.runtime.shutdown_grace()).await;

        let failed = router.run_shutdown_hooks().await;
        if failed > 0 {
            warn!(failed, "Some shutdown hooks failed");
        }

        if let Err(e) = adapter.disconnect().await {
            error!(adapter = adapter.name(), error = %e, "Error during adapter disconnect");
        }

        info!("Runtime stopped");
        Ok(())
    }
}

impl Default for ObotRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for in-flight dispatches up to `grace`, then detaches the rest.
async fn drain(tasks: &mut JoinSet<DispatchStatus>, grace: Duration) {
    if tasks.is_empty() {
        return;
    }

    debug!(in_flight = tasks.len(), "Waiting for in-flight dispatches");
    let wait = async {
        while let Some(joined) = tasks.join_next().await {
            log_joined(joined);
        }
    };

    if tokio::time::timeout(grace, wait).await.is_err() {
        warn!(
            in_flight = tasks.len(),
            grace_ms = grace.as_millis() as u64,
            "Grace period elapsed, leaving dispatches running"
        );
        tasks.detach_all();
    }
}

fn log_joined(joined: Result<DispatchStatus, JoinError>) {
    match joined {
        Ok(status) => debug!(status = ?status, "Dispatch finished"),
        Err(e) => error!(error = %e, "Dispatch task aborted"),
    }
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c() => info!("Received Ctrl+C, shutting down"),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                ctrl_c().await;
                info!("Received Ctrl+C, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
        info!("Received Ctrl+C, shutting down");
    }
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves,
/// leaving the inbound stream as the only way to stop.
async fn ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for an [`ObotRuntime`] with custom configuration sources.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    pub fn merge(mut self, config: ObotConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    pub fn build(self) -> ConfigResult<ObotRuntime> {
        let config = self.config_loader.load()?;
        Ok(ObotRuntime::from_config(config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use obot_core::{
        Adapter, BoxedMessage, Channel, Client, Message, Outgoing, PlatformResult, Signal,
    };
    use obot_framework::{Action, ActionResult, Capabilities};
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    type Log = Arc<Mutex<Vec<String>>>;

    struct TestClient;

    impl Client for TestClient {
        fn id(&self) -> &str {
            "test-client"
        }

        fn platform(&self) -> &'static str {
            "test"
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    struct TestChannel {
        log: Log,
    }

    #[async_trait]
    impl Channel for TestChannel {
        fn id(&self) -> &str {
            "test-channel"
        }

        async fn send(&self, content: Outgoing) -> PlatformResult<()> {
            if let Outgoing::Text(text) = content {
                self.log.lock().push(text);
            }
            Ok(())
        }
    }

    struct TestMessage {
        content: String,
        channel: TestChannel,
    }

    #[async_trait]
    impl Message for TestMessage {
        fn id(&self) -> &str {
            "m"
        }

        fn content(&self) -> &str {
            &self.content
        }

        fn author(&self) -> &str {
            "tester"
        }

        fn channel(&self) -> &dyn Channel {
            &self.channel
        }

        async fn reply(&self, text: &str) -> PlatformResult<()> {
            self.channel.log.lock().push(format!("reply: {text}"));
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn message(content: &str, log: &Log) -> BoxedMessage {
        Arc::new(TestMessage {
            content: content.to_string(),
            channel: TestChannel { log: Arc::clone(log) },
        })
    }

    /// Hands out a pre-filled receiver on connect.
    struct TestAdapter {
        inbound: Mutex<Option<mpsc::Receiver<BoxedMessage>>>,
        disconnected: Arc<AtomicBool>,
    }

    impl TestAdapter {
        fn new(inbound: mpsc::Receiver<BoxedMessage>) -> (Self, Arc<AtomicBool>) {
            let disconnected = Arc::new(AtomicBool::new(false));
            let adapter = Self {
                inbound: Mutex::new(Some(inbound)),
                disconnected: Arc::clone(&disconnected),
            };
            (adapter, disconnected)
        }
    }

    #[async_trait]
    impl Adapter for TestAdapter {
        fn name(&self) -> &'static str {
            "test"
        }

        async fn connect(&self, _buffer: usize) -> PlatformResult<Connection> {
            let inbound = self
                .inbound
                .lock()
                .take()
                .ok_or(obot_core::PlatformError::AlreadyConnected("test"))?;
            Ok(Connection {
                client: Arc::new(TestClient),
                inbound,
            })
        }

        async fn disconnect(&self) -> PlatformResult<()> {
            self.disconnected.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Records lifecycle hooks into the shared log and echoes its args.
    struct Echo {
        log: Log,
        delay: Duration,
    }

    #[async_trait]
    impl Action for Echo {
        fn capabilities(&self) -> Capabilities {
            Capabilities::new().with_start().with_shutdown()
        }

        async fn on_message(&self, signal: &mut Signal, _router: &Router) -> ActionResult {
            tokio::time::sleep(self.delay).await;
            let text = format!("echo: {}", signal.args());
            signal.channel().send_text(&text).await?;
            signal.success("echoed");
            Ok(())
        }

        async fn on_start(&self, _router: &Router) -> ActionResult {
            self.log.lock().push("start".into());
            Ok(())
        }

        async fn on_shutdown(&self, _router: &Router) -> ActionResult {
            self.log.lock().push("shutdown".into());
            Ok(())
        }
    }

    fn runtime(log: &Log, delay: Duration, grace_ms: u64) -> ObotRuntime {
        let mut config = ObotConfig::default();
        config.runtime.shutdown_grace_ms = grace_ms;
        let mut runtime = ObotRuntime::from_config(config);
        runtime
            .router_mut()
            .register(
                "echo",
                Echo {
                    log: Arc::clone(log),
                    delay,
                },
                None,
            )
            .unwrap();
        runtime.router_mut().bind_shortcut("e", "echo").unwrap();
        runtime
    }

    #[tokio::test]
    async fn test_run_until_without_adapter() {
        let log = Log::default();
        let result = runtime(&log, Duration::ZERO, 100)
            .run_until(std::future::pending())
            .await;
        assert!(matches!(result, Err(RuntimeError::NoAdapter)));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_inbound_close_runs_full_lifecycle() {
        let log = Log::default();
        let (tx, rx) = mpsc::channel(8);
        tx.send(message("ob echo hi", &log)).await.unwrap();
        tx.send(message("just chatting", &log)).await.unwrap();
        tx.send(message("ob nope", &log)).await.unwrap();
        drop(tx);

        let (adapter, disconnected) = TestAdapter::new(rx);
        let mut runtime = runtime(&log, Duration::ZERO, 1000);
        runtime.set_adapter(Box::new(adapter));

        runtime.run_until(std::future::pending()).await.unwrap();

        let log = log.lock().clone();
        assert_eq!(log.first().map(String::as_str), Some("start"));
        assert_eq!(log.last().map(String::as_str), Some("shutdown"));
        assert!(log.contains(&"echo: hi".to_string()));
        assert!(log.contains(&"reply: 🛑 Action \"nope\" is not supported".to_string()));
        assert_eq!(log.len(), 4);
        assert!(disconnected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_in_flight_dispatch() {
        let log = Log::default();
        let (tx, rx) = mpsc::channel(8);
        let (adapter, disconnected) = TestAdapter::new(rx);
        let mut runtime = runtime(&log, Duration::from_millis(50), 2000);
        runtime.set_adapter(Box::new(adapter));

        let trigger = async {
            tx.send(message("e slow", &log)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        };

        runtime.run_until(trigger).await.unwrap();

        assert_eq!(
            log.lock().clone(),
            vec!["start", "echo: slow", "shutdown"]
        );
        assert!(disconnected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_grace_elapsed_detaches_without_cancelling() {
        let log = Log::default();
        let (tx, rx) = mpsc::channel(8);
        let (adapter, _) = TestAdapter::new(rx);
        let mut runtime = runtime(&log, Duration::from_millis(100), 5);
        runtime.set_adapter(Box::new(adapter));

        let trigger = async {
            tx.send(message("e late", &log)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        };

        runtime.run_until(trigger).await.unwrap();
        assert_eq!(log.lock().clone(), vec!["start", "shutdown"]);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            log.lock().clone(),
            vec!["start", "shutdown", "echo: late"]
        );
    }

    #[test]
    fn test_register_adapter_bad_section() {
        #[derive(Debug, Default, serde::Deserialize)]
        struct StrictConfig {
            #[allow(dead_code)]
            port: u16,
        }

        struct Strict;

        #[async_trait]
        impl Adapter for Strict {
            fn name(&self) -> &'static str {
                "strict"
            }

            async fn connect(&self, _buffer: usize) -> PlatformResult<Connection> {
                Err(obot_core::PlatformError::NotConnected)
            }
        }

        impl ConfigurableAdapter for Strict {
            type Config = StrictConfig;
            const NAME: &'static str = "strict";

            fn from_config(_config: StrictConfig) -> PlatformResult<Self> {
                Ok(Strict)
            }
        }

        let mut config = ObotConfig::default();
        config
            .adapters
            .insert("strict".into(), serde_json::json!({ "port": "nope" }));
        let mut runtime = ObotRuntime::from_config(config);

        let err = runtime.register_adapter::<Strict>().unwrap_err();
        assert!(matches!(err, RuntimeError::AdapterConfig { adapter: "strict", .. }));
    }
}
