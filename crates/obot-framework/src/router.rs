//! The action registry and message dispatcher.
//!
//! A [`Router`] owns every registered action, the shortcut table, and the
//! startup/shutdown hook lists. It is filled once at startup and then shared
//! read-only (typically behind an `Arc`) by every dispatch.
//!
//! # Dispatch
//!
//! For each inbound message the router:
//!
//! 1. Classifies the trimmed text with [`parse_command`]
//! 2. Ignores non-commands, replies to rejected commands with the alert marker
//! 3. Builds a fresh [`Signal`] and runs the action, catching errors and panics
//! 4. Drains the signal's outcome log into structured log lines
//!
//! ```rust,ignore
//! let mut router = Router::new();
//! router.register("nasa", Apod::new(config), Some("NASA Astronomy Picture Of the Day"))?;
//! router.bind_shortcut("astron", "nasa")?;
//!
//! let router = Arc::new(router);
//! router.run_start_hooks().await;
//! router.dispatch(client, message).await;
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use obot_core::{BoxedClient, BoxedMessage, Lexer, Message, Outcome, OutcomeKind, Signal};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{Instrument, Level, debug, error, info, span, warn};

use crate::action::{Action, BoxedAction, Capabilities};
use crate::builtin::{Explain, Help};
use crate::error::RegistrationError;
use crate::parse::{
    CommandTable, Invocation, InvocationKind, ParseFailure, ParsedCommand, parse_command,
};

/// Tunables for a [`Router`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Keyword that introduces a direct invocation.
    pub prefix: String,
    /// Marker prepended to the reply sent for a rejected command.
    pub alert: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            prefix: "ob".to_string(),
            alert: "🛑".to_string(),
        }
    }
}

/// A registered action together with its metadata.
pub struct RegisteredAction {
    name: String,
    description: Option<String>,
    capabilities: Capabilities,
    action: BoxedAction,
}

impl RegisteredAction {
    /// Returns the name as it was registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Returns `true` if the action implements `on_help`.
    pub fn has_help(&self) -> bool {
        self.capabilities.help
    }

    pub fn action(&self) -> &BoxedAction {
        &self.action
    }
}

impl fmt::Debug for RegisteredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAction")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// A shortcut bound to an action.
///
/// The action handle is captured when the shortcut is bound.
struct Shortcut {
    name: String,
    target: String,
    action: BoxedAction,
}

/// One row of the action listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInfo {
    /// Registered action name.
    pub name: String,
    /// The most recently bound shortcut for this action, if any.
    pub shortcut: Option<String>,
    /// Description given at registration.
    pub description: Option<String>,
}

impl ActionInfo {
    /// Returns the description, or a placeholder when none was given.
    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or("<No Description>")
    }
}

/// What [`Router::dispatch`] did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    /// The text was not a command.
    Ignored,
    /// The text looked like a command but was rejected; a reply was attempted.
    Rejected(ParseFailure),
    /// The action ran to completion.
    Completed {
        /// Action or shortcut name that was invoked.
        action: String,
        /// Number of outcome records the action produced.
        outcomes: usize,
    },
    /// The action returned an error or panicked.
    Failed {
        /// Action or shortcut name that was invoked.
        action: String,
        /// Rendered error or panic message.
        cause: String,
        /// Number of outcome records logged before the failure.
        outcomes: usize,
    },
    /// No procedure could be resolved for a parsed command.
    Unresolved(String),
}

#[derive(Debug, Clone, Copy)]
enum HookPhase {
    Start,
    Shutdown,
}

impl HookPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "INIT",
            Self::Shutdown => "SHUTDOWN",
        }
    }
}

/// Registry of actions and shortcuts, and dispatcher of inbound messages.
pub struct Router {
    options: RouterOptions,
    /// Actions in registration order.
    actions: Vec<RegisteredAction>,
    /// Case-folded name → index into `actions`.
    action_index: HashMap<String, usize>,
    /// Shortcuts in binding order.
    shortcuts: Vec<Shortcut>,
    /// Case-folded name → index into `shortcuts`.
    shortcut_index: HashMap<String, usize>,
    start_hooks: Vec<usize>,
    shutdown_hooks: Vec<usize>,
}

impl Router {
    /// Creates a router with default options and the built-in `help` and
    /// `explain` actions.
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    /// Creates a router with the given options and the built-in actions.
    pub fn with_options(options: RouterOptions) -> Self {
        let mut router = Self {
            options,
            actions: Vec::new(),
            action_index: HashMap::new(),
            shortcuts: Vec::new(),
            shortcut_index: HashMap::new(),
            start_hooks: Vec::new(),
            shutdown_hooks: Vec::new(),
        };

        let prefix = router.options.prefix.clone();
        router.insert_action(
            "help".to_string(),
            Arc::new(Help::new(prefix.clone())),
            Some("Displays this message".to_string()),
        );
        router.insert_action(
            "explain".to_string(),
            Arc::new(Explain::new(prefix)),
            Some("Shows help message specific to an action".to_string()),
        );
        router
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Registers an action under `name`.
    ///
    /// Fails without touching the registry if an action with the same name
    /// (compared case-insensitively) already exists.
    pub fn register<A: Action>(
        &mut self,
        name: impl Into<String>,
        action: A,
        description: Option<&str>,
    ) -> Result<(), RegistrationError> {
        self.register_boxed(name, Arc::new(action), description)
    }

    /// Registers an already shared action.
    pub fn register_boxed(
        &mut self,
        name: impl Into<String>,
        action: BoxedAction,
        description: Option<&str>,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        let result = if !is_single_token(&name) {
            Err(RegistrationError::InvalidName(name))
        } else if self.action_index.contains_key(&name.to_lowercase()) {
            Err(RegistrationError::DuplicateAction(name))
        } else {
            self.insert_action(name, action, description.map(str::to_string));
            Ok(())
        };

        if let Err(e) = &result {
            error!(error = %e, "Action registration rejected");
        }
        result
    }

    fn insert_action(&mut self, name: String, action: BoxedAction, description: Option<String>) {
        let capabilities = action.capabilities();
        let index = self.actions.len();

        if capabilities.start {
            self.start_hooks.push(index);
        }
        if capabilities.shutdown {
            self.shutdown_hooks.push(index);
        }

        debug!(action = %name, ?capabilities, "Registered action");
        self.action_index.insert(name.to_lowercase(), index);
        self.actions.push(RegisteredAction {
            name,
            description,
            capabilities,
            action,
        });
    }

    /// Binds `shortcut` to the registered action `target`.
    ///
    /// Fails if the shortcut is already bound, equals the command prefix, or
    /// the target does not exist.
    pub fn bind_shortcut(
        &mut self,
        shortcut: impl Into<String>,
        target: &str,
    ) -> Result<(), RegistrationError> {
        let name = shortcut.into();
        let result = if !is_single_token(&name) {
            Err(RegistrationError::InvalidName(name))
        } else if name.to_lowercase() == self.options.prefix.to_lowercase() {
            Err(RegistrationError::ReservedShortcut(name))
        } else if let Some(&existing) = self.shortcut_index.get(&name.to_lowercase()) {
            Err(RegistrationError::DuplicateShortcut {
                name,
                target: self.shortcuts[existing].target.clone(),
            })
        } else {
            match self.find_action(target) {
                Some(entry) => {
                    let shortcut = Shortcut {
                        name,
                        target: entry.name.clone(),
                        action: Arc::clone(&entry.action),
                    };
                    debug!(shortcut = %shortcut.name, target = %shortcut.target, "Bound shortcut");
                    self.shortcut_index
                        .insert(shortcut.name.to_lowercase(), self.shortcuts.len());
                    self.shortcuts.push(shortcut);
                    Ok(())
                }
                None => Err(RegistrationError::UnknownTarget(target.to_string())),
            }
        };

        if let Err(e) = &result {
            error!(error = %e, "Shortcut binding rejected");
        }
        result
    }

    /// Looks up a registered action by name, ignoring case.
    pub fn find_action(&self, name: &str) -> Option<&RegisteredAction> {
        self.action_index
            .get(&name.to_lowercase())
            .map(|&index| &self.actions[index])
    }

    /// Returns the description of an action, if it exists and has one.
    pub fn description_of(&self, name: &str) -> Option<&str> {
        self.find_action(name).and_then(RegisteredAction::description)
    }

    /// Returns registered action names in registration order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|entry| entry.name.as_str())
    }

    /// Returns bound shortcut names in binding order.
    pub fn shortcut_names(&self) -> impl Iterator<Item = &str> {
        self.shortcuts.iter().map(|shortcut| shortcut.name.as_str())
    }

    /// Returns the number of registered actions, built-ins included.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Lists every action in registration order.
    ///
    /// Only the most recently bound shortcut of each action is shown.
    pub fn list_actions(&self) -> Vec<ActionInfo> {
        let mut shown: HashMap<&str, &str> = HashMap::new();
        for shortcut in &self.shortcuts {
            shown.insert(shortcut.target.as_str(), shortcut.name.as_str());
        }

        self.actions
            .iter()
            .map(|entry| ActionInfo {
                name: entry.name.clone(),
                shortcut: shown.get(entry.name.as_str()).map(|s| s.to_string()),
                description: entry.description.clone(),
            })
            .collect()
    }

    /// Classifies `text` without running anything.
    pub fn parse<'t>(&self, text: &'t str) -> ParsedCommand<'t> {
        parse_command(text, &self.options.prefix, self)
    }

    fn resolve(&self, invocation: &Invocation<'_>) -> Option<BoxedAction> {
        match invocation.kind {
            InvocationKind::Direct => self
                .find_action(&invocation.name)
                .map(|entry| Arc::clone(&entry.action)),
            InvocationKind::Shortcut => self
                .shortcut_index
                .get(&invocation.name.to_lowercase())
                .map(|&index| Arc::clone(&self.shortcuts[index].action)),
        }
    }

    /// Dispatches one inbound message.
    ///
    /// Never fails: action errors, panics, and reply failures are logged and
    /// reported through the returned [`DispatchStatus`].
    pub async fn dispatch(&self, client: BoxedClient, message: BoxedMessage) -> DispatchStatus {
        let invocation = match self.parse(message.content()) {
            ParsedCommand::Nop => return DispatchStatus::Ignored,
            ParsedCommand::Failure(reason) => {
                self.reject(message.as_ref(), &reason).await;
                return DispatchStatus::Rejected(reason);
            }
            ParsedCommand::Invoke(invocation) => invocation,
        };

        let name = invocation.name.clone();
        let Some(action) = self.resolve(&invocation) else {
            warn!(action = %name, "Unable to find procedure for action");
            return DispatchStatus::Unresolved(name);
        };

        let mut signal = Signal::new(client, Arc::clone(&message), invocation.args);
        let span = span!(Level::DEBUG, "dispatch", action = %name, message = %message.id());

        let result = AssertUnwindSafe(action.on_message(&mut signal, self))
            .catch_unwind()
            .instrument(span)
            .await;

        let outcomes = signal.drain_logs();
        print_outcomes(&name, &outcomes);

        match result {
            Ok(Ok(())) => DispatchStatus::Completed {
                action: name,
                outcomes: outcomes.len(),
            },
            Ok(Err(e)) => {
                warn!(action = %name, error = %e, "Failure executing action");
                DispatchStatus::Failed {
                    action: name,
                    cause: e.to_string(),
                    outcomes: outcomes.len(),
                }
            }
            Err(payload) => {
                let cause = panic_message(payload.as_ref());
                error!(action = %name, cause = %cause, "Action panicked");
                DispatchStatus::Failed {
                    action: name,
                    cause,
                    outcomes: outcomes.len(),
                }
            }
        }
    }

    async fn reject(&self, message: &dyn Message, reason: &ParseFailure) {
        let text = if self.options.alert.is_empty() {
            reason.to_string()
        } else {
            format!("{} {}", self.options.alert, reason)
        };

        if let Err(e) = message.reply(&text).await {
            warn!(error = %e, "Failure sending error message");
        }
    }

    /// Runs every `on_start` hook in registration order.
    ///
    /// Returns the number of hooks that failed.
    pub async fn run_start_hooks(&self) -> usize {
        self.run_hooks(HookPhase::Start).await
    }

    /// Runs every `on_shutdown` hook in registration order.
    ///
    /// Returns the number of hooks that failed.
    pub async fn run_shutdown_hooks(&self) -> usize {
        self.run_hooks(HookPhase::Shutdown).await
    }

    async fn run_hooks(&self, phase: HookPhase) -> usize {
        let hooks = match phase {
            HookPhase::Start => &self.start_hooks,
            HookPhase::Shutdown => &self.shutdown_hooks,
        };

        let mut failed = 0;
        for &index in hooks {
            let entry = &self.actions[index];
            let hook = match phase {
                HookPhase::Start => entry.action.on_start(self),
                HookPhase::Shutdown => entry.action.on_shutdown(self),
            };

            match AssertUnwindSafe(hook).catch_unwind().await {
                Ok(Ok(())) => {
                    debug!(phase = phase.as_str(), action = %entry.name, "Lifecycle hook finished");
                }
                Ok(Err(e)) => {
                    failed += 1;
                    error!(phase = phase.as_str(), action = %entry.name, error = %e, "Lifecycle hook failed");
                }
                Err(payload) => {
                    failed += 1;
                    let cause = panic_message(payload.as_ref());
                    error!(phase = phase.as_str(), action = %entry.name, cause = %cause, "Lifecycle hook panicked");
                }
            }
        }

        if !hooks.is_empty() {
            info!(
                phase = phase.as_str(),
                total = hooks.len(),
                failed,
                "Lifecycle hooks completed"
            );
        }
        failed
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable for Router {
    fn resolve_action(&self, name: &str) -> Option<&str> {
        self.find_action(name).map(RegisteredAction::name)
    }

    fn resolve_shortcut(&self, name: &str) -> Option<&str> {
        self.shortcut_index
            .get(&name.to_lowercase())
            .map(|&index| self.shortcuts[index].name.as_str())
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("actions", &self.actions.len())
            .field("shortcuts", &self.shortcuts.len())
            .finish()
    }
}

fn is_single_token(name: &str) -> bool {
    let mut lexer = Lexer::new(name);
    !name.is_empty() && lexer.next_token() == name
}

/// Emits one log line per outcome, on the channel matching its severity.
fn print_outcomes(action: &str, outcomes: &[Outcome]) {
    if outcomes.is_empty() {
        return;
    }

    let timestamp = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    for outcome in outcomes {
        let kind = outcome.kind().as_str();
        match outcome.kind() {
            OutcomeKind::Failure => {
                error!(kind, action, timestamp, "{}", outcome.message());
            }
            OutcomeKind::Warning => {
                warn!(kind, action, timestamp, "{}", outcome.message());
            }
            OutcomeKind::Success => {
                info!(kind, action, timestamp, "{}", outcome.message());
            }
        }
    }
}

/// Renders a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
