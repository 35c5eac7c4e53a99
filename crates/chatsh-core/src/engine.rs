//! Authorization and lifecycle control.
//!
//! The [`Engine`] is the entry point for every inbound line. It handles the
//! verbs that change who is authorized (`login`, `logout`, `restart`) and the
//! greetings (`hi`, `help`) before anything else, gates all other verbs on
//! session membership, and hands authorized lines to the resolver and
//! dispatcher. Control verbs given extra arguments get their usage back and
//! never reach an alias or the fallback.
//!
//! One line is processed at a time: the alias tables and the authorized set
//! sit behind a single lock that is held from the first read to the last
//! write of a line.

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::alias::AliasStore;
use crate::collaborator::{Collaborators, Credential};
use crate::config::EngineConfig;
use crate::dispatch::verb::split_head;
use crate::dispatch::{Dispatcher, Reply};
use crate::error::ChatshError;
use crate::resolver;
use crate::session::{SessionId, SessionRegistry};

pub const AUTHORIZED: &str = "Authorized";
pub const LOGGED_OUT: &str = "Logged out.";
pub const RESTARTING: &str = "Restarting bot.";
pub const UNAUTHORIZED: &str = "Unauthorized.";
pub const PUBLIC_HELP: &str = "Just say hi, or send 'login <password>' to start.";
pub const HI_THERE: &str = "Hi there";
pub const STARTING: &str = "Starting bot.";
pub const CLOSING: &str = "Closing bot.";

/// An inbound text event from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub session: SessionId,
    pub text: String,
    /// Set when the transport re-delivers an edited message
    pub edited: bool,
}

impl InboundMessage {
    pub fn new(session: impl Into<SessionId>, text: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            text: text.into(),
            edited: false,
        }
    }

    pub fn edited(session: impl Into<SessionId>, text: impl Into<String>) -> Self {
        Self {
            edited: true,
            ..Self::new(session, text)
        }
    }
}

/// Whether the inbound loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Result of handling one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    pub control: LoopControl,
}

impl Outcome {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            control: LoopControl::Continue,
        }
    }

    fn text(text: &str) -> Self {
        Self::reply(Reply::text(text))
    }

    pub fn should_stop(&self) -> bool {
        self.control == LoopControl::Stop
    }
}

/// Verbs intercepted before alias resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control<'a> {
    Login(&'a str),
    Logout,
    Restart,
    Help,
    Hi,
    /// A control verb followed by arguments it does not take
    Usage(&'static str),
}

impl<'a> Control<'a> {
    fn parse(head: &str, rest: &'a str) -> Option<Self> {
        let (control, usage) = match head {
            "login" | "id" => return Some(Control::Login(rest)),
            "exit" | "quit" | "logout" => (Control::Logout, "logout"),
            "reset" | "restart" => (Control::Restart, "restart"),
            "help" | "menu" => (Control::Help, "help"),
            "hi" => (Control::Hi, "hi"),
            _ => return None,
        };
        Some(if rest.is_empty() { control } else { Control::Usage(usage) })
    }
}

struct EngineState {
    sessions: SessionRegistry,
    aliases: AliasStore,
}

/// The command engine.
pub struct Engine {
    state: Mutex<EngineState>,
    dispatcher: Dispatcher,
    password: Credential,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        collaborators: Collaborators,
        sessions: SessionRegistry,
        aliases: AliasStore,
    ) -> Self {
        let dispatcher = Dispatcher::new(&config, collaborators);
        Self {
            state: Mutex::new(EngineState { sessions, aliases }),
            dispatcher,
            password: config.password,
        }
    }

    /// Restores sessions persisted by a previous run. Call once at startup.
    pub async fn restore(&self) -> Vec<SessionId> {
        self.state.lock().await.sessions.restore()
    }

    /// Currently authorized sessions.
    pub async fn authorized_sessions(&self) -> Vec<SessionId> {
        self.state.lock().await.sessions.sessions()
    }

    /// Handles one inbound line to completion.
    ///
    /// Never fails; only `restart` asks the caller to stop its loop.
    pub async fn handle(&self, message: &InboundMessage) -> Outcome {
        let mut state = self.state.lock().await;
        let session = &message.session;
        let authorized = state.sessions.is_authorized(session);
        debug!(session = %session, edited = message.edited, authorized, "Inbound line");

        let (head, rest) = split_head(&message.text);
        match Control::parse(&head, rest) {
            Some(Control::Login(candidate)) => {
                if self.password.matches(candidate) {
                    state.sessions.authorize(session);
                    Outcome::text(AUTHORIZED)
                } else {
                    info!(session = %session, "Rejected login attempt");
                    Outcome::reply(Reply::Silent)
                }
            }
            Some(Control::Logout) if authorized => {
                state.sessions.revoke(session);
                Outcome::text(LOGGED_OUT)
            }
            Some(Control::Restart) => {
                info!(session = %session, "Restart requested");
                state.sessions.revoke_all();
                Outcome {
                    reply: Reply::text(RESTARTING),
                    control: LoopControl::Stop,
                }
            }
            Some(Control::Help) if authorized => Outcome::reply(self.dispatcher.help(&state.aliases)),
            Some(Control::Help) => Outcome::text(PUBLIC_HELP),
            Some(Control::Hi) if authorized => Outcome::reply(self.dispatcher.greet().await),
            Some(Control::Hi) => Outcome::text(HI_THERE),
            Some(Control::Usage(usage)) if authorized => {
                Outcome::text(&ChatshError::usage(usage).to_string())
            }
            _ if !authorized => Outcome::text(UNAUTHORIZED),
            _ => {
                let EngineState { aliases, .. } = &mut *state;
                let resolved = resolver::resolve(aliases, &message.text);
                Outcome::reply(self.dispatcher.dispatch(aliases, &resolved).await)
            }
        }
    }
}
