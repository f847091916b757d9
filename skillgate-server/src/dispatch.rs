//! Event dispatch: routes a verified event to the registered handler.

use std::collections::HashMap;

use skillgate_core::event::{REQUEST_ENDED, REQUEST_INTENT, REQUEST_LAUNCH};
use skillgate_core::{Event, Response};

/// A handler for one event or intent.
pub type HandlerFn = Box<dyn Fn(&Event) -> Result<Response, DispatchError> + Send + Sync>;

/// Errors from dispatching a verified event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The event names an intent or request type nothing is registered for.
    #[error("no handler was specified for this event")]
    NoHandler,

    /// A registered handler failed.
    #[error("handler failed: {0}")]
    Handler(String),
}

/// Routing table from request types and intent names to handlers.
///
/// Only verified events reach a router; authentication happens upstream in
/// the handler, never here.
#[derive(Default)]
pub struct EventRouter {
    launch: Option<HandlerFn>,
    ended: Option<HandlerFn>,
    intents: HashMap<String, HandlerFn>,
}

impl EventRouter {
    /// Create an empty router. Every event fails with `NoHandler` until
    /// handlers are registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the launch handler.
    #[must_use]
    pub fn on_launch(
        mut self,
        handler: impl Fn(&Event) -> Result<Response, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        self.launch = Some(Box::new(handler));
        self
    }

    /// Register the session-ended handler.
    #[must_use]
    pub fn on_session_ended(
        mut self,
        handler: impl Fn(&Event) -> Result<Response, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        self.ended = Some(Box::new(handler));
        self
    }

    /// Register a handler for a named intent.
    #[must_use]
    pub fn on_intent(
        mut self,
        intent: impl Into<String>,
        handler: impl Fn(&Event) -> Result<Response, DispatchError> + Send + Sync + 'static,
    ) -> Self {
        self.intents.insert(intent.into(), Box::new(handler));
        self
    }

    /// Route an event to its handler and return the handler's response.
    ///
    /// # Errors
    ///
    /// `NoHandler` for unregistered request types or intents; handler
    /// errors pass through.
    pub fn dispatch(&self, event: &Event) -> Result<Response, DispatchError> {
        match event.request.kind.as_str() {
            REQUEST_LAUNCH => self.launch.as_ref().ok_or(DispatchError::NoHandler)?(event),
            REQUEST_ENDED => self.ended.as_ref().ok_or(DispatchError::NoHandler)?(event),
            REQUEST_INTENT => {
                let handler = self
                    .intents
                    .get(&event.request.intent.name)
                    .ok_or(DispatchError::NoHandler)?;
                handler(event)
            }
            _ => Err(DispatchError::NoHandler),
        }
    }
}
