//! Shared wire model for the skillgate webhook gateway.
//!
//! Contains the parsed event types delivered by the voice platform and the
//! response-construction API. Request authentication lives in
//! `skillgate-auth`; HTTP wiring lives in `skillgate-server`.

pub mod event;
pub mod response;

pub use event::{Application, Event, Intent, Request, Session, Slot, Timestamp, User};
pub use response::{Card, OutputSpeech, Response};
