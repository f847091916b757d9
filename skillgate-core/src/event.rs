//! Parsed event types for inbound platform requests.
//!
//! The shapes mirror the platform's JSON envelope. Deserialization is
//! deliberately lenient about absent optional sections (`#[serde(default)]`)
//! so that every request type shares one `Event` struct; the authentication
//! pipeline fails closed on the fields it actually needs.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Request type for a skill launch without an intent.
pub const REQUEST_LAUNCH: &str = "LaunchRequest";
/// Request type for an intent invocation.
pub const REQUEST_INTENT: &str = "IntentRequest";
/// Request type for the end of a session.
pub const REQUEST_ENDED: &str = "SessionEndedRequest";

/// The base type for any request from the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub session: Session,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(default)]
    pub request: Request,
}

impl Event {
    /// The application identifier the caller claims this request is for.
    ///
    /// Empty when the session carries no application block; the identity
    /// check treats that as a mismatch rather than a wildcard.
    #[must_use]
    pub fn application_id(&self) -> &str {
        &self.session.application.id
    }

    /// The request timestamp, if the payload carried one.
    #[must_use]
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.request.timestamp.as_ref()
    }
}

/// Session state: user identity, stored attributes, and the target app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "sessionId", default)]
    pub id: String,
    #[serde(rename = "new", default)]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub application: Application,
    #[serde(default)]
    pub user: User,
}

/// The application a request is addressed to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "applicationId", default)]
    pub id: String,
}

/// Consent token granting access to additional user information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(rename = "consentToken", default, skip_serializing_if = "String::is_empty")]
    pub consent_token: String,
}

/// The user behind the request, including a linked-account token if set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId", default)]
    pub id: String,
    #[serde(rename = "accessToken", default, skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    #[serde(default)]
    pub permissions: Permissions,
}

/// The request body: type, intent, and timing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "requestId", default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

/// A request timestamp in the platform's RFC 3339 wire format.
///
/// Serialization is pinned to the exact wire format rather than chrono's
/// default so that round-trips are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// View as a plain `DateTime<Utc>`.
    #[must_use]
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let parsed = DateTime::parse_from_rfc3339(&raw).map_err(D::Error::custom)?;
        Ok(Self(parsed.with_timezone(&Utc)))
    }
}

/// An invoked intent with its filled slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub slots: HashMap<String, Slot>,
    #[serde(
        rename = "confirmationStatus",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub confirmation_status: String,
}

/// A single slot value within an intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<Resolutions>,
}

/// Slot value resolutions grouped by authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolutions {
    #[serde(rename = "resolutionsPerAuthority", default)]
    pub per_authority: Vec<Resolution>,
}

/// A resolved slot value from one authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub authority: String,
    #[serde(default)]
    pub status: ResolutionStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ResolutionValue>,
}

/// Match status for a resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStatus {
    #[serde(default)]
    pub code: String,
}

/// One resolved value. The wire shape nests the value one level deep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionValue {
    #[serde(default)]
    pub value: ResolutionValueInner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionValueInner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

/// Audio player state on the caller's device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioPlayer {
    #[serde(rename = "playerActivity", default, skip_serializing_if = "String::is_empty")]
    pub player_activity: String,
}

/// Interfaces supported by the caller's device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportedInterfaces {
    #[serde(rename = "AudioPlayer", default)]
    pub audio_player: AudioPlayer,
}

/// The caller's device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "deviceId", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "supportedInterfaces", default)]
    pub interfaces: SupportedInterfaces,
}

/// System block of the request context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct System {
    #[serde(default)]
    pub application: Application,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub device: Device,
    #[serde(rename = "apiEndpoint", default, skip_serializing_if = "String::is_empty")]
    pub api_endpoint: String,
}

/// Additional context about the caller's setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "AudioPlayer", default)]
    pub audio_player: AudioPlayer,
    #[serde(rename = "System", default)]
    pub system: System,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": "1.0",
        "session": {
            "sessionId": "amzn1.echo-api.session.0000",
            "new": true,
            "application": {"applicationId": "amzn1.ask.skill.1234"},
            "user": {"userId": "amzn1.ask.account.AAAA"}
        },
        "request": {
            "requestId": "amzn1.echo-api.request.0001",
            "type": "IntentRequest",
            "locale": "en-US",
            "timestamp": "2024-01-01T00:00:00Z",
            "intent": {
                "name": "HelloName",
                "slots": {"Name": {"name": "Name", "value": "Ada"}}
            }
        }
    }"#;

    #[test]
    fn parses_full_intent_request() {
        let event: Event = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(event.version, "1.0");
        assert!(event.session.is_new);
        assert_eq!(event.application_id(), "amzn1.ask.skill.1234");
        assert_eq!(event.request.kind, REQUEST_INTENT);
        assert_eq!(event.request.intent.name, "HelloName");
        assert_eq!(event.request.intent.slots["Name"].value, "Ada");

        let ts = event.timestamp().expect("timestamp present");
        assert_eq!(
            ts.as_utc(),
            DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap()
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let event: Event = serde_json::from_str(r#"{"request":{"type":"LaunchRequest"}}"#).unwrap();

        assert_eq!(event.request.kind, REQUEST_LAUNCH);
        assert_eq!(event.application_id(), "");
        assert!(event.timestamp().is_none());
    }

    #[test]
    fn rejects_non_rfc3339_timestamp() {
        let result: Result<Event, _> = serde_json::from_str(
            r#"{"request":{"type":"LaunchRequest","timestamp":"January 1st"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn timestamp_round_trips_in_wire_format() {
        let ts = Timestamp(
            DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        let encoded = serde_json::to_string(&ts).unwrap();
        assert_eq!(encoded, r#""2024-06-15T10:30:00Z""#);

        let decoded: Timestamp = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, ts);
    }

    #[test]
    fn offset_timestamps_normalize_to_utc() {
        let decoded: Timestamp = serde_json::from_str(r#""2024-06-15T12:30:00+02:00""#).unwrap();
        assert_eq!(
            decoded.as_utc(),
            DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z").unwrap()
        );
    }
}
