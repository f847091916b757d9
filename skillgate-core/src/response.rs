//! Response construction for platform requests.
//!
//! Mirrors the platform's response envelope: output speech (plain or SSML),
//! cards, reprompts, and dialog directives, built with chained setters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::event::Intent;

/// Plain-text output speech.
pub const OUTPUT_SPEECH_PLAIN: &str = "PlainText";
/// SSML output speech.
pub const OUTPUT_SPEECH_SSML: &str = "SSML";

/// Simple card: title and body only.
pub const CARD_SIMPLE: &str = "Simple";
/// Standard card: title, body, and image.
pub const CARD_STANDARD: &str = "Standard";
/// Card prompting the user to link their account.
pub const CARD_LINK_ACCOUNT: &str = "LinkAccount";

/// Dialog delegate directive type.
pub const DIRECTIVE_DIALOG_DELEGATE: &str = "Dialog.Delegate";
/// Elicit-slot directive type.
pub const DIRECTIVE_ELICIT_SLOT: &str = "Dialog.ElicitSlot";
/// Confirm-slot directive type.
pub const DIRECTIVE_CONFIRM_SLOT: &str = "Dialog.ConfirmSlot";
/// Confirm-intent directive type.
pub const DIRECTIVE_CONFIRM_INTENT: &str = "Dialog.ConfirmIntent";

/// The response envelope returned to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub version: String,
    #[serde(rename = "sessionAttributes")]
    pub attributes: HashMap<String, serde_json::Value>,
    pub response: InnerResponse,
}

/// The actual content of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InnerResponse {
    #[serde(rename = "outputSpeech", skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub directives: Vec<Directive>,
    #[serde(rename = "shouldEndSession")]
    pub should_end_session: bool,
}

/// Spoken text, either plain or SSML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub ssml: String,
}

/// A card shown in the companion app. Not all fields apply to every type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub text: String,
    #[serde(rename = "image", skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<ImageUrls>,
}

/// Image URLs for a standard card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUrls {
    #[serde(rename = "smallImageUrl")]
    pub small_image_url: String,
    #[serde(rename = "largeImageUrl")]
    pub large_image_url: String,
}

/// Speech played when the user does not answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reprompt {
    #[serde(rename = "outputSpeech")]
    pub output_speech: OutputSpeech,
}

/// A dialog directive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "updatedIntent", skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(rename = "slotToElicit", skip_serializing_if = "String::is_empty", default)]
    pub slot_to_elicit: String,
    #[serde(rename = "slotToConfirm", skip_serializing_if = "String::is_empty", default)]
    pub slot_to_confirm: String,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Create a response with default values: version 1.0, session ended.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            attributes: HashMap::new(),
            response: InnerResponse {
                should_end_session: true,
                ..InnerResponse::default()
            },
        }
    }

    /// Add a plain text speech response.
    #[must_use]
    pub fn with_speech(mut self, speech: impl Into<String>) -> Self {
        self.response.output_speech = Some(OutputSpeech {
            kind: OUTPUT_SPEECH_PLAIN.to_string(),
            text: speech.into(),
            ssml: String::new(),
        });
        self
    }

    /// Add an SSML speech response.
    #[must_use]
    pub fn with_ssml_speech(mut self, speech: impl Into<String>) -> Self {
        self.response.output_speech = Some(OutputSpeech {
            kind: OUTPUT_SPEECH_SSML.to_string(),
            text: String::new(),
            ssml: speech.into(),
        });
        self
    }

    /// Add a simple card.
    #[must_use]
    pub fn with_card(mut self, title: impl Into<String>, content: impl Into<String>) -> Self {
        self.response.card = Some(Card {
            kind: CARD_SIMPLE.to_string(),
            title: title.into(),
            content: content.into(),
            ..Card::default()
        });
        self
    }

    /// Add a standard card with images.
    #[must_use]
    pub fn with_standard_card(
        mut self,
        title: impl Into<String>,
        text: impl Into<String>,
        small_image_url: impl Into<String>,
        large_image_url: impl Into<String>,
    ) -> Self {
        self.response.card = Some(Card {
            kind: CARD_STANDARD.to_string(),
            title: title.into(),
            text: text.into(),
            image_urls: Some(ImageUrls {
                small_image_url: small_image_url.into(),
                large_image_url: large_image_url.into(),
            }),
            ..Card::default()
        });
        self
    }

    /// Add a link-account card.
    #[must_use]
    pub fn with_link_account_card(mut self) -> Self {
        self.response.card = Some(Card {
            kind: CARD_LINK_ACCOUNT.to_string(),
            ..Card::default()
        });
        self
    }

    /// Add a plain text reprompt.
    #[must_use]
    pub fn with_reprompt(mut self, speech: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech {
                kind: OUTPUT_SPEECH_PLAIN.to_string(),
                text: speech.into(),
                ssml: String::new(),
            },
        });
        self
    }

    /// Add an SSML reprompt.
    #[must_use]
    pub fn with_ssml_reprompt(mut self, speech: impl Into<String>) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech {
                kind: OUTPUT_SPEECH_SSML.to_string(),
                text: String::new(),
                ssml: speech.into(),
            },
        });
        self
    }

    /// Add a dialog delegate directive with an optional updated intent.
    #[must_use]
    pub fn with_dialog_delegate(self, updated_intent: Option<Intent>) -> Self {
        self.with_directive(Directive {
            kind: DIRECTIVE_DIALOG_DELEGATE.to_string(),
            intent: updated_intent,
            ..Directive::default()
        })
    }

    /// Add an elicit-slot directive.
    #[must_use]
    pub fn with_elicit_slot(
        self,
        slot_to_elicit: impl Into<String>,
        updated_intent: Option<Intent>,
    ) -> Self {
        self.with_directive(Directive {
            kind: DIRECTIVE_ELICIT_SLOT.to_string(),
            intent: updated_intent,
            slot_to_elicit: slot_to_elicit.into(),
            ..Directive::default()
        })
    }

    /// Add a confirm-slot directive.
    #[must_use]
    pub fn with_confirm_slot(
        self,
        slot_to_confirm: impl Into<String>,
        updated_intent: Option<Intent>,
    ) -> Self {
        self.with_directive(Directive {
            kind: DIRECTIVE_CONFIRM_SLOT.to_string(),
            intent: updated_intent,
            slot_to_confirm: slot_to_confirm.into(),
            ..Directive::default()
        })
    }

    /// Add a confirm-intent directive.
    #[must_use]
    pub fn with_confirm_intent(self, updated_intent: Option<Intent>) -> Self {
        self.with_directive(Directive {
            kind: DIRECTIVE_CONFIRM_INTENT.to_string(),
            intent: updated_intent,
            ..Directive::default()
        })
    }

    /// Keep the session open after this response.
    #[must_use]
    pub fn keep_session_open(mut self) -> Self {
        self.response.should_end_session = false;
        self
    }

    /// Carry a session attribute over to the next request.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    fn with_directive(mut self, directive: Directive) -> Self {
        self.response.directives.push(directive);
        self
    }
}
