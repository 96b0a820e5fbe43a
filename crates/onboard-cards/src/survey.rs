//! Feedback-survey card.

use serde_json::json;

use onboard_core::types::CardAttachment;

use crate::{ADAPTIVE_CARD_VERSION, SHARE_FEEDBACK_COMMAND};

/// Build the recurring "how is onboarding going?" card.
pub fn survey_card(app_base_uri: &str) -> CardAttachment {
    CardAttachment::adaptive(json!({
        "type": "AdaptiveCard",
        "version": ADAPTIVE_CARD_VERSION,
        "body": [
            {
                "type": "Image",
                "url": format!("{app_base_uri}/Artifacts/surveyBanner.png"),
                "altText": "Share feedback",
            },
            {
                "type": "TextBlock",
                "size": "Medium",
                "weight": "Bolder",
                "text": "How is your onboarding going?",
                "wrap": true,
            },
            {
                "type": "TextBlock",
                "text": "Your feedback helps us improve the program for the next new hire.",
                "wrap": true,
            },
        ],
        "actions": [
            {
                "type": "Action.Submit",
                "title": "Share feedback",
                "data": {
                    "msteams": {
                        "type": "messageBack",
                        "text": SHARE_FEEDBACK_COMMAND,
                    }
                }
            }
        ],
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::types::ADAPTIVE_CARD_CONTENT_TYPE;

    #[test]
    fn test_survey_card_shape() {
        let card = survey_card("https://bot.example.com");
        assert_eq!(card.content_type, ADAPTIVE_CARD_CONTENT_TYPE);
        assert_eq!(
            card.content["body"][0]["url"],
            "https://bot.example.com/Artifacts/surveyBanner.png"
        );
        assert_eq!(
            card.content["actions"][0]["data"]["msteams"]["text"],
            SHARE_FEEDBACK_COMMAND
        );
    }

    #[test]
    fn test_survey_card_deterministic() {
        assert_eq!(
            survey_card("https://bot.example.com"),
            survey_card("https://bot.example.com")
        );
    }
}
