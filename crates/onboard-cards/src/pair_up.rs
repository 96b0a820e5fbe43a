//! Pair-up meeting suggestion card.

use serde_json::json;

use onboard_core::types::{CardAttachment, UserRecord};

use crate::{ADAPTIVE_CARD_VERSION, PAUSE_MATCHES_COMMAND};

/// Marker in the UPN that indicates an externally-authenticated guest user.
const EXTERNALLY_AUTHENTICATED_UPN_MARKER: &str = "#ext#";

/// Build the pair-up card `sender` receives about being matched with
/// `recipient`.
pub fn pair_up_card(sender: &UserRecord, recipient: &UserRecord) -> CardAttachment {
    // To start a chat with a guest user, use their external email, not the UPN.
    let recipient_upn = if is_guest_user(recipient) {
        recipient.email.as_str()
    } else {
        recipient.user_principal_name.as_str()
    };

    let meeting_title = format!("Meetup: {} / {}", sender.name, recipient.name);
    let meeting_content = "Let's find 30 minutes to get to know each other!";
    let meeting_link = format!(
        "https://teams.microsoft.com/l/meeting/new?subject={}&attendees={}&content={}",
        urlencoding::encode(&meeting_title),
        recipient_upn,
        urlencoding::encode(meeting_content),
    );
    let chat_link = format!(
        "https://teams.microsoft.com/l/chat/0/0?users={}&message={}",
        urlencoding::encode(recipient_upn),
        urlencoding::encode("Hi there! We got matched for a pair-up meetup."),
    );

    CardAttachment::adaptive(json!({
        "type": "AdaptiveCard",
        "version": ADAPTIVE_CARD_VERSION,
        "body": [
            {
                "type": "TextBlock",
                "size": "Medium",
                "weight": "Bolder",
                "text": "You've been matched!",
                "wrap": true,
                "maxLines": 2,
            },
            {
                "type": "TextBlock",
                "text": format!("Say hello to {}.", recipient.name),
                "wrap": true,
            },
            {
                "type": "TextBlock",
                "text": format!(
                    "Onboardbot paired you with {} for a get-to-know-you chat this round.",
                    recipient.name
                ),
                "wrap": true,
            },
            {
                "type": "TextBlock",
                "text": "Grab a coffee together, in person or online.",
                "wrap": true,
            },
        ],
        "actions": [
            {
                "type": "Action.OpenUrl",
                "title": format!("Chat with {}", recipient.name),
                "url": chat_link,
            },
            {
                "type": "Action.OpenUrl",
                "title": "Propose a meetup",
                "url": meeting_link,
            },
            {
                "type": "Action.Submit",
                "title": "Pause matches",
                "data": {
                    "msteams": {
                        "type": "messageBack",
                        "displayText": "Pause matches",
                        "text": PAUSE_MATCHES_COMMAND,
                    }
                }
            },
        ],
    }))
}

/// Whether the account is an externally-authenticated guest.
fn is_guest_user(account: &UserRecord) -> bool {
    account
        .user_principal_name
        .to_ascii_lowercase()
        .contains(EXTERNALLY_AUTHENTICATED_UPN_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use onboard_core::types::UserRole;

    fn user(name: &str, upn: &str, email: &str) -> UserRecord {
        UserRecord {
            aad_object_id: format!("aad-{name}"),
            name: name.into(),
            user_principal_name: upn.into(),
            email: email.into(),
            conversation_id: format!("conv-{name}"),
            service_url: "https://smba.trafficmanager.net/amer/".into(),
            role: UserRole::NewHire,
            bot_installed_on: Utc::now(),
            opted_in: true,
            profile_image_url: None,
        }
    }

    #[test]
    fn test_pair_up_card_links_use_upn() {
        let sender = user("Alex", "alex@contoso.com", "alex@contoso.com");
        let recipient = user("Sam", "sam@contoso.com", "sam@contoso.com");
        let card = pair_up_card(&sender, &recipient);

        let actions = card.content["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 3);
        let chat_url = actions[0]["url"].as_str().unwrap();
        assert!(chat_url.starts_with("https://teams.microsoft.com/l/chat/0/0?users=sam%40contoso.com"));
        let meeting_url = actions[1]["url"].as_str().unwrap();
        assert!(meeting_url.contains("attendees=sam@contoso.com"));
        assert!(meeting_url.contains("subject=Meetup%3A%20Alex%20%2F%20Sam"));
        assert_eq!(actions[2]["data"]["msteams"]["text"], PAUSE_MATCHES_COMMAND);
    }

    #[test]
    fn test_guest_recipient_uses_email() {
        let sender = user("Alex", "alex@contoso.com", "alex@contoso.com");
        let recipient = user(
            "Guest",
            "guest_outlook.com#EXT#@contoso.onmicrosoft.com",
            "guest@outlook.com",
        );
        let card = pair_up_card(&sender, &recipient);
        let chat_url = card.content["actions"][0]["url"].as_str().unwrap();
        assert!(chat_url.contains("guest%40outlook.com"));
        assert!(!chat_url.contains("onmicrosoft"));
    }

    #[test]
    fn test_card_mentions_recipient_not_sender() {
        let sender = user("Alex", "alex@contoso.com", "alex@contoso.com");
        let recipient = user("Sam", "sam@contoso.com", "sam@contoso.com");
        let card = pair_up_card(&sender, &recipient);
        let body = serde_json::to_string(&card.content["body"]).unwrap();
        assert!(body.contains("Sam"));
    }
}
