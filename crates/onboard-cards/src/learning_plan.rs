//! Learning-plan cards.
//!
//! Two shapes: the weekly list card (one row per task due that week) and the
//! single-task detail card a user sees when they open a row.

use serde_json::{json, Value};

use onboard_core::types::{CardAttachment, LearningPlanItem};

use crate::{ADAPTIVE_CARD_VERSION, SHARE_FEEDBACK_COMMAND};

/// Detail-card image dimensions in pixels.
const IMAGE_HEIGHT: u32 = 132;
const IMAGE_WIDTH: u32 = 500;

/// Build the weekly list card for the given week label.
///
/// Filters the complete plan down to items whose completion-week label
/// matches `week_label` (case-insensitive). Items without an image fall back
/// to the bundled artifact icon.
pub fn learning_plan_list_card(
    plan: &[LearningPlanItem],
    week_label: &str,
    app_base_uri: &str,
) -> CardAttachment {
    let items: Vec<Value> = plan
        .iter()
        .filter(|item| item.complete_by.eq_ignore_ascii_case(week_label))
        .map(|item| list_item(item, week_label, app_base_uri))
        .collect();

    CardAttachment::list(json!({
        "title": week_label,
        "items": items,
    }))
}

fn list_item(item: &LearningPlanItem, week_label: &str, app_base_uri: &str) -> Value {
    let icon = item
        .image_url
        .clone()
        .unwrap_or_else(|| format!("{app_base_uri}/Artifacts/listCardDefaultImage.png"));

    let mut entry = json!({
        "id": format!("{} => {} => {}", week_label, item.topic, item.task_name),
        "type": "resultItem",
        "title": item.topic,
        "subtitle": item.task_name,
        "icon": icon,
    });

    if let Some(link) = &item.link {
        entry["tap"] = json!({
            "type": "openUrl",
            "value": link.url,
        });
    }

    entry
}

/// Build the detail card for a single learning task.
pub fn learning_item_card(item: &LearningPlanItem, app_base_uri: &str) -> CardAttachment {
    let image = item
        .image_url
        .clone()
        .unwrap_or_else(|| format!("{app_base_uri}/Artifacts/learningPlan.png"));

    let mut actions = Vec::new();
    if let Some(link) = &item.link {
        actions.push(json!({
            "type": "Action.OpenUrl",
            "title": "View",
            "url": open_in_teams_url(&link.url),
        }));
    }
    actions.push(json!({
        "type": "Action.Submit",
        "title": "Share feedback",
        "data": {
            "msteams": {
                "type": "messageBack",
                "text": SHARE_FEEDBACK_COMMAND,
            }
        }
    }));

    CardAttachment::adaptive(json!({
        "type": "AdaptiveCard",
        "version": ADAPTIVE_CARD_VERSION,
        "body": [
            {
                "type": "TextBlock",
                "weight": "Bolder",
                "size": "ExtraLarge",
                "text": item.topic,
                "wrap": true,
            },
            {
                "type": "TextBlock",
                "spacing": "Small",
                "size": "Small",
                "color": "Accent",
                "text": item.task_name,
                "wrap": true,
            },
            {
                "type": "Image",
                "url": image,
                "altText": item.notes,
                "pixelHeight": IMAGE_HEIGHT,
                "pixelWidth": IMAGE_WIDTH,
            },
            {
                "type": "TextBlock",
                "spacing": "Medium",
                "text": item.notes,
                "wrap": true,
            },
        ],
        "actions": actions,
    }))
}

/// Rewrite a document URL into the Teams in-app file viewer when the link
/// points at a file; plain pages open as-is.
fn open_in_teams_url(url: &str) -> String {
    match file_extension(url) {
        Some(ext) => {
            let escaped = url.replace('/', "~2F");
            format!("https://teams.microsoft.com/_#/{ext}/viewer/teams/{escaped}")
        }
        None => url.to_string(),
    }
}

/// Extension of the file a URL points at, ignoring query strings.
fn file_extension(url: &str) -> Option<String> {
    let path = url.split('?').next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = last.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}
