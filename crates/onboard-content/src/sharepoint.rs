//! SharePoint learning-plan reader.
//!
//! The plan is a SharePoint list with one row per learning task. Rows carry
//! a `CompleteBy` label ("Week 1" … "Week N") that the scheduler matches
//! against each new hire's onboarding week.

use async_trait::async_trait;
use serde_json::Value;

use onboard_core::config::SharePointConfig;
use onboard_core::error::{OnboardError, Result};
use onboard_core::traits::ContentSource;
use onboard_core::types::{LearningPlanItem, ResourceLink};

use crate::graph::GraphTokenClient;

/// Learning-plan source backed by a SharePoint list via Microsoft Graph.
pub struct SharePointContentSource {
    client: reqwest::Client,
    tokens: GraphTokenClient,
    site_id: String,
    list_id: String,
}

impl SharePointContentSource {
    pub fn new(config: &SharePointConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens: GraphTokenClient::new(
                &config.tenant_id,
                &config.client_id,
                &config.client_secret,
            ),
            site_id: config.site_id.clone(),
            list_id: config.list_id.clone(),
        }
    }

    fn items_url(&self) -> String {
        format!(
            "https://graph.microsoft.com/v1.0/sites/{}/lists/{}/items?expand=fields&$top=999",
            self.site_id, self.list_id
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<Value> {
        let token = self.tokens.token().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| OnboardError::Content(format!("List items request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OnboardError::Content(format!(
                "Graph list items error {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OnboardError::Content(format!("Invalid list items response: {e}")))
    }
}

#[async_trait]
impl ContentSource for SharePointContentSource {
    async fn learning_plan(&self) -> Result<Vec<LearningPlanItem>> {
        let mut items = Vec::new();
        let mut url = self.items_url();

        loop {
            let page = self.fetch_page(&url).await?;
            items.extend(parse_learning_plan(&page));
            match page["@odata.nextLink"].as_str() {
                Some(next) => url = next.to_string(),
                None => break,
            }
        }

        tracing::debug!("📚 Loaded {} learning plan items", items.len());
        Ok(items)
    }
}

/// Map a Graph list-items page to learning-plan items. Rows without a topic
/// and task name are skipped.
pub fn parse_learning_plan(page: &Value) -> Vec<LearningPlanItem> {
    let rows = match page["value"].as_array() {
        Some(rows) => rows,
        None => return Vec::new(),
    };

    rows.iter()
        .filter_map(|row| {
            let fields = &row["fields"];
            let topic = fields["Topic"].as_str().unwrap_or_default().trim();
            let task_name = fields["TaskName"].as_str().unwrap_or_default().trim();
            if topic.is_empty() && task_name.is_empty() {
                return None;
            }
            Some(LearningPlanItem {
                topic: topic.to_string(),
                task_name: task_name.to_string(),
                complete_by: fields["CompleteBy"].as_str().unwrap_or_default().trim().to_string(),
                notes: fields["Notes"].as_str().unwrap_or_default().to_string(),
                link: parse_link(&fields["Link"]),
                image_url: fields["TaskImage"]["Url"]
                    .as_str()
                    .filter(|url| !url.is_empty())
                    .map(String::from),
            })
        })
        .collect()
}

fn parse_link(value: &Value) -> Option<ResourceLink> {
    let url = value["Url"].as_str()?.trim();
    if url.is_empty() {
        return None;
    }
    Some(ResourceLink {
        url: url.to_string(),
        description: value["Description"].as_str().unwrap_or_default().to_string(),
    })
}
