use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value as Json;
use std::time::Duration;

use super::StatsSource;

pub const DEFAULT_API_BASE: &str = "https://wbapi.wbpjs.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Entry of a squad member listing. Only the identifier is used.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SquadMember {
    pub uid: String,
    #[serde(default)]
    pub nick: Option<String>,
}

/// Blocking client for the War Brokers stats API
pub struct WbClient {
    client: Client,
    base_url: String,
}

impl WbClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wb-stats-normalizer/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Json> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} failed", url))?;

        let text = response.text().context("Failed to read response")?;
        parse_body(&text).with_context(|| format!("Failed to parse response from {}", url))
    }
}

/// An empty body is treated like an explicit `null`
fn parse_body(text: &str) -> serde_json::Result<Json> {
    if text.trim().is_empty() {
        return Ok(Json::Null);
    }
    serde_json::from_str(text)
}

impl StatsSource for WbClient {
    fn fetch_squad_list(&self) -> Result<Vec<String>> {
        let json = self.get_json("/squad/getSquadList", &[])?;
        serde_json::from_value(json).context("Squad list is not an array of names")
    }

    fn fetch_squad_members(&self, squad: &str) -> Result<Vec<SquadMember>> {
        let json = self.get_json("/squad/getSquadMembers", &[("squadName", squad)])?;
        if json.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(json)
            .with_context(|| format!("Member list of squad {} is malformed", squad))
    }

    fn fetch_player(&self, uid: &str) -> Result<Json> {
        self.get_json("/players/getPlayer", &[("uid", uid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body("").unwrap(), Json::Null);
        assert_eq!(parse_body("  \n").unwrap(), Json::Null);
        assert_eq!(parse_body("null").unwrap(), Json::Null);
        assert_eq!(parse_body(r#"{"nick":"a"}"#).unwrap(), json!({"nick": "a"}));
        assert!(parse_body("<html>").is_err());
    }

    #[test]
    fn test_squad_member_ignores_unknown_fields() {
        let members: Vec<SquadMember> =
            serde_json::from_value(json!([{"uid": "u1", "nick": "a", "level": 3}, {"uid": "u2"}])).unwrap();
        assert_eq!(members[0].uid, "u1");
        assert_eq!(members[1].nick, None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = WbClient::new("https://example.invalid/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://example.invalid");
    }
}
