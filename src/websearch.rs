//! Web search box: engine table, query resolution, and suggestions.

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::error::Result;

/// Endpoint for search-as-you-type suggestions (Firefox client format).
const SUGGEST_ENDPOINT: &str = "https://suggestqueries.google.com/complete/search?client=firefox&q=";

/// Maximum suggestions shown in the dropdown.
pub const MAX_SUGGESTIONS: usize = 8;

/// A supported web search engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    DuckDuckGo,
    Yahoo,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 4] = [
        SearchEngine::Google,
        SearchEngine::Bing,
        SearchEngine::DuckDuckGo,
        SearchEngine::Yahoo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Bing => "Bing",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
            SearchEngine::Yahoo => "Yahoo",
        }
    }

    /// Translation key of the engine's display name.
    pub fn label_key(self) -> &'static str {
        match self {
            SearchEngine::Google => "settings.engine.google",
            SearchEngine::Bing => "settings.engine.bing",
            SearchEngine::DuckDuckGo => "settings.engine.duckduckgo",
            SearchEngine::Yahoo => "settings.engine.yahoo",
        }
    }

    /// Query URL prefix; the encoded query is appended.
    pub fn search_url(self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com/search?q=",
            SearchEngine::Bing => "https://www.bing.com/search?q=",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com/?q=",
            SearchEngine::Yahoo => "https://search.yahoo.com/search?p=",
        }
    }

    /// Step through the settings selector by `delta`, wrapping.
    pub fn cycle(self, delta: isize) -> Self {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0) as isize;
        Self::ALL[(idx + delta).rem_euclid(Self::ALL.len() as isize) as usize]
    }
}

fn encode(query: &str) -> String {
    form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Turn a submitted query into the URL to navigate to.
///
/// Absolute URLs are opened directly (`https://` is added when the text has
/// no `://`); anything else becomes a search on `engine`. Blank input yields
/// `None`.
pub fn resolve_query(query: &str, engine: SearchEngine) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if Url::parse(query).is_ok() {
        if query.contains("://") {
            return Some(query.to_string());
        }
        return Some(format!("https://{}", query));
    }
    Some(format!("{}{}", engine.search_url(), encode(query)))
}

/// The suggestion endpoint URL for `query`.
pub fn suggest_url(query: &str) -> String {
    format!("{}{}", SUGGEST_ENDPOINT, encode(query))
}

/// Parse the `[query, [suggestion, ...]]` response body.
pub fn parse_suggestions(body: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    value
        .get(1)
        .and_then(|list| list.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|s| s.as_str().map(str::to_string))
                .take(MAX_SUGGESTIONS)
                .collect()
        })
        .unwrap_or_default()
}

/// Fetch suggestions for `query`. Failures are for the caller to drop.
pub async fn fetch_suggestions(client: &reqwest::Client, query: &str) -> Result<Vec<String>> {
    let body = client
        .get(suggest_url(query))
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(parse_suggestions(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_opens_directly() {
        assert_eq!(
            resolve_query("https://example.com/a", SearchEngine::Google).as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn scheme_without_slashes_gets_https_prefix() {
        assert_eq!(
            resolve_query("mailto:me@example.com", SearchEngine::Google).as_deref(),
            Some("https://mailto:me@example.com")
        );
    }

    #[test]
    fn plain_text_is_searched_with_engine() {
        assert_eq!(
            resolve_query("rust lang", SearchEngine::DuckDuckGo).as_deref(),
            Some("https://duckduckgo.com/?q=rust+lang")
        );
        assert_eq!(
            resolve_query("a&b", SearchEngine::Yahoo).as_deref(),
            Some("https://search.yahoo.com/search?p=a%26b")
        );
    }

    #[test]
    fn blank_query_resolves_to_nothing() {
        assert_eq!(resolve_query("   ", SearchEngine::Bing), None);
    }

    #[test]
    fn parse_suggestion_payload() {
        let body = r#"["rus",["rust","russia","rust lang"]]"#;
        assert_eq!(parse_suggestions(body), vec!["rust", "russia", "rust lang"]);
        assert!(parse_suggestions("oops").is_empty());
        assert!(parse_suggestions(r#"["q"]"#).is_empty());
    }

    #[test]
    fn engine_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&SearchEngine::DuckDuckGo).unwrap(), "\"duckduckgo\"");
        assert_eq!(SearchEngine::Yahoo.cycle(1), SearchEngine::Google);
        assert_eq!(SearchEngine::Google.cycle(-1), SearchEngine::Yahoo);
    }

    #[test]
    fn suggest_url_encodes_query() {
        assert!(suggest_url("a b").ends_with("client=firefox&q=a+b"));
    }
}
