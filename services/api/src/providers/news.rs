//! CryptoPanic news provider

use anyhow::Result;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Providers;

const POSTS_URL: &str = "https://cryptopanic.com/api/free/v1/posts/";

/// Normalized news projection returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    /// Lowercased currency codes the article is tagged with
    pub currencies: Vec<String>,
}

/// The subset of the CryptoPanic response we actually use
#[derive(Debug, Deserialize)]
struct PostsResponse {
    results: Vec<PostRow>,
}

#[derive(Debug, Deserialize)]
struct PostRow {
    id: i64,
    title: String,
    published_at: String,
    url: String,
    source: PostSource,
    #[serde(default)]
    currencies: Vec<PostCurrency>,
}

#[derive(Debug, Deserialize)]
struct PostSource {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PostCurrency {
    code: String,
}

impl Providers {
    /// Up to `limit` recent news articles
    ///
    /// A missing API key or any provider failure degrades to the static
    /// fallback set, truncated to `limit`.
    pub async fn fetch_news(&self, limit: usize) -> Vec<NewsArticle> {
        let Some(api_key) = self.config.cryptopanic_api_key.clone() else {
            warn!("No CRYPTOPANIC_API_KEY configured, serving fallback news");
            return fallback_news(limit);
        };

        match self.try_fetch_news(&api_key, limit).await {
            Ok(articles) => articles,
            Err(first) => {
                warn!("CryptoPanic request failed, retrying once: {:#}", first);
                match self.try_fetch_news(&api_key, limit).await {
                    Ok(articles) => articles,
                    Err(e) => {
                        warn!("CryptoPanic unavailable, serving fallback news: {:#}", e);
                        fallback_news(limit)
                    }
                }
            }
        }
    }

    async fn try_fetch_news(&self, api_key: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let response = self
            .client
            .get(POSTS_URL)
            .query(&[("auth_token", api_key), ("public", "true"), ("kind", "news")])
            .send()
            .await?
            .error_for_status()?;

        let data: PostsResponse = response.json().await?;

        Ok(data
            .results
            .into_iter()
            .take(limit)
            .map(|post| NewsArticle {
                id: post.id.to_string(),
                title: post.title,
                url: post.url,
                source: post.source.title,
                published_at: post.published_at,
                currencies: post
                    .currencies
                    .into_iter()
                    .map(|c| c.code.to_lowercase())
                    .collect(),
            })
            .collect())
    }
}

/// Keep articles whose currency tags intersect the user's coins
///
/// An empty intersection returns the full list rather than an empty result:
/// degraded relevance beats a blank dashboard.
pub fn filter_by_coins(articles: &[NewsArticle], coins: &[String]) -> Vec<NewsArticle> {
    let filtered: Vec<NewsArticle> = articles
        .iter()
        .filter(|article| article.currencies.iter().any(|code| coins.contains(code)))
        .cloned()
        .collect();

    if filtered.is_empty() {
        articles.to_vec()
    } else {
        filtered
    }
}

/// Static articles served when the provider is unavailable
pub fn fallback_news(limit: usize) -> Vec<NewsArticle> {
    let now = Utc::now();
    let stamp = |hours_ago: i64| (now - Duration::hours(hours_ago)).to_rfc3339();

    let articles = vec![
        NewsArticle {
            id: "1".to_string(),
            title: "Bitcoin ETF Sees Record Inflows".to_string(),
            url: "https://example.com/news/1".to_string(),
            source: "CoinDesk".to_string(),
            published_at: stamp(0),
            currencies: vec!["btc".to_string()],
        },
        NewsArticle {
            id: "2".to_string(),
            title: "Ethereum 2.0 Upgrade Shows Strong Progress".to_string(),
            url: "https://example.com/news/2".to_string(),
            source: "Cointelegraph".to_string(),
            published_at: stamp(1),
            currencies: vec!["eth".to_string()],
        },
        NewsArticle {
            id: "3".to_string(),
            title: "Solana Network Reaches New Transaction Milestone".to_string(),
            url: "https://example.com/news/3".to_string(),
            source: "Decrypt".to_string(),
            published_at: stamp(2),
            currencies: vec!["sol".to_string()],
        },
        NewsArticle {
            id: "4".to_string(),
            title: "DeFi Protocols See Increased Adoption".to_string(),
            url: "https://example.com/news/4".to_string(),
            source: "The Block".to_string(),
            published_at: stamp(3),
            currencies: vec!["eth".to_string(), "sol".to_string()],
        },
        NewsArticle {
            id: "5".to_string(),
            title: "Cardano Launches Smart Contract Update".to_string(),
            url: "https://example.com/news/5".to_string(),
            source: "CryptoSlate".to_string(),
            published_at: stamp(4),
            currencies: vec!["ada".to_string()],
        },
    ];

    articles.into_iter().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, currencies: &[&str]) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            title: format!("Article {}", id),
            url: format!("https://example.com/{}", id),
            source: "Test".to_string(),
            published_at: Utc::now().to_rfc3339(),
            currencies: currencies.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn coins(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_filter_keeps_only_matching_articles() {
        let articles = vec![article("1", &["btc"]), article("2", &["eth"])];

        let filtered = filter_by_coins(&articles, &coins(&["eth"]));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
    }

    #[test]
    fn test_empty_intersection_returns_full_list() {
        let articles = vec![article("1", &["btc"]), article("2", &["eth"])];

        let filtered = filter_by_coins(&articles, &coins(&["ada"]));

        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_fallback_respects_limit() {
        assert_eq!(fallback_news(2).len(), 2);
        assert_eq!(fallback_news(10).len(), 5);
    }

    #[test]
    fn test_fallback_currencies_are_lowercase_codes() {
        for article in fallback_news(10) {
            assert!(!article.currencies.is_empty());
            for code in &article.currencies {
                assert_eq!(code, &code.to_lowercase());
            }
        }
    }
}
