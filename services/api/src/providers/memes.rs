//! Humorapi meme provider

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Providers;

const SEARCH_URL: &str = "https://api.humorapi.com/memes/search";

/// A meme reference returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoMeme {
    pub id: String,
    pub url: String,
}

/// The subset of the Humorapi response we actually use
#[derive(Debug, Deserialize)]
struct MemeSearchResponse {
    memes: Vec<MemeRow>,
}

#[derive(Debug, Deserialize)]
struct MemeRow {
    id: i64,
    url: String,
}

impl Providers {
    /// Up to `limit` memes matching the keywords
    ///
    /// A missing API key or any provider failure degrades to the static
    /// fallback set, truncated to `limit`.
    pub async fn fetch_memes(&self, limit: usize, keywords: &str) -> Vec<CryptoMeme> {
        let Some(api_key) = self.config.humorapi_api_key.clone() else {
            warn!("No HUMORAPI_API_KEY configured, serving fallback memes");
            return fallback_memes(limit);
        };

        match self.try_fetch_memes(&api_key, limit, keywords).await {
            Ok(memes) => memes,
            Err(first) => {
                warn!("Humorapi request failed, retrying once: {:#}", first);
                match self.try_fetch_memes(&api_key, limit, keywords).await {
                    Ok(memes) => memes,
                    Err(e) => {
                        warn!("Humorapi unavailable, serving fallback memes: {:#}", e);
                        fallback_memes(limit)
                    }
                }
            }
        }
    }

    async fn try_fetch_memes(
        &self,
        api_key: &str,
        limit: usize,
        keywords: &str,
    ) -> Result<Vec<CryptoMeme>> {
        let number = limit.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("number", number.as_str()), ("keywords", keywords)])
            .header("x-api-key", api_key)
            .send()
            .await?
            .error_for_status()?;

        let data: MemeSearchResponse = response.json().await?;

        Ok(data
            .memes
            .into_iter()
            .take(limit)
            .map(|meme| CryptoMeme {
                id: meme.id.to_string(),
                url: meme.url,
            })
            .collect())
    }
}

/// Static memes served when the provider is unavailable
pub fn fallback_memes(limit: usize) -> Vec<CryptoMeme> {
    let urls = [
        "https://i.imgflip.com/65939r.jpg",
        "https://i.imgflip.com/6593a3.jpg",
        "https://i.imgflip.com/6593af.jpg",
        "https://i.imgflip.com/6593b1.jpg",
        "https://i.imgflip.com/6593bd.jpg",
    ];

    urls.iter()
        .enumerate()
        .take(limit)
        .map(|(index, url)| CryptoMeme {
            id: (index + 1).to_string(),
            url: url.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_respects_limit() {
        assert_eq!(fallback_memes(3).len(), 3);
        assert_eq!(fallback_memes(10).len(), 5);
    }

    #[test]
    fn test_fallback_ids_are_sequential() {
        let memes = fallback_memes(5);
        let ids: Vec<&str> = memes.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }
}
