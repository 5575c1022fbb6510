//! OpenRouter AI insight provider
//!
//! Builds an archetype-specific prompt, sends it to the completion API with
//! bounded output length and fixed sampling temperature, and falls back to
//! archetype-specific canned content when the provider is unavailable.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::Providers;

const COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const MODEL: &str = "openai/gpt-3.5-turbo";
const SYSTEM_PROMPT: &str = "You are a helpful crypto investment advisor. \
    Provide brief, actionable insights in 2-3 sentences. Be concise and specific.";
const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.7;

/// A generated (or canned) insight with its provenance stamps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoInsight {
    pub content: String,
    /// Day-granularity date stamp (YYYY-MM-DD)
    pub date: String,
    pub coins_mentioned: Vec<String>,
    pub generated_at: String,
}

/// The subset of the completion response we actually use
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl Providers {
    /// Personalized insight for the user's archetype and coins
    ///
    /// A missing API key or any provider failure degrades to an
    /// archetype-specific canned insight.
    pub async fn generate_insight(&self, investor_type: &str, coins: &[String]) -> CryptoInsight {
        let Some(api_key) = self.config.openrouter_api_key.clone() else {
            warn!("No OPENROUTER_API_KEY configured, serving canned insight");
            return fallback_insight(investor_type, coins);
        };

        match self.try_generate(&api_key, investor_type, coins).await {
            Ok(insight) => insight,
            Err(first) => {
                warn!("OpenRouter request failed, retrying once: {:#}", first);
                match self.try_generate(&api_key, investor_type, coins).await {
                    Ok(insight) => insight,
                    Err(e) => {
                        warn!("OpenRouter unavailable, serving canned insight: {:#}", e);
                        fallback_insight(investor_type, coins)
                    }
                }
            }
        }
    }

    async fn try_generate(
        &self,
        api_key: &str,
        investor_type: &str,
        coins: &[String],
    ) -> Result<CryptoInsight> {
        let prompt = build_prompt(investor_type, coins);
        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.frontend_url)
            .header("X-Title", "AI Crypto Advisor")
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let data: CompletionResponse = response.json().await?;

        let content = data
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            anyhow::bail!("Empty response from AI");
        }

        Ok(stamp(content, coins))
    }
}

fn stamp(content: String, coins: &[String]) -> CryptoInsight {
    let now = Utc::now();

    CryptoInsight {
        content,
        date: now.format("%Y-%m-%d").to_string(),
        coins_mentioned: coins.to_vec(),
        generated_at: now.to_rfc3339(),
    }
}

fn coins_list(coins: &[String]) -> String {
    coins
        .iter()
        .map(|c| c.to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Archetype-specific prompt, with a generic template for unknown types
pub fn build_prompt(investor_type: &str, coins: &[String]) -> String {
    let coins = coins_list(coins);

    match investor_type {
        "HODLer" => format!(
            "You're advising a long-term crypto investor (HODLer) who holds {coins}. \
             Provide a brief insight about long-term fundamentals and market trends \
             for these assets today."
        ),
        "Day Trader" => format!(
            "You're advising an active day trader focused on {coins}. Provide a brief \
             insight about today's price action, volatility, and short-term trading \
             opportunities."
        ),
        "Swing Trader" => format!(
            "You're advising a swing trader (holds 1-4 weeks) interested in {coins}. \
             Provide a brief insight about medium-term price trends and key \
             support/resistance levels."
        ),
        "NFT Collector" => format!(
            "You're advising an NFT enthusiast who follows {coins}. Provide a brief \
             insight about NFT trends, collections, and market activity on these \
             blockchains."
        ),
        "DeFi Enthusiast" => format!(
            "You're advising a DeFi investor focused on {coins}. Provide a brief \
             insight about DeFi protocol developments, yields, and ecosystem updates."
        ),
        "Miner" => format!(
            "You're advising a crypto miner focused on {coins}. Provide a brief \
             insight about mining profitability, network difficulty, and hardware \
             considerations."
        ),
        "Staker" => format!(
            "You're advising someone who stakes {coins}. Provide a brief insight \
             about staking rewards, network updates, and validator opportunities."
        ),
        _ => format!("Provide a brief crypto market insight about {coins} for today."),
    }
}

/// Canned archetype-specific insight used when the provider is unavailable
pub fn fallback_insight(investor_type: &str, coins: &[String]) -> CryptoInsight {
    let list = coins_list(coins);

    let content = match investor_type {
        "HODLer" => format!(
            "For long-term holders of {list}: Market fundamentals remain strong despite \
             short-term volatility. Continue dollar-cost averaging and ignore daily noise. \
             Focus on technology development and adoption metrics."
        ),
        "Day Trader" => format!(
            "For active traders on {list}: Watch for breakout patterns above key resistance \
             levels. Volume has been increasing, suggesting potential momentum. Set tight \
             stop-losses in this volatile environment."
        ),
        "Swing Trader" => format!(
            "For swing traders holding {list}: Medium-term trend remains bullish. Consider \
             taking partial profits near resistance zones and re-entering on pullbacks to \
             support levels."
        ),
        "NFT Collector" => format!(
            "For NFT enthusiasts on {list}: Blue-chip collections continue to show \
             resilience. Watch for new launches on these chains. Floor prices stabilizing \
             after recent market movements."
        ),
        "DeFi Enthusiast" => format!(
            "For DeFi investors on {list}: Total Value Locked (TVL) showing steady growth. \
             New yield opportunities emerging in liquidity pools. Always verify smart \
             contract audits before depositing."
        ),
        "Miner" => format!(
            "For miners of {list}: Network hash rate stable. Energy costs remain the key \
             profitability factor. Consider joining mining pools for more consistent rewards."
        ),
        "Staker" => format!(
            "For stakers of {list}: Staking yields remain attractive. Network security \
             continues to improve. Ensure you're using reputable validators with good uptime."
        ),
        _ => format!(
            "Market analysis for {list}: Stay informed, manage risk, and make decisions \
             based on your investment strategy and risk tolerance."
        ),
    };

    stamp(content, coins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::INVESTOR_TYPES;

    fn coins(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_each_archetype_gets_its_own_prompt() {
        let coins = coins(&["bitcoin"]);

        let mut prompts: Vec<String> = INVESTOR_TYPES
            .iter()
            .map(|archetype| build_prompt(archetype, &coins))
            .collect();
        prompts.push(build_prompt("Unknown", &coins));

        let before = prompts.len();
        prompts.sort();
        prompts.dedup();
        assert_eq!(prompts.len(), before);
    }

    #[test]
    fn test_prompt_mentions_uppercased_coins() {
        let prompt = build_prompt("HODLer", &coins(&["bitcoin", "solana"]));
        assert!(prompt.contains("BITCOIN, SOLANA"));
    }

    #[test]
    fn test_unknown_archetype_uses_generic_template() {
        let prompt = build_prompt("Astrologer", &coins(&["cardano"]));
        assert!(prompt.starts_with("Provide a brief crypto market insight"));
    }

    #[test]
    fn test_fallback_insight_is_stamped() {
        let insight = fallback_insight("Staker", &coins(&["solana"]));

        assert!(insight.content.contains("SOL"));
        assert_eq!(insight.date.len(), 10); // YYYY-MM-DD
        assert_eq!(insight.coins_mentioned, vec!["solana"]);
        assert!(!insight.generated_at.is_empty());
    }

    #[test]
    fn test_fallback_differs_per_archetype() {
        let coins = coins(&["bitcoin"]);
        let hodler = fallback_insight("HODLer", &coins);
        let miner = fallback_insight("Miner", &coins);
        let unknown = fallback_insight("Astrologer", &coins);

        assert_ne!(hodler.content, miner.content);
        assert!(unknown.content.starts_with("Market analysis"));
    }
}
