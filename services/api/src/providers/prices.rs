//! CoinGecko market-data provider

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Providers;

const MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

/// Normalized price projection returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinPrice {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub image: String,
}

/// The subset of a CoinGecko market row we actually use
#[derive(Debug, Deserialize)]
struct MarketRow {
    id: String,
    symbol: String,
    name: String,
    image: String,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    price_change_24h: Option<f64>,
    price_change_percentage_24h: Option<f64>,
}

impl Providers {
    /// Current prices for the given coin ids
    ///
    /// Any provider failure degrades to the static fallback list filtered
    /// to the requested ids.
    pub async fn fetch_prices(&self, coin_ids: &[String]) -> Vec<CoinPrice> {
        match self.try_fetch_prices(coin_ids).await {
            Ok(prices) => prices,
            Err(first) => {
                warn!("CoinGecko request failed, retrying once: {:#}", first);
                match self.try_fetch_prices(coin_ids).await {
                    Ok(prices) => prices,
                    Err(e) => {
                        warn!("CoinGecko unavailable, serving fallback prices: {:#}", e);
                        fallback_prices(coin_ids)
                    }
                }
            }
        }
    }

    async fn try_fetch_prices(&self, coin_ids: &[String]) -> Result<Vec<CoinPrice>> {
        let ids = coin_ids.join(",");
        let mut request = self.client.get(MARKETS_URL).query(&[
            ("vs_currency", "usd"),
            ("ids", ids.as_str()),
            ("order", "market_cap_desc"),
            ("sparkline", "false"),
        ]);

        // The demo API key is optional and only improves rate limits
        if let Some(api_key) = &self.config.coingecko_api_key {
            request = request.header("x-cg-demo-api-key", api_key);
        }

        let response = request.send().await?.error_for_status()?;
        let rows: Vec<MarketRow> = response.json().await?;

        Ok(rows
            .into_iter()
            .map(|row| CoinPrice {
                id: row.id,
                symbol: row.symbol.to_uppercase(),
                name: row.name,
                current_price: row.current_price.unwrap_or_default(),
                price_change_24h: row.price_change_24h.unwrap_or_default(),
                price_change_percentage_24h: row.price_change_percentage_24h.unwrap_or_default(),
                market_cap: row.market_cap.unwrap_or_default(),
                total_volume: row.total_volume.unwrap_or_default(),
                image: row.image,
            })
            .collect())
    }
}

/// Static prices served when the provider is unavailable, filtered to the
/// requested ids; unknown ids are silently dropped.
pub fn fallback_prices(coin_ids: &[String]) -> Vec<CoinPrice> {
    coin_ids.iter().filter_map(|id| fallback_price(id)).collect()
}

fn fallback_price(id: &str) -> Option<CoinPrice> {
    let price = match id {
        "bitcoin" => CoinPrice {
            id: "bitcoin".to_string(),
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            current_price: 45000.0,
            price_change_24h: 1250.0,
            price_change_percentage_24h: 2.85,
            market_cap: 880_000_000_000.0,
            total_volume: 25_000_000_000.0,
            image: "https://assets.coingecko.com/coins/images/1/large/bitcoin.png".to_string(),
        },
        "ethereum" => CoinPrice {
            id: "ethereum".to_string(),
            symbol: "ETH".to_string(),
            name: "Ethereum".to_string(),
            current_price: 2400.0,
            price_change_24h: -45.0,
            price_change_percentage_24h: -1.84,
            market_cap: 290_000_000_000.0,
            total_volume: 12_000_000_000.0,
            image: "https://assets.coingecko.com/coins/images/279/large/ethereum.png".to_string(),
        },
        "cardano" => CoinPrice {
            id: "cardano".to_string(),
            symbol: "ADA".to_string(),
            name: "Cardano".to_string(),
            current_price: 0.52,
            price_change_24h: 0.03,
            price_change_percentage_24h: 6.12,
            market_cap: 18_000_000_000.0,
            total_volume: 450_000_000.0,
            image: "https://assets.coingecko.com/coins/images/975/large/cardano.png".to_string(),
        },
        "solana" => CoinPrice {
            id: "solana".to_string(),
            symbol: "SOL".to_string(),
            name: "Solana".to_string(),
            current_price: 105.0,
            price_change_24h: 8.5,
            price_change_percentage_24h: 8.8,
            market_cap: 45_000_000_000.0,
            total_volume: 2_500_000_000.0,
            image: "https://assets.coingecko.com/coins/images/4128/large/solana.png".to_string(),
        },
        _ => return None,
    };

    Some(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_fallback_is_filtered_to_requested_ids() {
        let prices = fallback_prices(&ids(&["bitcoin", "solana"]));

        let returned: Vec<&str> = prices.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(returned, vec!["bitcoin", "solana"]);
    }

    #[test]
    fn test_unknown_ids_are_silently_dropped() {
        let prices = fallback_prices(&ids(&["bitcoin", "dogwifhat"]));

        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].id, "bitcoin");
    }

    #[test]
    fn test_fallback_symbols_are_uppercase() {
        let prices = fallback_prices(&ids(&["bitcoin", "ethereum", "cardano", "solana"]));

        let symbols: Vec<&str> = prices.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH", "ADA", "SOL"]);
    }
}
