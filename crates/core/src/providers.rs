//! Records returned by the companion providers: CheapShark deals,
//! FreeToGame listings, the Steam store, SteamSpy and the IGDB proxy

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::models::null_as_default;

/// CheapShark sends prices as decimal strings
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

// ============================================================================
// CheapShark
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(rename = "dealID", default)]
    pub deal_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "internalName", default)]
    pub internal_name: String,
    #[serde(rename = "storeID", default)]
    pub store_id: String,
    #[serde(rename = "gameID", default)]
    pub game_id: String,
    #[serde(rename = "salePrice", default)]
    pub sale_price: String,
    #[serde(rename = "normalPrice", default)]
    pub normal_price: String,
    #[serde(default)]
    pub savings: String,
    #[serde(rename = "isOnSale", default)]
    pub is_on_sale: String,
    #[serde(rename = "metacriticScore", default)]
    pub metacritic_score: String,
    #[serde(rename = "steamRatingText", default)]
    pub steam_rating_text: Option<String>,
    #[serde(rename = "steamAppID", default)]
    pub steam_app_id: Option<String>,
    #[serde(rename = "dealRating", default)]
    pub deal_rating: String,
    #[serde(default)]
    pub thumb: String,
}

impl Deal {
    pub fn sale_price_value(&self) -> Option<f64> {
        parse_price(&self.sale_price)
    }

    pub fn normal_price_value(&self) -> Option<f64> {
        parse_price(&self.normal_price)
    }

    /// Savings as a whole percentage
    pub fn savings_percent(&self) -> u32 {
        parse_price(&self.savings)
            .map(|s| s.round().clamp(0.0, 100.0) as u32)
            .unwrap_or(0)
    }
}

/// Cheapest deal by sale price. Unparsable prices never win; the first of
/// several equally cheap deals is kept.
pub fn cheapest_deal(deals: Vec<Deal>) -> Option<Deal> {
    let mut best: Option<(f64, Deal)> = None;
    for deal in deals {
        let Some(price) = deal.sale_price_value() else {
            continue;
        };
        match &best {
            Some((current, _)) if *current <= price => {}
            _ => best = Some((price, deal)),
        }
    }
    best.map(|(_, deal)| deal)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "storeID", default)]
    pub store_id: String,
    #[serde(rename = "storeName", default)]
    pub store_name: String,
    #[serde(rename = "isActive", default)]
    pub is_active: u8,
}

/// Entry from the CheapShark game search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealSearchGame {
    #[serde(rename = "gameID", default)]
    pub game_id: String,
    #[serde(rename = "steamAppID", default)]
    pub steam_app_id: Option<String>,
    #[serde(default)]
    pub cheapest: String,
    #[serde(rename = "cheapestDealID", default)]
    pub cheapest_deal_id: String,
    #[serde(default)]
    pub external: String,
    #[serde(default)]
    pub thumb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealGameInfo {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "steamAppID", default)]
    pub steam_app_id: Option<String>,
    #[serde(default)]
    pub thumb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub date: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreOffer {
    #[serde(rename = "storeID", default)]
    pub store_id: String,
    #[serde(rename = "dealID", default)]
    pub deal_id: String,
    #[serde(default)]
    pub price: String,
    #[serde(rename = "retailPrice", default)]
    pub retail_price: String,
    #[serde(default)]
    pub savings: String,
}

/// All offers for one CheapShark game id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDealInfo {
    #[serde(default)]
    pub info: DealGameInfo,
    #[serde(rename = "cheapestPriceEver", default)]
    pub cheapest_price_ever: Option<PriceRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deals: Vec<StoreOffer>,
}

// ============================================================================
// FreeToGame
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeGame {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub game_url: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

// ============================================================================
// Steam store / SteamSpy
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteamAppDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steam_appid: u64,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub header_image: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub developers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publishers: Vec<String>,
}

/// SteamSpy encodes an empty tag set as `[]` instead of `{}`
fn tag_votes<'de, D>(deserializer: D) -> Result<HashMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .filter_map(|(tag, votes)| votes.as_i64().map(|v| (tag, v)))
            .collect(),
        _ => HashMap::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SteamSpyStats {
    #[serde(default)]
    pub appid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    #[serde(default)]
    pub owners: String,
    #[serde(default)]
    pub average_forever: u64,
    #[serde(default)]
    pub average_2weeks: u64,
    #[serde(default)]
    pub ccu: u64,
    #[serde(default, deserialize_with = "tag_votes")]
    pub tags: HashMap<String, i64>,
}

impl SteamSpyStats {
    /// Tags sorted by vote count descending, then by name
    pub fn top_tags(&self) -> Vec<(String, u32)> {
        let mut tags: Vec<(String, u32)> = self
            .tags
            .iter()
            .map(|(name, count)| (name.clone(), (*count).max(0) as u32))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags
    }

    /// Share of positive reviews, 0-100
    pub fn positive_percent(&self) -> Option<u32> {
        let total = self.positive + self.negative;
        (total > 0).then(|| ((self.positive * 100) as f64 / total as f64).round() as u32)
    }
}

// ============================================================================
// IGDB (through the local proxy)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgdbNamed {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgdbInvolvedCompany {
    #[serde(default)]
    pub company: IgdbNamed,
    #[serde(default)]
    pub developer: bool,
    #[serde(default)]
    pub publisher: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgdbImage {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgdbVideo {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgdbGame {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub storyline: Option<String>,
    #[serde(default)]
    pub first_release_date: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<IgdbNamed>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platforms: Vec<IgdbNamed>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub involved_companies: Vec<IgdbInvolvedCompany>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshots: Vec<IgdbImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub videos: Vec<IgdbVideo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(title: &str, price: &str) -> Deal {
        Deal {
            title: title.into(),
            sale_price: price.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cheapest_deal_skips_unparsable_prices() {
        let best = cheapest_deal(vec![
            deal("a", "19.99"),
            deal("b", "n/a"),
            deal("c", "4.99"),
            deal("d", "4.99"),
        ])
        .unwrap();
        assert_eq!(best.title, "c");
        assert!(cheapest_deal(vec![deal("x", "")]).is_none());
        assert!(cheapest_deal(Vec::new()).is_none());
    }

    #[test]
    fn test_deal_wire_names() {
        let deal: Deal = serde_json::from_str(
            r#"{"dealID": "abc", "title": "Portal 2", "storeID": "1", "salePrice": "1.99",
                "normalPrice": "9.99", "savings": "80.080080", "steamAppID": "620"}"#,
        )
        .unwrap();
        assert_eq!(deal.deal_id, "abc");
        assert_eq!(deal.sale_price_value(), Some(1.99));
        assert_eq!(deal.savings_percent(), 80);
        assert_eq!(deal.steam_app_id.as_deref(), Some("620"));
    }

    #[test]
    fn test_steamspy_tags_accepts_empty_array() {
        let stats: SteamSpyStats =
            serde_json::from_str(r#"{"appid": 10, "name": "Counter-Strike", "tags": []}"#).unwrap();
        assert!(stats.tags.is_empty());

        let stats: SteamSpyStats = serde_json::from_str(
            r#"{"appid": 620, "positive": 300, "negative": 100,
                "tags": {"Puzzle": 900, "Co-op": 500, "Comedy": 500}}"#,
        )
        .unwrap();
        assert_eq!(
            stats.top_tags(),
            vec![
                ("Puzzle".to_string(), 900),
                ("Co-op".to_string(), 500),
                ("Comedy".to_string(), 500)
            ]
        );
        assert_eq!(stats.positive_percent(), Some(75));
    }
}
