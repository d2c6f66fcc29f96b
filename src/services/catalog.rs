//! Card retrieval from the catalog service.
//!
//! Two strategies produce the same `CardRecord` shape so everything
//! downstream (price normalization, supply resolution, market-cap math)
//! stays strategy-agnostic:
//!
//! - *Bulk*: one paginated search per set, following `next_page` links while
//!   `has_more` is set. A failed page logs and truncates the sequence;
//!   whatever was already fetched still flows through the pipeline.
//! - *Targeted*: one direct lookup per reference-list entry. A failed or
//!   empty lookup logs and omits that card without aborting the rest.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::constants::{CATALOG_CARD_URL, CATALOG_SEARCH_URL, THUMBNAIL_FALLBACK_BASE};
use crate::models::{CardRecord, PrintRunEntry, SetConfig};

pub struct CatalogClient {
    client: reqwest::Client,
    search_url: String,
    card_url: String,
}

impl CatalogClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_endpoints(
            client,
            CATALOG_SEARCH_URL.to_string(),
            CATALOG_CARD_URL.to_string(),
        )
    }

    /// Point the client at a different catalog host (e.g. a self-hosted
    /// mirror of the API)
    pub fn with_endpoints(client: reqwest::Client, search_url: String, card_url: String) -> Self {
        Self {
            client,
            search_url,
            card_url,
        }
    }

    /// Fetch every card of a set through the paginated search endpoint.
    ///
    /// Total: request or parse failures terminate the page loop early and
    /// the records fetched so far are returned.
    pub async fn fetch_set_bulk(&self, set: &SetConfig) -> Vec<CardRecord> {
        let mut cards = Vec::new();
        let mut page = 1u32;

        let query = format!("e:{}", set.catalog_code);
        let mut response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("q", query.as_str()),
                ("unique", "prints"),
                ("order", "set"),
                ("dir", "asc"),
            ])
            .send()
            .await;
        loop {
            let json = match self.read_page(response, &set.catalog_code, page).await {
                Some(json) => json,
                None => break,
            };

            let (mut page_cards, next_page) = parse_search_page(&json, &set.catalog_code);
            debug!(
                "Set {} page {}: {} records, has_more={}",
                set.catalog_code,
                page,
                page_cards.len(),
                next_page.is_some()
            );
            cards.append(&mut page_cards);

            match next_page {
                Some(url) => {
                    page += 1;
                    response = self.client.get(&url).send().await;
                }
                None => break,
            }
        }

        info!("Fetched {} cards for set {}", cards.len(), set.catalog_code);
        cards
    }

    /// Resolve one page response into JSON, or `None` to terminate the loop
    async fn read_page(
        &self,
        response: reqwest::Result<reqwest::Response>,
        set_code: &str,
        page: u32,
    ) -> Option<Value> {
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!("Set {} page {} request failed: {}", set_code, page, e);
                return None;
            }
        };

        if !response.status().is_success() {
            error!(
                "Set {} page {} returned status {}, stopping pagination",
                set_code,
                page,
                response.status()
            );
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!("Set {} page {}: failed to read body: {}", set_code, page, e);
                return None;
            }
        };

        match serde_json::from_str(&body) {
            Ok(json) => Some(json),
            Err(e) => {
                error!("Set {} page {}: invalid JSON: {}", set_code, page, e);
                None
            }
        }
    }

    /// Fetch the reference-listed cards of a set, one lookup per entry
    pub async fn fetch_set_targeted(
        &self,
        set: &SetConfig,
        entries: &[PrintRunEntry],
    ) -> Vec<CardRecord> {
        let mut cards = Vec::new();

        for entry in entries.iter().filter(|e| e.set_code == set.catalog_code) {
            let url = format!(
                "{}/{}/{}",
                self.card_url, set.catalog_code, entry.collector_number
            );

            match self.lookup_card(&url).await {
                Ok(json) => cards.push(parse_card(&json, &set.catalog_code)),
                Err(reason) => {
                    warn!(
                        "Set {} card {} ({}) lookup failed: {}, omitting",
                        set.catalog_code, entry.collector_number, entry.name, reason
                    );
                }
            }
        }

        info!(
            "Fetched {} of the listed cards for set {}",
            cards.len(),
            set.catalog_code
        );
        cards
    }

    async fn lookup_card(&self, url: &str) -> Result<Value, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read body: {}", e))?;

        serde_json::from_str(&body).map_err(|e| format!("invalid JSON: {}", e))
    }
}

/// Strip decorative characters from a collector number before it is used as
/// a join key or URL path segment
pub fn normalize_collector_number(raw: &str) -> String {
    raw.replace('#', "").trim().to_string()
}

/// Synthesized thumbnail link for cards the catalog returns no image for.
/// Well-formed but best-effort: the target may not exist.
fn fallback_thumbnail(set_code: &str, collector_number: &str) -> String {
    format!(
        "{}/{}/{}.jpg",
        THUMBNAIL_FALLBACK_BASE, set_code, collector_number
    )
}

/// Build a `CardRecord` from one catalog card object.
///
/// Missing fields degrade to empty/absent values; price strings are kept
/// raw so numeric parse failures surface during normalization, not here.
pub fn parse_card(card: &Value, set_code: &str) -> CardRecord {
    let name = card["name"].as_str().unwrap_or("").to_string();
    let collector_number = normalize_collector_number(card["collector_number"].as_str().unwrap_or(""));
    let rarity = card["rarity"].as_str().unwrap_or("").to_lowercase();

    let usd_raw = card["prices"]["usd"].as_str().map(str::to_string);
    let eur_raw = card["prices"]["eur"].as_str().map(str::to_string);

    let thumbnail = match card["image_uris"]["small"].as_str() {
        Some(url) => url.to_string(),
        None => fallback_thumbnail(set_code, &collector_number),
    };

    CardRecord {
        name,
        collector_number,
        rarity,
        usd_raw,
        eur_raw,
        thumbnail,
        set_code: set_code.to_string(),
    }
}

/// Split one search response into its records (in page order) and the next
/// page to follow, if the service reports one
pub fn parse_search_page(json: &Value, set_code: &str) -> (Vec<CardRecord>, Option<String>) {
    let cards = json["data"]
        .as_array()
        .map(|data| data.iter().map(|card| parse_card(card, set_code)).collect())
        .unwrap_or_default();

    let next_page = if json["has_more"].as_bool().unwrap_or(false) {
        json["next_page"].as_str().map(str::to_string)
    } else {
        None
    };

    (cards, next_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_collector_number() {
        assert_eq!(normalize_collector_number("#232"), "232");
        assert_eq!(normalize_collector_number("  47 "), "47");
        assert_eq!(normalize_collector_number("74a"), "74a");
    }

    #[test]
    fn test_parse_card_with_catalog_image() {
        let card = json!({
            "name": "Black Lotus",
            "collector_number": "232",
            "rarity": "Rare",
            "prices": {"usd": "8499.99", "eur": null},
            "image_uris": {"small": "https://cards.example/232.jpg"}
        });

        let record = parse_card(&card, "lea");
        assert_eq!(record.name, "Black Lotus");
        assert_eq!(record.rarity, "rare", "rarity is lower-cased");
        assert_eq!(record.usd_raw.as_deref(), Some("8499.99"));
        assert!(record.eur_raw.is_none(), "null price is absent, not empty");
        assert_eq!(record.thumbnail, "https://cards.example/232.jpg");
    }

    #[test]
    fn test_parse_card_synthesizes_fallback_thumbnail() {
        let card = json!({
            "name": "Mox Jet",
            "collector_number": "#234",
            "rarity": "rare",
            "prices": {"eur": "3100.00"}
        });

        let record = parse_card(&card, "lea");
        assert_eq!(
            record.thumbnail,
            "https://img.scryfall.com/cards/small/en/lea/234.jpg",
            "fallback URL uses the normalized collector number"
        );
    }

    #[test]
    fn test_parse_search_page_preserves_order_and_next_page() {
        let page = json!({
            "has_more": true,
            "next_page": "https://api.example/cards/search?page=2",
            "data": [
                {"name": "Ankh of Mishra", "collector_number": "231", "rarity": "rare", "prices": {}},
                {"name": "Black Lotus", "collector_number": "232", "rarity": "rare", "prices": {}}
            ]
        });

        let (cards, next) = parse_search_page(&page, "lea");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "Ankh of Mishra");
        assert_eq!(cards[1].name, "Black Lotus");
        assert_eq!(next.as_deref(), Some("https://api.example/cards/search?page=2"));
    }

    #[test]
    fn test_parse_search_page_last_page_has_no_next() {
        let page = json!({
            "has_more": false,
            "next_page": "https://api.example/should-not-be-followed",
            "data": []
        });

        let (cards, next) = parse_search_page(&page, "lea");
        assert!(cards.is_empty(), "a short page is not an error");
        assert!(next.is_none(), "next_page is ignored when has_more is false");
    }

    mod fetch_loop {
        use super::*;
        use crate::models::SetConfig;
        use std::net::SocketAddr;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        /// Serve a fixed sequence of HTTP responses, one connection each
        async fn canned_server(responses: Vec<(u16, String)>) -> SocketAddr {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            serve_from(listener, responses);
            addr
        }

        fn set_config() -> SetConfig {
            SetConfig {
                name: "alpha".to_string(),
                catalog_code: "lea".to_string(),
                supply_key: "Alpha".to_string(),
            }
        }

        fn page_body(names: &[&str], next_page: Option<&str>) -> String {
            let data: Vec<_> = names
                .iter()
                .map(|name| json!({"name": name, "collector_number": "1", "rarity": "rare", "prices": {}}))
                .collect();
            json!({
                "data": data,
                "has_more": next_page.is_some(),
                "next_page": next_page,
            })
            .to_string()
        }

        /// Serve a fixed response sequence from a pre-bound listener so page
        /// bodies can link `next_page` back to the same server
        fn serve_from(listener: TcpListener, responses: Vec<(u16, String)>) {
            tokio::spawn(async move {
                for (status, body) in responses {
                    let (mut socket, _) = listener.accept().await.unwrap();
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;

                    let reason = if status == 200 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        reason,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                }
            });
        }

        fn catalog_for(addr: SocketAddr) -> CatalogClient {
            CatalogClient::with_endpoints(
                reqwest::Client::new(),
                format!("http://{}/search", addr),
                format!("http://{}/cards", addr),
            )
        }

        #[tokio::test]
        async fn test_bulk_fetch_follows_pages_until_exhausted() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            let page2_url = format!("http://{}/page2", addr);
            let page1 = page_body(&["Card A", "Card B"], Some(&page2_url));
            let page2 = page_body(&["Card C"], None);
            serve_from(listener, vec![(200, page1), (200, page2)]);

            let cards = catalog_for(addr).fetch_set_bulk(&set_config()).await;
            let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["Card A", "Card B", "Card C"]);
        }

        #[tokio::test]
        async fn test_bulk_fetch_truncates_on_failed_page() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            let page2_url = format!("http://{}/page2", addr);
            let page1 = page_body(&["Card A", "Card B"], Some(&page2_url));
            serve_from(
                listener,
                vec![(200, page1), (500, String::from("upstream exploded"))],
            );

            let cards = catalog_for(addr).fetch_set_bulk(&set_config()).await;
            let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(
                names,
                vec!["Card A", "Card B"],
                "page 1 records survive, the failed page truncates silently"
            );
        }

        #[tokio::test]
        async fn test_targeted_fetch_skips_failed_lookups() {
            let lotus = json!({
                "name": "Black Lotus",
                "collector_number": "232",
                "rarity": "rare",
                "prices": {"usd": "8499.99"}
            })
            .to_string();
            let addr = canned_server(vec![(404, String::from("not found")), (200, lotus)]).await;

            let entries = vec![
                PrintRunEntry {
                    set_code: "lea".to_string(),
                    collector_number: "231".to_string(),
                    name: "Ankh of Mishra".to_string(),
                    prints: 1100,
                },
                PrintRunEntry {
                    set_code: "lea".to_string(),
                    collector_number: "232".to_string(),
                    name: "Black Lotus".to_string(),
                    prints: 1100,
                },
            ];

            let cards = catalog_for(addr).fetch_set_targeted(&set_config(), &entries).await;
            assert_eq!(cards.len(), 1, "the failed lookup is omitted, not fatal");
            assert_eq!(cards[0].name, "Black Lotus");
        }
    }
}
