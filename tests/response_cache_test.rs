//! Tests for [`ResponseCache`]: TTL cache of normalized responses.

use std::time::Duration;

use korea_tourism_mcp::cache::{CacheConfig, RequestSignature, ResponseCache};
use korea_tourism_mcp::{NormalizedResponse, Page};
use serde_json::json;

fn response(title: &str) -> NormalizedResponse {
    let item = json!({"contentid": "1", "title": title});
    NormalizedResponse {
        total_count: 1,
        items: vec![item.as_object().unwrap().clone()],
        page_no: 1,
        num_of_rows: 10,
    }
}

fn signature(keyword: &str) -> RequestSignature {
    RequestSignature::new(
        "searchKeyword1",
        "en",
        &[("keyword", keyword.to_string()), ("pageNo", "1".to_string())],
    )
}

// =========================================================================
// CacheConfig
// =========================================================================

#[test]
fn cache_config_defaults() {
    let config = CacheConfig::default();
    assert_eq!(config.max_entries, 1_000);
    assert_eq!(config.ttl, Duration::from_secs(86_400));
}

#[test]
fn cache_config_builder() {
    let config = CacheConfig::new()
        .max_entries(50)
        .ttl(Duration::from_secs(30));
    assert_eq!(config.max_entries, 50);
    assert_eq!(config.ttl, Duration::from_secs(30));
}

// =========================================================================
// ResponseCache
// =========================================================================

#[tokio::test]
async fn miss_then_hit() {
    let cache = ResponseCache::new(&CacheConfig::default());
    assert!(cache.get("search", &signature("palace")).await.is_none());

    cache.insert(signature("palace"), response("Palace")).await;
    let hit = cache.get("search", &signature("palace")).await.unwrap();
    assert_eq!(hit, response("Palace"));
    assert!(cache.get("search", &signature("temple")).await.is_none());
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let cache = ResponseCache::new(&CacheConfig::new().ttl(Duration::from_millis(50)));
    cache.insert(signature("palace"), response("Palace")).await;
    assert!(cache.get("search", &signature("palace")).await.is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(cache.get("search", &signature("palace")).await.is_none());
}

#[tokio::test]
async fn clear_drops_everything() {
    let cache = ResponseCache::new(&CacheConfig::default());
    cache.insert(signature("palace"), response("Palace")).await;
    cache.insert(signature("temple"), NormalizedResponse::empty(Page::default())).await;
    cache.clear();
    assert!(cache.get("search", &signature("palace")).await.is_none());
    assert!(cache.get("search", &signature("temple")).await.is_none());
}

#[test]
fn signature_includes_language() {
    let params = [("areaCode", "1".to_string())];
    assert_ne!(
        RequestSignature::new("areaCode1", "en", &params),
        RequestSignature::new("areaCode1", "ko", &params)
    );
}
