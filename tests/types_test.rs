use korea_tourism_mcp::{ContentType, Language, NormalizedResponse, Page, TourismError};
use serde_json::json;

// ============================================================================
// ContentType
// ============================================================================

#[test]
fn content_type_codes() {
    assert_eq!(ContentType::TouristAttraction.code(), "76");
    assert_eq!(ContentType::CulturalFacility.code(), "78");
    assert_eq!(ContentType::FestivalEvent.code(), "85");
    assert_eq!(ContentType::LeisureActivity.code(), "75");
    assert_eq!(ContentType::Accommodation.code(), "80");
    assert_eq!(ContentType::Shopping.code(), "79");
    assert_eq!(ContentType::Restaurant.code(), "82");
    assert_eq!(ContentType::Transportation.code(), "77");
}

#[test]
fn content_type_label_lookup_ignores_case() {
    assert_eq!(
        ContentType::from_label("tourist attraction").unwrap(),
        ContentType::TouristAttraction
    );
    assert_eq!(
        ContentType::from_label("  RESTAURANT ").unwrap(),
        ContentType::Restaurant
    );
    assert_eq!(
        "Festival Event".parse::<ContentType>().unwrap(),
        ContentType::FestivalEvent
    );
}

#[test]
fn content_type_unknown_label_lists_valid_ones() {
    let err = ContentType::from_label("Museum").unwrap_err();
    assert!(matches!(err, TourismError::InvalidArgument(_)));
    let message = err.to_string();
    assert!(message.contains("'Museum'"));
    for ty in ContentType::all() {
        assert!(message.contains(ty.label()), "missing {}", ty.label());
    }
}

#[test]
fn content_type_reverse_lookup() {
    assert_eq!(ContentType::from_code("82"), Some(ContentType::Restaurant));
    assert_eq!(ContentType::from_code("12"), None);
}

#[test]
fn content_type_serde_uses_labels() {
    let value = serde_json::to_value(ContentType::Shopping).unwrap();
    assert_eq!(value, json!("Shopping"));
    let parsed: ContentType = serde_json::from_value(json!("shopping")).unwrap();
    assert_eq!(parsed, ContentType::Shopping);
    assert!(serde_json::from_value::<ContentType>(json!("Spa")).is_err());
}

// ============================================================================
// Language
// ============================================================================

#[test]
fn language_services() {
    assert_eq!(Language::default(), Language::English);
    assert_eq!(Language::Korean.service(), "KorService1");
    assert_eq!(Language::SimplifiedChinese.service(), "ChsService1");
    assert_eq!(Language::parse("ZH-TW").unwrap(), Language::TraditionalChinese);
    assert_eq!(Language::all().count(), 9);
}

#[test]
fn language_unknown_code_rejected() {
    let err = Language::parse("xx").unwrap_err();
    assert!(matches!(err, TourismError::InvalidArgument(_)));
    assert!(err.to_string().contains("ko"));
}

// ============================================================================
// Page and NormalizedResponse
// ============================================================================

#[test]
fn page_rejects_zero() {
    assert!(Page::new(0, 10).is_err());
    assert!(Page::new(1, 0).is_err());
    assert_eq!(Page::new(2, 5).unwrap(), Page { page: 2, rows: 5 });
    assert_eq!(Page::default(), Page { page: 1, rows: 20 });
}

#[test]
fn empty_response_keeps_page_number() {
    let empty = NormalizedResponse::empty(Page::new(3, 10).unwrap());
    assert_eq!(empty.page_no, 3);
    assert_eq!(empty.total_count, 0);
    assert!(empty.items.is_empty());
    assert!(empty.first_item().is_empty());
}

#[test]
fn normalized_response_serializes_snake_case() {
    let response = NormalizedResponse::empty(Page::default());
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(
        value,
        json!({"total_count": 0, "items": [], "page_no": 1, "num_of_rows": 0})
    );
}
