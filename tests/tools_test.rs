//! End-to-end tool tests against a mocked upstream.

use std::sync::Arc;
use std::time::Duration;

use korea_tourism_mcp::tools::{Tool, ToolRegistry};
use korea_tourism_mcp::{ClientConfig, LazyClient, RetryConfig, TourismError};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(items: Value, total: u64) -> Value {
    json!({
        "response": {
            "header": {"resultCode": "0000", "resultMsg": "OK"},
            "body": {
                "items": {"item": items},
                "numOfRows": 20,
                "pageNo": 1,
                "totalCount": total
            }
        }
    })
}

fn registry(server: &MockServer) -> (Arc<LazyClient>, ToolRegistry) {
    let config = ClientConfig::new("test-key")
        .base_url(server.uri())
        .rate_limit(100, Duration::from_secs(1))
        .retry(RetryConfig::disabled());
    let client = Arc::new(LazyClient::new(config));
    let registry = ToolRegistry::with_defaults(client.clone());
    (client, registry)
}

fn tool(registry: &ToolRegistry, name: &str) -> Arc<dyn Tool> {
    registry
        .get(name)
        .unwrap_or_else(|| panic!("tool {name} is registered"))
}

#[tokio::test]
async fn registry_lists_all_tools_in_order() {
    let server = MockServer::start().await;
    let (_, registry) = registry(&server);
    assert_eq!(
        registry.names(),
        vec![
            "search_tourism_by_keyword",
            "get_tourism_by_area",
            "find_nearby_attractions",
            "search_festivals_by_date",
            "find_accommodations",
            "get_detailed_information",
            "get_tourism_images",
            "get_area_codes",
        ]
    );
    for schema in registry.schemas() {
        assert_eq!(schema.input_schema["type"], "object");
        assert!(!schema.description.is_empty());
    }
}

#[tokio::test]
async fn keyword_search_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/searchKeyword1"))
        .and(query_param("keyword", "Gyeongbokgung"))
        .and(query_param("contentTypeId", "76"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([
                {"contentid": "126508", "title": "Gyeongbokgung Palace"},
                {"contentid": "126509", "title": "Gyeongbokgung Station"},
                {"contentid": "126510", "title": "National Palace Museum"}
            ]),
            3,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "search_tourism_by_keyword")
        .call(json!({
            "keyword": "Gyeongbokgung",
            "content_type": "Tourist Attraction",
            "page": 1,
            "rows": 20
        }))
        .await
        .unwrap();

    assert_eq!(resource.uri, "korea-tourism://search/Gyeongbokgung");
    assert_eq!(resource.mime_type, "application/json");
    let body = resource.body().unwrap();
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["page_no"], 1);
}

#[tokio::test]
async fn content_type_labels_are_case_insensitive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/areaBasedList1"))
        .and(query_param("areaCode", "1"))
        .and(query_param("contentTypeId", "82"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 0)))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "get_tourism_by_area")
        .call(json!({"area_code": 1, "content_type": "rEsTaUrAnT"}))
        .await
        .unwrap();
    assert_eq!(resource.uri, "korea-tourism://area/1");
}

#[tokio::test]
async fn invalid_content_type_fails_before_any_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 0)))
        .expect(0)
        .mount(&server)
        .await;

    let (client, registry) = registry(&server);
    let err = tool(&registry, "search_tourism_by_keyword")
        .call(json!({"keyword": "Hanok", "content_type": "Museum"}))
        .await
        .unwrap_err();

    match err {
        TourismError::InvalidArgument(msg) => assert_eq!(
            msg,
            "Invalid content_type: 'Museum'. Valid types are: Tourist Attraction, \
             Cultural Facility, Festival Event, Leisure Activity, Accommodation, Shopping, \
             Restaurant, Transportation"
        ),
        other => panic!("expected invalid argument, got {other:?}"),
    }
    assert!(!client.is_initialized());
}

#[tokio::test]
async fn argument_errors_do_not_need_an_api_key() {
    let client = Arc::new(LazyClient::new(ClientConfig::default()));
    let registry = ToolRegistry::with_defaults(client);
    let err = tool(&registry, "get_tourism_images")
        .call(json!({"content_id": "1", "page": 0}))
        .await
        .unwrap_err();
    assert!(matches!(err, TourismError::InvalidArgument(_)));
}

#[tokio::test]
async fn nearby_reports_the_search_radius() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/locationBasedList1"))
        .and(query_param("radius", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!({"contentid": "1", "title": "City Hall"}),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "find_nearby_attractions")
        .call(json!({"longitude": 126.978, "latitude": 37.5665}))
        .await
        .unwrap();

    assert_eq!(resource.uri, "korea-tourism://nearby/126.978/37.5665");
    let body = resource.body().unwrap();
    assert_eq!(body["search_radius"], 1000);
    assert_eq!(body["items"][0]["title"], "City Hall");
}

#[tokio::test]
async fn nearby_uri_keeps_decimal_point_on_whole_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/locationBasedList1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 0)))
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "find_nearby_attractions")
        .call(json!({"longitude": 127, "latitude": 37.5}))
        .await
        .unwrap();

    assert_eq!(resource.uri, "korea-tourism://nearby/127.0/37.5");
}

#[tokio::test]
async fn nearby_rejects_out_of_range_radius() {
    let server = MockServer::start().await;
    let (_, registry) = registry(&server);
    let err = tool(&registry, "find_nearby_attractions")
        .call(json!({"longitude": 126.978, "latitude": 37.5665, "radius": 50000}))
        .await
        .unwrap_err();
    assert!(matches!(err, TourismError::InvalidArgument(_)));
}

#[tokio::test]
async fn festival_without_end_date_is_ongoing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/searchFestival1"))
        .and(query_param("eventStartDate", "20250501"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([{"title": "Lotus Lantern Festival"}]),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "search_festivals_by_date")
        .call(json!({"start_date": "20250501"}))
        .await
        .unwrap();

    assert_eq!(resource.uri, "korea-tourism://festival/20250501");
    let body = resource.body().unwrap();
    assert_eq!(body["start_date"], "20250501");
    assert_eq!(body["end_date"], "ongoing");
    assert_eq!(body["total_count"], 1);
}

#[tokio::test]
async fn festival_rejects_bad_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 0)))
        .expect(0)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let festival = tool(&registry, "search_festivals_by_date");
    for args in [
        json!({"start_date": "2025-05-01"}),
        json!({"start_date": "20250231"}),
        json!({"start_date": "20250510", "end_date": "20250501"}),
    ] {
        let err = festival.call(args).await.unwrap_err();
        assert!(matches!(err, TourismError::InvalidArgument(_)), "{err}");
    }
}

#[tokio::test]
async fn accommodations_without_area_use_all() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/searchStay1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 0)))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "find_accommodations")
        .call(json!({}))
        .await
        .unwrap();
    assert_eq!(resource.uri, "korea-tourism://accommodation/all");
    assert_eq!(resource.body().unwrap()["total_count"], 0);
}

#[tokio::test]
async fn detail_merges_common_intro_and_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/detailCommon1"))
        .and(query_param("contentId", "126508"))
        .and(query_param("overviewYN", "Y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!({"contentid": "126508", "title": "Gyeongbokgung", "usetime": "common"}),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/EngService1/detailIntro1"))
        .and(query_param("contentTypeId", "76"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!({"contentid": "126508", "usetime": "09:00~18:00", "restdate": "Tuesday"}),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/EngService1/detailInfo1"))
        .and(query_param("contentTypeId", "76"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([
                {"infoname": "Admission", "infotext": "3,000 won"},
                {"infoname": "Guided tours", "infotext": "Daily"}
            ]),
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "get_detailed_information")
        .call(json!({"content_id": 126508, "content_type": "Tourist Attraction"}))
        .await
        .unwrap();

    assert_eq!(resource.uri, "korea-tourism://detail/126508");
    let body = resource.body().unwrap();
    assert_eq!(body["title"], "Gyeongbokgung");
    assert_eq!(body["usetime"], "09:00~18:00");
    assert_eq!(body["restdate"], "Tuesday");
    assert_eq!(body["additional_info"].as_array().unwrap().len(), 2);
    assert_eq!(body["additional_info"][0]["infoname"], "Admission");
}

#[tokio::test]
async fn detail_without_content_type_only_fetches_common() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/detailCommon1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!({"contentid": "126508", "title": "Gyeongbokgung"}),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/EngService1/detailIntro1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]), 0)))
        .expect(0)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let body = tool(&registry, "get_detailed_information")
        .call(json!({"content_id": "126508"}))
        .await
        .unwrap()
        .body()
        .unwrap();
    assert_eq!(body["title"], "Gyeongbokgung");
    assert!(body.get("additional_info").is_none());
}

#[tokio::test]
async fn images_report_the_content_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/detailImage1"))
        .and(query_param("contentId", "126508"))
        .and(query_param("imageYN", "Y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([{"originimgurl": "http://example.com/1.jpg"}]),
            1,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "get_tourism_images")
        .call(json!({"content_id": "126508"}))
        .await
        .unwrap();
    assert_eq!(resource.uri, "korea-tourism://images/126508");
    let body = resource.body().unwrap();
    assert_eq!(body, json!({
        "total_count": 1,
        "items": [{"originimgurl": "http://example.com/1.jpg"}],
        "content_id": "126508"
    }));
}

#[tokio::test]
async fn area_codes_default_to_a_hundred_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EngService1/areaCode1"))
        .and(query_param("numOfRows", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([{"code": "1", "name": "Seoul"}, {"code": "2", "name": "Incheon"}]),
            17,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let (_, registry) = registry(&server);
    let resource = tool(&registry, "get_area_codes")
        .call(Value::Null)
        .await
        .unwrap();
    assert_eq!(resource.uri, "korea-tourism://area-codes");
    let body = resource.body().unwrap();
    assert_eq!(body["total_count"], 17);
    assert_eq!(body["parent_area_code"], Value::Null);
    assert_eq!(body["items"][1]["name"], "Incheon");
}
