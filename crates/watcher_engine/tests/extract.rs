use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use watcher_engine::{
    parse_records, Credentials, ExtractSelectors, Extractor, FailureKind, PortalExtractor,
};

fn credentials() -> Credentials {
    Credentials {
        username: "student@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

fn test_selectors() -> ExtractSelectors {
    ExtractSelectors {
        card: "div.card".to_string(),
        header: ".title".to_string(),
        body: ".desc".to_string(),
    }
}

const LISTINGS_PAGE: &str = r#"
<html><body>
  <div class="card">
    <div class="title">Intern, Acme · 3 hours ago</div>
    <div class="desc">Apply by Friday</div>
  </div>
  <div class="card">
    <div class="title">Backend Dev</div>
    <div class="desc">Remote, full time</div>
  </div>
</body></html>
"#;

fn portal(server: &MockServer) -> PortalExtractor {
    PortalExtractor::new(
        format!("{}/login", server.uri()),
        format!("{}/students", server.uri()),
        credentials(),
    )
    .with_selectors(test_selectors())
}

#[tokio::test]
async fn extracts_cards_in_page_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LISTINGS_PAGE, "text/html"))
        .mount(&server)
        .await;

    let records = portal(&server).extract().await.expect("extract ok");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].header, "Intern, Acme · 3 hours ago");
    assert_eq!(records[0].body, "Apply by Friday");
    assert_eq!(records[1].header, "Backend Dev");
}

#[tokio::test]
async fn rejected_login_fails_the_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = portal(&server).extract().await.unwrap_err();

    assert_eq!(err.kind, FailureKind::LoginRejected);
}

#[tokio::test]
async fn listings_page_error_status_fails_the_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = portal(&server).extract().await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn page_without_cards_is_a_valid_empty_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let records = portal(&server).extract().await.expect("extract ok");

    assert!(records.is_empty());
}

#[test]
fn card_missing_header_or_body_is_skipped() {
    let html = r#"
      <div class="card"><div class="title">Only a title</div></div>
      <div class="card">
        <div class="title">Complete card</div>
        <div class="desc">With a body</div>
      </div>
      <div class="card"><div class="title">  </div><div class="desc">blank title</div></div>
    "#;

    let records = parse_records(html, &test_selectors()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].header, "Complete card");
}

#[test]
fn invalid_selector_is_a_markup_mismatch() {
    let selectors = ExtractSelectors {
        card: "div[[".to_string(),
        ..test_selectors()
    };

    let err = parse_records("<html></html>", &selectors).unwrap_err();

    assert_eq!(err.kind, FailureKind::MarkupMismatch);
}

#[test]
fn card_text_is_trimmed() {
    let html = r#"
      <div class="card">
        <div class="title">
          Spaced   title
        </div>
        <div class="desc"> body </div>
      </div>
    "#;

    let records = parse_records(html, &test_selectors()).unwrap();

    assert_eq!(records[0].header, "Spaced   title");
    assert_eq!(records[0].body, "body");
}
