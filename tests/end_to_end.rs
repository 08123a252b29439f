use std::sync::Arc;

use linkbot::links::truncate::frame_budget;
use linkbot::links::{HttpFetch, LinkConfig, MessageFormatter, ReqwestFetcher, TitleResolver};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn formatter(max_line_bytes: usize) -> MessageFormatter {
    let http: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(&LinkConfig::default()).unwrap());
    MessageFormatter::new(
        TitleResolver::new(http),
        ["#chan".to_string()],
        max_line_bytes,
    )
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_owned(), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn single_link_gets_its_bare_title() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/a",
        "<html><head><title>Example Page</title></head></html>",
    )
    .await;

    let text = format!("check this {}/a out", server.uri());
    let frames = formatter(512).format(&text, "#chan", false).await;

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].target, "#chan");
    assert_eq!(frames[0].text, "Example Page");
}

#[tokio::test]
async fn opengraph_metadata_wins_over_title() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/og",
        r#"<html><head>
            <title>Plain</title>
            <meta property="og:title" content="Rich Title">
            <meta property="og:description" content="Rich description">
        </head></html>"#,
    )
    .await;

    let frames = formatter(512)
        .format(&format!("{}/og", server.uri()), "#chan", false)
        .await;

    assert_eq!(frames[0].text, "Rich Title | Rich description");
}

#[tokio::test]
async fn several_links_are_prefixed_with_their_url() {
    let server = MockServer::start().await;
    mount_page(&server, "/one", "<title>One</title>").await;
    mount_page(&server, "/two", "<title>Two</title>").await;

    let one = format!("{}/one", server.uri());
    let two = format!("{}/two", server.uri());
    let frames = formatter(512)
        .format(&format!("{one} and {two}"), "#chan", false)
        .await;

    let texts: Vec<&str> = frames.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(texts, vec![format!("{one}: One"), format!("{two}: Two")]);
}

#[tokio::test]
async fn non_html_links_are_never_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let frames = formatter(512)
        .format(&format!("{}/image.png", server.uri()), "#chan", false)
        .await;

    assert!(frames.is_empty());
}

#[tokio::test]
async fn broken_links_are_silent() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let frames = formatter(512)
        .format(&format!("{}/boom", server.uri()), "#chan", false)
        .await;

    assert!(frames.is_empty());
}

#[tokio::test]
async fn long_titles_are_cut_to_the_line_limit() {
    let server = MockServer::start().await;
    let title = "\u{65e5}\u{672c}".repeat(200);
    mount_page(&server, "/long", &format!("<title>{title}</title>")).await;

    let frames = formatter(512)
        .format(&format!("{}/long", server.uri()), "#chan", false)
        .await;

    assert_eq!(frames.len(), 1);
    let line = format!("PRIVMSG #chan :{}\n", frames[0].text);
    assert!(line.len() <= 512);
    // 496 bytes of budget and 3-byte code points: 165 fit.
    assert_eq!(frames[0].text.chars().count(), 165);
    assert!(title.starts_with(&frames[0].text));
}

#[tokio::test]
async fn small_line_limit_cuts_prefixed_titles() {
    let server = MockServer::start().await;
    let long = "x".repeat(100);
    mount_page(&server, "/long", &format!("<title>{long}</title>")).await;
    mount_page(&server, "/short", "<title>Short</title>").await;

    let first = format!("{}/long", server.uri());
    let second = format!("{}/short", server.uri());
    let frames = formatter(64)
        .format(&format!("{first} {second}"), "#chan", false)
        .await;

    let budget = frame_budget(64, "#chan");
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.text.len() <= budget));
    assert_eq!(frames[0].text.len(), budget);
    assert!(frames[0].text.starts_with(&format!("{first}: x")));
    assert_eq!(frames[1].text, format!("{second}: Short"));
}
