use super::*;
use crate::types::CrawlPageMetadata;

#[test]
fn structured_contains_three_labeled_sections_in_order() {
    let page = ScrapedPage {
        title: "Rust 1.0".into(),
        description: "Release notes".into(),
        markdown: "# Rust\n\nStable at last.".into(),
    };
    let s = page.structured();
    assert_eq!(
        s,
        "Title: Rust 1.0\n\nDescription: Release notes\n\nContent: # Rust\n\nStable at last."
    );

    let title_pos = s.find("Title: ").unwrap();
    let desc_pos = s.find("Description: ").unwrap();
    let content_pos = s.find("Content: ").unwrap();
    assert!(title_pos < desc_pos && desc_pos < content_pos);
}

#[test]
fn structured_uses_defaults_when_everything_is_absent() {
    let page = extract_page(None);
    assert_eq!(
        page.structured(),
        "Title: No title\n\nDescription: No description\n\nContent: No content"
    );
}

#[test]
fn extract_page_defaults_missing_metadata() {
    let page = extract_page(Some(CrawlPage {
        markdown: Some("body text".into()),
        metadata: None,
    }));
    assert_eq!(page.title, "No title");
    assert_eq!(page.description, "No description");
    assert_eq!(page.markdown, "body text");
}

#[test]
fn extract_page_defaults_missing_markdown() {
    let page = extract_page(Some(CrawlPage {
        markdown: None,
        metadata: Some(CrawlPageMetadata {
            title: Some("A title".into()),
            description: Some("A description".into()),
        }),
    }));
    assert_eq!(page.title, "A title");
    assert_eq!(page.description, "A description");
    assert_eq!(page.markdown, "No content");
}

#[test]
fn new_strips_trailing_slash_from_endpoint() {
    let client = FirecrawlClient::new(
        "key",
        "https://api.example.com/v1/crawl/",
        5,
        PollConfig::default(),
    )
    .expect("client builds");
    assert_eq!(client.endpoint, "https://api.example.com/v1/crawl");
}
