#[cfg(test)]
mod tests {
    use crate::config::ArxivSourceConfig;
    use crate::db::schema::Author;
    use crate::error::GraphError;
    use crate::scrapers::arxiv::{parse_feed, ArxivScraper};
    use crate::scrapers::scraper::PaperSource;
    use crate::test_utilities::{atom_entry, atom_feed};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn author() -> Author {
        Author {
            id: 1,
            name: "Alice Example".to_string(),
            categories: "cat:math.CO".to_string(),
        }
    }

    fn scraper_for(server: &MockServer) -> ArxivScraper {
        ArxivScraper::with_config(ArxivSourceConfig {
            base_url: format!("{}/api/query", server.uri()),
            page_size: 10,
            delay_ms: 0,
            max_pages: 5,
        })
    }

    #[test]
    fn test_parse_feed_extracts_id_title_and_pdf_link() {
        let feed = atom_feed(&[
            atom_entry("2401.00001v2", "Ramsey Numbers\n      Revisited", true),
            atom_entry("2401.00002v1", "No Download", false),
        ]);

        let records = parse_feed(&feed).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "http://arxiv.org/abs/2401.00001v2");
        assert_eq!(records[0].title, "Ramsey Numbers Revisited");
        assert_eq!(
            records[0].pdf_link.as_deref(),
            Some("http://arxiv.org/pdf/2401.00001v2")
        );
        assert_eq!(records[1].pdf_link, None);
    }

    /// Feed-level id and title must not leak into entries.
    #[test]
    fn test_parse_feed_without_entries_is_empty_page() {
        let records = parse_feed(&atom_feed(&[])).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_feed_unescapes_entities() {
        let feed = atom_feed(&[atom_entry("2401.00003v1", "Graphs &amp; Games", true)]);
        assert_eq!(parse_feed(&feed).unwrap()[0].title, "Graphs & Games");
    }

    #[test]
    fn test_parse_feed_rejects_malformed_xml() {
        let err = parse_feed("<feed><entry><id>x</title></entry></feed>").unwrap_err();
        assert!(matches!(err, GraphError::SourceParseError(_)));
    }

    #[test]
    fn test_parse_feed_rejects_non_feed_document() {
        let err = parse_feed("<html><body>Service Unavailable</body></html>").unwrap_err();
        assert!(matches!(err, GraphError::SourceParseError(_)));
    }

    #[test]
    fn test_parse_feed_rejects_entry_without_id() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><title>Orphan</title></entry></feed>"#;
        assert!(matches!(
            parse_feed(feed),
            Err(GraphError::SourceParseError(_))
        ));
    }

    #[test]
    fn test_parse_feed_surfaces_api_error_entry() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1234.12345v9</id>
    <title>Error</title>
    <summary>incorrect id format for 1234.12345v9</summary>
  </entry>
</feed>"#;
        match parse_feed(feed) {
            Err(GraphError::SourceParseError(msg)) => assert!(msg.contains("incorrect id format")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    /// The request carries the author query, ordering and paging parameters.
    #[tokio::test]
    async fn test_fetch_page_sends_expected_query() {
        let mock_server = MockServer::start().await;
        let feed = atom_feed(&[atom_entry("2401.00001v1", "Only Paper", true)]);

        Mock::given(method("GET"))
            .and(path("/api/query"))
            .and(query_param("search_query", "au:\"Alice Example\" AND (cat:math.CO)"))
            .and(query_param("sortBy", "lastUpdatedDate"))
            .and(query_param("sortOrder", "descending"))
            .and(query_param("start", "20"))
            .and(query_param("max_results", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .expect(1)
            .mount(&mock_server)
            .await;

        let records = scraper_for(&mock_server)
            .fetch_page(&author(), 20, 10)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Only Paper");
    }

    #[tokio::test]
    async fn test_fetch_page_http_error_is_source_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = scraper_for(&mock_server)
            .fetch_page(&author(), 0, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_unreachable_host_is_source_unavailable() {
        let scraper = ArxivScraper::with_config(ArxivSourceConfig {
            base_url: "http://127.0.0.1:9/api/query".to_string(),
            page_size: 10,
            delay_ms: 0,
            max_pages: 1,
        });

        let err = scraper.fetch_page(&author(), 0, 10).await.unwrap_err();
        assert!(matches!(err, GraphError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_garbage_body_is_parse_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("rate limited, try later"))
            .mount(&mock_server)
            .await;

        let err = scraper_for(&mock_server)
            .fetch_page(&author(), 0, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, GraphError::SourceParseError(_)));
    }
}
