use httpmock::prelude::*;
use star_catalog::{CatalogPipeline, CliConfig, EtlEngine, EtlError, LocalStorage};
use tempfile::TempDir;

fn listing_page(lists: &[&str]) -> String {
    format!(
        r#"<html><body>
        <header><ul><li><a href="/login">Sign in</a></li></ul></header>
        <article class="markdown-body entry-content container-lg">
            <h1>Servers</h1>
            {}
        </article>
        </body></html>"#,
        lists.join("\n<h2>Section</h2>\n")
    )
}

fn star_page(repo_path: &str, stars: &str) -> String {
    format!(
        r#"<html><body>
        <a href="/{0}/forks"><span class="text-bold">9</span> forks</a>
        <a href="/{0}/stargazers" class="Link Link--muted"><span class="text-bold">{1}</span> stars</a>
        </body></html>"#,
        repo_path, stars
    )
}

fn config_for(server: &MockServer, output_path: &str) -> CliConfig {
    CliConfig {
        target_url: server.url("/acme/servers/tree/main?tab=readme-ov-file"),
        output_path: output_path.to_string(),
        output_filename: "services".to_string(),
        output_formats: vec!["csv".to_string()],
        github_base_url: server.base_url(),
        raw_base_url: server.url("/raw"),
        concurrent_requests: 10,
        task_timeout_secs: None,
        request_timeout_secs: Some(10),
        skip_synopsis: false,
        config: None,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_first_and_third_party_services() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();

    let listing = listing_page(&[
        r#"<ul><li><a href='#about'>About</a></li></ul>"#,
        r#"<ul><li><strong><a href="/acme/servers/blob/main/src/fetch">Fetch</a></strong> - Web content fetching</li></ul>"#,
        r#"<ul><li><a href="/acme/archived">Archived</a></li></ul>"#,
        r#"<ul><li><strong><a href="/other/tool">Tool</a></strong> - A third-party tool</li></ul>"#,
    ]);

    let listing_mock = server.mock(|when, then| {
        when.method(GET).path("/acme/servers/tree/main");
        then.status(200).body(listing);
    });
    let parent_stars_mock = server.mock(|when, then| {
        when.method(GET).path("/acme/servers");
        then.status(200).body(star_page("acme/servers", "2.5k"));
    });
    let tool_stars_mock = server.mock(|when, then| {
        when.method(GET).path("/other/tool");
        then.status(200).body(star_page("other/tool", "3,400"));
    });
    let fetch_readme_mock = server.mock(|when, then| {
        when.method(GET).path("/raw/acme/servers/main/src/fetch/README.md");
        then.status(200)
            .body("# Fetch MCP Server\n\nFetches URLs and converts pages to markdown.\n");
    });
    let tool_master_mock = server.mock(|when, then| {
        when.method(GET).path("/raw/other/tool/master/README.md");
        then.status(404).body("404: Not Found");
    });
    let tool_main_mock = server.mock(|when, then| {
        when.method(GET).path("/raw/other/tool/main/README.md");
        then.status(200).body("## Tool\nTool does things.");
    });

    let config = config_for(&server, &output_path);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CatalogPipeline::new(storage, config).unwrap();
    let engine = EtlEngine::new(pipeline);

    let result = engine.run().await.unwrap();
    assert!(result.ends_with("services.csv"));

    listing_mock.assert();
    parent_stars_mock.assert_hits(1);
    tool_stars_mock.assert_hits(1);
    fetch_readme_mock.assert();
    tool_master_mock.assert();
    tool_main_mock.assert();

    let csv = std::fs::read_to_string(temp_dir.path().join("services.csv")).unwrap();
    let expected = format!(
        "Service,Stars,URL,Synopsis\n\
         Tool,3400,{base}/other/tool,Tool does things....\n\
         Fetch,2500,{base}/acme/servers/blob/main/src/fetch,Fetches URLs and converts pages to markdown....\n",
        base = server.base_url()
    );
    assert_eq!(csv, expected);
}

#[tokio::test]
async fn test_three_lists_yield_only_first_party() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();

    let listing = listing_page(&[
        "<ul></ul>",
        r#"<ul><li><strong><a href="/acme/servers/blob/main/src/git">Git</a></strong></li>
             <li><strong><a href="/acme/servers/blob/main/src/time">Time</a></strong></li></ul>"#,
        "<ul></ul>",
    ]);
    server.mock(|when, then| {
        when.method(GET).path("/acme/servers/tree/main");
        then.status(200).body(listing);
    });
    server.mock(|when, then| {
        when.method(GET).path("/acme/servers");
        then.status(200).body(star_page("acme/servers", "70"));
    });

    let mut config = config_for(&server, &output_path);
    config.skip_synopsis = true;
    config.output_formats = vec!["tsv".to_string()];

    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    EtlEngine::new(pipeline).run().await.unwrap();

    let tsv = std::fs::read_to_string(temp_dir.path().join("services.tsv")).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Git\t70\t"));
    assert!(lines[2].starts_with("Time\t70\t"));
}

#[tokio::test]
async fn test_unavailable_listing_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/acme/servers/tree/main");
        then.status(500);
    });

    let config = config_for(&server, &output_path);
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    let result = EtlEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(EtlError::EmptyCatalog { .. })));
    assert!(!temp_dir.path().join("services.csv").exists());
}

#[tokio::test]
async fn test_write_failure_is_fatal_after_enrichment() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, b"occupied").unwrap();
    let output_path = blocker.to_str().unwrap().to_string();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/acme/servers/tree/main");
        then.status(200).body(listing_page(&[
            "<ul></ul>",
            r#"<ul><li><a href="/acme/servers/blob/main/src/memory">Memory</a></li></ul>"#,
        ]));
    });
    let readme_mock = server.mock(|when, then| {
        when.method(GET).path("/raw/acme/servers/main/src/memory/README.md");
        then.status(200).body("Knowledge graph memory.");
    });

    let config = config_for(&server, &output_path);
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config).unwrap();
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    readme_mock.assert();
    assert!(matches!(err, EtlError::IoError(_)));
    assert_eq!(err.severity(), star_catalog::utils::error::ErrorSeverity::Critical);
}
