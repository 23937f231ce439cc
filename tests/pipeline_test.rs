use std::fs;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use tempfile::tempdir;
use zeitsprung::crawler::{CrawlerConfig, EpisodeCrawler};
use zeitsprung::knowledge::WikipediaClient;
use zeitsprung::model::{GatewayError, MockModel};
use zeitsprung::output::{Destination, ResultWriter};
use zeitsprung::pipeline::{EpisodePipeline, RunSummary};

const CARRHAE_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
    <h1 class="page-title">GAG300: Crassus und die Parther</h1>
    <div class="entry-content">
        <p>Marcus Licinius Crassus zieht mit sieben Legionen nach Osten.</p>
        <p>In der Wüste Mesopotamiens trifft er auf die Reiterei der Parther. AUS UNSERER WERBUNG Sponsor</p>
        <p>Dieser Absatz wird nicht mehr gelesen.</p>
    </div>
</body></html>"#;

const CARRHAE_DATES: &str = "```json\n{\"start_date\": \"-0053\", \"end_date\": \"-0053\"}\n```";

fn pipeline(server: &ServerGuard, model: MockModel, output: &std::path::Path) -> EpisodePipeline<MockModel> {
    let crawler = EpisodeCrawler::new(CrawlerConfig::default()).unwrap();
    EpisodePipeline::new(crawler, model, ResultWriter::new(output)).with_base_url(server.url())
}

fn wikipedia(server: &ServerGuard) -> WikipediaClient {
    WikipediaClient::with_endpoint(&format!("{}/w/api.php", server.url()), Duration::from_secs(5))
        .unwrap()
}

async fn mock_carrhae_page(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/archiv/gag300/")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(CARRHAE_PAGE)
        .create_async()
        .await
}

#[tokio::test]
async fn dated_episode_with_wikipedia_enrichment() {
    let mut server = Server::new_async().await;
    let _page = mock_carrhae_page(&mut server).await;
    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("list".into(), "search".into()),
            Matcher::UrlEncoded("srsearch".into(), "Schlacht bei Carrhae".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"query": {"search": [{"title": "Schlacht bei Carrhae"}]}}"#)
        .create_async()
        .await;
    let _extract = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded("titles".into(), "Schlacht bei Carrhae".into()))
        .with_status(200)
        .with_body(
            r#"{"query": {"pages": {"42": {"title": "Schlacht bei Carrhae", "extract": "Die Schlacht bei Carrhae fand im Jahr 53 v. Chr. statt."}}}}"#,
        )
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let model = MockModel::with_replies([
        Ok("  Schlacht bei Carrhae\n".to_string()),
        Ok(CARRHAE_DATES.to_string()),
    ]);
    let pipeline = pipeline(&server, model, dir.path()).with_wikipedia(wikipedia(&server));

    let summary = pipeline.run(300..=300, None).await;
    assert_eq!(
        summary,
        RunSummary {
            processed: 1,
            dated: 1,
            failed: 0,
        }
    );

    let calls = pipeline.model().calls().await;
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].params.wants_json());
    assert!(calls[1].params.wants_json());
    assert!(calls[1].prompt.contains(
        "Titel: GAG300: Crassus und die Parther\nZusammenfassung: Marcus Licinius Crassus zieht mit sieben Legionen nach Osten. In der Wüste Mesopotamiens trifft er auf die Reiterei der Parther.\nWikipedia-Informationen: Schlacht bei Carrhae: Die Schlacht bei Carrhae fand im Jahr 53 v. Chr. statt."
    ));

    let dated = fs::read_to_string(pipeline.writer().dated_path()).unwrap();
    let rows: Vec<&str> = dated.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(rows[0], "title;summary;year_from;year_until;url");
    assert_eq!(
        rows[1],
        format!(
            "GAG300: Crassus und die Parther;Marcus Licinius Crassus zieht mit sieben Legionen nach Osten. In der Wüste Mesopotamiens trifft er auf die Reiterei der Parther.;-0053;-0053;{}/archiv/gag300/",
            server.url()
        )
    );
    assert!(!pipeline.writer().error_path().exists());
}

#[tokio::test]
async fn ambiguous_term_is_not_used_for_enrichment() {
    let mut server = Server::new_async().await;
    let _page = mock_carrhae_page(&mut server).await;
    let _search = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded("list".into(), "search".into()))
        .with_status(200)
        .with_body(r#"{"query": {"search": [{"title": "Crassus"}]}}"#)
        .create_async()
        .await;
    let _extract = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded("titles".into(), "Crassus".into()))
        .with_status(200)
        .with_body(
            r#"{"query": {"pages": {"9": {"title": "Crassus", "extract": "Crassus ist der Name folgender Personen:", "pageprops": {"disambiguation": ""}}}}}"#,
        )
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let model = MockModel::with_replies([Ok("Crassus".to_string()), Ok(CARRHAE_DATES.to_string())]);
    let pipeline = pipeline(&server, model, dir.path()).with_wikipedia(wikipedia(&server));

    let processed = pipeline.process_episode(300).await.unwrap();
    assert_eq!(processed.destination, Destination::Dated);

    let calls = pipeline.model().calls().await;
    assert!(!calls[1].prompt.contains("Wikipedia-Informationen"));
}

#[tokio::test]
async fn failed_lookup_does_not_stop_dating() {
    let mut server = Server::new_async().await;
    let _page = mock_carrhae_page(&mut server).await;
    let _wiki = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let model = MockModel::with_replies([
        Ok("Schlacht bei Carrhae".to_string()),
        Ok(CARRHAE_DATES.to_string()),
    ]);
    let pipeline = pipeline(&server, model, dir.path()).with_wikipedia(wikipedia(&server));

    let processed = pipeline.process_episode(300).await.unwrap();
    assert_eq!(processed.destination, Destination::Dated);
    assert_eq!(processed.record.year_until.as_str(), "-0053");
}

#[tokio::test]
async fn transport_failures_route_episode_to_error_file() {
    let mut server = Server::new_async().await;
    let _page = mock_carrhae_page(&mut server).await;

    let dir = tempdir().unwrap();
    let model = MockModel::always(Err(GatewayError::Transport("timed out".to_string())));
    let pipeline = pipeline(&server, model, dir.path());

    let summary = pipeline.run(300..=300, None).await;
    assert_eq!(
        summary,
        RunSummary {
            processed: 1,
            dated: 0,
            failed: 1,
        }
    );

    // Baseline attempt plus the default four retries
    assert_eq!(pipeline.model().call_count().await, 5);

    assert!(!pipeline.writer().dated_path().exists());
    let errors = fs::read_to_string(pipeline.writer().error_path()).unwrap();
    let rows: Vec<&str> = errors.trim_start_matches('\u{feff}').lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("GAG300: Crassus und die Parther;"));
    assert!(rows[1].contains(";Unknown;Unknown;"));
}

#[tokio::test]
async fn every_episode_in_range_gets_exactly_one_row() {
    let mut server = Server::new_async().await;
    let _old_scheme = server
        .mock("GET", "/podcast/zs270/")
        .with_status(200)
        .with_body(CARRHAE_PAGE)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/archiv/gag271/")
        .with_status(404)
        .create_async()
        .await;
    let _undatable = server
        .mock("GET", "/archiv/gag272/")
        .with_status(200)
        .with_body(CARRHAE_PAGE)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let model = MockModel::with_replies([Ok(CARRHAE_DATES.to_string())]);
    model
        .push_reply(Ok(r#"{"start_date": "um 50 v. Chr.", "end_date": "-0050"}"#.to_string()))
        .await;
    let pipeline = pipeline(&server, model, dir.path());

    let summary = pipeline.run(270..=272, None).await;
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.dated, 1);
    assert_eq!(summary.failed, 2);

    let dated = fs::read_to_string(pipeline.writer().dated_path()).unwrap();
    let errors = fs::read_to_string(pipeline.writer().error_path()).unwrap();
    assert_eq!(dated.lines().count(), 2);
    assert_eq!(errors.lines().count(), 3);
    assert!(dated.contains("/podcast/zs270/"));
    assert!(errors.contains("/archiv/gag271/"));
    assert!(errors.contains("/archiv/gag272/"));
}
