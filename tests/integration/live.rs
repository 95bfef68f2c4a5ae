//! Bulk API tests against a real org. Run with `--ignored`.

use std::time::Duration;

use super::common::live_session;
use busbar_sf_bulk::{BatchInput, BulkJobClient, Dataset, FetchOutcome, Job};

const POLL_INTERVAL: Duration = Duration::from_secs(3);
const MAX_POLLS: u32 = 60;

async fn wait_for_results(client: &BulkJobClient, job: &Job) -> Dataset {
    for _ in 0..MAX_POLLS {
        match client.fetch_results(job, None).await.expect("status should be readable") {
            FetchOutcome::Ready { data, .. } => return data,
            FetchOutcome::NotReady { .. } => tokio::time::sleep(POLL_INTERVAL).await,
        }
    }
    panic!("job {job} did not finish within {MAX_POLLS} polls");
}

#[tokio::test]
#[ignore]
async fn test_live_insert_then_delete() {
    let Some(session) = live_session().await else { return; };
    let client = BulkJobClient::new().expect("Failed to create Bulk client");

    let job = client
        .create_job("insert", "Account", &session, None)
        .await
        .expect("insert job should open");

    let stamp = std::process::id();
    let accounts = Dataset::from_rows(
        ["Name"],
        vec![
            vec![format!("BusbarBulkTest Alpha {stamp}")],
            vec![format!("BusbarBulkTest Beta {stamp}")],
        ],
    )
    .unwrap();
    client
        .add_batch(&job, &BatchInput::Dataset(accounts), None)
        .await
        .expect("batch should be accepted");

    let results = wait_for_results(&client, &job).await;
    client.close_job(&job, None).await.expect("close should succeed");
    assert_eq!(results.len(), 2);

    let ids: Vec<Vec<String>> = results
        .column("Id")
        .expect("result rows carry Id")
        .into_iter()
        .filter(|id| !id.is_empty())
        .map(|id| vec![id.to_string()])
        .collect();

    let cleanup = client
        .create_job("delete", "Account", &session, None)
        .await
        .expect("delete job should open");
    client
        .add_batch(
            &cleanup,
            &BatchInput::Dataset(Dataset::from_rows(["Id"], ids).unwrap()),
            None,
        )
        .await
        .expect("delete batch should be accepted");
    wait_for_results(&client, &cleanup).await;
    client.close_job(&cleanup, None).await.expect("close should succeed");
}

#[tokio::test]
#[ignore]
async fn test_live_chunked_query() {
    let Some(session) = live_session().await else { return; };
    let client = BulkJobClient::new().expect("Failed to create Bulk client");

    let job = client
        .create_job("query", "Account", &session, Some(100_000))
        .await
        .expect("query job should open");
    client
        .add_batch(
            &job,
            &BatchInput::Query("SELECT Id, Name FROM Account".into()),
            None,
        )
        .await
        .expect("query batch should be accepted");

    let results = wait_for_results(&client, &job).await;
    client.close_job(&job, None).await.expect("close should succeed");

    assert!(results.column_index("Id").is_some());
    assert!(results.column_index("Name").is_some());
}
