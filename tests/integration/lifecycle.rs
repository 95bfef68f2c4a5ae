//! Full job lifecycles against a mock service.

use super::common::*;
use busbar_sf_bulk::{BatchInput, BatchState, Dataset, ErrorKind, FetchOutcome, Operation};
use busbar_sf_client::{PK_CHUNKING_HEADER, SESSION_HEADER};
use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_insert_lifecycle() {
    let server = MockServer::start().await;
    let job_path = format!("{JOBS_PATH}/750xx000000001A");

    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .and(header(SESSION_HEADER, SESSION_ID))
        .and(body_string_contains("<operation>insert</operation>"))
        .respond_with(
            ResponseTemplate::new(201).set_body_string(job_info("750xx000000001A", "insert", "Account")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{job_path}/batch")))
        .and(body_string(
            "Name,Industry\nAcme Corp,Technology\nGlobal Inc,Finance\n\"Smith, Jones & Co\",Legal\n",
        ))
        .respond_with(ResponseTemplate::new(201).set_body_string(batch_info(
            "751xx000000001A",
            "750xx000000001A",
            "Queued",
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch")))
        .respond_with(ResponseTemplate::new(200).set_body_string(batch_info_list(&[batch_info(
            "751xx000000001A",
            "750xx000000001A",
            "Completed",
            3,
        )])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch/751xx000000001A/result")))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "\"Id\",\"Success\",\"Created\",\"Error\"\n\
             \"001xx000003DGb1AAG\",\"true\",\"true\",\"\"\n\
             \"001xx000003DGb2AAG\",\"true\",\"true\",\"\"\n\
             \"001xx000003DGb3AAG\",\"true\",\"true\",\"\"\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(job_path.as_str()))
        .and(body_string_contains("<state>Closed</state>"))
        .respond_with(ResponseTemplate::new(200).set_body_string(job_info(
            "750xx000000001A",
            "insert",
            "Account",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let session = session();

    let job = client
        .create_job("insert", "Account", &session, None)
        .await
        .expect("create should succeed");
    assert_eq!(job.operation(), Operation::Insert);

    let accounts = Dataset::from_rows(
        ["Name", "Industry"],
        vec![
            vec!["Acme Corp".into(), "Technology".into()],
            vec!["Global Inc".into(), "Finance".into()],
            vec!["Smith, Jones & Co".into(), "Legal".into()],
        ],
    )
    .unwrap();
    client
        .add_batch(&job, &BatchInput::Dataset(accounts), None)
        .await
        .expect("batch should be accepted");

    let status = client.get_status(&job, None).await.unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].state, BatchState::Completed);
    assert_eq!(status[0].records_processed, 3);

    let outcome = client.fetch_results(&job, None).await.unwrap();
    let data = match outcome {
        FetchOutcome::Ready { data, .. } => data,
        FetchOutcome::NotReady { .. } => panic!("all batches are completed"),
    };
    assert_eq!(data.len(), 3);
    assert_eq!(data.columns(), &["Id", "Success", "Created", "Error"]);
    assert_eq!(data.column("Success"), Some(vec!["true", "true", "true"]));

    client.close_job(&job, None).await.expect("close should succeed");
}

#[tokio::test]
async fn test_chunked_query_lifecycle() {
    let server = MockServer::start().await;
    let job_path = format!("{JOBS_PATH}/750xx000000002Q");

    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .and(header(PK_CHUNKING_HEADER, "chunkSize=50"))
        .and(body_string_contains("<operation>query</operation>"))
        .and(body_string_contains("<concurrencyMode>Parallel</concurrencyMode>"))
        .respond_with(
            ResponseTemplate::new(201).set_body_string(job_info("750xx000000002Q", "query", "Account")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{job_path}/batch")))
        .and(body_string("SELECT Id, Name FROM Account"))
        .respond_with(ResponseTemplate::new(201).set_body_string(batch_info(
            "751xx0000000001",
            "750xx000000002Q",
            "Queued",
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch")))
        .respond_with(ResponseTemplate::new(200).set_body_string(batch_info_list(&[
            batch_info("751xx0000000001", "750xx000000002Q", "Completed", 0),
            batch_info("751xx0000000002", "750xx000000002Q", "Completed", 2),
            batch_info("751xx0000000003", "750xx000000002Q", "Failed", 1),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // The submission batch carries no rows and must never be downloaded.
    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch/751xx0000000001/result")))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_list("752xx0000000001")))
        .expect(0)
        .mount(&server)
        .await;

    for (batch_id, result_id, rows) in [
        (
            "751xx0000000002",
            "752xx0000000002",
            "\"Id\",\"Name\"\n\"001A\",\"Acme Corp\"\n\"001B\",\"Global Inc\"\n",
        ),
        (
            "751xx0000000003",
            "752xx0000000003",
            "\"Id\",\"Name\"\n\"001C\",\"Initech\"\n",
        ),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("{job_path}/batch/{batch_id}/result")))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_list(result_id)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{job_path}/batch/{batch_id}/result/{result_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(rows))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = mock_client(&server);
    let session = session();

    let job = client
        .create_job("query", "Account", &session, Some(50))
        .await
        .expect("create should succeed");
    client
        .add_batch(&job, &BatchInput::Query("SELECT Id, Name FROM Account".into()), None)
        .await
        .expect("query batch should be accepted");

    let outcome = client.fetch_results(&job, None).await.unwrap();
    assert!(outcome.is_ready());
    assert_eq!(outcome.batches().len(), 3);
    assert_eq!(outcome.batches()[2].state, BatchState::Failed);

    let data = outcome.into_data().unwrap();
    assert_eq!(data.columns(), &["Id", "Name"]);
    assert_eq!(data.column("Id"), Some(vec!["001A", "001B", "001C"]));
}

#[tokio::test]
async fn test_polling_until_ready() {
    let server = MockServer::start().await;
    let job_path = format!("{JOBS_PATH}/750xx000000003A");

    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch")))
        .respond_with(ResponseTemplate::new(200).set_body_string(batch_info_list(&[batch_info(
            "751xx000000003A",
            "750xx000000003A",
            "InProgress",
            1,
        )])))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch")))
        .respond_with(ResponseTemplate::new(200).set_body_string(batch_info_list(&[batch_info(
            "751xx000000003A",
            "750xx000000003A",
            "Completed",
            2,
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{job_path}/batch/751xx000000003A/result")))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Id,Success,Created,Error\n001A,true,false,\n001B,true,false,\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let job = busbar_sf_bulk::Job::resume("750xx000000003A", Operation::Update, "Account", session());

    let mut polls = 0;
    let data = loop {
        polls += 1;
        match client.fetch_results(&job, None).await.unwrap() {
            FetchOutcome::Ready { data, .. } => break data,
            FetchOutcome::NotReady { batches } => {
                assert_eq!(batches[0].state, BatchState::InProgress);
                assert!(polls < 5, "job never became ready");
            }
        }
    };

    assert_eq!(polls, 3);
    assert_eq!(data.len(), 2);
}

#[tokio::test]
async fn test_rejected_job_keeps_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(JOBS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<error xmlns="http://www.force.com/2009/06/asyncapi/dataload">
    <exceptionCode>InvalidJob</exceptionCode>
    <exceptionMessage>Entity 'Acount' is not supported by the Bulk API.</exceptionMessage>
</error>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = mock_client(&server)
        .create_job("update", "Acount", &session(), None)
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::JobCreationFailed(message) => {
            assert_eq!(message, "Entity 'Acount' is not supported by the Bulk API.")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_csv_file_batch() {
    use std::io::Write;

    let server = MockServer::start().await;
    let job_path = format!("{JOBS_PATH}/750xx000000004D");

    Mock::given(method("POST"))
        .and(path(format!("{job_path}/batch")))
        .and(header("Content-Type", "text/csv; charset=UTF-8"))
        .and(body_string("Id\n001A\n001B\n"))
        .respond_with(ResponseTemplate::new(201).set_body_string(batch_info(
            "751xx000000004D",
            "750xx000000004D",
            "Queued",
            0,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(b"Id\n001A\n001B\n").unwrap();

    let job = busbar_sf_bulk::Job::resume("750xx000000004D", Operation::Delete, "Account", session());
    let input = BatchInput::infer(file.path().to_string_lossy());

    mock_client(&server)
        .add_batch(&job, &input, None)
        .await
        .expect("csv file batch should be accepted");
}
