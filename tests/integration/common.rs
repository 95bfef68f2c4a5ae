use busbar_sf_auth::{Authenticator, Session, SessionAuthenticator};
use busbar_sf_bulk::BulkJobClient;
use wiremock::MockServer;

pub const SESSION_ID: &str = "00Dxx0000001gEF!AQ4AQFakeSession";

pub const JOBS_PATH: &str = "/services/async/47.0/job";

/// A session the way a SOAP login hands it back.
pub fn session() -> Session {
    Session::new(
        "https://na1.salesforce.com/services/Soap/u/47.0/00Dxx0000001gEF",
        SESSION_ID,
    )
}

/// Client pointed at the mock service.
pub fn mock_client(server: &MockServer) -> BulkJobClient {
    BulkJobClient::new()
        .expect("Failed to create Bulk client")
        .with_base_url(server.uri())
}

pub fn job_info(id: &str, operation: &str, object: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<jobInfo xmlns="http://www.force.com/2009/06/asyncapi/dataload">
    <id>{id}</id>
    <operation>{operation}</operation>
    <object>{object}</object>
    <createdById>005xx000001Sv6AAAS</createdById>
    <state>Open</state>
    <concurrencyMode>Parallel</concurrencyMode>
    <contentType>CSV</contentType>
</jobInfo>"#
    )
}

pub fn batch_info(id: &str, job_id: &str, state: &str, processed: u64) -> String {
    format!(
        r#"<batchInfo>
        <id>{id}</id>
        <jobId>{job_id}</jobId>
        <state>{state}</state>
        <numberRecordsProcessed>{processed}</numberRecordsProcessed>
        <numberRecordsFailed>0</numberRecordsFailed>
    </batchInfo>"#
    )
}

pub fn batch_info_list(batches: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<batchInfoList xmlns="http://www.force.com/2009/06/asyncapi/dataload">
    {}
</batchInfoList>"#,
        batches.join("\n    ")
    )
}

pub fn result_list(result_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<result-list xmlns="http://www.force.com/2009/06/asyncapi/dataload"><result>{result_id}</result></result-list>"#
    )
}

/// Session for tests against a real org, or `None` when the environment
/// does not provide one.
pub async fn live_session() -> Option<Session> {
    let authenticator = SessionAuthenticator::from_env().ok()?;
    match authenticator.authenticate().await {
        Ok(session) => Some(session),
        Err(e) => panic!("SF_SERVER_URL/SF_SESSION_ID are set but unusable: {e}"),
    }
}
