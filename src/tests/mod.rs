//! Tests against a mocked OctoPrint instance.

mod files;

use crate::{ClientConfig, OctoPrintClient};
use mockito::{Mock, ServerGuard};

const API_KEY: &str = "TESTKEY";

async fn mock_server() -> (ServerGuard, OctoPrintClient) {
    let server = mockito::Server::new_async().await;
    let client = OctoPrintClient::new(ClientConfig::new(server.url()).with_api_key(API_KEY))
        .unwrap();
    (server, client)
}

/// A mock answering `method path` with a JSON body.
async fn json_mock(server: &mut ServerGuard, method: &str, path: &str, body: &str) -> Mock {
    server
        .mock(method, path)
        .match_header("x-api-key", API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
