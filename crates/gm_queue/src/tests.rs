use std::time::Duration;

use gm_client::{ModelClient, StorageClient};
use gm_transcript::{Origin, Transcript};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use test_log::test;

use super::*;

fn clients(server: &MockServer) -> (StorageClient, ModelClient) {
    (
        StorageClient::new(server.base_url()),
        ModelClient::new(server.base_url()),
    )
}

fn queue() -> UploadQueue {
    UploadQueue::new().with_step_delay(Duration::ZERO)
}

#[test(tokio::test)]
async fn test_single_file_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "hello").unwrap();

    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(serde_json::json!({
                "message": "File uploaded successfully!",
                "currentPath": "/uploads/current/current.csv",
                "filename": "current.csv",
            }));
        })
        .await;
    let model = server
        .mock_async(|when, then| {
            when.method(POST).path("/ask_llm").json_body(serde_json::json!({
                "file": "aGVsbG8=",
                "isBase64": true,
                "filePath": "/uploads/current/current.csv",
            }));
            then.status(200)
                .json_body(serde_json::json!({ "response": "looks healthy" }));
        })
        .await;

    let (storage, model_client) = clients(&server);
    let mut queue = queue();
    let mut transcript = Transcript::default();

    assert!(queue.enqueue(&path, &mut transcript));
    queue.run(&storage, &model_client, &mut transcript).await;

    upload.assert_async().await;
    model.assert_async().await;
    assert_eq!(transcript.len(), 1);
    assert_eq!(
        transcript.to_string(),
        "--- response (file data.csv) ---\nlooks healthy"
    );
}

#[test(tokio::test)]
async fn test_files_processed_in_fifo_order_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    std::fs::write(&first, "a").unwrap();
    std::fs::write(&second, "b").unwrap();

    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(serde_json::json!({
                "message": "File uploaded successfully!",
                "currentPath": "/uploads/current/current.csv",
                "filename": "current.csv",
            }));
        })
        .await;
    let model = server
        .mock_async(|when, then| {
            when.method(POST).path("/ask_llm");
            then.status(200)
                .json_body(serde_json::json!({ "response": "ok" }));
        })
        .await;

    let (storage, model_client) = clients(&server);
    let mut queue = queue();
    let mut transcript = Transcript::default();

    assert!(queue.enqueue(&first, &mut transcript));
    assert!(queue.enqueue(&second, &mut transcript));
    assert_eq!(queue.len(), 2);

    queue.run(&storage, &model_client, &mut transcript).await;

    assert_eq!(upload.hits_async().await, 2);
    assert_eq!(model.hits_async().await, 2);
    assert!(queue.is_empty());
    assert!(!queue.is_processing());

    assert_eq!(transcript.len(), 2);
    assert_eq!(
        transcript.segments()[0].origin,
        Origin::File("first.csv".to_owned())
    );
    assert_eq!(
        transcript.segments()[1].origin,
        Origin::File("second.csv".to_owned())
    );
}

#[test(tokio::test)]
async fn test_oversized_file_is_rejected_before_enqueue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.csv");
    std::fs::write(&path, vec![b'a'; 6 * 1024 * 1024]).unwrap();

    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(serde_json::json!({ "response": "unreachable" }));
        })
        .await;

    let (storage, model_client) = clients(&server);
    let mut queue = queue();
    let mut transcript = Transcript::default();

    assert!(!queue.enqueue(&path, &mut transcript));
    assert!(queue.is_empty());

    queue.run(&storage, &model_client, &mut transcript).await;

    assert_eq!(upload.hits_async().await, 0);
    assert_eq!(transcript.len(), 1);
    assert!(transcript.segments()[0].is_error);
    assert!(transcript.segments()[0].text.contains("File too large"));
}

#[test(tokio::test)]
async fn test_non_csv_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not a dataset").unwrap();

    let server = MockServer::start_async().await;
    let (storage, model_client) = clients(&server);
    let mut queue = queue();
    let mut transcript = Transcript::default();

    assert!(!queue.enqueue(&path, &mut transcript));
    queue.run(&storage, &model_client, &mut transcript).await;

    assert_eq!(
        transcript.to_string(),
        "--- error (file notes.txt) ---\nNot a CSV file: notes.txt"
    );
}

#[test(tokio::test)]
async fn test_upload_failure_advances_to_next_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    std::fs::write(&first, "a").unwrap();
    std::fs::write(&second, "b").unwrap();

    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(500).body("disk full");
        })
        .await;
    let model = server
        .mock_async(|when, then| {
            when.method(POST).path("/ask_llm");
            then.status(200)
                .json_body(serde_json::json!({ "response": "unreachable" }));
        })
        .await;

    let (storage, model_client) = clients(&server);
    let mut queue = queue();
    let mut transcript = Transcript::default();

    queue.enqueue(&first, &mut transcript);
    queue.enqueue(&second, &mut transcript);
    queue.run(&storage, &model_client, &mut transcript).await;

    // Both files were attempted despite the first failure, none retried.
    assert_eq!(upload.hits_async().await, 2);
    assert_eq!(model.hits_async().await, 0);

    assert_eq!(transcript.len(), 2);
    assert!(transcript.segments().iter().all(|segment| segment.is_error));
    assert!(transcript.segments()[0].text.contains("Upload failed"));
}

#[test(tokio::test)]
async fn test_running_an_empty_queue_is_a_no_op() {
    let server = MockServer::start_async().await;
    let (storage, model_client) = clients(&server);
    let mut queue = queue();
    let mut transcript = Transcript::default();

    queue.run(&storage, &model_client, &mut transcript).await;

    assert!(queue.is_empty());
    assert!(!queue.is_processing());
    assert!(transcript.is_empty());
}
