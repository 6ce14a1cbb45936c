use super::test_client;
use inkweave_core::chapters::ChapterGenerateRequest;
use inkweave_core::wizard::{WizardCharactersRequest, WorldBuildingRequest};
use inkweave_core::{StreamNotice, StreamOptions, StreamOutcome};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

fn sse_body(frames: &[&str]) -> String {
    frames
        .iter()
        .map(|frame| format!("data: {frame}\n\n"))
        .collect()
}

fn world_request() -> WorldBuildingRequest {
    WorldBuildingRequest {
        title: "Ashes of the North".to_string(),
        description: "A frontier town faces the long winter.".to_string(),
        theme: "survival".to_string(),
        genre: "fantasy".to_string(),
        narrative_perspective: None,
        target_words: None,
        chapter_count: Some(5),
        character_count: Some(5),
        provider: None,
        model: None,
    }
}

#[tokio::test]
async fn progress_then_result_fires_each_callback_the_right_number_of_times() {
    let mut server = mockito::Server::new_async().await;
    let body = sse_body(&[
        r#"{"type": "progress", "message": "p1", "progress": 10}"#,
        r#"{"type": "progress", "message": "p2", "progress": 60}"#,
        r#"{"type": "result", "data": {"project_id": "p1", "time_period": "iron age"}}"#,
    ]);
    let _mock = server
        .mock("POST", "/wizard-stream/world-building")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let progress: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let completions = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(AtomicUsize::new(0));

    let progress_sink = progress.clone();
    let completions_sink = completions.clone();
    let errors_sink = errors.clone();
    let options = StreamOptions::new()
        .on_progress(move |notice| {
            if let StreamNotice::Progress { message, .. } = notice {
                progress_sink.lock().expect("lock").push(message);
            }
        })
        .on_complete(move |world: inkweave_core::wizard::WorldBuilding| {
            assert_eq!(world.project_id, "p1");
            assert_eq!(world.time_period.as_deref(), Some("iron age"));
            completions_sink.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(move |_| {
            errors_sink.fetch_add(1, Ordering::SeqCst);
        });

    let summary = client.wizard().world_building(&world_request(), options).await;

    assert_eq!(summary.outcome, StreamOutcome::Completed);
    assert_eq!(*progress.lock().expect("lock"), vec!["p1", "p2"]);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn a_malformed_frame_is_tolerated_and_completion_still_happens() {
    let mut server = mockito::Server::new_async().await;
    let body = format!(
        "data: {}\n\ndata: {{broken\n\ndata: {}\n\n",
        r#"{"type": "progress", "message": "p1"}"#,
        r#"{"type": "result", "data": {"project_id": "p1"}}"#,
    );
    let _mock = server
        .mock("POST", "/wizard-stream/world-building")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let completions = Arc::new(AtomicUsize::new(0));
    let completions_sink = completions.clone();
    let options = StreamOptions::new()
        .on_complete(move |_: inkweave_core::wizard::WorldBuilding| {
            completions_sink.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(|err| panic!("unexpected stream error: {err}"));

    let summary = client.wizard().world_building(&world_request(), options).await;

    assert_eq!(summary.outcome, StreamOutcome::Completed);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn a_server_error_frame_reaches_on_error_and_nothing_else() {
    let mut server = mockito::Server::new_async().await;
    let body = sse_body(&[
        r#"{"type": "progress", "message": "validating", "progress": 10}"#,
        r#"{"type": "error", "message": "project does not exist", "code": 404}"#,
    ]);
    let _mock = server
        .mock("POST", "/wizard-stream/characters")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let errors_sink = errors.clone();
    let options = StreamOptions::new()
        .on_complete(|_: inkweave_core::wizard::GeneratedCharacters| {
            panic!("completion after an error frame");
        })
        .on_error(move |err| {
            errors_sink.lock().expect("lock").push(err.user_message());
        });

    let request = WizardCharactersRequest {
        project_id: "p1".to_string(),
        count: Some(5),
        world_context: None,
        theme: None,
        genre: None,
        requirements: None,
        provider: None,
        model: None,
    };
    let summary = client.wizard().characters(&request, options).await;

    assert_eq!(summary.outcome, StreamOutcome::Failed);
    assert_eq!(
        *errors.lock().expect("lock"),
        vec!["project does not exist".to_string()]
    );
}

#[tokio::test]
async fn cancellation_mid_stream_fires_no_terminal_callback() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/wizard-stream/world-building")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_chunked_body(|writer| {
            writer.write_all(b"data: {\"type\": \"progress\", \"message\": \"p1\"}\n\n")?;
            writer.flush()?;
            // Hold the stream open long enough for the client to cancel.
            std::thread::sleep(std::time::Duration::from_millis(500));
            writer.write_all(b"data: {\"type\": \"result\", \"data\": {\"project_id\": \"p1\"}}\n\n")
        })
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let token = CancellationToken::new();
    let cancel = token.clone();
    let terminals = Arc::new(AtomicUsize::new(0));
    let complete_count = terminals.clone();
    let error_count = terminals.clone();

    let options = StreamOptions::new()
        .cancel_token(token)
        .on_progress(move |_| cancel.cancel())
        .on_complete(move |_: inkweave_core::wizard::WorldBuilding| {
            complete_count.fetch_add(1, Ordering::SeqCst);
        })
        .on_error(move |_| {
            error_count.fetch_add(1, Ordering::SeqCst);
        });

    let summary = client.wizard().world_building(&world_request(), options).await;

    assert_eq!(summary.outcome, StreamOutcome::Cancelled);
    assert_eq!(terminals.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_success_status_on_the_stream_endpoint_reaches_on_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/wizard-stream/world-building")
        .with_status(503)
        .with_body("{}")
        .create_async()
        .await;

    let (client, notifier) = test_client(&server);
    let errors: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let errors_sink = errors.clone();
    let options = StreamOptions::new()
        .on_complete(|_: inkweave_core::wizard::WorldBuilding| panic!("must not complete"))
        .on_error(move |err| {
            errors_sink.lock().expect("lock").push(err.user_message());
        });

    let summary = client.wizard().world_building(&world_request(), options).await;

    assert_eq!(summary.outcome, StreamOutcome::Failed);
    assert_eq!(
        *errors.lock().expect("lock"),
        vec!["service temporarily unavailable, please retry later".to_string()]
    );
    // The shared wrapper notification fired once as well.
    assert_eq!(notifier.messages().len(), 1);
}

#[tokio::test]
async fn chapter_drafting_assembles_the_streamed_text() {
    let mut server = mockito::Server::new_async().await;
    let body = sse_body(&[
        r#"{"type": "start", "message": "drafting"}"#,
        r#"{"type": "content", "content": "The rain "}"#,
        r#"{"type": "content", "content": "kept falling."}"#,
        r#"{"type": "done", "message": "ok", "word_count": 4}"#,
    ]);
    let _mock = server
        .mock("POST", "/chapters/c1/generate-stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let draft: Arc<Mutex<Option<inkweave_core::GeneratedText>>> = Arc::new(Mutex::new(None));
    let draft_sink = draft.clone();
    let options = StreamOptions::new().on_complete(move |generated| {
        *draft_sink.lock().expect("lock") = Some(generated);
    });

    let summary = client
        .chapters()
        .generate_stream("c1", &ChapterGenerateRequest { style_id: Some(3) }, options)
        .await;

    assert_eq!(summary.outcome, StreamOutcome::Completed);
    assert_eq!(summary.text, "The rain kept falling.");
    let draft = draft.lock().expect("lock").clone().expect("draft");
    assert_eq!(draft.content, "The rain kept falling.");
    assert_eq!(draft.word_count, 4);
}
