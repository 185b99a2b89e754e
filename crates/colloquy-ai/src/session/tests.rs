use std::time::Duration;

use colloquy_common::{BlockThreshold, GenerationConfig, Role, SafetyPolicy, Turn};
use futures_util::FutureExt;

use crate::mock::{MockProvider, MockReply};
use crate::{ChatError, FinishReason, StreamChunk, TokenUsage};

use super::{ChatSession, Reply};

fn session(seed: Vec<Turn>) -> ChatSession {
    ChatSession::new(
        "gemini-1.5-pro-latest",
        GenerationConfig::new()
            .with_temperature(1.0)
            .with_top_p(0.95)
            .with_top_k(64)
            .with_max_output_tokens(8192)
            .with_response_mime_type("text/plain"),
        SafetyPolicy::uniform(BlockThreshold::BlockMediumAndAbove),
        seed,
    )
}

fn sql_seed() -> Vec<Turn> {
    vec![
        Turn::user("You are an SQL expert."),
        Turn::model("Understood. Send me a question."),
    ]
}

// ---- history growth ----

#[tokio::test]
async fn echo_scenario() {
    let provider = MockProvider::new();
    let mut chat = session(Vec::new());

    let reply = chat.send(&provider, "hello").await.unwrap();

    assert_eq!(reply, Reply::Completed("echo:hello".into()));
    assert_eq!(
        chat.history(),
        &[Turn::user("hello"), Turn::model("echo:hello")]
    );
}

#[tokio::test]
async fn history_grows_by_two_per_send_in_order() {
    let provider = MockProvider::new();
    let mut chat = session(sql_seed());

    for i in 0..5 {
        let before = chat.history().len();
        let message = format!("question {i}");
        chat.send(&provider, message.clone()).await.unwrap();

        let history = chat.history();
        assert_eq!(history.len(), before + 2);
        assert_eq!(history[before], Turn::user(message.clone()));
        assert_eq!(history[before + 1].role(), Role::Model);
        assert_eq!(history[before + 1].text(), format!("echo:{message}"));
    }
    assert_eq!(chat.history()[..2], sql_seed()[..]);
}

#[tokio::test]
async fn provider_sees_seed_and_new_user_turn() {
    let provider = MockProvider::new();
    let mut chat = session(sql_seed());
    chat.send(&provider, "SELECT?").await.unwrap();

    let turns = &provider.requests()[0].turns;
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[2], Turn::user("SELECT?"));
}

// ---- rollback ----

#[tokio::test]
async fn provider_errors_roll_back() {
    let errors = [
        ChatError::Auth("bad key".into()),
        ChatError::RateLimited("quota".into()),
        ChatError::Network("reset".into()),
        ChatError::Api {
            status: 500,
            message: "boom".into(),
        },
    ];
    let provider = MockProvider::with_replies(errors.iter().cloned().map(MockReply::Error));
    let mut chat = session(sql_seed());

    for expected in errors {
        let err = chat.send(&provider, "q").await.unwrap_err();
        assert_eq!(err, expected);
        assert_eq!(chat.history(), sql_seed().as_slice());
    }
    assert_eq!(provider.call_count(), 4);
    assert_eq!(chat.usage().call_count(), 0);
}

#[tokio::test]
async fn timeout_rolls_back() {
    let provider = MockProvider::with_replies([MockReply::Stall]);
    let mut chat = session(sql_seed()).with_timeout(Duration::from_millis(50));

    let err = chat.send(&provider, "slow").await.unwrap_err();

    assert_eq!(err, ChatError::Timeout(Duration::from_millis(50)));
    assert_eq!(chat.timeout(), Some(Duration::from_millis(50)));
    assert_eq!(chat.history().len(), 2);
}

#[tokio::test]
async fn streaming_timeout_rolls_back() {
    let provider = MockProvider::with_replies([MockReply::Stall]);
    let mut chat = session(Vec::new()).with_timeout(Duration::from_millis(50));

    let err = chat
        .send_streaming(&provider, "slow", |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Timeout(_)));
    assert!(chat.history().is_empty());
}

#[test]
fn dropped_future_rolls_back() {
    let provider = MockProvider::with_replies([MockReply::Stall]);
    let mut chat = session(sql_seed());

    // One poll appends the user turn and parks on the provider.
    assert!(chat.send(&provider, "abandoned").now_or_never().is_none());

    assert_eq!(provider.call_count(), 1);
    assert_eq!(chat.history(), sql_seed().as_slice());
}

#[tokio::test]
async fn session_is_usable_after_failure() {
    let provider = MockProvider::with_replies([MockReply::Error(ChatError::Network(
        "down".into(),
    ))]);
    let mut chat = session(Vec::new());

    assert!(chat.send(&provider, "first").await.is_err());
    chat.send(&provider, "second").await.unwrap();

    assert_eq!(
        chat.history(),
        &[Turn::user("second"), Turn::model("echo:second")]
    );
}

#[tokio::test]
async fn empty_message_is_rejected_without_calling_provider() {
    let provider = MockProvider::new();
    let mut chat = session(Vec::new());

    assert_eq!(chat.send(&provider, "").await, Err(ChatError::EmptyMessage));
    assert_eq!(
        chat.send_streaming(&provider, "  \n", |_| {}).await,
        Err(ChatError::EmptyMessage)
    );
    assert_eq!(provider.call_count(), 0);
    assert!(chat.history().is_empty());
}

// ---- content-safety blocks ----

#[tokio::test]
async fn block_scenario_records_refusal() {
    let provider = MockProvider::with_replies([MockReply::Error(ChatError::Blocked(
        "SAFETY".into(),
    ))]);
    let mut chat = session(Vec::new());

    let reply = chat.send(&provider, "X").await.unwrap();

    assert_eq!(
        reply,
        Reply::Blocked {
            reason: "SAFETY".into()
        }
    );
    let history = chat.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], Turn::user("X"));
    assert_eq!(history[1], Turn::refusal("SAFETY"));
    assert_eq!(history[1].text(), "[response blocked: SAFETY]");
    assert_eq!(chat.usage().blocked_count(), 1);
}

#[tokio::test]
async fn block_mid_stream_records_refusal() {
    let provider = MockProvider::with_replies([MockReply::Stream(vec![
        Ok(StreamChunk::text("partial ")),
        Err(ChatError::Blocked("PROHIBITED_CONTENT".into())),
    ])]);
    let mut chat = session(Vec::new());
    let mut seen = Vec::new();

    let reply = chat
        .send_streaming(&provider, "X", |chunk| seen.push(chunk.to_string()))
        .await
        .unwrap();

    assert!(reply.is_blocked());
    assert_eq!(seen, vec!["partial "]);
    assert_eq!(chat.history()[1].blocked_reason(), Some("PROHIBITED_CONTENT"));
}

// ---- streaming ----

#[tokio::test]
async fn stream_scenario_concatenates_chunks() {
    let provider = MockProvider::with_replies([MockReply::Stream(vec![
        Ok(StreamChunk::text("Hel")),
        Ok(StreamChunk::text("lo, ")),
        Ok(StreamChunk::last("world")),
    ])]);
    let mut chat = session(Vec::new());
    let mut seen = Vec::new();

    let reply = chat
        .send_streaming(&provider, "greet", |chunk| seen.push(chunk.to_string()))
        .await
        .unwrap();

    assert_eq!(reply, Reply::Completed("Hello, world".into()));
    assert_eq!(seen, vec!["Hel", "lo, ", "world"]);
    assert_eq!(
        chat.history(),
        &[Turn::user("greet"), Turn::model("Hello, world")]
    );
}

#[tokio::test]
async fn streaming_matches_synchronous_text() {
    let text = "SELECT name FROM users WHERE id = 1;";
    let provider = MockProvider::with_replies([
        MockReply::Text(text.into()),
        MockReply::Text(text.into()),
    ])
    .with_chunk_size(4);

    let mut sync_chat = session(sql_seed());
    let mut stream_chat = session(sql_seed());

    let sync_reply = sync_chat.send(&provider, "q").await.unwrap();
    let stream_reply = stream_chat
        .send_streaming(&provider, "q", |_| {})
        .await
        .unwrap();

    assert_eq!(sync_reply, stream_reply);
    assert_eq!(sync_chat.history(), stream_chat.history());
}

#[tokio::test]
async fn stream_without_terminal_chunk_is_incomplete() {
    let provider = MockProvider::with_replies([MockReply::Stream(vec![
        Ok(StreamChunk::text("Hel")),
        Ok(StreamChunk::text("lo")),
    ])]);
    let mut chat = session(sql_seed());

    let err = chat
        .send_streaming(&provider, "q", |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::IncompleteStream(_)));
    assert_eq!(chat.history().len(), 2);
}

#[tokio::test]
async fn empty_stream_is_incomplete() {
    let provider = MockProvider::with_replies([MockReply::Stream(Vec::new())]);
    let mut chat = session(Vec::new());

    let err = chat
        .send_streaming(&provider, "q", |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::IncompleteStream(_)));
    assert!(chat.history().is_empty());
}

#[tokio::test]
async fn stream_error_rolls_back() {
    let provider = MockProvider::with_replies([MockReply::Stream(vec![
        Ok(StreamChunk::text("Hel")),
        Err(ChatError::Network("connection reset".into())),
    ])]);
    let mut chat = session(Vec::new());

    let err = chat
        .send_streaming(&provider, "q", |_| {})
        .await
        .unwrap_err();

    assert_eq!(err, ChatError::Network("connection reset".into()));
    assert!(chat.history().is_empty());
}

#[tokio::test]
async fn stream_keeps_last_usage_and_finish_reason() {
    let last = StreamChunk {
        text: "!".into(),
        finish_reason: Some(FinishReason::MaxTokens),
        usage: Some(TokenUsage {
            input_tokens: 7,
            output_tokens: 2,
        }),
    };
    let provider = MockProvider::with_replies([MockReply::Stream(vec![
        Ok(StreamChunk::text("hi")),
        Ok(last),
    ])]);
    let mut chat = session(Vec::new());

    chat.send_streaming(&provider, "q", |_| {}).await.unwrap();

    assert_eq!(chat.usage().total_tokens(), 9);
    assert_eq!(chat.history()[1].text(), "hi!");
}

// ---- fixed configuration ----

#[tokio::test]
async fn configuration_is_identical_across_sends() {
    let provider = MockProvider::new();
    let mut chat = session(sql_seed());

    for i in 0..10 {
        if i % 2 == 0 {
            chat.send(&provider, format!("q{i}")).await.unwrap();
        } else {
            chat.send_streaming(&provider, format!("q{i}"), |_| {})
                .await
                .unwrap();
        }
    }

    let requests = provider.requests();
    assert_eq!(requests.len(), 10);
    let first = &requests[0];
    for request in &requests[1..] {
        assert_eq!(request.model, first.model);
        assert_eq!(request.generation, first.generation);
        assert_eq!(request.safety, first.safety);
    }
    assert_eq!(chat.history().len(), 2 + 20);

    // The session still reports what it was constructed with.
    let original = session(Vec::new());
    assert_eq!(chat.model(), original.model());
    assert_eq!(chat.generation_config(), original.generation_config());
    assert_eq!(chat.safety_policy(), original.safety_policy());
    assert_eq!(
        first.generation,
        serde_json::to_string(chat.generation_config()).unwrap()
    );
    assert_eq!(
        first.safety,
        serde_json::to_string(chat.safety_policy()).unwrap()
    );
}

#[tokio::test]
async fn usage_accumulates_over_successful_calls() {
    let provider = MockProvider::new();
    let mut chat = session(Vec::new());

    chat.send(&provider, "one two").await.unwrap();
    chat.send(&provider, "three").await.unwrap();

    assert_eq!(chat.usage().call_count(), 2);
    assert!(chat.usage().total_tokens() > 0);
}
