use openrouter_node::{
    ai::MockChatClient,
    image::{encode_data_uri, ImageInput, PixelTensor},
    node::NO_RESPONSE,
    NodeInputs, OpenRouterNode,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

fn inputs_for(server: &MockServer, prompt: &str) -> NodeInputs {
    NodeInputs {
        base_url: format!("{}{}", server.uri(), COMPLETIONS_PATH),
        model: "test/model".to_string(),
        api_key: "sk-test".to_string(),
        prompt: prompt.to_string(),
        ..NodeInputs::default()
    }
}

async fn mount_json(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_plain_reply_is_returned_unchanged() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        200,
        serde_json::json!({"choices": [{"message": {"content": "hi"}}]}),
    )
    .await;

    let output = OpenRouterNode::new()
        .get_completion(&inputs_for(&server, "hello"))
        .await;
    assert_eq!(output, "hi");
}

#[tokio::test]
async fn test_http_500_is_request_error() {
    let server = MockServer::start().await;
    mount_json(&server, 500, serde_json::json!({"error": "boom"})).await;

    let output = OpenRouterNode::new()
        .get_completion(&inputs_for(&server, "hello"))
        .await;
    assert!(output.starts_with("Request Error:"), "got {}", output);
}

#[tokio::test]
async fn test_empty_choices_is_no_response() {
    let server = MockServer::start().await;
    mount_json(&server, 200, serde_json::json!({"choices": []})).await;

    let output = OpenRouterNode::new()
        .get_completion(&inputs_for(&server, "hello"))
        .await;
    assert_eq!(output, "No response from the model.");
}

#[tokio::test]
async fn test_missing_choices_is_no_response() {
    let server = MockServer::start().await;
    mount_json(&server, 200, serde_json::json!({"id": "gen-1"})).await;

    let output = OpenRouterNode::new()
        .get_completion(&inputs_for(&server, "hello"))
        .await;
    assert_eq!(output, NO_RESPONSE);
}

#[tokio::test]
async fn test_malformed_body_is_generic_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let output = OpenRouterNode::new()
        .get_completion(&inputs_for(&server, "hello"))
        .await;
    assert!(output.starts_with("Error:"), "got {}", output);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_request_error() {
    let inputs = NodeInputs {
        base_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
        prompt: "hello".to_string(),
        ..NodeInputs::default()
    };

    let output = OpenRouterNode::new().get_completion(&inputs).await;
    assert!(output.starts_with("Request Error:"), "got {}", output);
}

#[tokio::test]
async fn test_think_tags_stripped_from_reply() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        200,
        serde_json::json!({"choices": [{"message": {
            "content": "<think>a</think>text<think>b\nc</think>"
        }}]}),
    )
    .await;

    let node = OpenRouterNode::new();
    let trimmed = node.get_completion(&inputs_for(&server, "q")).await;
    assert_eq!(trimmed, "text");

    let raw = node
        .get_completion(&NodeInputs {
            trim_think: false,
            ..inputs_for(&server, "q")
        })
        .await;
    assert_eq!(raw, "<think>a</think>text<think>b\nc</think>");
}

#[tokio::test]
async fn test_request_carries_system_prompt_and_image() {
    let server = MockServer::start().await;
    let tensor = PixelTensor::new(vec![1, 2, 2, 4], vec![0.5; 16]).unwrap();
    let expected_uri = encode_data_uri(&ImageInput::Tensor(tensor.clone())).unwrap();

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "test/model",
            "temperature": 0.7,
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": [
                    {"type": "text", "text": "What colour?"},
                    {"type": "image_url", "image_url": {"url": expected_uri}}
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "grey"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let inputs = NodeInputs {
        system_prompt: "\n Be brief. \n".to_string(),
        image_input: Some(ImageInput::Tensor(tensor)),
        ..inputs_for(&server, "What colour?")
    };

    let output = OpenRouterNode::new().get_completion(&inputs).await;
    assert_eq!(output, "grey");
}

#[tokio::test]
async fn test_mock_transport_sees_no_system_message_for_blank_prompt() {
    let service = MockChatClient::new().with_content_response("ok".to_string());
    let inputs = NodeInputs {
        system_prompt: "   ".to_string(),
        prompt: "hello".to_string(),
        ..NodeInputs::default()
    };

    let output = OpenRouterNode::new()
        .get_completion_with(&service, &inputs)
        .await;
    assert_eq!(output, "ok");

    let messages = service.get_requests()[0]["messages"].clone();
    assert_eq!(messages.as_array().unwrap().len(), 1);
    assert_eq!(messages[0]["role"], "user");
}

#[test]
fn test_blocking_entry_point() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-blocking")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"<think>x</think>done"}}]}"#)
        .create();

    let inputs = NodeInputs {
        base_url: format!("{}/v1/chat/completions", server.url()),
        api_key: "sk-blocking".to_string(),
        prompt: "go".to_string(),
        ..NodeInputs::default()
    };

    let output = OpenRouterNode::new().get_completion_blocking(&inputs);
    assert_eq!(output, "done");
    mock.assert();
}

#[test]
fn test_blocking_entry_point_reports_status_errors() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"No auth credentials found"}}"#)
        .create();

    let inputs = NodeInputs {
        base_url: format!("{}/v1/chat/completions", server.url()),
        ..NodeInputs::default()
    };

    let output = OpenRouterNode::new().get_completion_blocking(&inputs);
    assert!(output.starts_with("Request Error:"), "got {}", output);
    assert!(output.contains("401"));
}
