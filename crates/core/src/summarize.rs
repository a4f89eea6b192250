use bedrock_lab_model::{ModelRequest, SamplingConfig};

use crate::model_client::{ClientError, ModelClient};
use crate::prompt;

/// Asks the model for a one-sentence summary of `text`.
pub async fn summarize(
    model_client: &ModelClient,
    text: &str,
    sampling: SamplingConfig,
) -> Result<String, ClientError> {
    let req = ModelRequest::with_prompt(prompt::summarization(text), sampling);
    let resp = model_client.send_request(req).await?;
    debug!("summary has {} chars", resp.text.chars().count());
    Ok(resp.text)
}

#[cfg(test)]
mod tests {
    use bedrock_lab_model::{ErrorKind, ModelMessage};
    use bedrock_lab_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    const SAMPLING: SamplingConfig = SamplingConfig {
        max_tokens: 1024,
        temperature: 0.7,
        top_p: 0.9,
    };

    #[tokio::test]
    async fn test_prompt_contains_text() {
        let mut provider = TestModelProvider::default();
        provider.add_response(PresetResponse::with_text("France is a country."));
        let client = ModelClient::new(provider.clone());

        let text = "\nFrance is a country located in Western Europe.\n";
        let summary = summarize(&client, text, SAMPLING).await.unwrap();
        assert_eq!(summary, "France is a country.");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].sampling, SAMPLING);
        let [ModelMessage::User(prompt)] = &requests[0].messages[..] else {
            panic!("expected a single user message");
        };
        assert!(prompt.contains(text));
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let mut provider = TestModelProvider::default();
        provider.add_response(PresetResponse::always_failing());
        let client = ModelClient::new(provider);

        let err = summarize(&client, "anything", SAMPLING).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
