//! Summarizes a paragraph about France in one sentence.

use bedrock_lab::corpus::FRANCE_TEXT;
use bedrock_lab::{Error, Lab, print_summary};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let lab = Lab::load()?;
    let model_client = lab.summarizer();
    print_summary(
        &model_client,
        FRANCE_TEXT,
        lab.config().sampling.summarize,
        &mut std::io::stdout(),
    )
    .await
}
