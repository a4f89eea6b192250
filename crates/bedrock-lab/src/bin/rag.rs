//! Answers the test queries from the sample corpus, with and without
//! retrieved context.

use bedrock_lab::corpus::{SAMPLE_DOCUMENTS, TEST_QUERIES};
use bedrock_lab::{Error, Lab, print_rag_comparison};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let lab = Lab::load()?;
    let mut pipeline = lab.rag_pipeline();
    print_rag_comparison(
        &mut pipeline,
        &SAMPLE_DOCUMENTS,
        &TEST_QUERIES,
        &mut std::io::stdout(),
    )
    .await
}
