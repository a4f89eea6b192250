use std::io::Write;

use bedrock_lab_core::{ModelClient, RagPipeline, summarize};
use bedrock_lab_model::SamplingConfig;

use crate::Error;

const RULE_WIDTH: usize = 50;

/// Seeds `pipeline` with `documents`, then prints the answer to every
/// query with and without retrieved context.
///
/// Each line is written as soon as it is known. Stops at the first failure,
/// leaving what was printed so far.
pub async fn print_rag_comparison<W: Write>(
    pipeline: &mut RagPipeline,
    documents: &[&str],
    queries: &[&str],
    out: &mut W,
) -> Result<(), Error> {
    pipeline.seed(documents.iter().copied()).await?;

    for query in queries {
        writeln!(out, "\nQuery: {query}")?;
        let with_context = pipeline.answer(query).await?;
        writeln!(out, "\nRAG Response: {}", with_context.text)?;
        let without_context = pipeline.answer_without_context(query).await?;
        writeln!(out, "\nNon-RAG Response: {}", without_context.text)?;
        writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    }
    Ok(())
}

/// Prints a one-sentence summary of `text`.
pub async fn print_summary<W: Write>(
    model_client: &ModelClient,
    text: &str,
    sampling: SamplingConfig,
    out: &mut W,
) -> Result<(), Error> {
    let summary = summarize(model_client, text, sampling).await?;
    writeln!(out, "{summary}")?;
    Ok(())
}
