//! The fixed inputs of the `rag` and `summarize` demos.

/// Documents seeded into the retrieval index.
pub const SAMPLE_DOCUMENTS: [&str; 5] = [
    "Amazon Bedrock is a fully managed foundation model service.",
    "RAG systems combine retrieval and generation for improved responses.",
    "Embeddings are vector representations of text in high-dimensional space.",
    "Chroma is an efficient vector store for building AI applications.",
    "Foundation models can be fine-tuned for specific tasks and domains.",
];

/// Questions answered with and without retrieved context.
pub const TEST_QUERIES: [&str; 3] = [
    "What are embeddings used for in AI?",
    "Explain the benefits of using RAG in AI applications.",
    "How does Amazon Bedrock support foundation models?",
];

/// The paragraph summarized by the `summarize` demo.
pub const FRANCE_TEXT: &str = "
France is a country located in Western Europe. It is known for its rich history, culture, and cuisine. The capital city of France is Paris, which is famous for landmarks such as the Eiffel Tower, Louvre Museum, and Notre-Dame Cathedral. France is also renowned for its contributions to art, fashion, and philosophy. The country has a diverse landscape that includes beautiful coastlines, picturesque countryside, and majestic mountains like the Alps and Pyrenees. French is the official language, and the country has a population of approximately 67 million people. France is a member of the European Union and plays a significant role in global politics and economics.
";
