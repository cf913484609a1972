/// Builds the generation prompt from the retrieved context and the user's question.
///
/// An empty `context` still yields a well-formed prompt with an empty context block.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Context:\n{context}\n\nQuestion: {question}\n\nAnswer clearly and concisely, using only the information in the context."
    )
}
