//! Prompt construction for answer generation

/// Builder for the generation prompt
#[derive(Debug, Default)]
pub struct PromptBuilder {
    context: String,
    question: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retrieved context block
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the question
    pub fn question(mut self, q: impl Into<String>) -> Self {
        self.question = q.into();
        self
    }

    /// Build the final prompt
    pub fn build(self) -> String {
        let mut prompt = String::new();

        prompt.push_str("CONTEXT:\n");
        prompt.push_str(&self.context);
        prompt.push_str("\n\n");

        prompt.push_str("USER QUESTION: ");
        prompt.push_str(&self.question);
        prompt.push_str("\n\n");

        prompt.push_str("GENERATED ANSWER:\n");
        prompt
    }
}
