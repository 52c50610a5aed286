use crate::knowledge::KnowledgeBase;

/// Prompt sent to the model on fallback. The company preamble is fixed at
/// startup; only the history and the question change per turn.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    preamble: String,
}

impl PromptTemplate {
    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        let services = join_with_and(kb.services.iter().map(|s| s.name.as_str()));
        let preamble = format!(
            "You are a knowledgeable assistant from {company} trained to provide accurate answers \
             based on a custom knowledge base.\n\n\
             The knowledge base contains information about the following topics:\n\
             1. Services offered by the company, including {services}.\n\
             2. Frequently asked questions (FAQ) about the company's products and services.\n\
             3. Company-specific details like name, industry, achievements, and contact information.",
            company = kb.company_name,
        );
        Self { preamble }
    }

    pub fn render(&self, context: &str, question: &str) -> String {
        format!(
            "{}\n\n\
             Below is the conversation history: {}\n\n\
             The user's question is: {}\n\n\
             Please provide an accurate answer based on the custom knowledge base without \
             mentioning that you are referring to it, ensuring it is relevant and helpful. \
             If you cannot find an answer, acknowledge that the information is not available.\n\n\
             Answer:\n",
            self.preamble, context, question
        )
    }
}

fn join_with_and<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<&str> = items.collect();
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}
