//! Response routing: canned answers from the knowledge base first, the
//! generative backend only when no rule matches.
//!
//! Rule groups are tried in a fixed order and the first hit wins:
//! service keywords, then FAQ questions, then attribute categories.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::matcher::{MatchMode, NormalizedQuery};
use crate::ai::Generator;
use crate::error::GenerationError;
use crate::knowledge::{KnowledgeBase, ServiceSlot};

/// Shown to the user when the generative backend fails.
pub const UNAVAILABLE_REPLY: &str = "I'm sorry, that information is not available right now.";

const GREETING_REPLY: &str =
    "Hello, I am an AI assistant from Vertex AI Solutions. How can I help you?";

/// Attribute categories, in matching order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Identity,
    Founder,
    Industry,
    Greeting,
    TargetIndustries,
    Achievements,
    Contact,
    Address,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Identity,
        Attribute::Founder,
        Attribute::Industry,
        Attribute::Greeting,
        Attribute::TargetIndustries,
        Attribute::Achievements,
        Attribute::Contact,
        Attribute::Address,
    ];

    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Attribute::Identity => &[
                "company name",
                "what's your company",
                "what's this company",
                "what is this company",
                "what is your company",
                "who are you",
                "what is your company called",
                "name of your company",
            ],
            Attribute::Founder => &["founder", "owner"],
            Attribute::Industry => &[
                "industry",
                "what industry",
                "operates in",
                "business sector",
                "do you do",
            ],
            Attribute::Greeting => &[
                "hi",
                "hello",
                "good morning",
                "good afternoon",
                "good night",
                "excuse me",
            ],
            Attribute::TargetIndustries => &["targeted industries", "related to"],
            Attribute::Achievements => &[
                "achievements",
                "accomplishments",
                "company milestones",
                "projects",
                "tasks",
                "success stories",
            ],
            Attribute::Contact => &[
                "contact",
                "how to reach",
                "contact information",
                "get in touch",
            ],
            Attribute::Address => &["address", "location", "head office", "place"],
        }
    }

    fn render(self, kb: &KnowledgeBase) -> String {
        match self {
            Attribute::Identity => format!("We are {}.", kb.company_name),
            // the company name here is fixed text, not kb.company_name
            Attribute::Founder => {
                format!("{} is the founder of Vertex AI Solution.", kb.founder)
            }
            Attribute::Industry => format!(
                "{} operates in the {} industry.",
                kb.company_name, kb.industry
            ),
            Attribute::Greeting => GREETING_REPLY.to_string(),
            Attribute::TargetIndustries => format!(
                "We are building solutions in {} industries.",
                kb.target_industries
            ),
            Attribute::Achievements => format!(
                "Some achievements include: {}.",
                kb.achievements.join(", ")
            ),
            Attribute::Contact => format!(
                "You can contact us at {} or {}.",
                kb.contact.email, kb.contact.phone
            ),
            Attribute::Address => {
                format!("Our head office is located at {}.", kb.contact.location)
            }
        }
    }
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Service(ServiceSlot),
    Faq(usize),
    Attribute(Attribute),
    Generated,
    Unavailable,
    /// Blank input; nothing was routed.
    EmptyInput,
}

impl ReplySource {
    pub fn is_canned(self) -> bool {
        matches!(
            self,
            ReplySource::Service(_) | ReplySource::Faq(_) | ReplySource::Attribute(_)
        )
    }
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplySource::Service(slot) => write!(f, "service:{:?}", slot),
            ReplySource::Faq(index) => write!(f, "faq:{}", index),
            ReplySource::Attribute(attr) => write!(f, "attribute:{:?}", attr),
            ReplySource::Generated => f.write_str("generated"),
            ReplySource::Unavailable => f.write_str("unavailable"),
            ReplySource::EmptyInput => f.write_str("empty-input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Routes a query to a canned answer or the generative fallback.
///
/// Holds no per-turn state: the answer depends only on the query, the
/// transcript passed in, the knowledge base, and the generator.
#[derive(Debug, Clone)]
pub struct Router {
    kb: Arc<KnowledgeBase>,
    mode: MatchMode,
    generation_timeout: Option<Duration>,
}

impl Router {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            mode: MatchMode::default(),
            generation_timeout: None,
        }
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn match_mode(&self) -> MatchMode {
        self.mode
    }

    /// Knowledge-base lookup only. `None` means the query needs the fallback.
    pub fn canned(&self, query: &str) -> Option<Reply> {
        let q = NormalizedQuery::new(query, self.mode);

        for slot in ServiceSlot::ALL {
            if q.matches(slot.keyword()) {
                return Some(Reply::new(
                    self.kb.service(slot).description.clone(),
                    ReplySource::Service(slot),
                ));
            }
        }

        for (index, entry) in self.kb.faq.iter().enumerate() {
            if q.matches(&entry.question) {
                return Some(Reply::new(entry.answer.clone(), ReplySource::Faq(index)));
            }
        }

        Attribute::ALL
            .into_iter()
            .find(|attr| q.matches_any(attr.phrases()))
            .map(|attr| Reply::new(attr.render(&self.kb), ReplySource::Attribute(attr)))
    }

    /// Resolves a query, surfacing generation failures to the caller.
    pub async fn try_resolve(
        &self,
        query: &str,
        context: &str,
        generator: &dyn Generator,
    ) -> Result<Reply, GenerationError> {
        if let Some(reply) = self.canned(query) {
            log::debug!("🎯 Canned answer ({})", reply.source);
            return Ok(reply);
        }

        log::debug!("📡 No rule matched, asking {}", generator.name());
        let generated = match self.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, generator.generate(context, query))
                .await
                .map_err(|_| GenerationError::Timeout(limit))??,
            None => generator.generate(context, query).await?,
        };

        if generated.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(Reply::new(generated, ReplySource::Generated))
    }

    /// Resolves a query. Generation failures become an apology reply, so the
    /// returned text is never empty.
    pub async fn resolve(&self, query: &str, context: &str, generator: &dyn Generator) -> Reply {
        match self.try_resolve(query, context, generator).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("⚠️ {} failed: {}", generator.name(), e);
                Reply::new(UNAVAILABLE_REPLY, ReplySource::Unavailable)
            }
        }
    }
}
