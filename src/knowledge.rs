//! Static company knowledge: facts, services, FAQ.
//!
//! Loaded once at startup and shared read-only. A document that fails
//! validation never produces a partial `KnowledgeBase`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// File name searched for when no explicit path is configured.
pub const KNOWLEDGE_FILE: &str = "custom_knowledge.json";

/// Minimum number of services; the positional service rules read indices 0..=3.
pub const MIN_SERVICES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    #[serde(rename = "service_name", alias = "name")]
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeBase {
    #[serde(alias = "companyName")]
    pub company_name: String,
    pub industry: String,
    pub founder: String,
    #[serde(rename = "company_overview", alias = "overview")]
    pub overview: String,
    #[serde(alias = "targetIndustries")]
    pub target_industries: String,
    pub services: Vec<Service>,
    pub faq: Vec<FaqEntry>,
    pub achievements: Vec<String>,
    #[serde(rename = "contact_information", alias = "contact")]
    pub contact: Contact,
}

/// Services addressed by a fixed keyword rule. Each slot is bound to a
/// position in `KnowledgeBase::services`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceSlot {
    AiModels,
    Automation,
    CloudIntegration,
    PredictiveAnalytics,
}

impl ServiceSlot {
    /// Slots in the order their keywords are tried.
    pub const ALL: [ServiceSlot; 4] = [
        ServiceSlot::AiModels,
        ServiceSlot::Automation,
        ServiceSlot::CloudIntegration,
        ServiceSlot::PredictiveAnalytics,
    ];

    pub fn index(self) -> usize {
        match self {
            ServiceSlot::AiModels => 0,
            ServiceSlot::Automation => 1,
            ServiceSlot::CloudIntegration => 2,
            ServiceSlot::PredictiveAnalytics => 3,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ServiceSlot::AiModels => "ai models",
            ServiceSlot::Automation => "automation",
            ServiceSlot::CloudIntegration => "cloud integration",
            ServiceSlot::PredictiveAnalytics => "predictive analytics",
        }
    }
}

impl KnowledgeBase {
    /// Reads and validates the knowledge document at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json(&raw)?;
        log::info!(
            "📚 Knowledge loaded from {}: {} services, {} FAQ entries",
            path.display(),
            kb.services.len(),
            kb.faq.len()
        );
        Ok(kb)
    }

    /// Parses and validates a knowledge document.
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let kb: KnowledgeBase = serde_json::from_str(raw)?;
        kb.validate()?;
        Ok(kb)
    }

    /// Resolves the knowledge file location: the explicit path if given,
    /// otherwise the first existing well-known candidate.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, LoadError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        let mut candidates = vec![
            PathBuf::from(KNOWLEDGE_FILE),
            PathBuf::from("data").join(KNOWLEDGE_FILE),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("vertex-chat").join(KNOWLEDGE_FILE));
        }
        candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(KNOWLEDGE_FILE));

        match candidates.iter().find(|p| p.exists()) {
            Some(found) => Ok(found.clone()),
            None => Err(LoadError::NotFound {
                searched: candidates,
            }),
        }
    }

    pub fn service(&self, slot: ServiceSlot) -> &Service {
        // validate() guarantees MIN_SERVICES entries
        &self.services[slot.index()]
    }

    fn validate(&self) -> Result<(), LoadError> {
        require("company_name", &self.company_name)?;
        require("industry", &self.industry)?;
        require("founder", &self.founder)?;
        require("company_overview", &self.overview)?;
        require("target_industries", &self.target_industries)?;

        if self.services.len() < MIN_SERVICES {
            return Err(LoadError::TooFewServices {
                found: self.services.len(),
                required: MIN_SERVICES,
            });
        }
        for (i, service) in self.services.iter().enumerate() {
            require(&format!("services[{i}].service_name"), &service.name)?;
            require(&format!("services[{i}].description"), &service.description)?;
        }

        if self.faq.is_empty() {
            return Err(LoadError::EmptyField("faq".to_string()));
        }
        for (i, entry) in self.faq.iter().enumerate() {
            require(&format!("faq[{i}].question"), &entry.question)?;
            require(&format!("faq[{i}].answer"), &entry.answer)?;
        }

        if self.achievements.is_empty() {
            return Err(LoadError::EmptyField("achievements".to_string()));
        }
        for (i, achievement) in self.achievements.iter().enumerate() {
            require(&format!("achievements[{i}]"), achievement)?;
        }

        require("contact_information.email", &self.contact.email)?;
        require("contact_information.phone", &self.contact.phone)?;
        require("contact_information.location", &self.contact.location)?;
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), LoadError> {
    if value.trim().is_empty() {
        Err(LoadError::EmptyField(field.to_string()))
    } else {
        Ok(())
    }
}
