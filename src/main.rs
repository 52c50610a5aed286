mod ai;
mod config;
mod context;
mod core;
mod error;
mod knowledge;
mod logger;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::NativeOptions;

use crate::ai::{Generator, OllamaClient, OpenAIClient, PromptTemplate};
use crate::config::{Config, LlmBackend};
use crate::core::{ChatAgent, Router};
use crate::knowledge::KnowledgeBase;
use crate::ui::VertexChatApp;

fn main() -> Result<()> {
    logger::init();
    log::info!("🚀 Vertex chat starting");

    // eframe owns the main thread; generation runs on this runtime
    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let _guard = rt.enter();

    let config = Config::default();
    log::info!("📁 Configuration loaded (backend={:?})", config.backend);

    let knowledge = load_knowledge(&config)?;
    let generator = build_generator(&config, &knowledge)?;
    let router = Router::new(Arc::clone(&knowledge))
        .with_match_mode(config.match_mode)
        .with_generation_timeout(config.generation_timeout);
    let agent = ChatAgent::new(router, generator, config.history_turns);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(Box::new(VertexChatApp::new(config, agent)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))?;

    log::info!("👋 Vertex chat stopped");
    Ok(())
}

fn load_knowledge(config: &Config) -> Result<Arc<KnowledgeBase>> {
    let path = KnowledgeBase::locate(config.knowledge_path.as_deref())?;
    let kb = KnowledgeBase::load(&path)
        .with_context(|| format!("cannot start without knowledge base {}", path.display()))?;
    Ok(Arc::new(kb))
}

fn build_generator(config: &Config, kb: &KnowledgeBase) -> Result<Arc<dyn Generator>> {
    let template = PromptTemplate::from_knowledge(kb);

    let generator: Arc<dyn Generator> = match (config.backend, &config.openai_api_key) {
        (LlmBackend::OpenAI, Some(api_key)) => {
            let client = OpenAIClient::new(
                template,
                api_key.clone(),
                config.openai_base_url.clone(),
                config.openai_model.clone(),
                config.temperature,
                Some(config.max_tokens),
                config.generation_timeout,
            )?;
            log::info!("📡 Using OpenAI-compatible backend (model={})", client.model());
            Arc::new(client)
        }
        _ => {
            let client = OllamaClient::new(
                template,
                config.ollama_base_url.clone(),
                config.ollama_model.clone(),
                config.temperature,
                config.generation_timeout,
            )?;
            log::info!("📡 Using Ollama backend (model={})", client.model());
            Arc::new(client)
        }
    };

    Ok(generator)
}
