//! Main window: title bar, conversation, input line
use crate::config::Config;
use crate::context::{Speaker, Turn};
use crate::core::ChatAgent;
use eframe::egui;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::chat_bubble;
use super::images::Images;

pub const TITLE_TEXT: &str = "VERTEX-AI-CHAT";
const TITLE_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xd5, 0xf0, 0xe8);
const CHAT_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xfc, 0xff, 0xff);
const SEND_BUTTON: egui::Color32 = egui::Color32::from_rgb(0x3d, 0x3c, 0x3c);
const LOGO_SIZE: f32 = 100.0;
const INPUT_FONT_SIZE: f32 = 20.0;

pub struct VertexChatApp {
    pub config: Config,
    pub agent: Arc<Mutex<ChatAgent>>,
    pub messages: Vec<Turn>,
    pub input_text: String,
    pub is_thinking: bool,
    pub response_receiver: std_mpsc::Receiver<Vec<Turn>>,
    pub response_sender: std_mpsc::Sender<Vec<Turn>>,
    pub images: Option<Images>,
    pub style_initialized: bool,
}

impl VertexChatApp {
    pub fn new(config: Config, agent: ChatAgent) -> Self {
        let (sender, receiver) = std_mpsc::channel();
        Self {
            config,
            agent: Arc::new(Mutex::new(agent)),
            messages: Vec::new(),
            input_text: String::new(),
            is_thinking: false,
            response_receiver: receiver,
            response_sender: sender,
            images: None,
            style_initialized: false,
        }
    }

    fn init_style(&mut self, ctx: &egui::Context) {
        if self.style_initialized {
            return;
        }
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = egui::Color32::WHITE;
        ctx.set_visuals(visuals);
        self.images = Some(Images::load(ctx, &self.config.images_dir));
        self.style_initialized = true;
    }

    /// Sends the current input to the agent on a tokio worker. The user turn
    /// is shown right away; once answered, the agent's history comes back
    /// through `response_receiver` and replaces `messages`.
    pub fn send_message(&mut self, ctx: &egui::Context) {
        if self.input_text.trim().is_empty() || self.is_thinking {
            return;
        }

        let user_input = std::mem::take(&mut self.input_text);
        self.messages.push(Turn {
            speaker: Speaker::User,
            text: user_input.clone(),
        });
        self.is_thinking = true;

        let agent = Arc::clone(&self.agent);
        let sender = self.response_sender.clone();
        let ctx_clone = ctx.clone();

        tokio::spawn(async move {
            let mut agent = agent.lock().await;
            agent.respond(&user_input).await;
            let history = agent.history().to_vec();
            drop(agent);

            if let Err(e) = sender.send(history) {
                log::error!("Failed to deliver reply to the UI: {}", e);
            }

            ctx_clone.request_repaint();
        });
    }

    /// Drains finished exchanges from background tasks.
    pub fn process_replies(&mut self) {
        while let Ok(history) = self.response_receiver.try_recv() {
            self.messages = history;
            self.is_thinking = false;
        }
    }

    /// Clears the window and the agent's context together. Nothing holds the
    /// agent while no reply is pending, so the lock is taken in place.
    pub fn clear_conversation(&mut self) {
        if self.is_thinking {
            return;
        }
        match self.agent.try_lock() {
            Ok(mut agent) => {
                agent.clear_history();
                self.messages.clear();
            }
            Err(_) => log::warn!("⚠️ Agent busy, conversation not cleared"),
        }
    }

    fn draw_title(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let logo = self.images.as_ref().and_then(|i| i.logo.as_ref());
            if let Some(texture) = logo {
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                        .fit_to_exact_size(egui::vec2(LOGO_SIZE, LOGO_SIZE)),
                );
            }

            egui::Frame::new()
                .fill(TITLE_BACKGROUND)
                .corner_radius(egui::CornerRadius::same(15))
                .inner_margin(egui::Margin::same(15))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(TITLE_TEXT)
                                .size(40.0)
                                .strong()
                                .color(egui::Color32::BLACK),
                        );
                    });
                });
        });
    }

    fn draw_messages(&self, ui: &mut egui::Ui) {
        let (user_avatar, bot_avatar) = match &self.images {
            Some(images) => (images.user_avatar.as_ref(), images.bot_avatar.as_ref()),
            None => (None, None),
        };

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for turn in &self.messages {
                    let avatar = match turn.speaker {
                        Speaker::User => user_avatar,
                        Speaker::Assistant => bot_avatar,
                    };
                    chat_bubble::draw_bubble(ui, turn.speaker, &turn.text, avatar);
                }

                if self.is_thinking {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(
                            egui::RichText::new(format!("{} is thinking...", self.config.assistant_name))
                                .italics()
                                .color(egui::Color32::GRAY),
                        );
                    });
                }
            });
    }

    fn draw_input(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let total = ui.available_width();
            let field_width = total * 0.9 - ui.spacing().item_spacing.x;

            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input_text)
                    .hint_text("Ask anything...")
                    .font(egui::FontId::proportional(INPUT_FONT_SIZE))
                    .margin(egui::Margin::same(10))
                    .desired_width(field_width),
            );

            let enter_pressed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let send = egui::Button::new(
                egui::RichText::new("Send")
                    .size(INPUT_FONT_SIZE)
                    .color(egui::Color32::WHITE),
            )
            .fill(SEND_BUTTON)
            .corner_radius(egui::CornerRadius::same(10))
            .min_size(egui::vec2(ui.available_width(), response.rect.height()));
            let clicked = ui.add_enabled(!self.is_thinking, send).clicked();

            if enter_pressed || clicked {
                self.send_message(ctx);
                response.request_focus();
            }
        });
    }
}

impl eframe::App for VertexChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.init_style(ctx);
        self.process_replies();

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::L)) {
            self.clear_conversation();
        }

        egui::TopBottomPanel::top("title_area")
            .frame(egui::Frame::new().inner_margin(egui::Margin::same(10)).fill(egui::Color32::WHITE))
            .show(ctx, |ui| self.draw_title(ui));

        egui::TopBottomPanel::bottom("input_area")
            .frame(egui::Frame::new().inner_margin(egui::Margin::same(10)).fill(egui::Color32::WHITE))
            .show(ctx, |ui| self.draw_input(ui, ctx));

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(CHAT_BACKGROUND)
                    .corner_radius(egui::CornerRadius::same(15))
                    .inner_margin(egui::Margin::same(10)),
            )
            .show(ctx, |ui| self.draw_messages(ui));
    }
}
