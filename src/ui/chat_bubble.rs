//! Chat bubble rendering
use eframe::egui;

use crate::context::Speaker;

pub const AVATAR_SIZE: f32 = 60.0;
pub const BUBBLE_FONT_SIZE: f32 = 18.0;
pub const BUBBLE_MAX_WIDTH: f32 = 1800.0;

pub const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(0xc6, 0xf7, 0xdc);
pub const BOT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(0xfa, 0xcd, 0xca);
pub const BUBBLE_TEXT: egui::Color32 = egui::Color32::from_rgb(0x33, 0x33, 0x33);

/// Draws one message row. User rows put the avatar on the left, assistant
/// rows mirror it to the right.
pub fn draw_bubble(
    ui: &mut egui::Ui,
    speaker: Speaker,
    text: &str,
    avatar: Option<&egui::TextureHandle>,
) {
    let (layout, fill) = match speaker {
        Speaker::User => (egui::Layout::left_to_right(egui::Align::TOP), USER_BUBBLE),
        Speaker::Assistant => (egui::Layout::right_to_left(egui::Align::TOP), BOT_BUBBLE),
    };

    ui.with_layout(layout, |ui| {
        draw_avatar(ui, speaker, avatar);

        let max_width = (ui.available_width() - AVATAR_SIZE).clamp(80.0, BUBBLE_MAX_WIDTH);
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(15))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(text)
                            .size(BUBBLE_FONT_SIZE)
                            .color(BUBBLE_TEXT),
                    )
                    .wrap(),
                );
            });
    });
    ui.add_space(10.0);
}

fn draw_avatar(ui: &mut egui::Ui, speaker: Speaker, avatar: Option<&egui::TextureHandle>) {
    let size = egui::vec2(AVATAR_SIZE, AVATAR_SIZE);
    match avatar {
        Some(texture) => {
            ui.add(
                egui::Image::from_texture(egui::load::SizedTexture::from_handle(texture))
                    .fit_to_exact_size(size),
            );
        }
        None => {
            let glyph = match speaker {
                Speaker::User => "🙂",
                Speaker::Assistant => "🤖",
            };
            ui.add_sized(size, egui::Label::new(egui::RichText::new(glyph).size(36.0)));
        }
    }
}
