//! Logo and avatar textures
use eframe::egui;
use std::path::{Path, PathBuf};

pub const LOGO_FILE: &str = "ttest.png";
pub const USER_AVATAR_FILE: &str = "user1.png";
pub const BOT_AVATAR_FILE: &str = "bot5.png";

/// Textures used by the chat window. Any of them may be missing; the UI
/// draws a text placeholder instead.
pub struct Images {
    pub logo: Option<egui::TextureHandle>,
    pub user_avatar: Option<egui::TextureHandle>,
    pub bot_avatar: Option<egui::TextureHandle>,
}

impl Images {
    pub fn load(ctx: &egui::Context, images_dir: &Path) -> Self {
        Self {
            logo: load_texture(ctx, images_dir, LOGO_FILE),
            user_avatar: load_texture(ctx, images_dir, USER_AVATAR_FILE),
            bot_avatar: load_texture(ctx, images_dir, BOT_AVATAR_FILE),
        }
    }
}

fn candidate_paths(images_dir: &Path, file: &str) -> Vec<PathBuf> {
    vec![
        images_dir.join(file),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("images").join(file),
    ]
}

fn load_texture(ctx: &egui::Context, images_dir: &Path, file: &str) -> Option<egui::TextureHandle> {
    let path = candidate_paths(images_dir, file)
        .into_iter()
        .find(|p| p.exists());

    let Some(path) = path else {
        log::warn!("⚠️ Image {} not found in {}", file, images_dir.display());
        return None;
    };

    let image_data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("⚠️ Cannot read {}: {}", path.display(), e);
            return None;
        }
    };

    match image::load_from_memory(&image_data) {
        Ok(img) => {
            let size = [img.width() as usize, img.height() as usize];
            let pixels = img.to_rgba8().into_raw();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
            log::debug!("🖼️ Loaded {}", path.display());
            Some(ctx.load_texture(file, color_image, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            log::warn!("⚠️ Cannot decode {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_dir_is_tried_first() {
        let paths = candidate_paths(Path::new("/opt/vertex/img"), BOT_AVATAR_FILE);
        assert_eq!(paths[0], PathBuf::from("/opt/vertex/img/bot5.png"));
        assert!(paths[1].ends_with("images/bot5.png"));
    }

    #[test]
    fn test_missing_images_degrade_to_none() {
        let ctx = egui::Context::default();
        let dir = tempfile::tempdir().unwrap();
        let texture = load_texture(&ctx, dir.path(), "does-not-exist.png");
        assert!(texture.is_none());
    }

    #[test]
    fn test_decodes_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 20, 20, 255]));
        img.save(dir.path().join("tiny.png")).unwrap();

        let ctx = egui::Context::default();
        let texture = load_texture(&ctx, dir.path(), "tiny.png").unwrap();
        assert_eq!(texture.size(), [4, 3]);
    }
}
