use std::io::Cursor;
use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};
use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::{BadgeOverlay, BadgeTemplateConfig};
use crate::error::{EmblemError, Result};
use crate::models::{ProviderResult, ProviderStatus};

/// Fallback background used when a project's configured background is
/// missing or undecodable.
pub const DEFAULT_BACKGROUND: &str = "default.png";

/// Composes a project's badge: the background with one status sub-image
/// painted per configured overlay, in configuration order. Later overlays
/// occlude earlier ones where they overlap, so reordering the overlay list
/// changes the output.
pub fn compose(
    badges_dir: &Path,
    template: &BadgeTemplateConfig,
    overlays: &[BadgeOverlay],
    results: &IndexMap<String, ProviderResult>,
) -> Result<RgbaImage> {
    let mut output = load_background(badges_dir, &template.background)?;

    for overlay in overlays {
        let key = overlay.provider.to_lowercase();
        let Some(result) = results.get(&key) else {
            warn!(
                "Overlay provider '{}' not available in listed providers",
                overlay.provider
            );
            continue;
        };

        debug!("Overlaying provider '{}' status: {}", key, result.status);
        let badge_file = match result.status {
            ProviderStatus::Passing => &template.badges.passing,
            ProviderStatus::Failing => &template.badges.failing,
            ProviderStatus::Unknown => &template.badges.unknown,
        };

        // One missing or broken sub-image never aborts the whole badge
        let badge_image = match image::open(badges_dir.join(badge_file)) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                warn!("Unable to load status badge '{badge_file}': {e}");
                continue;
            }
        };

        // Alpha "over" blend, clipped to the output bounds
        imageops::overlay(
            &mut output,
            &badge_image,
            overlay.position.left,
            overlay.position.top,
        );
    }

    Ok(output)
}

/// Loads the background into a fresh RGBA buffer with its origin at (0,0),
/// falling back to the default background when the configured one cannot
/// be read.
fn load_background(badges_dir: &Path, background: &str) -> Result<RgbaImage> {
    let path = badges_dir.join(background);
    match image::open(&path) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(e) => {
            warn!("Badge background '{}' not found: {e}. Using default.", path.display());
            let default_path = badges_dir.join(DEFAULT_BACKGROUND);
            image::open(&default_path).map(|img| img.to_rgba8()).map_err(|e| {
                EmblemError::BackgroundUnavailable(format!("'{}': {e}", default_path.display()))
            })
        }
    }
}

/// Encodes the composed badge losslessly for the HTTP response body.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}
