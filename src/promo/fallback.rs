//! 回退图片：任何一张输出生成失败时，用同尺寸的占位图替换。
//!
//! 固定使用内置光栅后端，不经过注入的 `SurfaceFactory`，
//! 这样即使注入的后端本身出错也仍然能产出占位图。

use image::imageops::FilterType;

use super::font::FontSpec;
use super::raster::RasterSurface;
use super::source::EncodedImage;
use super::surface::{Fill, Rgba, Surface, TextAlign, TextBaseline, TextStyle};
use super::geometry::Rect;
use super::ImageError;

/// 未提供说明文字时的默认文案。
pub const DEFAULT_FALLBACK_CAPTION: &str = "Image Generation Failed";

const FALLBACK_BACKGROUND: Rgba = Rgba::hex(0xf1f3f4);
const FALLBACK_TEXT: Rgba = Rgba::hex(0x5f6368);
const FALLBACK_FONT: FontSpec = FontSpec::bold(20.0);

/// 生成 `width x height` 的占位图，说明文字单行居中。
///
/// 只在尺寸为零时失败。
pub fn generate_fallback(
    width: u32,
    height: u32,
    caption: &str,
) -> Result<EncodedImage, ImageError> {
    let caption = if caption.trim().is_empty() {
        DEFAULT_FALLBACK_CAPTION
    } else {
        caption
    };

    let mut surface = RasterSurface::new(width, height, FilterType::Nearest)?;
    surface.fill_rect(
        Rect::new(0.0, 0.0, width as f32, height as f32),
        &Fill::Solid(FALLBACK_BACKGROUND),
    )?;
    surface.fill_text(
        caption,
        width as f32 / 2.0,
        height as f32 / 2.0,
        &TextStyle {
            font: FALLBACK_FONT,
            color: FALLBACK_TEXT,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        },
    )?;

    log::debug!("🧩 生成回退图片 - 尺寸: {}x{} 文案: {}", width, height, caption);
    surface.encode()
}
