//! # 合成器模块
//!
//! ## 设计思路
//!
//! 三种输出各自一个合成函数，共享同一套约定：
//! - 输入图片在绘制前解码，解码失败直接返回错误，不在这里做回退
//! - 每次调用通过注入的 `SurfaceFactory` 创建独立画布，结束即释放
//! - 所有尺寸、边距与字号来自 `layout`，颜色来自 `style`
//!
//! 回退图片的替换由编排层（`handler`）统一负责。

use std::time::Instant;

use super::font::FontSpec;
use super::geometry::{Rect, Size, fit_contain, fit_contain_capped};
use super::layout::{MarqueeLayout, OutputKind, SmallTileLayout};
use super::pipeline::decode_source;
use super::shape::rounded_rect_path;
use super::source::{DecodedImage, EncodedImage};
use super::style::{StylePalette, VisualStyle};
use super::surface::{Fill, Rgba, Surface, SurfaceFactory, TextStyle};
use super::text::{self, TextMeasure};
use super::{EngineConfig, ImageError, ImageSource};

/// 用画布的测量能力驱动截断与换行。
struct SurfaceMeasure<'a> {
    surface: &'a dyn Surface,
    font: FontSpec,
}

impl TextMeasure for SurfaceMeasure<'_> {
    fn measure(&self, text: &str) -> f32 {
        self.surface.measure_text(text, self.font)
    }
}

/// 一次合成调用所需的上下文（均为借用）。
pub struct Compositor<'a> {
    surfaces: &'a dyn SurfaceFactory,
    config: &'a EngineConfig,
}

impl<'a> Compositor<'a> {
    pub fn new(surfaces: &'a dyn SurfaceFactory, config: &'a EngineConfig) -> Self {
        Self { surfaces, config }
    }

    /// 小图：图标居中，名称位于图标下方。
    pub fn small_tile(
        &self,
        icon: &ImageSource,
        name: &str,
        style: VisualStyle,
    ) -> Result<EncodedImage, ImageError> {
        let start = Instant::now();
        let icon = decode_source(icon, self.config)?;
        let palette = style.tile_palette();

        let (mut surface, canvas) = self.create_canvas(OutputKind::SmallTile)?;
        surface.fill_rect(canvas, &palette.background(canvas.width, canvas.height))?;

        let icon_rect = canvas.centered_horizontally(
            icon_box(&icon, SmallTileLayout::ICON_MAX),
            SmallTileLayout::ICON_TOP,
        );
        surface.draw_image(&icon, icon_rect)?;

        let name_font = SmallTileLayout::NAME_FONT;
        let name = text::truncate(
            name,
            canvas.width - SmallTileLayout::NAME_MARGIN,
            &SurfaceMeasure {
                surface: &*surface,
                font: name_font,
            },
        );
        surface.fill_text(
            &name,
            canvas.center_x(),
            icon_rect.bottom() + SmallTileLayout::NAME_GAP,
            &TextStyle::centered_top(name_font, palette.title),
        )?;

        let encoded = surface.encode()?;
        log::info!(
            "✅ 小图合成完成 - 风格: {} 尺寸: {}x{} 耗时: {}ms",
            style,
            encoded.width(),
            encoded.height(),
            start.elapsed().as_millis()
        );
        Ok(encoded)
    }

    /// 横幅：左侧品牌区（图标、名称、描述），右侧首张截图卡片。
    ///
    /// 没有截图或首张截图无法解码时，卡片以空状态绘制，不视为失败。
    pub fn marquee(
        &self,
        icon: &ImageSource,
        name: &str,
        description: &str,
        screenshot: Option<&ImageSource>,
        style: VisualStyle,
    ) -> Result<EncodedImage, ImageError> {
        let start = Instant::now();
        let icon = decode_source(icon, self.config)?;
        let screenshot = match screenshot.map(|source| decode_source(source, self.config)) {
            Some(Ok(decoded)) => Some(decoded),
            Some(Err(err)) => {
                log::warn!("⚠️ 横幅截图解码失败，卡片以空状态绘制：{}", err);
                None
            }
            None => None,
        };
        let palette = style.marquee_palette();

        let (mut surface, canvas) = self.create_canvas(OutputKind::Marquee)?;
        surface.fill_rect(canvas, &palette.background(canvas.width, canvas.height))?;
        if let Some(overlay) = palette.overlay {
            surface.fill_rect(canvas, &Fill::Solid(overlay))?;
        }

        let branding = Rect::new(0.0, 0.0, MarqueeLayout::branding_width(), canvas.height);
        let icon_rect = branding.centered_horizontally(
            icon_box(&icon, MarqueeLayout::ICON_MAX),
            MarqueeLayout::ICON_TOP,
        );
        surface.draw_image(&icon, icon_rect)?;

        let name_font = MarqueeLayout::NAME_FONT;
        let name = text::truncate(
            name,
            branding.width - MarqueeLayout::NAME_MARGIN,
            &SurfaceMeasure {
                surface: &*surface,
                font: name_font,
            },
        );
        surface.fill_text(
            &name,
            branding.center_x(),
            icon_rect.bottom() + MarqueeLayout::NAME_GAP,
            &TextStyle::centered_top(name_font, palette.title),
        )?;

        let description_font = MarqueeLayout::DESCRIPTION_FONT;
        let lines = text::wrap(
            description,
            branding.width - MarqueeLayout::DESCRIPTION_MARGIN,
            MarqueeLayout::DESCRIPTION_MAX_LINES,
            &SurfaceMeasure {
                surface: &*surface,
                font: description_font,
            },
        );
        let description_top = icon_rect.bottom() + MarqueeLayout::DESCRIPTION_GAP;
        let description_style = TextStyle::centered_top(description_font, palette.body);
        for (index, line) in lines.iter().enumerate() {
            surface.fill_text(
                line,
                branding.center_x(),
                description_top + index as f32 * MarqueeLayout::DESCRIPTION_LINE_HEIGHT,
                &description_style,
            )?;
        }

        draw_screenshot_card(&mut *surface, canvas, branding, screenshot.as_ref(), &palette)?;

        let encoded = surface.encode()?;
        log::info!(
            "✅ 横幅合成完成 - 风格: {} 截图: {} 描述行数: {} 耗时: {}ms",
            style,
            if screenshot.is_some() { "有" } else { "无" },
            lines.len(),
            start.elapsed().as_millis()
        );
        Ok(encoded)
    }

    /// 商店截图：白色背景，等比包含缩放后居中。
    pub fn screenshot(&self, source: &ImageSource) -> Result<EncodedImage, ImageError> {
        let start = Instant::now();
        let screenshot = decode_source(source, self.config)?;

        let (mut surface, canvas) = self.create_canvas(OutputKind::Screenshot)?;
        surface.fill_rect(canvas, &Fill::Solid(Rgba::WHITE))?;

        let fitted = fit_contain(image_size(&screenshot), canvas.size());
        surface.draw_image(&screenshot, canvas.centered_in(fitted))?;

        let encoded = surface.encode()?;
        log::info!(
            "✅ 截图合成完成 - 原始: {}x{} 绘制: {:.0}x{:.0} 耗时: {}ms",
            screenshot.width(),
            screenshot.height(),
            fitted.width,
            fitted.height,
            start.elapsed().as_millis()
        );
        Ok(encoded)
    }

    fn create_canvas(&self, kind: OutputKind) -> Result<(Box<dyn Surface>, Rect), ImageError> {
        let (width, height) = kind.dimensions();
        let surface = self.surfaces.create_surface(width, height)?;
        let actual = surface.size();
        if actual != (width, height) {
            return Err(ImageError::Composition(format!(
                "画布尺寸不符: 期望 {}x{} 实际 {}x{}",
                width, height, actual.0, actual.1
            )));
        }
        Ok((surface, Rect::from_size(Size::from_pixels(width, height))))
    }
}

fn image_size(image: &DecodedImage) -> Size {
    Size::from_pixels(image.width(), image.height())
}

/// 图标放入 `max x max` 方框，不放大。
fn icon_box(icon: &DecodedImage, max: f32) -> Size {
    fit_contain_capped(image_size(icon), Size::new(max, max))
}

/// 右侧卡片：宽度为剩余区域减去留白，16:10，垂直居中。
fn card_rect(canvas: Rect, branding: Rect) -> Rect {
    let width = canvas.width - branding.width - MarqueeLayout::CARD_MARGIN;
    let height = width * MarqueeLayout::CARD_ASPECT;
    Rect::new(
        branding.right() + MarqueeLayout::CARD_MARGIN / 2.0,
        (canvas.height - height) / 2.0,
        width,
        height,
    )
}

fn draw_screenshot_card(
    surface: &mut dyn Surface,
    canvas: Rect,
    branding: Rect,
    screenshot: Option<&DecodedImage>,
    palette: &StylePalette,
) -> Result<(), ImageError> {
    let card = card_rect(canvas, branding);
    let frame = card.inflate(MarqueeLayout::CARD_PADDING);
    let path = rounded_rect_path(
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        MarqueeLayout::CARD_RADIUS,
    )?;

    match screenshot {
        Some(image) => {
            surface.fill_path(&path, &Fill::Solid(palette.card), Some(&palette.card_shadow))?;
            let fitted = fit_contain(image_size(image), card.size());
            surface.draw_image(image, card.centered_in(fitted))
        }
        None => {
            surface.fill_path(&path, &Fill::Solid(palette.card_empty), None)?;
            surface.stroke_path(&path, palette.card_border, 1.0)
        }
    }
}
