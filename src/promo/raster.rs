//! # 光栅绘制后端
//!
//! ## 设计思路
//!
//! 基于 tiny-skia 的 CPU 画布实现 `Surface`：路径、渐变与抗锯齿交给 tiny-skia，
//! 字形覆盖率来自 ab_glyph，贴图缩放复用解码流水线的 `resize_rgba`。
//!
//! ## 实现思路
//!
//! - 画布内部为预乘 alpha，编码前统一还原为直通 alpha 再写 PNG。
//! - 投影：在裁剪后的独立图层上绘制形状，用 `fast_blur`（sigma = blur / 2）近似
//!   Canvas 的高斯投影，再按偏移合成回画布；图层只覆盖形状外扩 3 sigma 的范围。
//! - 文字：逐字形光栅化，按覆盖率做 source-over 混合。

use std::time::Instant;

use ab_glyph::Font;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ImageEncoder, RgbaImage};
use tiny_skia::{
    Color, FillRule, GradientStop, IntSize, LinearGradient, Paint, Path, Pixmap, PixmapPaint,
    PremultipliedColorU8, SpreadMode, Stroke, Transform,
};

use super::font::FontSpec;
use super::geometry::Rect;
use super::pipeline::resize_rgba;
use super::source::{DecodedImage, EncodedImage};
use super::surface::{Fill, Rgba, Shadow, Surface, SurfaceFactory, TextAlign, TextBaseline, TextStyle};
use super::ImageError;

/// 生产环境使用的绘制后端。
#[derive(Debug, Clone, Copy)]
pub struct RasterBackend {
    filter: FilterType,
}

impl RasterBackend {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl SurfaceFactory for RasterBackend {
    fn create_surface(&self, width: u32, height: u32) -> Result<Box<dyn Surface>, ImageError> {
        Ok(Box::new(RasterSurface::new(width, height, self.filter)?))
    }
}

/// tiny-skia 画布。
pub struct RasterSurface {
    pixmap: Pixmap,
    filter: FilterType,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, filter: FilterType) -> Result<Self, ImageError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ImageError::Composition(format!("画布创建失败：{}x{}", width, height))
        })?;
        Ok(Self { pixmap, filter })
    }

    /// 还原为直通 alpha 的 RGBA 像素。
    pub fn to_rgba_image(&self) -> Result<RgbaImage, ImageError> {
        let mut raw = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            raw.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), raw)
            .ok_or_else(|| ImageError::Composition("画布像素缓冲长度异常".to_string()))
    }

    fn draw_shadow(&mut self, path: &Path, shadow: &Shadow) -> Result<(), ImageError> {
        if shadow.color.a == 0 {
            return Ok(());
        }

        let sigma = (shadow.blur / 2.0).max(0.0);
        let pad = (sigma * 3.0).ceil() + 1.0;
        let bounds = path.bounds();

        let layer_width = (bounds.width() + pad * 2.0).ceil() as u32;
        let layer_height = (bounds.height() + pad * 2.0).ceil() as u32;
        let mut layer = Pixmap::new(layer_width, layer_height).ok_or_else(|| {
            ImageError::Composition(format!("投影图层创建失败：{}x{}", layer_width, layer_height))
        })?;

        let paint = solid_paint(shadow.color);
        let translate = Transform::from_translate(pad - bounds.left(), pad - bounds.top());
        layer.fill_path(path, &paint, FillRule::Winding, translate, None);

        let layer = if sigma > 0.0 {
            blur_premultiplied(layer, sigma)?
        } else {
            layer
        };

        let x = (bounds.left() - pad + shadow.offset_x).round() as i32;
        let y = (bounds.top() - pad + shadow.offset_y).round() as i32;
        self.pixmap.draw_pixmap(
            x,
            y,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) -> Result<(), ImageError> {
        let Some(area) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        else {
            return Err(ImageError::Composition(format!("矩形参数无效：{:?}", rect)));
        };

        let paint = fill_paint(fill)?;
        self.pixmap.fill_rect(area, &paint, Transform::identity(), None);
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &Path,
        fill: &Fill,
        shadow: Option<&Shadow>,
    ) -> Result<(), ImageError> {
        if let Some(shadow) = shadow {
            self.draw_shadow(path, shadow)?;
        }

        let paint = fill_paint(fill)?;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) -> Result<(), ImageError> {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &solid_paint(color), &stroke, Transform::identity(), None);
        Ok(())
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> Result<(), ImageError> {
        let target_width = dest.width.round() as u32;
        let target_height = dest.height.round() as u32;
        if target_width == 0 || target_height == 0 {
            log::debug!("跳过绘制：目标尺寸过小 {:?}", dest);
            return Ok(());
        }

        let start = Instant::now();
        let resized = resize_rgba(image, target_width, target_height, self.filter)?;
        let tile = premultiplied_pixmap(resized)?;

        self.pixmap.draw_pixmap(
            dest.x.round() as i32,
            dest.y.round() as i32,
            tile.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        log::debug!(
            "🖼️ 贴图完成 - {}x{} -> {}x{} 耗时: {}ms",
            image.width(),
            image.height(),
            target_width,
            target_height,
            start.elapsed().as_millis()
        );
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), ImageError> {
        if text.is_empty() || style.color.a == 0 {
            return Ok(());
        }

        let font = style.font;
        let left = match style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - font.text_width(text) / 2.0,
        };
        let baseline = match style.baseline {
            TextBaseline::Top => y + font.ascent(),
            TextBaseline::Middle => y + (font.ascent() + font.descent()) / 2.0,
        };

        let width = self.pixmap.width() as i32;
        let height = self.pixmap.height() as i32;
        let pixels = self.pixmap.pixels_mut();

        for glyph in font.layout(text, left, baseline) {
            let Some(outlined) = font.font().outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let origin_x = bounds.min.x as i32;
            let origin_y = bounds.min.y as i32;

            outlined.draw(|gx, gy, coverage| {
                let px = origin_x + gx as i32;
                let py = origin_y + gy as i32;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                let index = (py * width + px) as usize;
                pixels[index] = blend_over(pixels[index], style.color, coverage);
            });
        }

        Ok(())
    }

    fn measure_text(&self, text: &str, font: FontSpec) -> f32 {
        font.text_width(text)
    }

    fn encode(&self) -> Result<EncodedImage, ImageError> {
        let start = Instant::now();
        let image = self.to_rgba_image()?;
        let (width, height) = image.dimensions();

        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(image.as_raw(), width, height, image::ColorType::Rgba8.into())
            .map_err(|e| ImageError::Composition(format!("PNG 编码失败：{}", e)))?;

        log::debug!(
            "📦 PNG 编码完成 - 尺寸: {}x{} 大小: {} 字节 耗时: {}ms",
            width,
            height,
            buf.len(),
            start.elapsed().as_millis()
        );
        Ok(EncodedImage::from_png_bytes(&buf, width, height))
    }
}

fn to_skia_color(color: Rgba) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid_paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

fn fill_paint(fill: &Fill) -> Result<Paint<'static>, ImageError> {
    match *fill {
        Fill::Solid(color) => Ok(solid_paint(color)),
        Fill::LinearGradient {
            start,
            end,
            from,
            to,
        } => {
            let shader = LinearGradient::new(
                tiny_skia::Point::from_xy(start.0, start.1),
                tiny_skia::Point::from_xy(end.0, end.1),
                vec![
                    GradientStop::new(0.0, to_skia_color(from)),
                    GradientStop::new(1.0, to_skia_color(to)),
                ],
                SpreadMode::Pad,
                Transform::identity(),
            )
            .ok_or_else(|| ImageError::Composition("线性渐变参数无效".to_string()))?;

            let mut paint = Paint::default();
            paint.shader = shader;
            paint.anti_alias = true;
            Ok(paint)
        }
    }
}

/// 直通 alpha 像素转换为 tiny-skia 预乘画布。
fn premultiplied_pixmap(image: RgbaImage) -> Result<Pixmap, ImageError> {
    let (width, height) = image.dimensions();
    let mut raw = image.into_raw();
    for px in raw.chunks_exact_mut(4) {
        let alpha = px[3] as u16;
        for channel in &mut px[..3] {
            *channel = ((*channel as u16 * alpha + 127) / 255) as u8;
        }
    }

    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| ImageError::Composition(format!("贴图尺寸无效：{}x{}", width, height)))?;
    Pixmap::from_vec(raw, size)
        .ok_or_else(|| ImageError::Composition("贴图像素缓冲长度异常".to_string()))
}

/// 对预乘图层做快速高斯近似模糊。
fn blur_premultiplied(layer: Pixmap, sigma: f32) -> Result<Pixmap, ImageError> {
    let (width, height) = (layer.width(), layer.height());
    let buffer = RgbaImage::from_raw(width, height, layer.take())
        .ok_or_else(|| ImageError::Composition("投影图层缓冲长度异常".to_string()))?;

    let mut raw = image::imageops::fast_blur(&buffer, sigma).into_raw();
    // 分通道模糊的舍入可能让颜色分量略大于 alpha
    for px in raw.chunks_exact_mut(4) {
        let alpha = px[3];
        for channel in &mut px[..3] {
            *channel = (*channel).min(alpha);
        }
    }

    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| ImageError::Composition(format!("投影图层尺寸无效：{}x{}", width, height)))?;
    Pixmap::from_vec(raw, size)
        .ok_or_else(|| ImageError::Composition("投影图层像素缓冲长度异常".to_string()))
}

/// 以覆盖率为权重的 source-over 混合（预乘空间）。
fn blend_over(dst: PremultipliedColorU8, color: Rgba, coverage: f32) -> PremultipliedColorU8 {
    let src_alpha = color.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if src_alpha <= 0.0 {
        return dst;
    }
    let keep = 1.0 - src_alpha;
    let mix = |src: u8, dst: u8| (src as f32 * src_alpha + dst as f32 * keep).round() as u8;

    PremultipliedColorU8::from_rgba(
        mix(color.r, dst.red()),
        mix(color.g, dst.green()),
        mix(color.b, dst.blue()),
        mix(0xff, dst.alpha()),
    )
    .unwrap_or(dst)
}
