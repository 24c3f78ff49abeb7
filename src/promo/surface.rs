//! # 绘制表面抽象
//!
//! ## 设计思路
//!
//! 合成器只描述“画什么”，不关心像素如何落地。所有绘制能力通过 `Surface` trait 注入，
//! 生产环境使用 `raster::RasterBackend`，测试可以注入记录调用的桩实现。
//!
//! - `SurfaceFactory`：按尺寸创建新的空白表面，每次合成调用独占一个
//! - `Surface`：填充、描边、贴图、文字与最终编码

use tiny_skia::Path;

use super::font::FontSpec;
use super::geometry::Rect;
use super::source::{DecodedImage, EncodedImage};
use super::ImageError;

/// 直通 alpha 的 8 位颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// 从 `0xRRGGBB` 构建不透明颜色。
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// 按 CSS `rgba()` 的 0.0..=1.0 透明度替换 alpha。
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// 填充方式。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    /// 从 `start` 到 `end` 的双色线性渐变（画布坐标）。
    LinearGradient {
        start: (f32, f32),
        end: (f32, f32),
        from: Rgba,
        to: Rgba,
    },
}

/// 投影参数，语义与 Canvas 的 `shadowColor / shadowBlur / shadowOffset*` 相同。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// 文字的垂直锚点：`Top` 为 em 框顶部，`Middle` 为 em 框中线。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Rgba,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// 水平居中、顶部对齐。
    pub const fn centered_top(font: FontSpec, color: Rgba) -> Self {
        Self {
            font,
            color,
            align: TextAlign::Center,
            baseline: TextBaseline::Top,
        }
    }
}

/// 可绘制的渲染目标。
pub trait Surface {
    /// 画布尺寸（像素）。
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) -> Result<(), ImageError>;

    /// 填充路径；带 `shadow` 时先绘制投影再绘制本体。
    fn fill_path(&mut self, path: &Path, fill: &Fill, shadow: Option<&Shadow>)
    -> Result<(), ImageError>;

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) -> Result<(), ImageError>;

    /// 将图片缩放到 `dest` 并绘制。
    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) -> Result<(), ImageError>;

    /// 在 `(x, y)` 处绘制单行文字，锚点由 `style` 决定。
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle)
    -> Result<(), ImageError>;

    fn measure_text(&self, text: &str, font: FontSpec) -> f32;

    /// 将当前内容编码为 PNG Data URL。
    fn encode(&self) -> Result<EncodedImage, ImageError>;
}

/// 渲染目标工厂。
pub trait SurfaceFactory: Send + Sync {
    fn create_surface(&self, width: u32, height: u32) -> Result<Box<dyn Surface>, ImageError>;
}
