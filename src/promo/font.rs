//! # 字体模块
//!
//! ## 设计思路
//!
//! 文本测量与绘制必须在任何机器上得到相同结果，因此不查找系统字体，
//! 而是通过 `include_bytes!` 内置 DejaVu Sans（常规 / 粗体）。
//!
//! ## 实现思路
//!
//! - 字号按 CSS 像素理解（em 高度），换算为 ab_glyph 的 `PxScale`（ascent - descent 高度）。
//! - 宽度测量累加字距调整后的水平步进，与绘制时的排版保持一致。
//! - 控制字符（换行、制表符等）按空格测量与排版，不会画出 `.notdef` 方框。

use ab_glyph::{Font, FontRef, Glyph, GlyphId, PxScale, ScaleFont, point};
use once_cell::sync::Lazy;

use super::text::TextMeasure;

// 编译期内置资源，解析失败属于构建错误
static REGULAR_FONT: Lazy<FontRef<'static>> = Lazy::new(|| {
    FontRef::try_from_slice(include_bytes!("../../assets/fonts/DejaVuSans.ttf"))
        .expect("内置字体 DejaVuSans 解析失败")
});

static BOLD_FONT: Lazy<FontRef<'static>> = Lazy::new(|| {
    FontRef::try_from_slice(include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf"))
        .expect("内置字体 DejaVuSans-Bold 解析失败")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// 字体规格：CSS 像素字号 + 字重。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub weight: FontWeight,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }

    pub(crate) fn font(&self) -> &'static FontRef<'static> {
        match self.weight {
            FontWeight::Regular => &REGULAR_FONT,
            FontWeight::Bold => &BOLD_FONT,
        }
    }

    /// CSS 字号对应的 ab_glyph 缩放。
    pub(crate) fn scale(&self) -> PxScale {
        let font = self.font();
        let units_per_em = font.units_per_em().unwrap_or(2048.0);
        PxScale::from(self.size * font.height_unscaled() / units_per_em)
    }

    /// 基线到字形顶部的距离（正数）。
    pub fn ascent(&self) -> f32 {
        self.font().as_scaled(self.scale()).ascent()
    }

    /// 基线到字形底部的距离（负数）。
    pub fn descent(&self) -> f32 {
        self.font().as_scaled(self.scale()).descent()
    }

    /// 单行文本的像素宽度（含字距调整）。
    pub fn text_width(&self, text: &str) -> f32 {
        let scaled = self.font().as_scaled(self.scale());
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;

        for c in text.chars().map(printable) {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        width
    }

    /// 以 `(x, baseline)` 为起点排出一行字形。
    pub(crate) fn layout(&self, text: &str, x: f32, baseline: f32) -> Vec<Glyph> {
        let scale = self.scale();
        let scaled = self.font().as_scaled(scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = x;
        let mut previous: Option<GlyphId> = None;

        for c in text.chars().map(printable) {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(caret, baseline)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        glyphs
    }
}

fn printable(c: char) -> char {
    if c.is_control() { ' ' } else { c }
}

impl TextMeasure for FontSpec {
    fn measure(&self, text: &str) -> f32 {
        self.text_width(text)
    }
}
