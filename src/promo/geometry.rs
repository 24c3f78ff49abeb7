//! 版式几何：尺寸、矩形与等比“包含”缩放。

/// 浮点尺寸（像素）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// 轴对齐矩形（左上角 + 尺寸）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// 向四周扩展 `amount` 像素。
    pub fn inflate(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// 在 `self` 中居中放置 `size`。
    pub fn centered_in(&self, size: Size) -> Self {
        Self::new(
            self.x + (self.width - size.width) / 2.0,
            self.y + (self.height - size.height) / 2.0,
            size.width,
            size.height,
        )
    }

    /// 水平居中、顶边固定在 `top`。
    pub fn centered_horizontally(&self, size: Size, top: f32) -> Self {
        Self::new(
            self.x + (self.width - size.width) / 2.0,
            top,
            size.width,
            size.height,
        )
    }
}

/// 等比缩放，使 `src` 完整落在 `bounds` 内（不裁剪，可放大）。
///
/// 缩放系数为 `min(tw / sw, th / sh)`；任一尺寸为空时返回零尺寸。
pub fn fit_contain(src: Size, bounds: Size) -> Size {
    scale_within(src, bounds, contain_scale(src, bounds))
}

/// 与 [`fit_contain`] 相同，但缩放系数不超过 1.0（不超过原生分辨率）。
pub fn fit_contain_capped(src: Size, bounds: Size) -> Size {
    scale_within(src, bounds, contain_scale(src, bounds).min(1.0))
}

fn contain_scale(src: Size, bounds: Size) -> f32 {
    if src.is_empty() || bounds.is_empty() {
        return 0.0;
    }
    (bounds.width / src.width).min(bounds.height / src.height)
}

fn scale_within(src: Size, bounds: Size, scale: f32) -> Size {
    if scale <= 0.0 {
        return Size::ZERO;
    }
    // 浮点误差可能让受限边略超出边界
    Size::new(
        (src.width * scale).min(bounds.width),
        (src.height * scale).min(bounds.height),
    )
}
