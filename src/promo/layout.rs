//! 版式常量：每种输出的画布尺寸、边距与字号。

use super::font::FontSpec;

/// 生成的图片种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    SmallTile,
    Marquee,
    Screenshot,
}

impl OutputKind {
    /// 商店要求的像素尺寸。
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::SmallTile => (SmallTileLayout::WIDTH, SmallTileLayout::HEIGHT),
            Self::Marquee => (MarqueeLayout::WIDTH, MarqueeLayout::HEIGHT),
            Self::Screenshot => (ScreenshotLayout::WIDTH, ScreenshotLayout::HEIGHT),
        }
    }

    /// 生成失败时回退图片上的说明文字。
    pub const fn fallback_caption(self) -> &'static str {
        match self {
            Self::SmallTile => "Small Tile Generation Failed",
            Self::Marquee => "Marquee Generation Failed",
            Self::Screenshot => "Screenshot Generation Failed",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SmallTile => "small_tile",
            Self::Marquee => "marquee",
            Self::Screenshot => "screenshot",
        }
    }
}

/// 小图 440x280。
pub struct SmallTileLayout;

impl SmallTileLayout {
    pub const WIDTH: u32 = 440;
    pub const HEIGHT: u32 = 280;
    pub const ICON_MAX: f32 = 128.0;
    pub const ICON_TOP: f32 = 50.0;
    pub const NAME_FONT: FontSpec = FontSpec::bold(28.0);
    /// 名称可用宽度 = 画布宽度 - 左右边距之和。
    pub const NAME_MARGIN: f32 = 60.0;
    pub const NAME_GAP: f32 = 30.0;
}

/// 横幅 1400x560：左侧品牌区，右侧截图卡片。
pub struct MarqueeLayout;

impl MarqueeLayout {
    pub const WIDTH: u32 = 1400;
    pub const HEIGHT: u32 = 560;
    pub const BRANDING_RATIO: f32 = 0.4;
    pub const ICON_MAX: f32 = 196.0;
    pub const ICON_TOP: f32 = 100.0;
    pub const NAME_FONT: FontSpec = FontSpec::bold(40.0);
    pub const NAME_MARGIN: f32 = 80.0;
    pub const NAME_GAP: f32 = 40.0;
    pub const DESCRIPTION_FONT: FontSpec = FontSpec::regular(20.0);
    pub const DESCRIPTION_MARGIN: f32 = 100.0;
    pub const DESCRIPTION_GAP: f32 = 100.0;
    pub const DESCRIPTION_LINE_HEIGHT: f32 = 30.0;
    pub const DESCRIPTION_MAX_LINES: usize = 3;
    /// 截图卡片左右留白之和。
    pub const CARD_MARGIN: f32 = 100.0;
    /// 卡片高宽比（16:10）。
    pub const CARD_ASPECT: f32 = 0.625;
    pub const CARD_PADDING: f32 = 10.0;
    pub const CARD_RADIUS: f32 = 10.0;

    pub fn branding_width() -> f32 {
        Self::WIDTH as f32 * Self::BRANDING_RATIO
    }
}

/// 商店截图 1280x800。
pub struct ScreenshotLayout;

impl ScreenshotLayout {
    pub const WIDTH: u32 = 1280;
    pub const HEIGHT: u32 = 800;
}
