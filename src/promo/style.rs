//! # 视觉风格模块
//!
//! ## 设计思路
//!
//! 风格是封闭枚举，每个取值在编译期映射到一份结构化调色板，合成器只读取调色板字段，
//! 不再按字符串分支。背景统一是 135° 对角渐变（首尾同色即纯色），对应画布左上到右下。
//!
//! 小图与横幅使用同一枚举，但各自有独立调色板：`gradient-blue` 在两处的终点色不同，
//! 仅横幅带有半透明黑色遮罩。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::surface::{Fill, Rgba, Shadow};
use super::ImageError;

/// 可选视觉风格。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualStyle {
    #[default]
    Classic,
    GradientBlue,
    GradientPurple,
    GradientOrange,
    Dark,
    Vibrant,
}

impl VisualStyle {
    pub const ALL: [VisualStyle; 6] = [
        Self::Classic,
        Self::GradientBlue,
        Self::GradientPurple,
        Self::GradientOrange,
        Self::Dark,
        Self::Vibrant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::GradientBlue => "gradient-blue",
            Self::GradientPurple => "gradient-purple",
            Self::GradientOrange => "gradient-orange",
            Self::Dark => "dark",
            Self::Vibrant => "vibrant",
        }
    }

    /// 小图（440x280）调色板。
    pub fn tile_palette(self) -> StylePalette {
        match self {
            Self::Classic => StylePalette::light(Rgba::hex(0xf9f9fa), Rgba::hex(0xf9f9fa)),
            Self::GradientBlue => StylePalette::tinted(Rgba::hex(0x4285f4), Rgba::hex(0x34a853)),
            Self::GradientPurple => StylePalette::tinted(Rgba::hex(0x673ab7), Rgba::hex(0xe91e63)),
            Self::GradientOrange => StylePalette::tinted(Rgba::hex(0xff5722), Rgba::hex(0xff9800)),
            Self::Dark => StylePalette::tinted(Rgba::hex(0x212121), Rgba::hex(0x424242)),
            Self::Vibrant => StylePalette::vibrant(),
        }
    }

    /// 横幅（1400x560）调色板。
    pub fn marquee_palette(self) -> StylePalette {
        match self {
            Self::Classic => StylePalette::light(Rgba::hex(0xf9f9fa), Rgba::hex(0xeaeaec)),
            Self::GradientBlue => StylePalette::tinted(Rgba::hex(0x4285f4), Rgba::hex(0x0f9d58))
                .with_overlay(0.3),
            Self::GradientPurple => StylePalette::tinted(Rgba::hex(0x673ab7), Rgba::hex(0xe91e63))
                .with_overlay(0.3),
            Self::GradientOrange => StylePalette::tinted(Rgba::hex(0xff5722), Rgba::hex(0xff9800))
                .with_overlay(0.3),
            Self::Dark => {
                StylePalette::tinted(Rgba::hex(0x212121), Rgba::hex(0x424242)).with_overlay(0.5)
            }
            Self::Vibrant => StylePalette::vibrant().with_overlay(0.2),
        }
    }
}

impl FromStr for VisualStyle {
    type Err = ImageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| ImageError::InvalidFormat(format!("未知视觉风格：{}", value)))
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 某个风格在某种输出上的具体颜色。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StylePalette {
    pub background_from: Rgba,
    pub background_to: Rgba,
    /// 背景之上的整幅遮罩。
    pub overlay: Option<Rgba>,
    pub title: Rgba,
    pub body: Rgba,
    /// 截图卡片底色。
    pub card: Rgba,
    /// 没有可用截图时的卡片底色与描边。
    pub card_empty: Rgba,
    pub card_border: Rgba,
    pub card_shadow: Shadow,
}

const CARD_SHADOW_BLUR: f32 = 20.0;
const CARD_SHADOW_OFFSET_Y: f32 = 5.0;

impl StylePalette {
    fn light(from: Rgba, to: Rgba) -> Self {
        Self {
            background_from: from,
            background_to: to,
            overlay: None,
            title: Rgba::hex(0x202124),
            body: Rgba::hex(0x5f6368),
            card: Rgba::WHITE,
            card_empty: Rgba::hex(0xf5f5f5),
            card_border: Rgba::hex(0xdddddd),
            card_shadow: card_shadow(0.1),
        }
    }

    fn tinted(from: Rgba, to: Rgba) -> Self {
        Self {
            background_from: from,
            background_to: to,
            overlay: None,
            title: Rgba::WHITE,
            body: Rgba::WHITE.with_opacity(0.9),
            card: Rgba::WHITE,
            card_empty: Rgba::WHITE.with_opacity(0.2),
            card_border: Rgba::WHITE.with_opacity(0.4),
            card_shadow: card_shadow(0.2),
        }
    }

    fn vibrant() -> Self {
        Self {
            title: Rgba::hex(0x333333),
            body: Rgba::hex(0x333333).with_opacity(0.9),
            ..Self::tinted(Rgba::hex(0x00c9ff), Rgba::hex(0x92fe9d))
        }
    }

    fn with_overlay(self, opacity: f32) -> Self {
        Self {
            overlay: Some(Rgba::BLACK.with_opacity(opacity)),
            ..self
        }
    }

    /// 覆盖 `width x height` 画布的背景填充。
    pub fn background(&self, width: f32, height: f32) -> Fill {
        if self.background_from == self.background_to {
            return Fill::Solid(self.background_from);
        }
        Fill::LinearGradient {
            start: (0.0, 0.0),
            end: (width, height),
            from: self.background_from,
            to: self.background_to,
        }
    }
}

fn card_shadow(opacity: f32) -> Shadow {
    Shadow {
        color: Rgba::BLACK.with_opacity(opacity),
        blur: CARD_SHADOW_BLUR,
        offset_x: 0.0,
        offset_y: CARD_SHADOW_OFFSET_Y,
    }
}
