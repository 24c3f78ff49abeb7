//! # 输出集合
//!
//! 一次生成的全部图片。对外序列化为
//! `{ "smallTile": ..., "marqueeTile": ..., "screenshots": [...] }`，值均为 PNG Data URL。
//! 被回退图片替换的槽位记录在 `degraded` 中，不参与序列化。

use std::fmt;

use serde::Serialize;

use super::source::EncodedImage;
use super::ImageError;

/// 输出槽位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSlot {
    SmallTile,
    Marquee,
    /// 截图槽位，下标从 0 开始，与输入顺序一致。
    Screenshot(usize),
}

impl OutputSlot {
    /// 下载时使用的文件名（截图序号从 1 开始）。
    pub fn file_name(self) -> String {
        match self {
            Self::SmallTile => "small-tile.png".to_string(),
            Self::Marquee => "marquee.png".to_string(),
            Self::Screenshot(index) => format!("screenshots/screenshot-{}.png", index + 1),
        }
    }
}

impl fmt::Display for OutputSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallTile => f.write_str("small_tile"),
            Self::Marquee => f.write_str("marquee"),
            Self::Screenshot(index) => write!(f, "screenshot[{}]", index),
        }
    }
}

/// 一次生成的结果集合。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoBundle {
    pub small_tile: EncodedImage,
    pub marquee_tile: EncodedImage,
    pub screenshots: Vec<EncodedImage>,
    #[serde(skip)]
    pub(crate) degraded: Vec<OutputSlot>,
}

impl PromoBundle {
    /// 使用了回退图片的槽位。
    pub fn degraded(&self) -> &[OutputSlot] {
        &self.degraded
    }

    pub fn is_degraded(&self, slot: OutputSlot) -> bool {
        self.degraded.contains(&slot)
    }

    /// 按下载文件名展开为 `(文件名, PNG 字节)`，写入由调用方负责。
    pub fn assets(&self) -> Result<Vec<(String, Vec<u8>)>, ImageError> {
        let mut assets = Vec::with_capacity(self.screenshots.len() + 2);
        assets.push((OutputSlot::SmallTile.file_name(), self.small_tile.png_bytes()?));
        assets.push((OutputSlot::Marquee.file_name(), self.marquee_tile.png_bytes()?));
        for (index, screenshot) in self.screenshots.iter().enumerate() {
            assets.push((OutputSlot::Screenshot(index).file_name(), screenshot.png_bytes()?));
        }
        Ok(assets)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
