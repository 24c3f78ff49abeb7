//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `EngineConfig`：输入体积上限、解码像素上限、可接受格式、
//! 截图数量上限与缩放滤镜。画布尺寸、字号、边距等版式常量属于 `layout` 模块，
//! 在编译期固定，不在这里配置。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `RenderProfile` 负责档位字符串解析与反向输出。
//! - `apply_profile` 将档位转换为具体滤镜。
//! - `infer_profile` 用于从当前配置反推档位。

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;

use super::ImageError;

/// 上传控件允许的图片类型（png / jpg / jpeg / webp）。
pub const DEFAULT_ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// 图片生成配置。
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 单个输入图片允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 通过文件签名识别后允许的 MIME 类型。
    pub accepted_mime_types: Vec<&'static str>,
    /// 单次生成允许的截图数量上限。
    pub max_screenshots: usize,
    /// 图标与截图绘制到画布时的缩放滤镜。
    pub resize_filter: FilterType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            accepted_mime_types: DEFAULT_ACCEPTED_MIME_TYPES.to_vec(),
            max_screenshots: 5,
            resize_filter: FilterType::Triangle,
        }
    }
}

/// 渲染质量档位。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与速度平衡
/// - `Speed`：优先生成速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderProfile {
    Quality,
    Balanced,
    Speed,
}

impl RenderProfile {
    /// 将档位输出为稳定字符串。
    ///
    /// # 示例
    /// ```rust
    /// use promo_generator::promo::RenderProfile;
    ///
    /// assert_eq!(RenderProfile::Speed.as_str(), "speed");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl FromStr for RenderProfile {
    type Err = ImageError;

    /// 从外部字符串解析档位，忽略大小写与首尾空白。
    fn from_str(profile: &str) -> Result<Self, Self::Err> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知渲染档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }
}

impl fmt::Display for RenderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EngineConfig {
    /// 基于当前滤镜反推档位。
    pub fn infer_profile(&self) -> RenderProfile {
        match self.resize_filter {
            FilterType::CatmullRom | FilterType::Lanczos3 | FilterType::Gaussian => {
                RenderProfile::Quality
            }
            FilterType::Nearest => RenderProfile::Speed,
            FilterType::Triangle => RenderProfile::Balanced,
        }
    }

    /// 应用指定档位到实际参数。
    pub fn apply_profile(&mut self, profile: RenderProfile) {
        self.resize_filter = match profile {
            RenderProfile::Quality => FilterType::CatmullRom,
            RenderProfile::Balanced => FilterType::Triangle,
            RenderProfile::Speed => FilterType::Nearest,
        };
    }

    /// 判断识别出的 MIME 类型是否在允许列表中。
    pub(crate) fn accepts_mime(&self, mime: &str) -> bool {
        self.accepted_mime_types.iter().any(|accepted| *accepted == mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_through_strings() {
        for profile in [RenderProfile::Quality, RenderProfile::Balanced, RenderProfile::Speed] {
            assert_eq!(profile.as_str().parse::<RenderProfile>().ok(), Some(profile));
        }
        assert_eq!(" Quality ".parse::<RenderProfile>().ok(), Some(RenderProfile::Quality));
    }

    #[test]
    fn unknown_profile_is_rejected() {
        assert!(matches!(
            "ultra".parse::<RenderProfile>(),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn apply_then_infer_is_consistent() {
        let mut config = EngineConfig::default();
        assert_eq!(config.infer_profile(), RenderProfile::Balanced);

        config.apply_profile(RenderProfile::Quality);
        assert_eq!(config.resize_filter, FilterType::CatmullRom);
        assert_eq!(config.infer_profile(), RenderProfile::Quality);

        config.apply_profile(RenderProfile::Speed);
        assert_eq!(config.infer_profile(), RenderProfile::Speed);
    }

    #[test]
    fn default_accepts_upload_formats_only() {
        let config = EngineConfig::default();
        assert!(config.accepts_mime("image/png"));
        assert!(config.accepts_mime("image/webp"));
        assert!(!config.accepts_mime("image/gif"));
    }
}
