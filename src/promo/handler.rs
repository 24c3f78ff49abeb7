//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `PromoGenerator` 只负责流程编排与配置管理，不直接绘制任何像素。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 校验调用方输入（图标必需、截图数量上限）
//! 3. 依次合成小图、横幅、每张截图
//! 4. 单张失败就地替换为回退图片，其余输出不受影响
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<EngineConfig>>` 支持运行时动态切档。
//! - 单次生成内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `small_tile/marquee/screenshot/total` 阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::bundle::{OutputSlot, PromoBundle};
use super::compositor::Compositor;
use super::fallback::generate_fallback;
use super::layout::OutputKind;
use super::raster::RasterBackend;
use super::source::EncodedImage;
use super::style::VisualStyle;
use super::surface::SurfaceFactory;
use super::{EngineConfig, ImageError, ImageSource, RenderProfile};
use crate::error::PromoError;

/// 一次生成的全部输入。
#[derive(Debug, Clone, Default)]
pub struct PromoRequest {
    /// 扩展图标；缺失时整个请求失败。
    pub icon: Option<ImageSource>,
    pub name: String,
    pub description: String,
    /// 截图按顺序生成，第一张同时用于横幅。
    pub screenshots: Vec<ImageSource>,
    pub tile_style: VisualStyle,
    pub marquee_style: VisualStyle,
}

impl PromoRequest {
    pub fn new(icon: ImageSource, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            icon: Some(icon),
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_screenshot(mut self, screenshot: ImageSource) -> Self {
        self.screenshots.push(screenshot);
        self
    }

    pub fn with_screenshots(mut self, screenshots: impl IntoIterator<Item = ImageSource>) -> Self {
        self.screenshots.extend(screenshots);
        self
    }

    pub fn with_tile_style(mut self, style: VisualStyle) -> Self {
        self.tile_style = style;
        self
    }

    pub fn with_marquee_style(mut self, style: VisualStyle) -> Self {
        self.marquee_style = style;
        self
    }
}

/// 宣传图生成器。
///
/// 未注入绘制后端时，每次生成按当前配置的缩放滤镜构建 `RasterBackend`。
pub struct PromoGenerator {
    config: Arc<RwLock<EngineConfig>>,
    surfaces: Option<Box<dyn SurfaceFactory>>,
}

impl PromoGenerator {
    /// 使用内置光栅后端创建生成器。
    ///
    /// # 示例
    /// ```rust
    /// use promo_generator::promo::{EngineConfig, PromoGenerator};
    ///
    /// let generator = PromoGenerator::new(EngineConfig::default());
    /// assert_eq!(generator.profile()?.as_str(), "balanced");
    /// # Ok::<(), promo_generator::promo::ImageError>(())
    /// ```
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            surfaces: None,
        }
    }

    /// 注入自定义绘制后端（回退图片仍使用内置后端）。
    pub fn with_surfaces(config: EngineConfig, surfaces: impl SurfaceFactory + 'static) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            surfaces: Some(Box::new(surfaces)),
        }
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次生成链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<EngineConfig, ImageError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 设置渲染档位。
    pub fn set_profile(&self, profile: RenderProfile) -> Result<(), ImageError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ImageError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_profile(profile);

        log::info!(
            "⚙️ 已切换渲染档位：{}（filter={:?}）",
            profile,
            config.resize_filter
        );
        Ok(())
    }

    /// 获取当前生效档位。
    pub fn profile(&self) -> Result<RenderProfile, ImageError> {
        let config = self
            .config
            .read()
            .map_err(|_| ImageError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_profile())
    }

    /// 生成全部宣传图。
    ///
    /// 只有调用方输入不合法时返回错误；任何单张图片失败都会被替换为同尺寸回退图，
    /// 并记录在 [`PromoBundle::degraded`] 中。
    pub fn generate_all(&self, request: &PromoRequest) -> Result<PromoBundle, PromoError> {
        let total_start = Instant::now();

        let icon = request.icon.as_ref().ok_or_else(|| {
            log::error!("❌ 生成失败：缺少图标");
            PromoError::MissingInput("icon")
        })?;

        let config = self.config_snapshot()?;
        if request.screenshots.len() > config.max_screenshots {
            log::error!(
                "❌ 生成失败：截图数量 {} 超过上限 {}",
                request.screenshots.len(),
                config.max_screenshots
            );
            return Err(PromoError::InvalidInput(format!(
                "截图最多 {} 张，实际 {} 张",
                config.max_screenshots,
                request.screenshots.len()
            )));
        }

        let raster = RasterBackend::new(config.resize_filter);
        let surfaces: &dyn SurfaceFactory = match &self.surfaces {
            Some(injected) => injected.as_ref(),
            None => &raster,
        };
        let compositor = Compositor::new(surfaces, &config);
        let mut degraded = Vec::new();

        let stage_start = Instant::now();
        let small_tile = resolve(
            OutputSlot::SmallTile,
            OutputKind::SmallTile,
            compositor.small_tile(icon, &request.name, request.tile_style),
            &mut degraded,
        )?;
        let small_tile_ms = stage_start.elapsed().as_millis();

        let stage_start = Instant::now();
        let marquee_tile = resolve(
            OutputSlot::Marquee,
            OutputKind::Marquee,
            compositor.marquee(
                icon,
                &request.name,
                &request.description,
                request.screenshots.first(),
                request.marquee_style,
            ),
            &mut degraded,
        )?;
        let marquee_ms = stage_start.elapsed().as_millis();

        let stage_start = Instant::now();
        let mut screenshots = Vec::with_capacity(request.screenshots.len());
        for (index, source) in request.screenshots.iter().enumerate() {
            screenshots.push(resolve(
                OutputSlot::Screenshot(index),
                OutputKind::Screenshot,
                compositor.screenshot(source),
                &mut degraded,
            )?);
        }
        let screenshots_ms = stage_start.elapsed().as_millis();

        log::info!(
            "✅ 宣传图生成完成 - 截图: {} 回退: {} 阶段耗时: small_tile={}ms marquee={}ms screenshots={}ms total={}ms",
            screenshots.len(),
            degraded.len(),
            small_tile_ms,
            marquee_ms,
            screenshots_ms,
            total_start.elapsed().as_millis()
        );

        Ok(PromoBundle {
            small_tile,
            marquee_tile,
            screenshots,
            degraded,
        })
    }
}

/// 成功直接返回；失败记录降级并替换为该输出种类的回退图片。
fn resolve(
    slot: OutputSlot,
    kind: OutputKind,
    result: Result<EncodedImage, ImageError>,
    degraded: &mut Vec<OutputSlot>,
) -> Result<EncodedImage, PromoError> {
    let (width, height) = kind.dimensions();
    let checked = result.and_then(|image| {
        if (image.width(), image.height()) == (width, height) {
            Ok(image)
        } else {
            Err(ImageError::Composition(format!(
                "输出尺寸不符: 期望 {}x{} 实际 {}x{}",
                width,
                height,
                image.width(),
                image.height()
            )))
        }
    });

    match checked {
        Ok(image) => Ok(image),
        Err(err) => {
            log::warn!(
                "⚠️ {} 生成失败（阶段: {} 错误码: {}），使用回退图片：{}",
                slot,
                err.stage(),
                err.code(),
                err
            );
            degraded.push(slot);
            Ok(generate_fallback(width, height, kind.fallback_caption())?)
        }
    }
}
