//! # 解码与缩放流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → RGBA”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低异常输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 读取 header 尺寸
//! 2. 按像素上限与内存上限快速拒绝
//! 3. 完整解码并转换 RGBA
//! 4. 绘制时按目标尺寸缩放（fast_image_resize，失败回退 `image::imageops`）

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{GenericImageView, ImageBuffer, Rgba, RgbaImage};
use std::io::Cursor;
use std::time::Instant;

use super::source::{DecodedImage, RawImageData};
use super::{EngineConfig, ImageError, ImageSource, loader};

/// 加载并解码一个图片来源。
///
/// 解码失败对该图片是终态，不重试；由调用方决定如何降级。
pub(crate) fn decode_source(
    source: &ImageSource,
    config: &EngineConfig,
) -> Result<DecodedImage, ImageError> {
    let raw = loader::load_source(source, config)?;
    decode(raw, config)
}

/// 将原始字节解码为 RGBA 图像。
pub(crate) fn decode(raw: RawImageData<'_>, config: &EngineConfig) -> Result<DecodedImage, ImageError> {
    let start = Instant::now();

    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes)?;
    validate_dimensions(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&raw.bytes)
        .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    validate_dimensions(config, width, height)?;

    let pixels = decoded.to_rgba8();

    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|count| count.checked_mul(4))
        .ok_or_else(|| ImageError::ResourceLimit("图片尺寸导致内存溢出风险".to_string()))?;

    if pixels.as_raw().len() != expected_len {
        return Err(ImageError::Decode("解码后像素数据长度异常".to_string()));
    }

    log::info!(
        "✅ 图片解码成功 - 来源: {} 类型: {} 尺寸: {}x{} 耗时: {}ms",
        raw.source_hint,
        raw.detected_mime,
        width,
        height,
        start.elapsed().as_millis()
    );

    Ok(DecodedImage::new(pixels))
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))
}

fn validate_dimensions(config: &EngineConfig, width: u32, height: u32) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
    }

    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(ImageError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    let estimated = pixels
        .checked_mul(4)
        .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(ImageError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}

/// 将解码图片缩放到精确的目标尺寸。
///
/// 尺寸相同时直接复制；fast_image_resize 失败时回退 `image::imageops::resize`。
pub(crate) fn resize_rgba(
    image: &DecodedImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    if target_width == 0 || target_height == 0 {
        return Err(ImageError::Composition(format!(
            "缩放目标尺寸无效：{}x{}",
            target_width, target_height
        )));
    }

    if image.width() == target_width && image.height() == target_height {
        return Ok(image.pixels().clone());
    }

    match resize_with_fast_image_resize(image.pixels(), target_width, target_height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                err
            );
            Ok(image::imageops::resize(
                image.pixels(),
                target_width,
                target_height,
                filter,
            ))
        }
    }
}

fn resize_with_fast_image_resize(
    src: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        src.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| ImageError::Composition(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    // U8x4 默认在卷积前后自动预乘/还原 alpha，透明边缘不会出现暗边
    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(to_resize_alg(filter));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Composition(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Composition("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_resize_alg(filter: FilterType) -> fr::ResizeAlg {
    match filter {
        FilterType::Nearest => fr::ResizeAlg::Nearest,
        FilterType::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        FilterType::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
        FilterType::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
        FilterType::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
    }
}
