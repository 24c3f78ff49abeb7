//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理两种来源（原始字节 / Base64 字符串）的字节解析，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要的解码开销。
//!
//! ## 实现思路
//!
//! - 原始字节：直接借用，不复制；校验声明类型、体积与文件签名。
//! - Base64：Data URL 标记解析 + 解码前体积估算 + 解码后签名校验。
//! - 所有失败都映射为解码阶段的 `ImageError`，由编排层决定是否回退。

use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose};

use super::source::RawImageData;
use super::{EngineConfig, ImageError, ImageSource};

/// 解析图片来源为原始字节。
///
/// 返回值借用 `source` 的生命周期；不会修改或保留调用方数据。
pub(crate) fn load_source<'a>(
    source: &'a ImageSource,
    config: &EngineConfig,
) -> Result<RawImageData<'a>, ImageError> {
    if let Some(declared) = source.declared_mime() {
        validate_declared_mime(declared)?;
    }

    let (bytes, source_hint): (Cow<'a, [u8]>, &'static str) = match source {
        ImageSource::Bytes { data, .. } => {
            validate_file_size(data.len() as u64, config)?;
            (Cow::Borrowed(data.as_slice()), "bytes")
        }
        ImageSource::EncodedString(data) => {
            log::debug!("📝 开始解析 base64 图片");
            let decoded = parse_base64_with_limit(data, config.max_file_size)?;
            validate_file_size(decoded.len() as u64, config)?;
            (Cow::Owned(decoded), "base64")
        }
    };

    let detected_mime = validate_image_signature(&bytes, config)?;

    Ok(RawImageData {
        bytes,
        detected_mime,
        source_hint,
    })
}

/// 调用方声明的类型必须是 `image/*`。
fn validate_declared_mime(declared: &str) -> Result<(), ImageError> {
    if declared.trim().to_ascii_lowercase().starts_with("image/") {
        return Ok(());
    }

    Err(ImageError::InvalidFormat(format!(
        "声明的文件类型不是图片：{}",
        declared
    )))
}

fn validate_file_size(len: u64, config: &EngineConfig) -> Result<(), ImageError> {
    if len > config.max_file_size {
        return Err(ImageError::ResourceLimit(format!(
            "图片体积过大：{}（限制：{}）",
            format_file_size(len),
            format_file_size(config.max_file_size)
        )));
    }
    Ok(())
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, ImageError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| ImageError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| ImageError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

/// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前按上限估算体积。
fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, ImageError> {
    let normalized = data.trim();

    let payload = if normalized.starts_with("data:") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| ImageError::InvalidFormat("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    let estimated_len = estimate_base64_decoded_upper_bound_len(payload)?;
    if estimated_len > max_file_size {
        return Err(ImageError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{}（限制：{}）",
            format_file_size(estimated_len),
            format_file_size(max_file_size)
        )));
    }

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))
}

/// 通过文件签名（magic bytes）校验输入是否为允许的图片类型。
fn validate_image_signature(bytes: &[u8], config: &EngineConfig) -> Result<&'static str, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| ImageError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(ImageError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    if !config.accepts_mime(kind.mime_type()) {
        return Err(ImageError::InvalidFormat(format!(
            "不支持的图片类型：{}（可选：{}）",
            kind.mime_type(),
            config.accepted_mime_types.join(", ")
        )));
    }

    Ok(kind.mime_type())
}

/// 将字节数格式化为人类可读的体积文案。
pub(crate) fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}
