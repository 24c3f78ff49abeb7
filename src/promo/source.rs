//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示调用方提供的图片来源（原始字节或已编码字符串）
//! - `RawImageData` 表示已解析来源、尚未解码的字节
//! - `DecodedImage` 表示已解码、可直接绘制的 RGBA 像素
//! - `EncodedImage` 表示合成完成后的 PNG Data URL

use std::borrow::Cow;

use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;
use serde::{Serialize, Serializer};

use super::ImageError;

/// 输出图片统一使用的 MIME 类型。
pub const OUTPUT_MIME_TYPE: &str = "image/png";

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// 图片输入来源。
///
/// 在加载边界只解析一次，下游代码不再关心来源形态。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 上传得到的原始字节，可附带声明的 MIME 类型。
    Bytes {
        data: Vec<u8>,
        mime_type: Option<String>,
    },
    /// Data URL（`data:image/...;base64,`）或纯 Base64 字符串。
    EncodedString(String),
}

impl ImageSource {
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            data: data.into(),
            mime_type: None,
        }
    }

    pub fn from_bytes_with_mime(data: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self::Bytes {
            data: data.into(),
            mime_type: Some(mime_type.into()),
        }
    }

    pub fn from_encoded(data: impl Into<String>) -> Self {
        Self::EncodedString(data.into())
    }

    /// 调用方声明的 MIME 类型；Data URL 从前缀中提取。
    pub(crate) fn declared_mime(&self) -> Option<&str> {
        match self {
            Self::Bytes { mime_type, .. } => mime_type.as_deref(),
            Self::EncodedString(data) => data
                .trim()
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .filter(|mime| !mime.is_empty()),
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
///
/// `Bytes` 来源直接借用调用方数据，`EncodedString` 来源持有解码后的字节。
pub(crate) struct RawImageData<'a> {
    /// 原始图片字节。
    pub(crate) bytes: Cow<'a, [u8]>,
    /// 通过文件签名识别出的 MIME 类型。
    pub(crate) detected_mime: &'static str,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码阶段输出：直通 alpha 的 RGBA 像素。
///
/// 每次合成调用独占一份，调用结束即释放，不跨调用缓存。
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub(crate) pixels: RgbaImage,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 合成结果：PNG Data URL 及其像素尺寸。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_url: String,
    width: u32,
    height: u32,
}

impl EncodedImage {
    /// 将 PNG 字节封装为 Data URL。
    pub fn from_png_bytes(png: &[u8], width: u32, height: u32) -> Self {
        let mut data_url = String::with_capacity(DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
        data_url.push_str(DATA_URL_PREFIX);
        general_purpose::STANDARD.encode_string(png, &mut data_url);
        Self {
            data_url,
            width,
            height,
        }
    }

    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 还原 PNG 字节，供调用方落盘或打包。
    pub fn png_bytes(&self) -> Result<Vec<u8>, ImageError> {
        let payload = self
            .data_url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or_else(|| ImageError::InvalidFormat("缺少 PNG Data URL 前缀".to_string()))?;
        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| ImageError::Decode(format!("Base64 解码失败：{}", e)))
    }
}

/// 对外契约中图片以 Data URL 字符串出现。
impl Serialize for EncodedImage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.data_url)
    }
}
