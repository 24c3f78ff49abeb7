//! 统一错误类型模块
//!
//! # 设计思路
//!
//! `generate_all` 只在“调用方输入本身不合法”时返回错误：缺少图标、截图数量超限。
//! 单张图片的解码 / 合成失败在编排层被替换为回退图片，不会出现在这里。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于 UI 边界直接透传。

use serde::Serialize;

use crate::promo::ImageError;

/// 调用方可见的错误类型。
#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    /// 缺少必需输入（如图标）
    #[error("缺少必需输入: {0}")]
    MissingInput(&'static str),

    /// 输入不满足约束（如截图数量超限）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 引擎内部错误（配置锁中毒、回退图片生成失败等）
    #[error("{0}")]
    Image(#[from] ImageError),
}

impl Serialize for PromoError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
