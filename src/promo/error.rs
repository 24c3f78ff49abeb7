//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载解码与合成两个阶段的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让编排层可按分支匹配并决定是否回退。
//!
//! - `Decode` / `InvalidFormat` / `ResourceLimit`：输入图片无法被解释（解码阶段）
//! - `Composition`：绘制阶段失败（画布创建、路径构建、编码等）

/// 图片生成统一错误类型。
///
/// 该类型只在引擎内部流转，编排层会将其转换为回退图片，不会透传给调用方。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("合成错误：{0}")]
    Composition(String),
}

impl ImageError {
    /// 稳定的机器可读错误码，用于日志与降级记录。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_failed",
            Self::InvalidFormat(_) => "invalid_format",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Composition(_) => "composition_failed",
        }
    }

    /// 错误所处阶段：`decode` 或 `compose`。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode(_) | Self::InvalidFormat(_) | Self::ResourceLimit(_) => "decode",
            Self::Composition(_) => "compose",
        }
    }

    pub fn is_decode(&self) -> bool {
        self.stage() == "decode"
    }
}

impl From<ImageError> for String {
    fn from(error: ImageError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_splits_decode_and_composition() {
        assert_eq!(ImageError::Decode("x".into()).stage(), "decode");
        assert_eq!(ImageError::InvalidFormat("x".into()).stage(), "decode");
        assert_eq!(ImageError::ResourceLimit("x".into()).stage(), "decode");
        assert_eq!(ImageError::Composition("x".into()).stage(), "compose");
        assert!(!ImageError::Composition("x".into()).is_decode());
    }

    #[test]
    fn display_keeps_inner_message() {
        let err = ImageError::Composition("画布创建失败".into());
        assert!(err.to_string().contains("画布创建失败"));
        assert_eq!(err.code(), "composition_failed");
    }
}
