//! # 扩展商店宣传图生成器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  调用方（上传表单 / 预览面板）                           │
//! │    图标 + 名称 + 描述 + 0~5 张截图 + 风格                │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ PromoRequest          ↑ Result<PromoBundle, PromoError>
//! ┌───────┴──────────────────────────────────────────────────┐
//! │                      后端 (Rust)                         │
//! │                                                          │
//! │  ┌─ error ────── PromoError (调用方可见错误)             │
//! │  │                                                       │
//! │  └─ promo                                                │
//! │      ├─ handler        编排 + 回退 + 阶段耗时            │
//! │      ├─ compositor     小图 440x280 / 横幅 1400x560 /    │
//! │      │                 截图 1280x800                     │
//! │      ├─ raster         tiny-skia + ab_glyph 绘制后端     │
//! │      ├─ loader/pipeline 加载·校验·解码·缩放              │
//! │      └─ fallback       同尺寸占位图                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 调用方可见错误 `PromoError`（缺少图标、截图超限） |
//! | [`promo`] | 加载、解码、排版、合成、编码与回退的完整流水线 |
//!
//! 输出统一为 PNG Data URL，同一输入总是得到逐字节相同的结果。

pub mod error;
pub mod promo;
