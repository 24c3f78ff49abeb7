//! # 宣传图生成模块（promo）
//!
//! ## 设计思路
//!
//! 该模块将“图片来源识别 → 加载校验 → 解码缩放 → 版式合成 → PNG 编码 → 失败回退”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整次生成，统一处理回退与阶段耗时
//! - `compositor`：小图 / 横幅 / 截图三种版式的绘制
//! - `surface` / `raster`：可注入的绘制能力及其 tiny-skia 实现
//! - `loader` / `pipeline`：来源加载、安全校验、解码与缩放
//! - `text` / `font` / `geometry` / `shape`：排版与几何工具
//! - `layout` / `style`：编译期版式常量与视觉风格调色板
//! - `fallback` / `bundle`：回退图片与输出集合
//! - `config` / `error` / `source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! PromoGenerator::generate_all
//!    ↓
//! handler.rs（配置快照 + 输入校验 + 阶段耗时日志）
//!    ├─ compositor.rs（按版式绘制）
//!    │    ├─ loader.rs / pipeline.rs（加载 + 解码）
//!    │    ├─ text.rs / font.rs（截断 + 换行 + 测量）
//!    │    └─ surface.rs → raster.rs（填充 / 投影 / 贴图 / 文字 / 编码）
//!    └─ fallback.rs（失败时生成同尺寸占位图）
//!    ↓
//! 返回 PromoBundle（PNG Data URL 集合）
//! ```
//!
//! ## 分层职责建议
//!
//! - 尺寸、边距、字号变更优先改 `layout.rs`
//! - 配色变更优先改 `style.rs`
//! - 生成顺序与回退策略变更优先改 `handler.rs`
//! - 输入限制与档位策略变更优先改 `config.rs`

mod bundle;
mod compositor;
mod config;
mod error;
mod fallback;
mod font;
mod geometry;
mod handler;
mod layout;
mod loader;
mod pipeline;
mod raster;
mod shape;
mod source;
mod style;
mod surface;
pub mod text;

pub use bundle::{OutputSlot, PromoBundle};
pub use compositor::Compositor;
pub use config::{DEFAULT_ACCEPTED_MIME_TYPES, EngineConfig, RenderProfile};
pub use error::ImageError;
pub use fallback::{DEFAULT_FALLBACK_CAPTION, generate_fallback};
pub use font::{FontSpec, FontWeight};
pub use geometry::{Rect, Size, fit_contain, fit_contain_capped};
pub use handler::{PromoGenerator, PromoRequest};
pub use layout::{MarqueeLayout, OutputKind, ScreenshotLayout, SmallTileLayout};
pub use raster::{RasterBackend, RasterSurface};
pub use shape::rounded_rect_path;
pub use source::{DecodedImage, EncodedImage, ImageSource, OUTPUT_MIME_TYPE};
pub use style::{StylePalette, VisualStyle};
pub use surface::{Fill, Rgba, Shadow, Surface, SurfaceFactory, TextAlign, TextBaseline, TextStyle};
