//! 矢量形状构建。

use tiny_skia::{Path, PathBuilder};

use super::ImageError;

/// 构建圆角矩形闭合路径，四个角为二次曲线近似的四分之一圆。
///
/// 不校验 `radius`：调用方需保证 `radius <= min(width, height) / 2`。
/// 宽高非正或坐标非有限值时返回 `Composition` 错误。
pub fn rounded_rect_path(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    radius: f32,
) -> Result<Path, ImageError> {
    let finite = [x, y, width, height, radius].iter().all(|v| v.is_finite());
    if !finite || width <= 0.0 || height <= 0.0 {
        return Err(ImageError::Composition(format!(
            "圆角矩形参数无效：x={} y={} w={} h={} r={}",
            x, y, width, height, radius
        )));
    }

    let right = x + width;
    let bottom = y + height;

    let mut pb = PathBuilder::new();
    pb.move_to(x + radius, y);
    pb.line_to(right - radius, y);
    pb.quad_to(right, y, right, y + radius);
    pb.line_to(right, bottom - radius);
    pb.quad_to(right, bottom, right - radius, bottom);
    pb.line_to(x + radius, bottom);
    pb.quad_to(x, bottom, x, bottom - radius);
    pb.line_to(x, y + radius);
    pb.quad_to(x, y, x + radius, y);
    pb.close();

    pb.finish()
        .ok_or_else(|| ImageError::Composition("圆角矩形路径构建失败".to_string()))
}
