//! # 文本排版模块
//!
//! ## 设计思路
//!
//! 截断与换行只依赖一个“测量宽度”的能力（`TextMeasure`），不绑定具体字体或画布，
//! 单元测试可以用等宽闭包替代真实字体。
//!
//! ## 实现思路
//!
//! - `truncate`：放得下原样返回；否则按字符数二分查找最长的 `前缀 + "..."`，
//!   测量次数为 O(log n)，超长输入也不会卡住。
//! - `wrap`：按空白贪心换行；超出行数时只把最后一行连同下一个词交给 `truncate`，
//!   剩余文本不再参与测量。

/// 截断时追加的省略号。
pub const ELLIPSIS: &str = "...";

/// 文本像素宽度测量能力。
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f32,
{
    fn measure(&self, text: &str) -> f32 {
        self(text)
    }
}

/// 将单行文本截断到 `max_width` 以内。
///
/// 放得下时原样返回；否则返回以 `"..."` 结尾且宽度不超过 `max_width` 的前缀。
/// 连省略号本身都放不下时尽力而为，返回 `"..."`，调用方不应假设最小长度。
///
/// # 示例
/// ```rust
/// use promo_generator::promo::text::truncate;
///
/// let measure = |s: &str| s.chars().count() as f32 * 10.0;
/// assert_eq!(truncate("Hello", 50.0, &measure), "Hello");
/// assert_eq!(truncate("Hello world", 60.0, &measure), "Hel...");
/// ```
pub fn truncate<M>(text: &str, max_width: f32, measurer: &M) -> String
where
    M: TextMeasure + ?Sized,
{
    if measurer.measure(text) <= max_width {
        return text.to_string();
    }

    // 第 k 个字符的起始字节偏移，前缀长度必须小于全文
    let boundaries: Vec<usize> = text.char_indices().map(|(index, _)| index).collect();
    let with_ellipsis =
        |chars: usize| format!("{}{}", text[..boundaries[chars]].trim_end(), ELLIPSIS);

    let mut fitting = None;
    let (mut low, mut high) = (0, boundaries.len());
    while low < high {
        let mid = low + (high - low) / 2;
        let candidate = with_ellipsis(mid);
        if measurer.measure(&candidate) <= max_width {
            fitting = Some(candidate);
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    fitting.unwrap_or_else(|| ELLIPSIS.to_string())
}

/// 按像素宽度贪心换行，最多 `max_lines` 行。
///
/// - 空文本（或只有空白）返回单个空字符串，而不是空序列。
/// - `max_lines` 为 0 时按 1 处理。
/// - 单个词宽于 `max_width` 时该行被截断。
/// - 行数用尽仍有剩余文本时，最后一行连同下一个词被截断为以 `"..."` 结尾。
pub fn wrap<M>(text: &str, max_width: f32, max_lines: usize, measurer: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let max_lines = max_lines.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut consumed = 0;

    for word in &words {
        let candidate = if current.is_empty() {
            (*word).to_string()
        } else {
            format!("{} {}", current, word)
        };

        if current.is_empty() || measurer.measure(&candidate) <= max_width {
            current = candidate;
            consumed += 1;
            continue;
        }

        if lines.len() + 1 == max_lines {
            break;
        }
        lines.push(std::mem::take(&mut current));
        current = (*word).to_string();
        consumed += 1;
    }

    if let Some(next) = words.get(consumed) {
        current = truncate(&format!("{} {}", current, next), max_width, measurer);
    }
    lines.push(current);

    lines
        .into_iter()
        .map(|line| truncate(&line, max_width, measurer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn mono(text: &str) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    #[test]
    fn truncate_keeps_fitting_text() {
        assert_eq!(truncate("Test Extension", 140.0, &mono), "Test Extension");
        assert_eq!(truncate("", 0.0, &mono), "");
    }

    #[test]
    fn truncate_appends_ellipsis_within_budget() {
        let result = truncate("Test Extension", 100.0, &mono);
        assert!(result.ends_with(ELLIPSIS));
        assert!(mono(&result) <= 100.0);
        assert_eq!(result, "Test Ex...");
    }

    #[test]
    fn truncate_drops_trailing_space_before_ellipsis() {
        assert_eq!(truncate("ab cdef", 50.0, &mono), "ab...");
    }

    #[test]
    fn truncate_is_best_effort_when_ellipsis_does_not_fit() {
        assert_eq!(truncate("Hello", 20.0, &mono), ELLIPSIS);
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let result = truncate("插件名称很长很长", 50.0, &mono);
        assert_eq!(result, "插件...");
    }

    #[test]
    fn wrap_empty_text_yields_single_empty_line() {
        assert_eq!(wrap("", 100.0, 3, &mono), vec![String::new()]);
        assert_eq!(wrap("   ", 100.0, 3, &mono), vec![String::new()]);
    }

    #[test]
    fn wrap_breaks_greedily() {
        let lines = wrap("aaa bbb ccc ddd", 70.0, 5, &mono);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn wrap_marks_overflow_with_ellipsis() {
        let lines = wrap("aaa bbb ccc ddd eee fff", 70.0, 2, &mono);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "aaa bbb");
        assert!(lines[1].ends_with(ELLIPSIS));
        assert!(lines.iter().all(|line| mono(line) <= 70.0));
    }

    #[test]
    fn wrap_truncates_overlong_single_word() {
        let lines = wrap("supercalifragilistic short", 80.0, 3, &mono);
        assert_eq!(lines[0], "super...");
        assert_eq!(lines[1], "short");
    }

    #[test]
    fn wrap_treats_zero_max_lines_as_one() {
        let lines = wrap("aaa bbb ccc", 70.0, 0, &mono);
        assert_eq!(lines.len(), 1);
        assert!(mono(&lines[0]) <= 70.0);
    }

    #[test]
    fn truncate_measures_logarithmically_on_long_input() {
        let calls = Cell::new(0usize);
        let counting = |text: &str| {
            calls.set(calls.get() + 1);
            mono(text)
        };
        let text = "x".repeat(50_000);

        let result = truncate(&text, 380.0, &counting);

        assert_eq!(result, format!("{}{}", "x".repeat(35), ELLIPSIS));
        assert!(calls.get() <= 20, "measure calls = {}", calls.get());
    }

    #[test]
    fn wrap_ignores_text_beyond_last_line() {
        let measured = Cell::new(0usize);
        let counting = |text: &str| {
            measured.set(measured.get() + text.chars().count());
            mono(text)
        };
        let text = "lorem ipsum dolor ".repeat(4_000);

        let lines = wrap(&text, 460.0, 3, &counting);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "lorem ipsum dolor lorem ipsum dolor lorem");
        assert!(lines[2].ends_with(ELLIPSIS));
        assert!(lines.iter().all(|line| mono(line) <= 460.0));
        // 远小于全文长度（72000 字符）
        assert!(measured.get() < 5_000, "measured chars = {}", measured.get());
    }
}
