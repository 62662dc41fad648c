//! 展示格式化（es-ES 区域习惯）

use crate::date::Timestamp;
use chrono::NaiveDate;

/// 缺失值的占位文本
pub const NOT_AVAILABLE: &str = "N/A";

/// 两位小数，逗号作小数点；整数部分达到 5 位时按千位用点分组
///
/// 与浏览器 `Intl.NumberFormat('es-ES')` 的默认行为一致（4 位数不分组）。
pub fn format_amount(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if int_part.len() >= 5 {
        let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    } else {
        int_part.to_string()
    };

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}{},{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// 货币展示：`$` 前缀
pub fn format_currency(value: f64) -> String {
    format!("${}", format_amount(value))
}

/// `dd/mm/yyyy`，缺失时为 `N/A`
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_timestamp(ts: Option<Timestamp>) -> String {
    format_date(ts.and_then(|t| t.to_date()))
}

/// 解析数字输入；空串、非法值、非有限值按 0 处理
pub fn parse_amount(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// 空文本展示为 `N/A`
pub fn or_not_available(text: &str) -> &str {
    if text.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        text
    }
}
