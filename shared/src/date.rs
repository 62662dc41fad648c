//! 时间类型模块
//!
//! 提供两种时间表示：
//! - `Timestamp`: 可序列化的毫秒时间戳，文档存储中的原生时间类型
//! - `NaiveDate`: 界面上使用的日历日期（`<input type="date">` 的值）
//!
//! 两者只在存储边界处互相转换。

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

/// `<input type="date">` 使用的格式
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳，用于序列化传输和存储
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数 (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 日历日期在 UTC 零点的时间戳
    pub fn from_date(date: NaiveDate) -> Self {
        let ms = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self(ms)
    }

    /// 转换为 UTC 日历日期，超出表示范围时返回 None
    pub fn to_date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(self.0).map(|dt| dt.date_naive())
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_millis() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 计算两个时间戳之间的差值，负值截断为零
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

// =========================================================
// 日期输入的解析与格式化
// =========================================================

/// 解析 `YYYY-MM-DD`，空串或非法值返回 None
pub fn parse_input_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, INPUT_DATE_FORMAT).ok()
}

/// 格式化为 `<input type="date">` 接受的值
pub fn format_input_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(INPUT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

// =========================================================
// 宽松的时间反序列化
// =========================================================

/// 历史文档里的日期字段可能是毫秒数、浮点数或 ISO 字符串
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl RawDate {
    fn into_timestamp(self) -> Option<Timestamp> {
        match self {
            RawDate::Millis(ms) => Some(Timestamp(ms)),
            RawDate::Float(ms) if ms.is_finite() => Some(Timestamp(ms as i64)),
            RawDate::Float(_) => None,
            RawDate::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| Timestamp(dt.timestamp_millis()))
                .ok()
                .or_else(|| parse_input_date(&s).map(Timestamp::from_date)),
        }
    }
}

/// 无法识别的日期值按缺失处理，而不是让整个文档解析失败
pub(crate) fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDate>::deserialize(deserializer)?;
    Ok(raw.and_then(RawDate::into_timestamp))
}
