//! 时间工具函数
//!
//! 所有日期→时间戳转换统一在 API handler / query 层完成，
//! repository 层只接收 `i64` Unix millis (UTC)。

use chrono::NaiveDate;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 当前 UTC 日期
pub fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 日期开始 (00:00:00 UTC) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// 日期结束 → 次日 00:00:00 UTC 的 Unix millis
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day)
}

/// 日期 → 当天 [start, end) Unix millis 区间
pub fn day_bounds_millis(date: NaiveDate) -> (i64, i64) {
    (day_start_millis(date), day_end_millis(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2026-08-29").is_ok());
        assert!(parse_date("29/08/2026").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_day_bounds() {
        let date = parse_date("2026-08-29").unwrap();
        let (start, end) = day_bounds_millis(date);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }
}
