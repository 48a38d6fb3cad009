// ==========================================
// 热处理炉装炉排产系统 - 营业日计算
// ==========================================
// 职责: 计算两个日期之间的营业日数（排除周六、周日）
// 红线: 无状态、无副作用
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};

// ==========================================
// BusinessCalendar - 营业日纯函数
// ==========================================
pub struct BusinessCalendar;

impl BusinessCalendar {
    /// 是否营业日
    pub fn is_business_day(date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// 计算 start → end 的营业日数
    ///
    /// # 规则
    /// - start ≤ end: 计 [start, end) 区间,start 计入,end 不计入
    /// - end < start: 计 (end, start] 区间并取负（与 numpy busday_count 一致）
    ///   例: 周六 → 前一周五 = 0,周一 → 前一周日 = -1
    ///
    /// # 示例
    /// ```
    /// use chrono::NaiveDate;
    /// use furnace_aps::engine::BusinessCalendar;
    /// // 2026-01-16 周五 → 2026-01-19 周一: 仅周五计入
    /// let fri = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
    /// let mon = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
    /// assert_eq!(BusinessCalendar::business_days_between(fri, mon), 1);
    /// assert_eq!(BusinessCalendar::business_days_between(mon, fri), -1);
    /// ```
    pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
        if end < start {
            let one = Duration::days(1);
            return -Self::count_forward(end + one, start + one);
        }
        Self::count_forward(start, end)
    }

    /// 距交期营业日数（任一日期缺失 → None）
    pub fn distance(today: Option<NaiveDate>, deadline: Option<NaiveDate>) -> Option<i64> {
        match (today, deadline) {
            (Some(start), Some(end)) => Some(Self::business_days_between(start, end)),
            _ => None,
        }
    }

    fn count_forward(start: NaiveDate, end: NaiveDate) -> i64 {
        let days = (end - start).num_days();
        let full_weeks = days / 7;
        let mut count = full_weeks * 5;

        let mut cursor = start + Duration::days(full_weeks * 7);
        while cursor < end {
            if Self::is_business_day(cursor) {
                count += 1;
            }
            cursor += Duration::days(1);
        }
        count
    }
}
