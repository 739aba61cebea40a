//! Story Context - 日期组合器
//!
//! 故事日期由六个自由文本字段组成（年/月/日，区间时再加一组结束日期）。
//! 本模块负责：
//! - 区间校验：结束日期不能早于开始日期，月份名称必须合法
//! - 生成可读文本 `date_as_text`，如 `March 1st - 5th, 2020`
//!
//! 纯函数实现，不持有任何状态；是否需要重新生成文本由调用方判断后传入。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 月份名称表，下标 + 1 即月份序号
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// 区间两端之间的分隔符
const RANGE_SEPARATOR: &str = " - ";

/// 故事日期字段
///
/// 不变量:
/// - `is_range == false` 时只有开始字段有意义
/// - `is_range == true` 时六个字段都必须非空（由 Story 的必填校验保证）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
    pub is_range: bool,
    pub start_year: Option<String>,
    pub start_month: Option<String>,
    pub start_day: Option<String>,
    pub end_year: Option<String>,
    pub end_month: Option<String>,
    pub end_day: Option<String>,
}

impl DateSpec {
    /// 单个日期
    pub fn single(
        year: impl Into<String>,
        month: impl Into<String>,
        day: impl Into<String>,
    ) -> Self {
        Self {
            is_range: false,
            start_year: Some(year.into()),
            start_month: Some(month.into()),
            start_day: Some(day.into()),
            ..Default::default()
        }
    }

    /// 日期区间，参数顺序为 (年, 月, 日)
    pub fn range(
        start: (&str, &str, &str),
        end: (&str, &str, &str),
    ) -> Self {
        Self {
            is_range: true,
            start_year: Some(start.0.to_string()),
            start_month: Some(start.1.to_string()),
            start_day: Some(start.2.to_string()),
            end_year: Some(end.0.to_string()),
            end_month: Some(end.1.to_string()),
            end_day: Some(end.2.to_string()),
        }
    }

    /// 读取字段值
    pub fn get(&self, field: DateField) -> Option<&str> {
        match field {
            DateField::StartYear => self.start_year.as_deref(),
            DateField::StartMonth => self.start_month.as_deref(),
            DateField::StartDay => self.start_day.as_deref(),
            DateField::EndYear => self.end_year.as_deref(),
            DateField::EndMonth => self.end_month.as_deref(),
            DateField::EndDay => self.end_day.as_deref(),
        }
    }

    /// 六个日期字段是否与另一份完全相同（不比较 `is_range`）
    pub fn same_fields(&self, other: &DateSpec) -> bool {
        DateField::ALL
            .iter()
            .all(|field| self.get(*field) == other.get(*field))
    }

    /// 区间模式下为空的字段
    pub fn blank_fields(&self) -> Vec<DateField> {
        DateField::ALL
            .iter()
            .copied()
            .filter(|field| is_blank(self.get(*field).unwrap_or_default()))
            .collect()
    }
}

/// 日期字段名，用于把校验错误挂到具体字段上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    StartYear,
    StartMonth,
    StartDay,
    EndYear,
    EndMonth,
    EndDay,
}

impl DateField {
    pub const ALL: [DateField; 6] = [
        DateField::StartYear,
        DateField::StartMonth,
        DateField::StartDay,
        DateField::EndYear,
        DateField::EndMonth,
        DateField::EndDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateField::StartYear => "start_year",
            DateField::StartMonth => "start_month",
            DateField::StartDay => "start_day",
            DateField::EndYear => "end_year",
            DateField::EndMonth => "end_month",
            DateField::EndDay => "end_day",
        }
    }
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 日期区间校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("can't be smaller than start year")]
    EndYearBeforeStartYear,

    #[error("Invalid month")]
    InvalidMonthName(DateField),

    #[error("can't be smaller than start month")]
    EndMonthBeforeStartMonth,

    #[error("can't be smaller than start day")]
    EndDayBeforeStartDay,
}

impl DateRangeError {
    /// 错误所属字段
    pub fn field(&self) -> DateField {
        match self {
            DateRangeError::EndYearBeforeStartYear => DateField::EndYear,
            DateRangeError::InvalidMonthName(field) => *field,
            DateRangeError::EndMonthBeforeStartMonth => DateField::EndMonth,
            DateRangeError::EndDayBeforeStartDay => DateField::EndDay,
        }
    }
}

/// 故事日期组合器
pub struct StoryDateComposer;

impl StoryDateComposer {
    /// 校验日期区间，收集全部错误（不会在第一个错误处停止）
    ///
    /// 调用前提：`spec.is_range == true`，且必填校验已由调用方完成。
    pub fn validate_range(spec: &DateSpec) -> Vec<DateRangeError> {
        let mut errors = Vec::new();

        let start_year = parse_int(spec.start_year.as_deref());
        let end_year = parse_int(spec.end_year.as_deref());

        if start_year > end_year {
            errors.push(DateRangeError::EndYearBeforeStartYear);
        }

        let start_month = month_index(spec.start_month.as_deref());
        let end_month = month_index(spec.end_month.as_deref());

        if start_month == 0 {
            errors.push(DateRangeError::InvalidMonthName(DateField::StartMonth));
        }
        if end_month == 0 {
            errors.push(DateRangeError::InvalidMonthName(DateField::EndMonth));
        }
        // 非法月份按 0 参与比较
        if start_year == end_year && start_month > end_month {
            errors.push(DateRangeError::EndMonthBeforeStartMonth);
        }

        if start_year == end_year
            && start_month == end_month
            && parse_int(spec.start_day.as_deref()) > parse_int(spec.end_day.as_deref())
        {
            errors.push(DateRangeError::EndDayBeforeStartDay);
        }

        errors
    }

    /// 生成日期文本
    ///
    /// 区间在同一年时省略开始端的年份；同年同月时再省略结束端的月份。
    /// 输入不合法时退化为部分或空字符串，从不失败。
    pub fn compose_date_as_text(spec: &DateSpec) -> String {
        let start_year = spec.start_year.as_deref().unwrap_or_default();
        let start_month = spec.start_month.as_deref().unwrap_or_default();
        let start_day = spec.start_day.as_deref().unwrap_or_default();

        if !spec.is_range {
            return Self::format_single_date(start_year, start_month, start_day);
        }

        let end_year = spec.end_year.as_deref().unwrap_or_default();
        let end_day = spec.end_day.as_deref().unwrap_or_default();

        let mut left_year = start_year;
        let mut right_month = spec.end_month.as_deref().unwrap_or_default();

        if spec.start_year == spec.end_year {
            left_year = "";
            if spec.start_month == spec.end_month {
                right_month = "";
            }
        }

        let left = Self::format_single_date(left_year, start_month, start_day);
        let right = Self::format_single_date(end_year, right_month, end_day);

        join_present(&[&left, &right], RANGE_SEPARATOR)
    }

    /// 保存前刷新 `date_as_text`
    ///
    /// `fields_changed` 为 false 时保留原文本不动。返回是否重新生成。
    pub fn populate(spec: &DateSpec, fields_changed: bool, date_as_text: &mut String) -> bool {
        if !fields_changed {
            return false;
        }
        *date_as_text = Self::compose_date_as_text(spec);
        true
    }

    /// 格式化单个日期
    ///
    /// - 无日：`March 2020`
    /// - 有日：`March 1st, 2020`
    pub fn format_single_date(year: &str, month: &str, day: &str) -> String {
        if is_blank(day) {
            return join_present(&[month, year], " ");
        }

        let ordinal = ordinalize(parse_int(Some(day)));
        let day_part = join_present(&[month, &ordinal], " ");
        join_present(&[&day_part, year], ", ")
    }
}

/// 月份序号（1-12），无法识别时为 0
///
/// 匹配前把输入转成首字母大写、其余小写的形式，因此大小写不敏感。
pub fn month_index(month: Option<&str>) -> usize {
    let Some(month) = month else {
        return 0;
    };
    let capitalized = capitalize(month);
    MONTH_NAMES
        .iter()
        .position(|name| *name == capitalized)
        .map(|index| index + 1)
        .unwrap_or(0)
}

/// 英文序数词：1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st ...
pub fn ordinalize(number: i64) -> String {
    let abs = number.unsigned_abs();
    let suffix = if (11..=13).contains(&(abs % 100)) {
        "th"
    } else {
        match abs % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", number, suffix)
}

/// 宽松的整数解析
///
/// 跳过前导空白，接受可选符号位，读取开头的连续数字；
/// 其余情况（空、非数字开头）返回 0。`"12abc"` -> 12。
pub fn parse_int(value: Option<&str>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut result: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        result = result
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if negative {
        -result
    } else {
        result
    }
}

/// 空串或纯空白
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn join_present(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .copied()
        .filter(|part| !is_blank(part))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: (&str, &str, &str), end: (&str, &str, &str)) -> DateSpec {
        DateSpec::range(start, end)
    }

    fn fields(errors: &[DateRangeError]) -> Vec<DateField> {
        errors.iter().map(DateRangeError::field).collect()
    }

    #[test]
    fn test_ordinal_suffixes() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (111, "111th"),
            (0, "0th"),
            (-1, "-1st"),
        ];
        for (number, expected) in cases {
            assert_eq!(ordinalize(number), expected);
        }
    }

    #[test]
    fn test_format_single_date() {
        assert_eq!(StoryDateComposer::format_single_date("2020", "", ""), "2020");
        assert_eq!(StoryDateComposer::format_single_date("", "", ""), "");
        assert_eq!(
            StoryDateComposer::format_single_date("2020", "March", "1"),
            "March 1st, 2020"
        );
        assert_eq!(
            StoryDateComposer::format_single_date("2020", "March", ""),
            "March 2020"
        );
        assert_eq!(StoryDateComposer::format_single_date("", "March", "2"), "March 2nd");
        assert_eq!(StoryDateComposer::format_single_date("2020", "", "3"), "3rd, 2020");
        assert_eq!(StoryDateComposer::format_single_date("  ", " ", "\t"), "");
    }

    #[test]
    fn test_non_range_text() {
        let spec = DateSpec::single("1999", "July", "4");
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "July 4th, 1999");

        let spec = DateSpec {
            start_year: Some("1999".to_string()),
            ..Default::default()
        };
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "1999");

        assert_eq!(StoryDateComposer::compose_date_as_text(&DateSpec::default()), "");
    }

    #[test]
    fn test_non_range_ignores_end_fields() {
        let mut spec = DateSpec::single("1999", "July", "");
        spec.end_year = Some("2005".to_string());
        spec.end_month = Some("May".to_string());
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "July 1999");
    }

    #[test]
    fn test_range_same_year_and_month_keeps_only_day_on_left() {
        let spec = range(("2020", "June", "5"), ("2020", "June", "10"));
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "June 5th - 10th, 2020");
    }

    #[test]
    fn test_range_same_year_keeps_month_on_left() {
        let spec = range(("2020", "March", "1"), ("2020", "April", "2"));
        assert_eq!(
            StoryDateComposer::compose_date_as_text(&spec),
            "March 1st - April 2nd, 2020"
        );
    }

    #[test]
    fn test_range_different_years_keeps_both_years() {
        let spec = range(("2019", "December", "31"), ("2020", "January", "1"));
        assert_eq!(
            StoryDateComposer::compose_date_as_text(&spec),
            "December 31st, 2019 - January 1st, 2020"
        );
    }

    #[test]
    fn test_range_without_days() {
        let spec = range(("2019", "May", ""), ("2021", "May", ""));
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "May 2019 - May 2021");

        let spec = range(("2020", "May", ""), ("2020", "May", ""));
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "May - 2020");
    }

    #[test]
    fn test_range_with_blank_side() {
        let spec = DateSpec {
            is_range: true,
            end_year: Some("2020".to_string()),
            ..Default::default()
        };
        assert_eq!(StoryDateComposer::compose_date_as_text(&spec), "2020");
    }

    #[test]
    fn test_compose_is_idempotent() {
        let spec = range(("2020", "March", "1"), ("2021", "April", "2"));
        let first = StoryDateComposer::compose_date_as_text(&spec);
        let second = StoryDateComposer::compose_date_as_text(&spec);
        assert_eq!(first, second);
    }

    #[test]
    fn test_populate_respects_change_gate() {
        let spec = DateSpec::single("2020", "May", "1");
        let mut text = "previous".to_string();

        assert!(!StoryDateComposer::populate(&spec, false, &mut text));
        assert_eq!(text, "previous");

        assert!(StoryDateComposer::populate(&spec, true, &mut text));
        assert_eq!(text, "May 1st, 2020");
    }

    #[test]
    fn test_valid_range_has_no_errors() {
        let spec = range(("2020", "march", "1"), ("2020", "MARCH", "1"));
        assert!(StoryDateComposer::validate_range(&spec).is_empty());
    }

    #[test]
    fn test_end_year_before_start_year() {
        let spec = range(("2020", "March", "1"), ("2019", "March", "1"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert_eq!(errors, vec![DateRangeError::EndYearBeforeStartYear]);
        assert_eq!(fields(&errors), vec![DateField::EndYear]);
    }

    #[test]
    fn test_end_month_before_start_month_in_same_year() {
        let spec = range(("2020", "March", "1"), ("2020", "January", "2"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert_eq!(errors, vec![DateRangeError::EndMonthBeforeStartMonth]);
        assert_eq!(fields(&errors), vec![DateField::EndMonth]);
    }

    #[test]
    fn test_end_day_before_start_day_in_same_month() {
        let spec = range(("2020", "June", "10"), ("2020", "June", "5"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert_eq!(errors, vec![DateRangeError::EndDayBeforeStartDay]);
        assert_eq!(fields(&errors), vec![DateField::EndDay]);
    }

    #[test]
    fn test_month_order_ignored_across_years() {
        let spec = range(("2019", "December", "31"), ("2020", "January", "1"));
        assert!(StoryDateComposer::validate_range(&spec).is_empty());
    }

    #[test]
    fn test_invalid_start_month_reports_invalid_name_only() {
        // 非法开始月份按 0 比较，不会再触发月份顺序错误
        let spec = range(("2020", "Smarch", "1"), ("2020", "May", "2"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert_eq!(errors, vec![DateRangeError::InvalidMonthName(DateField::StartMonth)]);
    }

    #[test]
    fn test_invalid_end_month_also_reports_month_order() {
        let spec = range(("2020", "May", "1"), ("2020", "Smarch", "2"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert_eq!(
            errors,
            vec![
                DateRangeError::InvalidMonthName(DateField::EndMonth),
                DateRangeError::EndMonthBeforeStartMonth,
            ]
        );
        assert_eq!(fields(&errors), vec![DateField::EndMonth, DateField::EndMonth]);
    }

    #[test]
    fn test_all_errors_are_collected() {
        let spec = range(("2021", "Foo", "9"), ("2020", "Bar", "1"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert_eq!(
            errors,
            vec![
                DateRangeError::EndYearBeforeStartYear,
                DateRangeError::InvalidMonthName(DateField::StartMonth),
                DateRangeError::InvalidMonthName(DateField::EndMonth),
            ]
        );
    }

    #[test]
    fn test_both_months_invalid_compares_days() {
        let spec = range(("2020", "Foo", "9"), ("2020", "Bar", "1"));
        let errors = StoryDateComposer::validate_range(&spec);
        assert!(errors.contains(&DateRangeError::EndDayBeforeStartDay));
    }

    #[test]
    fn test_month_index() {
        assert_eq!(month_index(Some("January")), 1);
        assert_eq!(month_index(Some("december")), 12);
        assert_eq!(month_index(Some("sEPTEMBER")), 9);
        assert_eq!(month_index(Some("Sept")), 0);
        assert_eq!(month_index(Some("")), 0);
        assert_eq!(month_index(None), 0);
    }

    #[test]
    fn test_parse_int_is_lenient() {
        assert_eq!(parse_int(Some("2020")), 2020);
        assert_eq!(parse_int(Some(" 12abc")), 12);
        assert_eq!(parse_int(Some("abc")), 0);
        assert_eq!(parse_int(Some("-7")), -7);
        assert_eq!(parse_int(Some("")), 0);
        assert_eq!(parse_int(None), 0);
    }

    #[test]
    fn test_blank_fields_and_change_detection() {
        let mut spec = range(("2020", "", "1"), ("2020", "May", "  "));
        assert_eq!(spec.blank_fields(), vec![DateField::StartMonth, DateField::EndDay]);

        let before = spec.clone();
        spec.is_range = false;
        assert!(spec.same_fields(&before));

        spec.end_day = Some("3".to_string());
        assert!(!spec.same_fields(&before));
    }
}
