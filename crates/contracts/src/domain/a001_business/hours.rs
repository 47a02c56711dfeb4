//! Недельное расписание работы.
//!
//! Источник данных знает три исторические формы поля `hours` и компактный
//! текст `hours_raw` ("Mon-Thu 08:30-16:00; Fri 08:30-12:00; Sat-Sun closed").
//! Всё сводится к одной форме `{tz, weekly: {mon: [{open, close}], ...}}`.

use std::collections::BTreeMap;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TZ: &str = "Asia/Muscat";

const CLOSED_MARKERS: &[&str] = &["closed", "close", "off", "—", "-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// Day token with the usual aliases (`monday`, `tues`, `thurs`, `mon.`)
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "mon" | "monday" | "mon." => Some(Weekday::Mon),
            "tue" | "tuesday" | "tues" => Some(Weekday::Tue),
            "wed" | "wednesday" => Some(Weekday::Wed),
            "thu" | "thursday" | "thur" | "thurs" => Some(Weekday::Thu),
            "fri" | "friday" => Some(Weekday::Fri),
            "sat" | "saturday" => Some(Weekday::Sat),
            "sun" | "sunday" => Some(Weekday::Sun),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        Weekday::ALL.iter().position(|d| d == self).unwrap_or(0)
    }
}

/// Интервал работы, время в формате `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub open: String,
    pub close: String,
}

impl Interval {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub tz: String,
    pub weekly: BTreeMap<Weekday, Vec<Interval>>,
}

impl WeeklyHours {
    pub fn empty(tz: &str) -> Self {
        Self {
            tz: tz.to_string(),
            weekly: BTreeMap::new(),
        }
    }

    pub fn has_intervals(&self) -> bool {
        self.weekly.values().any(|slots| !slots.is_empty())
    }

    /// Строки вида `Mon: 09:00–17:00`, пустой день `Closed`
    pub fn summary_lines(&self) -> Vec<String> {
        Weekday::ALL
            .iter()
            .map(|day| {
                let slots = self.weekly.get(day).map(Vec::as_slice).unwrap_or(&[]);
                if slots.is_empty() {
                    format!("{}: Closed", day.display_name())
                } else {
                    let joined = slots
                        .iter()
                        .map(|s| format!("{}–{}", s.open, s.close))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{}: {}", day.display_name(), joined)
                }
            })
            .collect()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    // ─── Компактный текст ───────────────────────────────────────────────────

    /// Разбор компактной записи расписания.
    ///
    /// Группы разделяются `;`, внутри группы `<дни> <часы>`. Неверное время
    /// является ошибкой; нераспознанные группы пропускаются.
    pub fn parse_compact(compact: &str, tz: &str) -> anyhow::Result<Self> {
        let mut weekly: BTreeMap<Weekday, Vec<Interval>> =
            Weekday::ALL.iter().map(|d| (*d, Vec::new())).collect();

        for group in compact.split(';').map(str::trim).filter(|g| !g.is_empty()) {
            let Some((days_part, hours_part)) = group.split_once(' ') else {
                continue;
            };

            let days = expand_days(days_part);
            if days.is_empty() {
                continue;
            }

            let hours_part = hours_part.trim().to_lowercase();
            if CLOSED_MARKERS.contains(&hours_part.as_str()) {
                continue;
            }

            let mut intervals = Vec::new();
            for interval in hours_part.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let Some((open, close)) = interval.split_once('-') else {
                    continue;
                };
                intervals.push(Interval::new(parse_time(open)?, parse_time(close)?));
            }

            for day in days {
                weekly.entry(day).or_default().extend(intervals.iter().cloned());
            }
        }

        Ok(Self {
            tz: tz.to_string(),
            weekly,
        })
    }

    // ─── Исторические формы ─────────────────────────────────────────────────

    /// Приводит любую известную форму поля `hours` к каноническому виду.
    /// Нераспознанная форма даёт `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) if map.contains_key("weekly") => {
                let mut hours = Self::empty(&tz_of(value));
                if let Some(weekly) = map.get("weekly").and_then(Value::as_object) {
                    for (day_key, slots) in weekly {
                        let Some(day) = Weekday::from_token(day_key) else {
                            continue;
                        };
                        let parsed = slots_from_value(slots);
                        if !parsed.is_empty() {
                            hours.weekly.insert(day, parsed);
                        }
                    }
                }
                Some(hours)
            }
            Value::Object(map)
                if Weekday::ALL.iter().any(|d| map.contains_key(d.display_name())) =>
            {
                let mut hours = Self::empty(&tz_of(value));
                for day in Weekday::ALL {
                    let parsed = map
                        .get(day.display_name())
                        .map(slots_from_value)
                        .unwrap_or_default();
                    if !parsed.is_empty() {
                        hours.weekly.insert(day, parsed);
                    }
                }
                Some(hours)
            }
            Value::Array(slots) => {
                let mut hours = Self::empty(DEFAULT_TZ);
                for slot in slots.iter().filter_map(Value::as_object) {
                    let days = slot.get("days").and_then(Value::as_str).unwrap_or("").trim();
                    let open = slot.get("open").and_then(Value::as_str);
                    let close = slot.get("close").and_then(Value::as_str);
                    let (Some(open), Some(close)) = (open, close) else {
                        continue;
                    };
                    if days.is_empty() {
                        continue;
                    }
                    for day in expand_days(days) {
                        hours.weekly.entry(day).or_default().push(Interval::new(open, close));
                    }
                }
                Some(hours)
            }
            _ => None,
        }
    }
}

fn tz_of(value: &Value) -> String {
    value
        .get("tz")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TZ)
        .to_string()
}

/// `[{open, close}]`, `[["09:00","17:00"]]` или одна пара `["09:00","17:00"]`
fn slots_from_value(value: &Value) -> Vec<Interval> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    if let Some(pair) = time_pair(value) {
        return vec![pair];
    }
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(Interval::new(
                obj.get("open")?.as_str()?,
                obj.get("close")?.as_str()?,
            )),
            Value::Array(_) => time_pair(item),
            _ => None,
        })
        .collect()
}

fn time_pair(value: &Value) -> Option<Interval> {
    match value.as_array()?.as_slice() {
        [Value::String(open), Value::String(close)] => Some(Interval::new(open.as_str(), close.as_str())),
        _ => None,
    }
}

/// Список дней: токены через запятую, `daily`, диапазоны `mon-thu`
/// (в том числе с переходом через воскресенье).
fn expand_days(days_part: &str) -> Vec<Weekday> {
    let mut days = Vec::new();
    for token in days_part.split(',').map(|t| t.trim().to_lowercase()) {
        if token == "daily" || token == "everyday" {
            days.extend(Weekday::ALL);
        } else if let Some((from, to)) = token.split_once('-') {
            let (Some(from), Some(to)) = (Weekday::from_token(from), Weekday::from_token(to)) else {
                continue;
            };
            let (start, end) = (from.index(), to.index());
            if start <= end {
                days.extend(&Weekday::ALL[start..=end]);
            } else {
                days.extend(&Weekday::ALL[start..]);
                days.extend(&Weekday::ALL[..=end]);
            }
        } else if let Some(day) = Weekday::from_token(&token) {
            days.push(day);
        }
    }
    days
}

/// `H:MM` / `HH:MM` -> `HH:MM`
fn parse_time(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    let Some((hh, mm)) = raw.split_once(':') else {
        bail!("Invalid time: {raw}");
    };
    let valid_digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
    };
    if !valid_digits(hh, 1, 2) || !valid_digits(mm, 2, 2) {
        bail!("Invalid time: {raw}");
    }
    let (h, m): (u32, u32) = (hh.parse()?, mm.parse()?);
    if h > 23 || m > 59 {
        bail!("Invalid time: {raw}");
    }
    Ok(format!("{h:02}:{m:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_compact_groups() {
        let hours = WeeklyHours::parse_compact(
            "Mon-Thu 08:30-16:00; Fri 8:30-12:00; Sat-Sun closed",
            DEFAULT_TZ,
        )
        .unwrap();
        assert_eq!(hours.weekly[&Weekday::Mon], vec![Interval::new("08:30", "16:00")]);
        assert_eq!(hours.weekly[&Weekday::Thu].len(), 1);
        assert_eq!(hours.weekly[&Weekday::Fri], vec![Interval::new("08:30", "12:00")]);
        assert!(hours.weekly[&Weekday::Sat].is_empty());
        assert!(hours.weekly[&Weekday::Sun].is_empty());
        assert!(hours.has_intervals());
    }

    #[test]
    fn test_parse_compact_daily_and_split_shift() {
        let hours = WeeklyHours::parse_compact("Daily 10:00-14:00, 18:00-23:00", DEFAULT_TZ).unwrap();
        for day in Weekday::ALL {
            assert_eq!(hours.weekly[&day].len(), 2);
        }
    }

    #[test]
    fn test_parse_compact_wraparound_range() {
        let hours = WeeklyHours::parse_compact("Sat-Mon 09:00-13:00", DEFAULT_TZ).unwrap();
        let open_days: Vec<Weekday> = hours
            .weekly
            .iter()
            .filter(|(_, slots)| !slots.is_empty())
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(open_days, vec![Weekday::Mon, Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn test_parse_compact_invalid_time() {
        assert!(WeeklyHours::parse_compact("Mon 24:00-25:00", DEFAULT_TZ).is_err());
        assert!(WeeklyHours::parse_compact("Mon 9-17:00", DEFAULT_TZ).is_err());
    }

    #[test]
    fn test_parse_compact_empty() {
        let hours = WeeklyHours::parse_compact("   ", DEFAULT_TZ).unwrap();
        assert!(!hours.has_intervals());
        assert_eq!(hours.weekly.len(), 7);
    }

    #[test]
    fn test_from_value_weekly_form() {
        let hours = WeeklyHours::from_value(&json!({
            "weekly": {"MON": [{"open": "09:00", "close": "17:00"}], "tue": [["10:00", "12:00"]], "wed": []}
        }))
        .unwrap();
        assert_eq!(hours.tz, DEFAULT_TZ);
        assert_eq!(hours.weekly[&Weekday::Mon], vec![Interval::new("09:00", "17:00")]);
        assert_eq!(hours.weekly[&Weekday::Tue], vec![Interval::new("10:00", "12:00")]);
        assert!(!hours.weekly.contains_key(&Weekday::Wed));
    }

    #[test]
    fn test_from_value_legacy_title_case() {
        let hours = WeeklyHours::from_value(&json!({
            "tz": "Asia/Dubai",
            "Mon": ["09:00", "17:00"],
            "Fri": [["09:00", "12:00"], ["16:00", "20:00"]]
        }))
        .unwrap();
        assert_eq!(hours.tz, "Asia/Dubai");
        assert_eq!(hours.weekly[&Weekday::Mon].len(), 1);
        assert_eq!(hours.weekly[&Weekday::Fri].len(), 2);
    }

    #[test]
    fn test_from_value_slot_array() {
        let hours = WeeklyHours::from_value(&json!([
            {"days": "Mon, Tuesday", "open": "09:00", "close": "18:00"},
            {"days": "", "open": "09:00", "close": "18:00"},
            "garbage"
        ]))
        .unwrap();
        assert_eq!(hours.weekly.len(), 2);
        assert!(hours.weekly.contains_key(&Weekday::Tue));
    }

    #[test]
    fn test_from_value_unknown_shape() {
        assert!(WeeklyHours::from_value(&json!("9 to 5")).is_none());
        assert!(WeeklyHours::from_value(&json!({"foo": 1})).is_none());
    }

    #[test]
    fn test_summary_lines() {
        let hours = WeeklyHours::parse_compact("Mon 09:00-17:00", DEFAULT_TZ).unwrap();
        let lines = hours.summary_lines();
        assert_eq!(lines[0], "Mon: 09:00–17:00");
        assert_eq!(lines[6], "Sun: Closed");
    }

    #[test]
    fn test_serializes_lowercase_days() {
        let hours = WeeklyHours::parse_compact("Mon 09:00-17:00", DEFAULT_TZ).unwrap();
        let value = hours.to_value();
        assert_eq!(value["weekly"]["mon"][0]["open"], json!("09:00"));
        assert_eq!(value["tz"], json!("Asia/Muscat"));
    }
}
