//! Presentation projection of board state.
//!
//! Everything here is a pure function of its inputs: the same snapshot and
//! pending set always produce the same cards. "Today" is passed in rather
//! than read from the clock for the same reason.

use chrono::{DateTime, Duration, NaiveDate};
use serde::Serialize;

use digest_core::{CalendarEvent, Item, ItemId, TaskEntry};

use crate::coordinator::PendingLookup;

// =============================================================================
// EMAIL CARDS
// =============================================================================

/// What the body of an email card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardVariant {
    /// The snippet, with a summarize control.
    Plain { snippet: String },
    /// A loading indicator; no control.
    Pending,
    /// The summary; no control.
    Enriched { summary: String },
}

/// One rendered email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: ItemId,
    pub sender: String,
    pub subject: String,
    pub date_label: String,
    pub variant: CardVariant,
}

impl CardView {
    /// Whether the card offers the summarize control.
    pub fn can_trigger(&self) -> bool {
        matches!(self.variant, CardVariant::Plain { .. })
    }
}

/// Variant for a single item. Pending wins over an existing summary.
pub fn card_variant(item: &Item, pending: &impl PendingLookup) -> CardVariant {
    if pending.is_pending(&item.id) {
        CardVariant::Pending
    } else if let Some(summary) = item.enrichment().filter(|_| item.is_enriched()) {
        CardVariant::Enriched {
            summary: summary.to_string(),
        }
    } else {
        CardVariant::Plain {
            snippet: item.snippet.clone(),
        }
    }
}

/// Cards for `items`, in order.
pub fn project(items: &[Item], pending: &impl PendingLookup) -> Vec<CardView> {
    items
        .iter()
        .map(|item| CardView {
            id: item.id.clone(),
            sender: item.sender.clone(),
            subject: item.subject.clone(),
            date_label: date_label(&item.date),
            variant: card_variant(item, pending),
        })
        .collect()
}

// =============================================================================
// DATES AND TIMES
// =============================================================================

/// Parse the calendar date out of a backend date string.
///
/// Accepts `YYYY-MM-DD`, RFC 3339, and RFC 2822 (with or without a trailing
/// `(UTC)`-style comment, as Gmail's `Date:` header often has). Timestamps
/// keep the date in their own offset.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    let without_comment = match raw.rfind(" (") {
        Some(pos) if raw.ends_with(')') => &raw[..pos],
        _ => raw,
    };
    DateTime::parse_from_rfc2822(without_comment)
        .ok()
        .map(|ts| ts.date_naive())
}

/// `"Nov 14, 2025"`, or the raw string when it cannot be parsed.
pub fn date_label(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// `Today`, `Tomorrow`, or the regular date label.
pub fn task_date_label(raw: &str, today: NaiveDate) -> String {
    match parse_date(raw) {
        Some(date) if date == today => "Today".to_string(),
        Some(date) if date == today + Duration::days(1) => "Tomorrow".to_string(),
        _ => date_label(raw),
    }
}

/// Whether a due date lies before `today`. Undated tasks are never overdue.
pub fn is_overdue(raw: &str, today: NaiveDate) -> bool {
    parse_date(raw).is_some_and(|date| date < today)
}

/// `"15:00"` to `"3:00 PM"`. Empty stays empty; anything unparseable is
/// returned as-is.
pub fn format_time_12h(time: &str) -> String {
    let time = time.trim();
    if time.is_empty() {
        return String::new();
    }
    let Some((hours, minutes)) = time.split_once(':') else {
        return time.to_string();
    };
    let Ok(hour) = hours.parse::<u32>() else {
        return time.to_string();
    };
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{} {}", hour12, minutes, suffix)
}

// =============================================================================
// AGENDA CARDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    pub title: String,
    /// `"3:00 PM - 4:00 PM"`, or just the start when there is no end.
    pub time_range: String,
    pub location: String,
    pub description: String,
    pub date_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    pub title: String,
    pub notes: String,
    pub date_label: String,
    pub overdue: bool,
}

pub fn project_events(events: &[CalendarEvent]) -> Vec<EventCard> {
    events
        .iter()
        .map(|event| {
            let start = format_time_12h(&event.start_time);
            let end = format_time_12h(&event.end_time);
            let time_range = if end.is_empty() {
                start
            } else {
                format!("{} - {}", start, end)
            };
            EventCard {
                title: event.title.clone(),
                time_range,
                location: event.location.clone(),
                description: event.description.clone(),
                date_label: date_label(&event.date),
            }
        })
        .collect()
}

pub fn project_tasks(tasks: &[TaskEntry], today: NaiveDate) -> Vec<TaskCard> {
    tasks
        .iter()
        .map(|task| TaskCard {
            title: task.title.clone(),
            notes: task.notes.clone(),
            date_label: task_date_label(&task.date, today),
            overdue: is_overdue(&task.date, today),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn enriched(id: i32, snippet: &str, summary: &str) -> Item {
        let mut item = Item::new(id, "s", "", snippet, "");
        item.set_enrichment(summary).unwrap();
        item
    }

    #[test]
    fn test_variant_precedence() {
        let items = vec![
            Item::new(1, "", "", "a", ""),
            enriched(2, "b", "B summary"),
            enriched(3, "c", "C summary"),
        ];
        let pending: HashSet<ItemId> = [ItemId::from(3)].into_iter().collect();

        let cards = project(&items, &pending);
        assert_eq!(
            cards[0].variant,
            CardVariant::Plain {
                snippet: "a".into()
            }
        );
        assert_eq!(
            cards[1].variant,
            CardVariant::Enriched {
                summary: "B summary".into()
            }
        );
        assert_eq!(cards[2].variant, CardVariant::Pending);
    }

    #[test]
    fn test_empty_summary_renders_plain() {
        let item = enriched(1, "a", "");
        let variant = card_variant(&item, &HashSet::<ItemId>::new());
        assert!(matches!(variant, CardVariant::Plain { .. }));
    }

    #[test]
    fn test_only_plain_cards_can_trigger() {
        let items = vec![Item::new(1, "", "", "a", ""), enriched(2, "b", "S")];
        let pending: HashSet<ItemId> = HashSet::new();
        let cards = project(&items, &pending);
        assert!(cards[0].can_trigger());
        assert!(!cards[1].can_trigger());

        let pending: HashSet<ItemId> = [ItemId::from(1)].into_iter().collect();
        assert!(!project(&items, &pending)[0].can_trigger());
    }

    #[test]
    fn test_projection_is_deterministic() {
        let items = vec![
            Item::new("x", "a@b", "Hi", "a", "2025-11-14"),
            enriched(2, "b", "S"),
        ];
        let pending: HashSet<ItemId> = [ItemId::from("x")].into_iter().collect();
        assert_eq!(project(&items, &pending), project(&items, &pending));
    }

    #[test]
    fn test_card_carries_header_fields() {
        let items = vec![Item::new(
            "18c2f",
            "Sarah <sarah@company.com>",
            "Q4 budget",
            "p",
            "Fri, 14 Nov 2025 09:12:00 -0800",
        )];
        let card = &project(&items, &HashSet::<ItemId>::new())[0];
        assert_eq!(card.id.as_str(), "18c2f");
        assert_eq!(card.sender, "Sarah <sarah@company.com>");
        assert_eq!(card.subject, "Q4 budget");
        assert_eq!(card.date_label, "Nov 14, 2025");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-11-14"), Some(day(2025, 11, 14)));
        assert_eq!(
            parse_date("2025-11-14T23:30:00-05:00"),
            Some(day(2025, 11, 14))
        );
        assert_eq!(
            parse_date("Thu, 13 Nov 2025 18:00:00 +0000 (UTC)"),
            Some(day(2025, 11, 13))
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_date_label_falls_back_to_raw() {
        assert_eq!(date_label("2025-11-03"), "Nov 3, 2025");
        assert_eq!(date_label("sometime"), "sometime");
        assert_eq!(date_label(""), "");
    }

    #[test]
    fn test_task_labels_and_overdue() {
        let today = day(2025, 11, 14);
        assert_eq!(task_date_label("2025-11-14", today), "Today");
        assert_eq!(task_date_label("2025-11-15", today), "Tomorrow");
        assert_eq!(task_date_label("2025-11-20", today), "Nov 20, 2025");
        assert_eq!(task_date_label("", today), "");

        assert!(is_overdue("2025-11-13", today));
        assert!(!is_overdue("2025-11-14", today));
        assert!(!is_overdue("", today));
    }

    #[test]
    fn test_format_time_12h() {
        assert_eq!(format_time_12h("00:05"), "12:05 AM");
        assert_eq!(format_time_12h("09:30"), "9:30 AM");
        assert_eq!(format_time_12h("12:00"), "12:00 PM");
        assert_eq!(format_time_12h("15:00"), "3:00 PM");
        assert_eq!(format_time_12h(""), "");
        assert_eq!(format_time_12h("noon"), "noon");
    }

    #[test]
    fn test_project_agenda() {
        let events = vec![CalendarEvent {
            title: "Office hours".into(),
            start_time: "15:00".into(),
            end_time: "16:00".into(),
            location: "Room 4".into(),
            description: String::new(),
            date: "2025-11-18".into(),
        }];
        let cards = project_events(&events);
        assert_eq!(cards[0].time_range, "3:00 PM - 4:00 PM");
        assert_eq!(cards[0].date_label, "Nov 18, 2025");

        let tasks = vec![TaskEntry {
            title: "Laundry".into(),
            notes: String::new(),
            date: "2025-11-10".into(),
        }];
        let cards = project_tasks(&tasks, day(2025, 11, 14));
        assert!(cards[0].overdue);
        assert_eq!(cards[0].date_label, "Nov 10, 2025");
    }
}
