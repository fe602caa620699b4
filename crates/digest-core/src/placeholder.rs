//! Fixed demo collections substituted when the backend is unreachable.
//!
//! When an initial fetch fails, the shell shows these instead of an empty
//! list so the board stays usable in a disconnected demo mode. The contents
//! are fixed; tests compare against them exactly.

use crate::models::{CalendarEvent, Item, TaskEntry};

/// Number of entries in each placeholder collection.
pub const PLACEHOLDER_LEN: usize = 5;

/// Placeholder emails. Ids 1..=5, no subject, no body.
pub fn emails() -> Vec<Item> {
    let first = format!(
        "Hey! Just {}wanted to follow up on our meeting yesterday. Let me know if you have any questions.",
        "wanted to fst ".repeat(30)
    );

    vec![
        Item::new(1, "john@example.com", "", first, "2025-11-14"),
        Item::new(
            2,
            "sarah@company.com",
            "",
            "The quarterly report is ready for review. Please check the attached documents.",
            "2025-11-13",
        ),
        Item::new(
            3,
            "notifications@service.com",
            "",
            "Your subscription will renew on November 20th. Update your payment method if needed.",
            "2025-11-12",
        ),
        Item::new(
            4,
            "team@startup.io",
            "",
            "Congratulations! Your application has been approved. Welcome to the team!",
            "2025-11-11",
        ),
        Item::new(
            5,
            "support@platform.com",
            "",
            "We have received your support ticket. Our team will get back to you within 24 hours.",
            "2025-11-10",
        ),
    ]
}

fn event(
    title: &str,
    start_time: &str,
    end_time: &str,
    location: &str,
    description: &str,
    date: &str,
) -> CalendarEvent {
    CalendarEvent {
        title: title.to_string(),
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
        location: location.to_string(),
        description: description.to_string(),
        date: date.to_string(),
    }
}

/// Placeholder calendar events.
pub fn events() -> Vec<CalendarEvent> {
    vec![
        event(
            "Team Standup",
            "09:00",
            "09:30",
            "Conference Room A",
            "Daily team sync",
            "2025-11-16",
        ),
        event(
            "Client Meeting",
            "14:00",
            "15:00",
            "Zoom",
            "Q4 review with stakeholders",
            "2025-11-16",
        ),
        event(
            "Code Review",
            "11:00",
            "12:00",
            "",
            "Review PRs for the new feature",
            "2025-11-17",
        ),
        event(
            "All Hands Meeting",
            "16:00",
            "17:00",
            "Main Auditorium",
            "Monthly company update",
            "2025-11-18",
        ),
        event(
            "Project Planning",
            "10:00",
            "11:30",
            "Conference Room B",
            "Sprint planning for next iteration",
            "2025-11-19",
        ),
    ]
}

fn task(title: &str, notes: &str, date: &str) -> TaskEntry {
    TaskEntry {
        title: title.to_string(),
        notes: notes.to_string(),
        date: date.to_string(),
    }
}

/// Placeholder tasks.
pub fn tasks() -> Vec<TaskEntry> {
    vec![
        task(
            "Complete project proposal",
            "Include budget breakdown and timeline",
            "2025-11-16",
        ),
        task(
            "Review pull requests",
            "Focus on the authentication module updates",
            "2025-11-17",
        ),
        task(
            "Prepare presentation slides",
            "Client meeting on Thursday - needs charts and demos",
            "2025-11-18",
        ),
        task(
            "Update documentation",
            "API endpoints for the new features",
            "2025-11-19",
        ),
        task(
            "Team 1:1 meetings",
            "Schedule with all team members for feedback",
            "2025-11-20",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_emails_shape() {
        let items = emails();
        assert_eq!(items.len(), PLACEHOLDER_LEN);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert!(items.iter().all(|i| i.body.is_none() && !i.is_enriched()));
    }

    #[test]
    fn test_placeholder_first_email_text() {
        let first = &emails()[0];
        assert!(first.snippet.starts_with("Hey! Just wanted to fst wanted to fst"));
        assert!(first
            .snippet
            .ends_with("wanted to follow up on our meeting yesterday. Let me know if you have any questions."));
        assert_eq!(first.snippet.matches("wanted to fst").count(), 30);
    }

    #[test]
    fn test_placeholder_agenda_lengths() {
        assert_eq!(events().len(), PLACEHOLDER_LEN);
        assert_eq!(tasks().len(), PLACEHOLDER_LEN);
        assert_eq!(events()[2].location, "");
        assert_eq!(tasks()[4].title, "Team 1:1 meetings");
    }
}
