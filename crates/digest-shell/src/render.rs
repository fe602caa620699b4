//! Plain-text rendering of cards for the terminal.

use std::fmt::Write;

use digest_enrich::{CardVariant, CardView, EventCard, TaskCard};

pub fn email_card(card: &CardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}  {}", card.id, card.sender, card.date_label);
    if !card.subject.is_empty() {
        let _ = writeln!(out, "    {}", card.subject);
    }
    match &card.variant {
        CardVariant::Plain { snippet } => {
            let _ = writeln!(out, "    {}", snippet);
        }
        CardVariant::Pending => {
            let _ = writeln!(out, "    (summarizing...)");
        }
        CardVariant::Enriched { summary } => {
            let _ = writeln!(out, "    Summary: {}", summary);
        }
    }
    out
}

pub fn event_card(card: &EventCard) -> String {
    let mut out = format!("{}  {}  {}\n", card.date_label, card.time_range, card.title);
    if !card.location.is_empty() {
        let _ = writeln!(out, "    @ {}", card.location);
    }
    if !card.description.is_empty() {
        let _ = writeln!(out, "    {}", card.description);
    }
    out
}

pub fn task_card(card: &TaskCard) -> String {
    let marker = if card.overdue { "!" } else { "-" };
    let mut out = if card.date_label.is_empty() {
        format!("{} {}\n", marker, card.title)
    } else {
        format!("{} {} ({})\n", marker, card.title, card.date_label)
    };
    if !card.notes.is_empty() {
        let _ = writeln!(out, "    {}", card.notes);
    }
    out
}
