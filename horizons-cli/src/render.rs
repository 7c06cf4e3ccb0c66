use std::fmt::Write;

use horizons_core::{
    Notification, NotificationLevel, Panels,
    presentation::Card,
};

pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        match n.level {
            NotificationLevel::Error => eprintln!("{}", render_notification(n)),
            _ => println!("{}", render_notification(n)),
        }
    }
}

pub fn render_notification(n: &Notification) -> String {
    let tag = match n.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}: {}", n.title, n.description)
}

/// Both sections as plain text. The climate section is omitted when it
/// was skipped.
pub fn render_panels(panels: &Panels) -> String {
    let mut out = String::new();

    if let Some((coordinate, date)) = &panels.query {
        let _ = writeln!(out, "\n{coordinate} on {date}");
    }

    if let Some(cards) = panels.current_cards() {
        render_section(&mut out, "Current weather (OpenWeather)", &cards);
    }

    if let Some(cards) = panels.climate_cards() {
        render_section(&mut out, "Daily climate (NASA POWER)", &cards);
    }

    out
}

fn render_section(out: &mut String, heading: &str, cards: &[Card]) {
    let _ = writeln!(out, "\n{heading}");
    for card in cards {
        let _ = writeln!(out, "  {:<20} {:<22} {}", card.title, card.subtitle, card);
    }
}
