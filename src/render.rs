use crate::models::Entry;
use chrono::{Duration, NaiveDate};
use std::fmt::Write;

pub const EMPTY_VIEW_HTML: &str = r#"<div class="empty">No entries for this view.</div>"#;
const DEFAULT_WEIGHT_UNIT: &str = "lb";

/// Pill colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Good,
    Warn,
    Bad,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Good => "good",
            Self::Warn => "warn",
            Self::Bad => "bad",
        }
    }

    pub fn for_energy(energy: &str) -> Self {
        match energy {
            "high" => Self::Good,
            "low" => Self::Bad,
            _ => Self::Warn,
        }
    }

    pub fn for_poop(quality: &str) -> Self {
        match quality {
            "normal" => Self::Good,
            "none" => Self::Warn,
            _ => Self::Bad,
        }
    }
}

/// Markup for the entry list. An empty view renders only the placeholder.
pub fn render_entries(items: &[&Entry]) -> String {
    if items.is_empty() {
        return EMPTY_VIEW_HTML.to_string();
    }
    items.iter().map(|entry| render_entry(entry)).collect()
}

pub fn render_entry(entry: &Entry) -> String {
    // Tones follow the stored value; only the label falls back to `normal`.
    let energy = entry.energy().unwrap_or_default();
    let poop = entry.poop_quality().unwrap_or_default();

    let mut pills = Vec::with_capacity(7);
    if let Some(weight) = entry.finite_weight() {
        let unit = entry
            .weight_unit()
            .filter(|unit| !unit.is_empty())
            .unwrap_or(DEFAULT_WEIGHT_UNIT);
        pills.push(pill(Tone::Plain, &format!("Weight: {weight} {unit}")));
    }
    pills.push(pill(Tone::for_energy(energy), &format!("Energy: {}", or_normal(energy))));
    if let Some(meals) = entry.meals() {
        pills.push(pill(Tone::Plain, &format!("Meals: {meals}")));
    }
    if let Some(cups) = entry.water_cups() {
        pills.push(pill(Tone::Plain, &format!("Water: {cups} cups")));
    }
    if let Some(walks) = entry.walks() {
        pills.push(pill(Tone::Plain, &format!("Walks: {walks}")));
    }
    pills.push(pill(Tone::for_poop(poop), &format!("Poop: {}", or_normal(poop))));
    pills.push(if entry.meds_given() {
        pill(Tone::Warn, "Meds ✓")
    } else {
        pill(Tone::Plain, "Meds ✗")
    });

    let mut html = String::new();
    let _ = write!(
        html,
        "<article class=\"entry\">\n  <h3>{}</h3>\n  <div class=\"row\">\n    {}\n  </div>\n",
        escape_html(&format_date(entry.date().unwrap_or_default())),
        pills.join("\n    ")
    );
    if let Some(notes) = entry.notes().filter(|notes| !notes.is_empty()) {
        let _ = writeln!(html, "  <div class=\"note space-top\">{}</div>", escape_html(notes));
    }
    html.push_str("</article>");
    html
}

pub fn pill(tone: Tone, text: &str) -> String {
    format!("<span class=\"pill {}\">{}</span>", tone.class(), escape_html(text))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `M/D/YYYY` from the numeric year, month and day of a `Y-M-D` string.
/// Out-of-range parts roll over the way a calendar constructor does
/// (`2025-02-30` is `3/2/2025`); years 0-99 mean 1900-1999.
pub fn format_date(raw: &str) -> String {
    calendar_date(raw)
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

fn calendar_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('-').map(date_part);
    let year = parts.next()??;
    let month = parts.next()??;
    let day = parts.next()??;

    let year = if (0..=99).contains(&year) { year + 1900 } else { year };
    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let first = NaiveDate::from_ymd_opt(
        i32::try_from(months.div_euclid(12)).ok()?,
        u32::try_from(months.rem_euclid(12) + 1).ok()?,
        1,
    )?;
    first.checked_add_signed(Duration::try_days(day.checked_sub(1)?)?)
}

fn date_part(part: &str) -> Option<i64> {
    let part = part.trim();
    if part.is_empty() {
        return Some(0);
    }
    part.parse().ok()
}

/// Empty categorical values display as `normal`.
fn or_normal(value: &str) -> &str {
    if value.is_empty() { "normal" } else { value }
}
