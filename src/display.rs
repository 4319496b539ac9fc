use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::mail::{DeliveryMode, DeliveryReport, Recipient, VolunteerMissions};
use crate::roster::{Roster, SurveyImport};
use crate::schedule::FillReport;

/// Prints who the survey import left out of the roster.
pub fn print_import_summary(import: &SurveyImport) {
    println!("\n=== Roster ===");
    println!("Volunteers loaded: {}", import.roster.len());
    println!("Contacts: {}", import.contacts.len());

    if !import.withdrawn.is_empty() {
        println!("Withdrawn ({}):", import.withdrawn.len());
        for name in &import.withdrawn {
            println!("  - {}", name);
        }
    }
    if !import.malformed_rows.is_empty() {
        let rows: Vec<String> = import.malformed_rows.iter().map(|r| r.to_string()).collect();
        println!("⚠️  Rows skipped as unreadable: {}", rows.join(", "));
    }
}

/// Prints the outcome of a fill pass, under-filled slots first.
pub fn print_fill_report(report: &FillReport) {
    println!("\n=== Fill ===");
    println!(
        "Manual names matched: {}, unmatched: {}",
        report.reconcile.matched,
        report.reconcile.unmatched.len()
    );
    for name in &report.reconcile.unmatched {
        println!("  ? {}", name);
    }
    println!("Names written: {}", report.names_written());

    let short: Vec<_> = report.shortfalls().collect();
    if short.is_empty() {
        println!("Every slot is filled.");
        return;
    }
    println!("⚠️  Slots still missing people ({} seats):", report.total_shortfall());
    for slot in short {
        let note = if slot.room_limited { " (not enough rows)" } else { "" };
        println!(
            "  {} @ {} -> {}/{}{}",
            slot.role,
            slot.hour,
            slot.names_in_block,
            slot.quota,
            note
        );
    }
}

/// Prints hours given to each volunteer against their cap.
pub fn print_volunteer_totals(roster: &Roster) {
    println!("\n=== Hours per volunteer ===");
    for (_, v) in roster.iter() {
        let cap = v
            .max_hours
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<30} {}/{}", v.full_name(), v.assigned_hours, cap);
    }
}

/// Prints the first message of a batch and where it will go.
pub fn print_preview(first: &Recipient, mode: &DeliveryMode, total: usize) {
    println!("\n=== Preview ({} messages) ===", total);
    match mode {
        DeliveryMode::Production => println!("Mode: PRODUCTION, messages go to the real addresses"),
        DeliveryMode::Test { address } => println!("Mode: test, every message goes to {}", address),
    }
    println!(
        "To: {} <{}>",
        first.name,
        first.email.as_deref().unwrap_or("no address")
    );
    println!("Subject: {}\n", first.subject);
    println!("{}", first.body);
}

pub fn print_delivery_report(report: &DeliveryReport) {
    println!("\n=== Delivery ===");
    println!("Sent: {}", report.sent);
    println!("Failed: {}", report.failed);
    println!("Skipped (no address): {}", report.skipped);
    println!("Total: {}", report.total);
    if let Some(reason) = &report.aborted {
        println!("⚠️  Stopped early: {}", reason);
    }
}

/// Writes every volunteer's day as `name:` followed by `hour    role` lines.
pub fn write_volunteer_schedules<W: Write>(
    out: &mut W,
    volunteers: &[VolunteerMissions],
    generated_at: NaiveDateTime,
) -> std::io::Result<()> {
    writeln!(out, "** Missions, generated {} **", generated_at.format("%Y-%m-%d %H:%M"))?;
    for v in volunteers {
        writeln!(out)?;
        writeln!(out, "{}:", v.name)?;
        for m in &v.missions {
            writeln!(out, "  {:<12}{}", m.hour, m.role)?;
        }
    }
    Ok(())
}

pub fn save_volunteer_schedules<P: AsRef<Path>>(
    path: P,
    volunteers: &[VolunteerMissions],
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_volunteer_schedules(&mut out, volunteers, chrono::Local::now().naive_local())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::Mission;
    use chrono::NaiveDate;

    fn missions() -> Vec<VolunteerMissions> {
        vec![VolunteerMissions {
            name: "Léa Roux".to_string(),
            email: None,
            missions: vec![
                Mission {
                    role: "Vaisselle".to_string(),
                    hour: "18h-19h".to_string(),
                },
                Mission {
                    role: "Service au bar".to_string(),
                    hour: "19h-20h".to_string(),
                },
            ],
        }]
    }

    #[test]
    fn schedule_text_lists_hours_then_roles() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let mut out = Vec::new();

        write_volunteer_schedules(&mut out, &missions(), at).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "** Missions, generated 2024-06-01 09:30 **");
        assert_eq!(lines[2], "Léa Roux:");
        assert_eq!(lines[3], "  18h-19h     Vaisselle");
        assert_eq!(lines[4], "  19h-20h     Service au bar");
    }

    #[test]
    fn saved_schedule_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missions.txt");

        save_volunteer_schedules(&path, &missions()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("** Missions, generated "));
        assert!(text.contains("Léa Roux:"));
    }
}
