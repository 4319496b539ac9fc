use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use volunteer_shifts::config::MailConfig;
use volunteer_shifts::error::MailError;
use volunteer_shifts::grid::{write_csv, write_xlsx, Grid};
use volunteer_shifts::mail::{
    assignment_recipients, attach_emails, deliver_all, extract_missions, DeliveryMode, Mailer,
    OutgoingMail,
};
use volunteer_shifts::roster::{load_roster, SurveyImport, SurveyLayout};
use volunteer_shifts::schedule::{FillEngine, FillReport, RoleTable};

const SURVEY: &str = "\
Horodateur,Prénom,NOM,Adresse mail,\"Si oui, as tu quand même envie d'être bénévole ?\",Combien de temps veux-tu aider ?,Quelles sont tes disponibilités ?,Acceptes-tu de faire des tâches ingrates ?,Tu te sens plutôt,As-tu un brevet de secourisme ?,Bar 14h-23h [postes],Catering 17h-22h [postes],Billetterie [vente],Ateliers 14h 18h [postes]
t,Léa,Dupont,lea@example.org,Oui,2h !,\"14h-15h, 15h-16h\",Oui,Petite nature,Non,Service au bar,,,
t,Paul,Martin,paul@example.org,Oui,1h,14h-15h,Oui,Petite nature,Non,,,,
t,Noé,Petit,noe@example.org,Oui,Pas de limite j'adore le travail !,\"14h-15h, 15h-16h\",Oui,Gros biscotos,Oui,Vaisselle,,,
t,Ada,Roux,,Oui,1h,15h-16h,Non merci,,,,,,
t,Zoé,Blanc,zoe@example.org,Non !,,,,,,,,,
";

const GRID: &str = "\
Planning,,
Rôle,14h-15h,15h-16h
Service au bar,2,1
,Paul Martin,
,,
,,
Vaisselle,1,1
,,
";

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let roster = dir.join("survey.csv");
    let grid = dir.join("planning.csv");
    fs::write(&roster, SURVEY).unwrap();
    fs::write(&grid, GRID).unwrap();
    (roster, grid)
}

fn run(roster: &Path, grid: &Path, seed: u64) -> (SurveyImport, Grid, FillReport) {
    let import = load_roster(roster, &SurveyLayout::default()).unwrap();
    let mut grid = Grid::load(grid).unwrap();
    let mut engine = FillEngine::new(import.roster.clone(), StdRng::seed_from_u64(seed));
    let report = engine.run(&mut grid, &RoleTable::default(), 9);
    (import, grid, report)
}

#[test]
fn fills_every_open_seat_without_breaking_constraints() {
    let dir = tempfile::tempdir().unwrap();
    let (roster, grid_path) = write_inputs(dir.path());

    let (import, grid, report) = run(&roster, &grid_path, 7);

    assert_eq!(import.roster.len(), 4);
    assert_eq!(import.withdrawn, vec!["Zoé Blanc".to_string()]);
    assert_eq!(report.reconcile.matched, 1);
    assert!(report.reconcile.unmatched.is_empty());
    assert_eq!(report.names_written(), 4);
    assert_eq!(report.total_shortfall(), 0);

    // The manual entry is untouched.
    assert_eq!(grid.cell(3, 1), "Paul Martin");

    let mut per_person: HashMap<String, usize> = HashMap::new();
    for (col, _) in grid.hour_columns() {
        let mut seen = Vec::new();
        for row in 2..grid.height() {
            let cell = grid.cell(row, col).trim();
            if cell.is_empty() || grid.is_quota_row(row) {
                continue;
            }
            assert!(!seen.contains(&cell), "{cell} booked twice in column {col}");
            seen.push(cell);
            *per_person.entry(cell.to_string()).or_default() += 1;
        }
    }
    assert_eq!(per_person.get("Paul Martin"), Some(&1));
    assert!(per_person.get("Léa Dupont").copied().unwrap_or(0) <= 2);
    assert!(!per_person.contains_key("Ada Roux"));
    assert!(!per_person.contains_key("Zoé Blanc"));
}

#[test]
fn same_seed_gives_same_grid() {
    let dir = tempfile::tempdir().unwrap();
    let (roster, grid_path) = write_inputs(dir.path());

    let (_, first, _) = run(&roster, &grid_path, 42);
    let (_, second, _) = run(&roster, &grid_path, 42);

    assert_eq!(first, second);
}

#[test]
fn filled_grid_survives_export_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (roster, grid_path) = write_inputs(dir.path());
    let (_, grid, _) = run(&roster, &grid_path, 1);

    let csv_out = dir.path().join("planning_filled.csv");
    let xlsx_out = dir.path().join("planning_filled.xlsx");
    write_csv(&grid, &csv_out).unwrap();
    write_xlsx(&grid, &xlsx_out).unwrap();

    assert_eq!(Grid::load(&csv_out).unwrap(), grid);
    assert!(fs::metadata(&xlsx_out).unwrap().len() > 0);
}

#[derive(Default)]
struct Outbox(Vec<OutgoingMail>);

impl Mailer for Outbox {
    fn send(&mut self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.0.push(mail.clone());
        Ok(())
    }
}

#[test]
fn completed_grid_becomes_one_message_per_volunteer() {
    let dir = tempfile::tempdir().unwrap();
    let (roster, grid_path) = write_inputs(dir.path());
    let (import, grid, _) = run(&roster, &grid_path, 3);

    let config = MailConfig {
        test_address: "test@example.org".to_string(),
        ..MailConfig::default()
    };
    let mut volunteers = extract_missions(&grid, &config.skip_roles, &config.skip_names);
    let unmatched = attach_emails(&mut volunteers, &import.contacts, &config.email_overrides);
    assert_eq!(unmatched, 0);

    let paul = volunteers.iter().find(|v| v.name == "Paul Martin").unwrap();
    assert_eq!(paul.email.as_deref(), Some("paul@example.org"));
    assert_eq!(paul.missions.len(), 1);
    assert_eq!(paul.missions[0].role, "Service au bar");
    assert_eq!(paul.missions[0].hour, "14h-15h");

    let seats: usize = volunteers.iter().map(|v| v.missions.len()).sum();
    assert_eq!(seats, 5);

    let recipients = assignment_recipients(&volunteers, &config);
    let mode = DeliveryMode::from_config(&config, false).unwrap();
    let mut outbox = Outbox::default();
    let report = deliver_all(&mut outbox, &recipients, &mode);

    assert_eq!(report.sent, volunteers.len());
    assert_eq!(report.skipped, 0);
    assert!(outbox.0.iter().all(|m| m.to == "test@example.org"));
}
