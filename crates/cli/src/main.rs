use agenda_core::{CoreConfig, FileStore, ScheduleService, Slot, SlotKey, SlotTemplate};
use agenda_types::{PatientId, PhysicianId};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Clinic appointment slot scheduling CLI")]
struct Cli {
    /// Directory holding the slot ledgers
    #[arg(long, env = "AGENDA_DATA_DIR", default_value = "agenda_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure a physician has a full year of slots
    EnsureSchedule {
        /// Physician registration number
        physician: String,
        /// Calendar year (e.g. 2024)
        year: i32,
    },
    /// Reserve an open slot for a patient
    Reserve {
        /// Physician registration number
        physician: String,
        /// Slot date (YYYY-MM-DD)
        date: NaiveDate,
        /// Slot time (HH:MM:SS)
        time: NaiveTime,
        /// Patient identifier
        patient: String,
    },
    /// Cancel a reservation, returning the slot to open
    Cancel {
        /// Physician registration number
        physician: String,
        /// Slot date (YYYY-MM-DD)
        date: NaiveDate,
        /// Slot time (HH:MM:SS)
        time: NaiveTime,
    },
    /// Administratively close a slot (drops any reservation)
    Close {
        /// Physician registration number
        physician: String,
        /// Slot date (YYYY-MM-DD)
        date: NaiveDate,
        /// Slot time (HH:MM:SS)
        time: NaiveTime,
    },
    /// Administratively open a slot (drops any reservation)
    Open {
        /// Physician registration number
        physician: String,
        /// Slot date (YYYY-MM-DD)
        date: NaiveDate,
        /// Slot time (HH:MM:SS)
        time: NaiveTime,
    },
    /// Mark a reserved slot's appointment as having taken place
    Fulfill {
        /// Physician registration number
        physician: String,
        /// Slot date (YYYY-MM-DD)
        date: NaiveDate,
        /// Slot time (HH:MM:SS)
        time: NaiveTime,
    },
    /// List a physician's bookable slots on a date
    ListOpen {
        /// Physician registration number
        physician: String,
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Show every slot a patient holds, across physicians
    History {
        /// Patient identifier
        patient: String,
    },
}

fn slot_line(slot: &Slot) -> String {
    match slot.patient() {
        Some(patient) => format!(
            "{} {} {} {} (patient {})",
            slot.key.physician,
            slot.key.date,
            slot.key.time,
            slot.status(),
            patient
        ),
        None => format!(
            "{} {} {} {}",
            slot.key.physician,
            slot.key.date,
            slot.key.time,
            slot.status()
        ),
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Arc::new(CoreConfig::new(cli.data_dir, SlotTemplate::standard())?);
    let store = FileStore::new(cfg.slot_data_dir().to_path_buf());
    let service = ScheduleService::new(store, cfg);

    match cli.command {
        Commands::EnsureSchedule { physician, year } => {
            let physician = PhysicianId::new(&physician)?;
            let summary = service.ensure_year_schedule(&physician, year)?;
            println!(
                "Created {} slots for physician {} in {} ({} already present)",
                summary.created, physician, year, summary.preserved
            );
        }
        Commands::Reserve {
            physician,
            date,
            time,
            patient,
        } => {
            let key = SlotKey::new(PhysicianId::new(&physician)?, date, time);
            let patient = PatientId::new(&patient)?;
            let slot = service.reserve(&key, patient)?;
            println!("Reserved: {}", slot_line(&slot));
        }
        Commands::Cancel {
            physician,
            date,
            time,
        } => {
            let key = SlotKey::new(PhysicianId::new(&physician)?, date, time);
            let slot = service.cancel(&key)?;
            println!("Cancelled: {}", slot_line(&slot));
        }
        Commands::Close {
            physician,
            date,
            time,
        } => {
            let key = SlotKey::new(PhysicianId::new(&physician)?, date, time);
            let slot = service.close(&key)?;
            println!("Closed: {}", slot_line(&slot));
        }
        Commands::Open {
            physician,
            date,
            time,
        } => {
            let key = SlotKey::new(PhysicianId::new(&physician)?, date, time);
            let slot = service.open(&key)?;
            println!("Opened: {}", slot_line(&slot));
        }
        Commands::Fulfill {
            physician,
            date,
            time,
        } => {
            let key = SlotKey::new(PhysicianId::new(&physician)?, date, time);
            let slot = service.fulfill(&key)?;
            println!("Fulfilled: {}", slot_line(&slot));
        }
        Commands::ListOpen { physician, date } => {
            let physician = PhysicianId::new(&physician)?;
            let slots = service.open_slots(&physician, date)?;
            if slots.is_empty() {
                println!("No open slots for physician {} on {}", physician, date);
            } else {
                for slot in slots {
                    println!("{}", slot_line(&slot));
                }
            }
        }
        Commands::History { patient } => {
            let patient = PatientId::new(&patient)?;
            let slots = service.patient_history(&patient)?;
            if slots.is_empty() {
                println!("No appointments found for patient {}", patient);
            } else {
                for slot in slots {
                    println!("{}", slot_line(&slot));
                }
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
