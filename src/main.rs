//! Command-line interface for the appointment desk.
//!
//! This binary provides an interactive menu over a roster for viewing staff
//! load, booking appointments and working through the waiting queue.

use appointdesk::dashboard;
use appointdesk::queue::ordinal_badge;
use appointdesk::seed::{demo_roster, load_snapshot};
use appointdesk::{
    AppointmentStatus, AssignmentOutcome, AutoAssigner, DeskConfig, DeskError, LoadLevel,
    NewAppointment, Roster,
};
use chrono::{Local, NaiveDate, NaiveTime};
use dotenv::dotenv;
use std::io::{self, Write};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct DeskCLI {
    assigner: AutoAssigner,
    config: DeskConfig,
    running: bool,
}

impl DeskCLI {
    fn new(roster: Roster, config: DeskConfig) -> Self {
        DeskCLI {
            assigner: AutoAssigner::new(roster),
            config,
            running: true,
        }
    }

    fn roster(&self) -> &Roster {
        &self.assigner.roster
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       APPOINTMENT DESK");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. View staff load");
        println!("2. View waiting queue");
        println!("3. Book appointment");
        println!("4. Auto-assign a queued appointment");
        println!("5. Auto-assign the whole queue");
        println!("6. Assign a queued appointment manually");
        println!("7. Change appointment status");
        println!("8. Dashboard");
        println!("9. Recent activity");
        println!("0. Exit");
        println!("{}", "-".repeat(20));
    }

    fn get_input(&self, prompt: &str, default: Option<&str>) -> String {
        if let Some(def) = default {
            print!("{} [{}]: ", prompt, def);
        } else {
            print!("{}: ", prompt);
        }
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return default.unwrap_or("").to_string();
        }
        let input = input.trim();

        if input.is_empty() {
            default.unwrap_or("").to_string()
        } else {
            input.to_string()
        }
    }

    fn get_int_input(&self, prompt: &str, default: Option<i32>) -> i32 {
        loop {
            let default_str = default.map(|d| d.to_string());
            let input = self.get_input(prompt, default_str.as_deref());

            if let Ok(value) = input.parse::<i32>() {
                return value;
            }
            println!("Please enter a valid number");
        }
    }

    fn get_date_input(&self, prompt: &str) -> NaiveDate {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        loop {
            let input = self.get_input(prompt, Some(&today));
            match NaiveDate::parse_from_str(&input, "%Y-%m-%d") {
                Ok(date) => return date,
                Err(_) => println!("Please enter a date as YYYY-MM-DD"),
            }
        }
    }

    fn get_time_input(&self, prompt: &str) -> NaiveTime {
        loop {
            let input = self.get_input(prompt, Some("09:00"));
            match NaiveTime::parse_from_str(&input, "%H:%M") {
                Ok(time) => return time,
                Err(_) => println!("Please enter a time as HH:MM"),
            }
        }
    }

    /// Ask for a 1-based index into a list of `len` entries.
    fn choose(&self, prompt: &str, len: usize) -> Option<usize> {
        let choice = self.get_int_input(prompt, Some(0));
        if choice > 0 && (choice as usize) <= len {
            Some(choice as usize - 1)
        } else {
            None
        }
    }

    fn view_staff_load(&self) {
        let date = self.get_date_input("Date");
        let loads = dashboard::staff_loads(self.roster(), date);

        if loads.is_empty() {
            println!("\nNo staff on the roster");
            return;
        }

        println!("\n--- Staff Load on {} ---", date.format("%A, %Y-%m-%d"));
        for (summary, staff) in loads.iter().zip(self.roster().staff()) {
            let marker = match summary.level {
                LoadLevel::Normal => "",
                LoadLevel::NearCapacity => " (near capacity)",
                LoadLevel::Overloaded => " (full)",
            };
            println!(
                "  {:20} {:14} {:9} {}{}",
                summary.staff_name,
                staff.service_type.name(),
                staff.availability_status.name(),
                summary.load,
                marker
            );
        }
    }

    fn view_queue(&self) {
        let queued = self.roster().queued_appointments();

        if queued.is_empty() {
            println!("\nThe waiting queue is empty");
            return;
        }

        println!("\n--- Waiting Queue ({}) ---", queued.len());
        for (item, appointment) in queued {
            let service = self
                .roster()
                .get_service(appointment.service_id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown service");
            let eligible = self.roster().eligible_staff(appointment.service_id).len();
            println!(
                "  {:5} {:20} {} {} at {} ({} eligible staff)",
                ordinal_badge(item.position),
                appointment.customer_name,
                service,
                appointment.date.format("%Y-%m-%d"),
                appointment.time.format("%H:%M"),
                eligible
            );
        }
    }

    fn book_appointment(&mut self) {
        let services = self.roster().services().to_vec();
        if services.is_empty() {
            println!("\nNo services in the catalogue");
            return;
        }

        println!("\n--- Book Appointment ---");
        let customer_name = self.get_input("Customer name", None);

        println!("\nServices:");
        for (i, service) in services.iter().enumerate() {
            println!(
                "  {}. {} ({} min, {})",
                i + 1,
                service.name,
                service.duration.minutes(),
                service.required_staff_type
            );
        }
        let Some(index) = self.choose("Select service", services.len()) else {
            println!("Invalid choice");
            return;
        };
        let service = &services[index];

        let date = self.get_date_input("Date");
        let time = self.get_time_input("Time");

        let eligible: Vec<(uuid::Uuid, String)> = self
            .roster()
            .eligible_staff(service.id)
            .iter()
            .map(|s| (s.id, s.name.clone()))
            .collect();

        println!("\nStaff (0 to leave the appointment in the queue):");
        for (i, (staff_id, name)) in eligible.iter().enumerate() {
            let load = self
                .roster()
                .staff_load(*staff_id, date)
                .map(|l| l.to_string())
                .unwrap_or_default();
            println!("  {}. {} [{}]", i + 1, name, load);
        }
        let staff_id = self
            .choose("Select staff", eligible.len())
            .map(|i| eligible[i].0);

        let request = NewAppointment {
            customer_name: customer_name.clone(),
            service_id: service.id,
            staff_id,
            date,
            time,
        };

        match self.assigner.roster.book_appointment(request) {
            Ok(_) => match staff_id {
                Some(_) => println!("\nAppointment booked for {}", customer_name),
                None => println!(
                    "\n{} added to the queue ({} waiting)",
                    customer_name,
                    self.assigner.pending_count()
                ),
            },
            Err(e @ DeskError::Conflict { .. }) => println!(
                "\nCould not book: {}. Please pick another staff or change the time.",
                e
            ),
            Err(e) => println!("\nCould not book: {}", e),
        }
    }

    fn pick_queue_item(&self) -> Option<uuid::Uuid> {
        let items: Vec<uuid::Uuid> = self.roster().queue().items().iter().map(|i| i.id).collect();
        if items.is_empty() {
            println!("\nThe waiting queue is empty");
            return None;
        }
        self.view_queue();
        self.choose("Select queue position (0 to go back)", items.len())
            .map(|i| items[i])
    }

    fn auto_assign_one(&mut self) {
        let Some(queue_item_id) = self.pick_queue_item() else {
            return;
        };

        match self.assigner.auto_assign(queue_item_id) {
            Ok(AssignmentOutcome::Assigned { staff_id }) => {
                let name = self
                    .roster()
                    .get_staff(staff_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                println!("\nAssigned to {}", name);
            }
            Ok(AssignmentOutcome::Unassignable) => {
                println!("\nNo available staff under capacity; the appointment stays queued")
            }
            Err(e) => println!("\nCould not assign: {}", e),
        }
    }

    fn auto_assign_all(&mut self) {
        let pending = self.assigner.pending_count();
        if pending == 0 {
            println!("\nThe waiting queue is empty");
            return;
        }

        println!("\n--- Processing {} queued appointments ---", pending);
        let result = self.assigner.process_queue();

        println!("\n--- Assignment Results ---");
        println!("  Total queued: {}", result.total_items);
        println!("  Assigned: {}", result.assigned.len());
        println!("  Still waiting: {}", result.unassignable.len());
        println!("  Success rate: {:.1}%", result.success_rate());

        for assigned in &result.assigned {
            println!("  - {}: {}", assigned.customer_name, assigned.message);
        }
        for waiting in &result.unassignable {
            println!("  - {}: {}", waiting.customer_name, waiting.message);
        }
    }

    fn assign_manually(&mut self) {
        let Some(queue_item_id) = self.pick_queue_item() else {
            return;
        };
        let Some((service_id, date)) = self
            .roster()
            .queue()
            .get(queue_item_id)
            .and_then(|item| self.roster().get_appointment(item.appointment_id))
            .map(|a| (a.service_id, a.date))
        else {
            return;
        };

        let eligible: Vec<(uuid::Uuid, String)> = self
            .roster()
            .eligible_staff(service_id)
            .iter()
            .map(|s| (s.id, s.name.clone()))
            .collect();
        if eligible.is_empty() {
            println!("\nNo available staff for this service");
            return;
        }

        for (i, (staff_id, name)) in eligible.iter().enumerate() {
            let load = self
                .roster()
                .staff_load(*staff_id, date)
                .map(|l| l.to_string())
                .unwrap_or_default();
            println!("  {}. {} [{}]", i + 1, name, load);
        }
        let Some(index) = self.choose("Select staff (0 to go back)", eligible.len()) else {
            return;
        };

        match self.assigner.assign_manually(queue_item_id, eligible[index].0) {
            Ok(()) => println!("\nAssigned to {}", eligible[index].1),
            Err(e) => println!("\nCould not assign: {}", e),
        }
    }

    fn change_status(&mut self) {
        let date = self.get_date_input("Date");
        let appointments: Vec<(uuid::Uuid, String)> = self
            .roster()
            .appointments_on(date)
            .iter()
            .map(|a| {
                (
                    a.id,
                    format!("{} {} ({})", a.time.format("%H:%M"), a.customer_name, a.status),
                )
            })
            .collect();

        if appointments.is_empty() {
            println!("\nNo appointments on {}", date);
            return;
        }

        for (i, (_, label)) in appointments.iter().enumerate() {
            println!("  {}. {}", i + 1, label);
        }
        let Some(index) = self.choose("Select appointment (0 to go back)", appointments.len())
        else {
            return;
        };

        let input = self.get_input("New status (completed/cancelled/no-show)", Some("completed"));
        let status = match AppointmentStatus::from_string(&input) {
            Ok(status) => status,
            Err(e) => {
                println!("{}", e);
                return;
            }
        };

        match self.assigner.roster.set_status(appointments[index].0, status) {
            Ok(()) => println!("\nMarked as {}", status),
            Err(e) => println!("\nCould not update status: {}", e),
        }
    }

    fn view_dashboard(&self) {
        let today = Local::now().date_naive();
        let stats = dashboard::summarize(self.roster(), today);

        println!("\n--- Today ({}) ---", today.format("%A, %Y-%m-%d"));
        println!(
            "  Total appointments: {} ({} pending)",
            stats.total_appointments_today, stats.pending
        );
        println!("  Completed: {}", stats.completed);
        println!("  Waiting queue: {}", stats.waiting_queue_count);
        println!(
            "  Available staff: {} ({} on leave)",
            stats.available_staff, stats.on_leave_staff
        );
    }

    fn view_activity(&self) {
        let recent = self.roster().activity().recent(self.config.activity_limit);
        if recent.is_empty() {
            println!("\nNo activity yet");
            return;
        }

        println!("\n--- Recent Activity ---");
        for entry in recent {
            println!(
                "  {} [{:?}] {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.kind,
                entry.message
            );
        }
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let choice = self.get_int_input("Enter choice", Some(8));

            match choice {
                1 => self.view_staff_load(),
                2 => self.view_queue(),
                3 => self.book_appointment(),
                4 => self.auto_assign_one(),
                5 => self.auto_assign_all(),
                6 => self.assign_manually(),
                7 => self.change_status(),
                8 => self.view_dashboard(),
                9 => self.view_activity(),
                0 => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

fn build_roster(config: &DeskConfig) -> appointdesk::Result<Roster> {
    match &config.seed_file {
        Some(path) => {
            info!("Loading roster from {}", path.display());
            Roster::from_snapshot(load_snapshot(path)?, config.load_policy)
        }
        None => demo_roster(config.load_policy, Local::now().date_naive()),
    }
}

fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DeskConfig::from_env();

    let roster = match build_roster(&config) {
        Ok(mut roster) => {
            roster.set_activity_capacity(config.activity_capacity);
            roster
        }
        Err(e) => {
            error!("Failed to load roster: {}", e);
            std::process::exit(1);
        }
    };

    let mut cli = DeskCLI::new(roster, config);
    cli.run();
}
