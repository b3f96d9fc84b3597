use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AppointmentStatus, LoadLevel, StaffLoad};
use crate::roster::Roster;

/// Headline numbers for one day at the desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_appointments_today: usize,
    pub completed: usize,
    pub pending: usize,
    pub waiting_queue_count: usize,
    pub available_staff: usize,
    pub on_leave_staff: usize,
}

#[derive(Debug, Clone)]
pub struct StaffLoadSummary {
    pub staff_name: String,
    pub load: StaffLoad,
    pub level: LoadLevel,
}

pub fn summarize(roster: &Roster, today: NaiveDate) -> DashboardStats {
    let todays = roster.appointments_on(today);
    let count_status =
        |status: AppointmentStatus| todays.iter().filter(|a| a.status == status).count();
    let available_staff = roster.staff().iter().filter(|s| s.is_available()).count();

    DashboardStats {
        total_appointments_today: todays.len(),
        completed: count_status(AppointmentStatus::Completed),
        pending: count_status(AppointmentStatus::Scheduled),
        waiting_queue_count: roster.queue().len(),
        available_staff,
        on_leave_staff: roster.staff().len() - available_staff,
    }
}

/// Load for every staff member on `date`, in roster order.
pub fn staff_loads(roster: &Roster, date: NaiveDate) -> Vec<StaffLoadSummary> {
    roster
        .staff()
        .iter()
        .filter_map(|staff| {
            roster.staff_load(staff.id, date).map(|load| StaffLoadSummary {
                staff_name: staff.name.clone(),
                level: load.level(),
                load,
            })
        })
        .collect()
}
