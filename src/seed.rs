//! Loading a roster from a JSON snapshot, and the built-in demo roster.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{DeskError, Result};
use crate::models::{
    Appointment, AppointmentStatus, LoadPolicy, NewAppointment, Service, ServiceDuration, Staff,
    StaffType,
};
use crate::roster::Roster;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl RosterSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_roster(roster: &Roster) -> Self {
        RosterSnapshot {
            staff: roster.staff().to_vec(),
            services: roster.services().to_vec(),
            appointments: roster.appointments().to_vec(),
        }
    }
}

impl Roster {
    /// Populate a roster from a snapshot.
    ///
    /// Open appointments without staff are queued in snapshot order.
    pub fn from_snapshot(snapshot: RosterSnapshot, policy: LoadPolicy) -> Result<Self> {
        let mut roster = Roster::new(policy);
        for staff in snapshot.staff {
            roster.add_staff(staff)?;
        }
        for service in snapshot.services {
            roster.add_service(service)?;
        }
        for appointment in snapshot.appointments {
            roster.restore_appointment(appointment)?;
        }

        info!("Loaded {}", roster);
        Ok(roster)
    }
}

pub fn load_snapshot(path: &Path) -> Result<RosterSnapshot> {
    let json = fs::read_to_string(path)?;
    RosterSnapshot::from_json(&json)
}

fn at(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| DeskError::Validation(format!("Invalid time {:02}:{:02}", hour, minute)))
}

/// A small roster with a few staff, services and a non-empty queue on `today`.
pub fn demo_roster(policy: LoadPolicy, today: NaiveDate) -> Result<Roster> {
    let mut roster = Roster::new(policy);

    let riya = roster.add_staff(Staff::new("Dr. Riya Sharma".to_string(), StaffType::Doctor, 4)?)?;
    roster.add_staff(Staff::new("Dr. Arjun Mehta".to_string(), StaffType::Doctor, 3)?)?;
    let priya = roster.add_staff(Staff::new(
        "Priya Patel".to_string(),
        StaffType::Consultant,
        5,
    )?)?;
    roster.add_staff(Staff::new(
        "Rahul Verma".to_string(),
        StaffType::SupportAgent,
        8,
    )?)?;

    let general = roster.add_service(Service::new(
        "General Consultation".to_string(),
        ServiceDuration::Half,
        StaffType::Doctor,
        None,
    )?)?;
    let specialist = roster.add_service(Service::new(
        "Specialist Check-up".to_string(),
        ServiceDuration::Hour,
        StaffType::Doctor,
        Some("Extended examination with a specialist".to_string()),
    )?)?;
    let financial = roster.add_service(Service::new(
        "Financial Consultation".to_string(),
        ServiceDuration::Half,
        StaffType::Consultant,
        None,
    )?)?;
    roster.add_service(Service::new(
        "Quick Support".to_string(),
        ServiceDuration::Quarter,
        StaffType::SupportAgent,
        None,
    )?)?;

    let booked = [
        ("John Doe", general, Some(riya), at(9, 0)?),
        ("Jane Smith", general, Some(riya), at(9, 30)?),
        ("Mike Johnson", financial, Some(priya), at(10, 0)?),
        ("Emily Brown", specialist, Some(riya), at(11, 0)?),
        ("Thomas White", general, None, at(10, 0)?),
        ("Jennifer Green", specialist, None, at(11, 30)?),
        ("Kevin Brown", general, None, at(12, 0)?),
    ];

    let mut first = None;
    for (customer, service_id, staff_id, time) in booked {
        let id = roster.book_appointment(NewAppointment {
            customer_name: customer.to_string(),
            service_id,
            staff_id,
            date: today,
            time,
        })?;
        first.get_or_insert(id);
    }
    if let Some(id) = first {
        roster.set_status(id, AppointmentStatus::Completed)?;
    }

    Ok(roster)
}
