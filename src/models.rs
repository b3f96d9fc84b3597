//! Data models for the appointment desk.
//!
//! This module defines the records the desk keeps in memory:
//! - Staff: a doctor, consultant or support agent with a daily capacity
//! - Service: a catalogue entry naming the staff type it needs
//! - Appointment: a customer booking, assigned to staff or waiting in the queue
//! - StaffLoad: how many active appointments a staff member holds on a day

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{DeskError, Result};

/// Category of work a staff member performs and a service requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffType {
    Doctor,
    Consultant,
    #[serde(rename = "Support Agent")]
    SupportAgent,
}

impl StaffType {
    /// Convert a string to a StaffType enum value.
    pub fn from_string(value: &str) -> Result<Self> {
        match value.to_lowercase().trim() {
            "doctor" => Ok(StaffType::Doctor),
            "consultant" => Ok(StaffType::Consultant),
            "support agent" | "support" => Ok(StaffType::SupportAgent),
            _ => Err(DeskError::Validation(format!(
                "Invalid staff type: '{}'. Must be one of: doctor, consultant, support agent",
                value
            ))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StaffType::Doctor => "Doctor",
            StaffType::Consultant => "Consultant",
            StaffType::SupportAgent => "Support Agent",
        }
    }
}

impl fmt::Display for StaffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    Available,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl AvailabilityStatus {
    pub fn name(&self) -> &str {
        match self {
            AvailabilityStatus::Available => "Available",
            AvailabilityStatus::OnLeave => "On Leave",
        }
    }
}

/// Length of a service. Only 15, 30 and 60 minute services exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ServiceDuration {
    Quarter,
    Half,
    Hour,
}

impl ServiceDuration {
    pub fn minutes(&self) -> u32 {
        match self {
            ServiceDuration::Quarter => 15,
            ServiceDuration::Half => 30,
            ServiceDuration::Hour => 60,
        }
    }
}

impl TryFrom<u32> for ServiceDuration {
    type Error = DeskError;

    fn try_from(minutes: u32) -> Result<Self> {
        match minutes {
            15 => Ok(ServiceDuration::Quarter),
            30 => Ok(ServiceDuration::Half),
            60 => Ok(ServiceDuration::Hour),
            other => Err(DeskError::Validation(format!(
                "Invalid service duration: {} minutes. Must be 15, 30 or 60",
                other
            ))),
        }
    }
}

impl From<ServiceDuration> for u32 {
    fn from(duration: ServiceDuration) -> u32 {
        duration.minutes()
    }
}

/// Lifecycle state of an appointment.
///
/// Completed, Cancelled and No-Show are terminal. Waiting only exists while
/// the appointment sits in the queue without staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Waiting,
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
}

impl AppointmentStatus {
    /// Convert a string to an AppointmentStatus enum value.
    pub fn from_string(value: &str) -> Result<Self> {
        match value.to_lowercase().trim() {
            "waiting" => Ok(AppointmentStatus::Waiting),
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            "no-show" | "noshow" | "no show" => Ok(AppointmentStatus::NoShow),
            _ => Err(DeskError::Validation(format!(
                "Invalid status: '{}'. Must be one of: waiting, scheduled, completed, cancelled, no-show",
                value
            ))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AppointmentStatus::Waiting => "Waiting",
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No-Show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Whether an appointment may move from `self` to `next`.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            AppointmentStatus::Waiting => next != AppointmentStatus::Waiting,
            AppointmentStatus::Scheduled => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which appointments count toward load and occupy a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Everything except Cancelled is active.
    #[default]
    CancelledOnly,
    /// Cancelled and Completed appointments are both ignored.
    ExcludeCompleted,
}

impl LoadPolicy {
    pub fn from_string(value: &str) -> Result<Self> {
        match value.to_lowercase().trim() {
            "cancelled-only" | "cancelled_only" => Ok(LoadPolicy::CancelledOnly),
            "exclude-completed" | "exclude_completed" => Ok(LoadPolicy::ExcludeCompleted),
            _ => Err(DeskError::Config(format!(
                "Invalid load policy: '{}'. Must be cancelled-only or exclude-completed",
                value
            ))),
        }
    }

    pub fn is_active(&self, status: AppointmentStatus) -> bool {
        match self {
            LoadPolicy::CancelledOnly => status != AppointmentStatus::Cancelled,
            LoadPolicy::ExcludeCompleted => !matches!(
                status,
                AppointmentStatus::Cancelled | AppointmentStatus::Completed
            ),
        }
    }
}

/// A member of staff who can be assigned appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub service_type: StaffType,
    pub daily_capacity: u32,
    pub availability_status: AvailabilityStatus,
}

impl Staff {
    /// Create a new, available staff member with validation.
    pub fn new(name: String, service_type: StaffType, daily_capacity: u32) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(DeskError::Validation("Staff name cannot be empty".to_string()));
        }
        if daily_capacity == 0 {
            return Err(DeskError::Validation(
                "Daily capacity must be positive".to_string(),
            ));
        }

        Ok(Staff {
            id: Uuid::new_v4(),
            name,
            service_type,
            daily_capacity,
            availability_status: AvailabilityStatus::Available,
        })
    }

    pub fn is_available(&self) -> bool {
        self.availability_status == AvailabilityStatus::Available
    }
}

/// Fields an operator may change on an existing staff record.
#[derive(Debug, Clone, Default)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub service_type: Option<StaffType>,
    pub daily_capacity: Option<u32>,
    pub availability_status: Option<AvailabilityStatus>,
}

/// An entry in the service catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub duration: ServiceDuration,
    pub required_staff_type: StaffType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Service {
    pub fn new(
        name: String,
        duration: ServiceDuration,
        required_staff_type: StaffType,
        description: Option<String>,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(DeskError::Validation("Service name cannot be empty".to_string()));
        }

        Ok(Service {
            id: Uuid::new_v4(),
            name,
            duration,
            required_staff_type,
            description: description.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// A customer booking. `assigned_staff_id == None` means it waits in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_name: String,
    pub service_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    #[serde(default = "Local::now")]
    pub created_at: DateTime<Local>,
}

impl Appointment {
    /// Create a new appointment with validation.
    ///
    /// The status follows from the assignment: Scheduled with staff,
    /// Waiting without.
    pub fn new(
        customer_name: String,
        service_id: Uuid,
        assigned_staff_id: Option<Uuid>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self> {
        if customer_name.trim().is_empty() {
            return Err(DeskError::Validation(
                "Customer name cannot be empty".to_string(),
            ));
        }

        let status = match assigned_staff_id {
            Some(_) => AppointmentStatus::Scheduled,
            None => AppointmentStatus::Waiting,
        };

        Ok(Appointment {
            id: Uuid::new_v4(),
            customer_name,
            service_id,
            assigned_staff_id,
            date,
            time,
            status,
            created_at: Local::now(),
        })
    }

    pub fn is_queued(&self) -> bool {
        self.assigned_staff_id.is_none() && !self.status.is_terminal()
    }

    /// Whether this appointment holds `staff_id` at the given date and time.
    pub fn occupies(&self, staff_id: Uuid, date: NaiveDate, time: NaiveTime) -> bool {
        self.assigned_staff_id == Some(staff_id) && self.date == date && self.time == time
    }
}

/// Details for booking a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub customer_name: String,
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Fields an operator may change when editing an appointment in place.
#[derive(Debug, Clone, Default)]
pub struct AppointmentEdit {
    pub customer_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

/// How close a staff member is to their daily capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    Normal,
    NearCapacity,
    Overloaded,
}

/// Active appointments held by a staff member on a day, against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffLoad {
    pub current: usize,
    pub max: u32,
}

impl StaffLoad {
    pub fn has_capacity(&self) -> bool {
        self.current < self.max as usize
    }

    pub fn level(&self) -> LoadLevel {
        let max = self.max as usize;
        if self.current >= max {
            LoadLevel::Overloaded
        } else if self.current + 1 >= max {
            LoadLevel::NearCapacity
        } else {
            LoadLevel::Normal
        }
    }

    /// Percentage of capacity in use. Zero capacity reads as fully used.
    pub fn utilization(&self) -> f64 {
        if self.max == 0 {
            return 100.0;
        }
        (self.current as f64 / self.max as f64) * 100.0
    }
}

impl fmt::Display for StaffLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.max)
    }
}
