use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::models::AppointmentStatus;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Staff member not found: {0}")]
    StaffNotFound(Uuid),

    #[error("Service not found: {0}")]
    ServiceNotFound(Uuid),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    #[error("Queue item not found: {0}")]
    QueueItemNotFound(Uuid),

    #[error("Service '{service_name}' is referenced by {appointments} appointment(s)")]
    ServiceInUse {
        service_name: String,
        appointments: usize,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{staff_name} already has an appointment on {date} at {}", .time.format("%H:%M"))]
    Conflict {
        staff_name: String,
        date: NaiveDate,
        time: NaiveTime,
    },

    #[error("{staff_name} is at capacity ({current}/{max})")]
    OverCapacity {
        staff_name: String,
        current: usize,
        max: u32,
    },

    #[error("{staff_name} cannot serve '{service_name}'")]
    NotEligible {
        staff_name: String,
        service_name: String,
    },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeskError>;
