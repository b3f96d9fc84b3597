//! Staff load, conflict detection and queue auto-assignment for a small
//! appointment desk.
//!
//! A [`Roster`] owns staff, services, appointments and the waiting queue.
//! An [`AutoAssigner`] wraps a roster and hands queued appointments to the
//! least loaded eligible staff member.

pub mod activity;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod queue;
pub mod roster;
pub mod scheduler;
pub mod seed;

pub use activity::{ActivityFeed, ActivityKind, ActivityLog, DEFAULT_ACTIVITY_CAPACITY};
pub use config::DeskConfig;
pub use error::{DeskError, Result};
pub use models::{
    Appointment, AppointmentEdit, AppointmentStatus, AvailabilityStatus, LoadLevel, LoadPolicy,
    NewAppointment, Service, ServiceDuration, Staff, StaffLoad, StaffType, StaffUpdate,
};
pub use queue::{QueueItem, WaitingQueue};
pub use roster::Roster;
pub use scheduler::{AssignmentOutcome, AutoAssigner, BatchAssignmentResult};
pub use seed::RosterSnapshot;
