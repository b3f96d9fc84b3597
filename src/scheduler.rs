//! Queue auto-assignment.
//!
//! This module provides the AutoAssigner struct which hands queued
//! appointments to the least loaded eligible staff member, or leaves them
//! queued when everyone qualified is at capacity.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DeskError, Result};
use crate::roster::Roster;

/// Outcome of trying to assign one queued appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Assigned { staff_id: Uuid },
    Unassignable,
}

/// Result of an assignment attempt for a single queue item.
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    pub appointment_id: Uuid,
    pub customer_name: String,
    pub outcome: AssignmentOutcome,
    pub message: String,
}

/// Result of working through the whole queue.
#[derive(Debug)]
pub struct BatchAssignmentResult {
    pub assigned: Vec<AssignmentResult>,
    pub unassignable: Vec<AssignmentResult>,
    pub total_items: usize,
}

impl BatchAssignmentResult {
    /// Calculate the success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        (self.assigned.len() as f64 / self.total_items as f64) * 100.0
    }
}

/// Load-balancing assigner for the waiting queue.
///
/// Among the staff eligible for an appointment's service, the one with the
/// fewest active appointments on the appointment's date wins, provided they
/// are under capacity. Ties go to whoever comes first in roster order.
pub struct AutoAssigner {
    pub roster: Roster,
}

impl AutoAssigner {
    pub fn new(roster: Roster) -> Self {
        AutoAssigner { roster }
    }

    /// Pick the staff member who should take an appointment, if anyone can.
    pub fn pick_staff(&self, appointment_id: Uuid) -> Option<Uuid> {
        let appointment = self.roster.get_appointment(appointment_id)?;

        let mut best: Option<(Uuid, usize)> = None;
        for staff in self.roster.eligible_staff(appointment.service_id) {
            let Some(load) = self.roster.staff_load(staff.id, appointment.date) else {
                continue;
            };
            if !load.has_capacity() {
                continue;
            }
            match best {
                Some((_, lowest)) if load.current >= lowest => {}
                _ => best = Some((staff.id, load.current)),
            }
        }

        best.map(|(staff_id, _)| staff_id)
    }

    /// Assign a queued appointment to the least loaded eligible staff member.
    ///
    /// When nobody is eligible or under capacity the appointment stays
    /// queued and `Unassignable` is returned.
    pub fn auto_assign(&mut self, queue_item_id: Uuid) -> Result<AssignmentOutcome> {
        let appointment_id = self
            .roster
            .queue()
            .get(queue_item_id)
            .map(|item| item.appointment_id)
            .ok_or(DeskError::QueueItemNotFound(queue_item_id))?;

        if self.roster.get_appointment(appointment_id).is_none() {
            return Err(DeskError::AppointmentNotFound(appointment_id));
        }

        match self.pick_staff(appointment_id) {
            Some(staff_id) => {
                self.roster.place(appointment_id, staff_id)?;
                info!(appointment_id = %appointment_id, staff_id = %staff_id, "Auto-assigned");
                Ok(AssignmentOutcome::Assigned { staff_id })
            }
            None => {
                debug!(appointment_id = %appointment_id, "No eligible staff under capacity");
                Ok(AssignmentOutcome::Unassignable)
            }
        }
    }

    /// Assign a queued appointment to a staff member chosen by the operator.
    ///
    /// The choice must be eligible, free at that slot and under capacity.
    pub fn assign_manually(&mut self, queue_item_id: Uuid, staff_id: Uuid) -> Result<()> {
        let appointment_id = self
            .roster
            .queue()
            .get(queue_item_id)
            .map(|item| item.appointment_id)
            .ok_or(DeskError::QueueItemNotFound(queue_item_id))?;

        let (service_id, date, time) = self
            .roster
            .get_appointment(appointment_id)
            .map(|a| (a.service_id, a.date, a.time))
            .ok_or(DeskError::AppointmentNotFound(appointment_id))?;

        self.roster
            .guard_assignment(service_id, staff_id, date, time, Some(appointment_id))?;
        self.roster.place(appointment_id, staff_id)?;

        info!(appointment_id = %appointment_id, staff_id = %staff_id, "Manually assigned");
        Ok(())
    }

    /// Try to auto-assign every queued appointment, front to back.
    pub fn process_queue(&mut self) -> BatchAssignmentResult {
        let pending: Vec<(Uuid, Uuid)> = self
            .roster
            .queue()
            .items()
            .iter()
            .map(|item| (item.id, item.appointment_id))
            .collect();
        let total = pending.len();

        let mut assigned = Vec::new();
        let mut unassignable = Vec::new();

        for (queue_item_id, appointment_id) in pending {
            let customer_name = self
                .roster
                .get_appointment(appointment_id)
                .map(|a| a.customer_name.clone())
                .unwrap_or_default();

            match self.auto_assign(queue_item_id) {
                Ok(outcome @ AssignmentOutcome::Assigned { staff_id }) => {
                    let staff_name = self
                        .roster
                        .get_staff(staff_id)
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    assigned.push(AssignmentResult {
                        appointment_id,
                        customer_name,
                        outcome,
                        message: format!("Assigned to {}", staff_name),
                    });
                }
                Ok(AssignmentOutcome::Unassignable) => unassignable.push(AssignmentResult {
                    appointment_id,
                    customer_name,
                    outcome: AssignmentOutcome::Unassignable,
                    message: "No available staff under capacity".to_string(),
                }),
                Err(e) => unassignable.push(AssignmentResult {
                    appointment_id,
                    customer_name,
                    outcome: AssignmentOutcome::Unassignable,
                    message: e.to_string(),
                }),
            }
        }

        BatchAssignmentResult {
            assigned,
            unassignable,
            total_items: total,
        }
    }

    /// Get the number of appointments waiting for staff.
    pub fn pending_count(&self) -> usize {
        self.roster.queue().len()
    }
}
