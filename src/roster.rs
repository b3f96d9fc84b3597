//! Roster of staff, services and appointments for the desk.
//!
//! This module provides the Roster struct which owns every collection the
//! desk works with and answers the load, conflict and eligibility queries
//! the assignment logic is built on.

use chrono::{Local, NaiveDate, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::activity::{ActivityFeed, ActivityKind};
use crate::error::{DeskError, Result};
use crate::models::{
    Appointment, AppointmentEdit, AppointmentStatus, AvailabilityStatus, LoadPolicy,
    NewAppointment, Service, Staff, StaffLoad, StaffUpdate,
};
use crate::queue::{QueueItem, WaitingQueue};

#[derive(Debug, Clone, Default)]
pub struct Roster {
    policy: LoadPolicy,
    staff: Vec<Staff>,
    services: Vec<Service>,
    appointments: Vec<Appointment>,
    queue: WaitingQueue,
    activity: ActivityFeed,
}

impl Roster {
    pub fn new(policy: LoadPolicy) -> Self {
        Roster {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Staff in the order they were added. This order breaks load ties.
    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    pub fn activity(&self) -> &ActivityFeed {
        &self.activity
    }

    pub fn set_activity_capacity(&mut self, capacity: usize) {
        self.activity.set_capacity(capacity);
    }

    pub fn get_staff(&self, staff_id: Uuid) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == staff_id)
    }

    pub fn get_service(&self, service_id: Uuid) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }

    pub fn get_appointment(&self, appointment_id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == appointment_id)
    }

    fn appointment_mut(&mut self, appointment_id: Uuid) -> Result<&mut Appointment> {
        self.appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
            .ok_or(DeskError::AppointmentNotFound(appointment_id))
    }

    // ---- staff ----

    pub fn add_staff(&mut self, staff: Staff) -> Result<Uuid> {
        if self.get_staff(staff.id).is_some() {
            return Err(DeskError::Validation(format!(
                "Staff member {} already exists",
                staff.id
            )));
        }
        if staff.name.trim().is_empty() {
            return Err(DeskError::Validation("Staff name cannot be empty".to_string()));
        }

        info!(staff_id = %staff.id, "Added {} ({})", staff.name, staff.service_type);
        let id = staff.id;
        self.staff.push(staff);
        Ok(id)
    }

    pub fn update_staff(&mut self, staff_id: Uuid, update: StaffUpdate) -> Result<&Staff> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DeskError::Validation("Staff name cannot be empty".to_string()));
            }
        }

        let staff = self
            .staff
            .iter_mut()
            .find(|s| s.id == staff_id)
            .ok_or(DeskError::StaffNotFound(staff_id))?;

        if let Some(name) = update.name {
            staff.name = name;
        }
        if let Some(service_type) = update.service_type {
            staff.service_type = service_type;
        }
        if let Some(capacity) = update.daily_capacity {
            staff.daily_capacity = capacity;
        }
        if let Some(status) = update.availability_status {
            staff.availability_status = status;
        }

        debug!(staff_id = %staff_id, "Updated staff record");
        Ok(staff)
    }

    pub fn set_availability(&mut self, staff_id: Uuid, status: AvailabilityStatus) -> Result<()> {
        self.update_staff(
            staff_id,
            StaffUpdate {
                availability_status: Some(status),
                ..Default::default()
            },
        )?;
        Ok(())
    }

    /// Remove a staff member. Their open appointments go back to the queue.
    pub fn remove_staff(&mut self, staff_id: Uuid) -> Result<Staff> {
        let index = self
            .staff
            .iter()
            .position(|s| s.id == staff_id)
            .ok_or(DeskError::StaffNotFound(staff_id))?;
        let removed = self.staff.remove(index);

        let mut requeued = Vec::new();
        for appointment in self
            .appointments
            .iter_mut()
            .filter(|a| a.assigned_staff_id == Some(staff_id) && !a.status.is_terminal())
        {
            appointment.assigned_staff_id = None;
            appointment.status = AppointmentStatus::Waiting;
            requeued.push((appointment.id, appointment.customer_name.clone()));
        }

        for (appointment_id, customer) in requeued {
            self.queue.enqueue(appointment_id);
            self.activity.record(
                ActivityKind::Queue,
                format!("{} returned to the queue after {} was removed", customer, removed.name),
            );
        }

        info!(staff_id = %staff_id, "Removed {}", removed.name);
        Ok(removed)
    }

    // ---- services ----

    pub fn add_service(&mut self, service: Service) -> Result<Uuid> {
        if self.get_service(service.id).is_some() {
            return Err(DeskError::Validation(format!(
                "Service {} already exists",
                service.id
            )));
        }

        info!(service_id = %service.id, "Added service {}", service.name);
        let id = service.id;
        self.services.push(service);
        Ok(id)
    }

    /// Remove a service that no appointment references.
    pub fn remove_service(&mut self, service_id: Uuid) -> Result<Service> {
        let index = self
            .services
            .iter()
            .position(|s| s.id == service_id)
            .ok_or(DeskError::ServiceNotFound(service_id))?;

        let references = self
            .appointments
            .iter()
            .filter(|a| a.service_id == service_id)
            .count();
        if references > 0 {
            return Err(DeskError::ServiceInUse {
                service_name: self.services[index].name.clone(),
                appointments: references,
            });
        }

        Ok(self.services.remove(index))
    }

    // ---- queries ----

    fn active_count(&self, staff_id: Uuid, date: NaiveDate, exclude: Option<Uuid>) -> usize {
        self.appointments
            .iter()
            .filter(|a| a.assigned_staff_id == Some(staff_id) && a.date == date)
            .filter(|a| Some(a.id) != exclude)
            .filter(|a| self.policy.is_active(a.status))
            .count()
    }

    /// Active appointments held by a staff member on `as_of`, against capacity.
    pub fn staff_load(&self, staff_id: Uuid, as_of: NaiveDate) -> Option<StaffLoad> {
        let staff = self.get_staff(staff_id)?;
        Some(StaffLoad {
            current: self.active_count(staff_id, as_of, None),
            max: staff.daily_capacity,
        })
    }

    pub fn staff_load_today(&self, staff_id: Uuid) -> Option<StaffLoad> {
        self.staff_load(staff_id, Local::now().date_naive())
    }

    /// Another active appointment holding the same staff, date and time.
    pub fn find_conflict(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Option<&Appointment> {
        self.appointments.iter().find(|a| {
            a.occupies(staff_id, date, time)
                && Some(a.id) != exclude
                && self.policy.is_active(a.status)
        })
    }

    /// Available staff of the type the service requires, in roster order.
    pub fn eligible_staff(&self, service_id: Uuid) -> Vec<&Staff> {
        let Some(service) = self.get_service(service_id) else {
            return Vec::new();
        };

        self.staff
            .iter()
            .filter(|s| s.service_type == service.required_staff_type && s.is_available())
            .collect()
    }

    /// Active appointments for a staff member on a date, sorted by time.
    pub fn staff_appointments_on(&self, staff_id: Uuid, date: NaiveDate) -> Vec<&Appointment> {
        let mut appointments: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.assigned_staff_id == Some(staff_id) && a.date == date)
            .filter(|a| self.policy.is_active(a.status))
            .collect();
        appointments.sort_by_key(|a| a.time);
        appointments
    }

    pub fn appointments_on(&self, date: NaiveDate) -> Vec<&Appointment> {
        let mut appointments: Vec<&Appointment> =
            self.appointments.iter().filter(|a| a.date == date).collect();
        appointments.sort_by_key(|a| a.time);
        appointments
    }

    /// Queue items paired with their appointments, in position order.
    pub fn queued_appointments(&self) -> Vec<(&QueueItem, &Appointment)> {
        self.queue
            .items()
            .iter()
            .filter_map(|item| {
                self.get_appointment(item.appointment_id)
                    .map(|appointment| (item, appointment))
            })
            .collect()
    }

    // ---- assignment checks ----

    /// Check that `staff_id` may take a `service_id` appointment at the slot.
    ///
    /// `exclude` names the appointment being placed so it does not clash
    /// with or count against itself.
    pub fn check_assignment(
        &self,
        service_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let service = self
            .get_service(service_id)
            .ok_or(DeskError::ServiceNotFound(service_id))?;
        let staff = self
            .get_staff(staff_id)
            .ok_or(DeskError::StaffNotFound(staff_id))?;

        if staff.service_type != service.required_staff_type || !staff.is_available() {
            return Err(DeskError::NotEligible {
                staff_name: staff.name.clone(),
                service_name: service.name.clone(),
            });
        }

        self.check_slot(staff_id, date, time, exclude)
    }

    /// Check that `staff_id` is free at the slot and under capacity that day.
    ///
    /// Eligibility is not rechecked, so appointments already held by staff
    /// who went on leave or changed type can still be moved.
    pub fn check_slot(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let staff = self
            .get_staff(staff_id)
            .ok_or(DeskError::StaffNotFound(staff_id))?;

        if self.find_conflict(staff_id, date, time, exclude).is_some() {
            return Err(DeskError::Conflict {
                staff_name: staff.name.clone(),
                date,
                time,
            });
        }

        let current = self.active_count(staff_id, date, exclude);
        if current >= staff.daily_capacity as usize {
            return Err(DeskError::OverCapacity {
                staff_name: staff.name.clone(),
                current,
                max: staff.daily_capacity,
            });
        }

        Ok(())
    }

    fn note_conflict(&mut self, staff_id: Uuid, outcome: Result<()>) -> Result<()> {
        if let Err(err @ DeskError::Conflict { .. }) = &outcome {
            warn!(staff_id = %staff_id, "{}", err);
            self.activity.record(ActivityKind::Conflict, err.to_string());
        }
        outcome
    }

    /// Same as `check_assignment`, noting conflicts in the activity feed.
    pub(crate) fn guard_assignment(
        &mut self,
        service_id: Uuid,
        staff_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let outcome = self.check_assignment(service_id, staff_id, date, time, exclude);
        self.note_conflict(staff_id, outcome)
    }

    /// Give a queued appointment to a staff member and drop it from the queue.
    ///
    /// Callers check eligibility first.
    pub(crate) fn place(&mut self, appointment_id: Uuid, staff_id: Uuid) -> Result<()> {
        let staff_name = self
            .get_staff(staff_id)
            .map(|s| s.name.clone())
            .ok_or(DeskError::StaffNotFound(staff_id))?;

        let appointment = self.appointment_mut(appointment_id)?;
        appointment.assigned_staff_id = Some(staff_id);
        if appointment.status == AppointmentStatus::Waiting {
            appointment.status = AppointmentStatus::Scheduled;
        }
        let customer = appointment.customer_name.clone();

        self.queue.remove_appointment(appointment_id);
        self.activity.record(
            ActivityKind::Assignment,
            format!("{} assigned to {}", customer, staff_name),
        );
        Ok(())
    }

    // ---- appointments ----

    /// Book an appointment. Without staff it joins the back of the queue.
    pub fn book_appointment(&mut self, request: NewAppointment) -> Result<Uuid> {
        if self.get_service(request.service_id).is_none() {
            return Err(DeskError::ServiceNotFound(request.service_id));
        }
        let appointment = Appointment::new(
            request.customer_name,
            request.service_id,
            request.staff_id,
            request.date,
            request.time,
        )?;
        if let Some(staff_id) = request.staff_id {
            self.guard_assignment(request.service_id, staff_id, request.date, request.time, None)?;
        }

        let id = appointment.id;
        let customer = appointment.customer_name.clone();
        self.appointments.push(appointment);

        let staff_name = request
            .staff_id
            .and_then(|staff_id| self.get_staff(staff_id))
            .map(|staff| staff.name.clone());

        match staff_name {
            Some(staff_name) => {
                self.activity.record(
                    ActivityKind::Assignment,
                    format!("{} booked with {}", customer, staff_name),
                );
            }
            None => {
                let item = self.queue.enqueue(id);
                self.activity.record(
                    ActivityKind::Queue,
                    format!("{} joined the queue at position {}", customer, item.position),
                );
            }
        }

        info!(appointment_id = %id, "Booked appointment for {}", customer);
        Ok(id)
    }

    /// Change the customer, date or time of an open appointment.
    pub fn edit_appointment(&mut self, appointment_id: Uuid, edit: AppointmentEdit) -> Result<()> {
        let current = self
            .get_appointment(appointment_id)
            .ok_or(DeskError::AppointmentNotFound(appointment_id))?;

        if current.status.is_terminal() {
            return Err(DeskError::Validation(format!(
                "Cannot edit a {} appointment",
                current.status
            )));
        }
        if let Some(name) = &edit.customer_name {
            if name.trim().is_empty() {
                return Err(DeskError::Validation(
                    "Customer name cannot be empty".to_string(),
                ));
            }
        }

        let date = edit.date.unwrap_or(current.date);
        let time = edit.time.unwrap_or(current.time);
        let moved = date != current.date || time != current.time;

        if let (Some(staff_id), true) = (current.assigned_staff_id, moved) {
            let outcome = self.check_slot(staff_id, date, time, Some(appointment_id));
            self.note_conflict(staff_id, outcome)?;
        }

        let appointment = self.appointment_mut(appointment_id)?;
        if let Some(name) = edit.customer_name {
            appointment.customer_name = name;
        }
        appointment.date = date;
        appointment.time = time;

        debug!(appointment_id = %appointment_id, "Edited appointment");
        Ok(())
    }

    /// Move an appointment to a new status.
    ///
    /// Closing a queued appointment takes it out of the queue.
    pub fn set_status(&mut self, appointment_id: Uuid, status: AppointmentStatus) -> Result<()> {
        let appointment = self.appointment_mut(appointment_id)?;
        let from = appointment.status;

        if !from.can_transition_to(status) {
            return Err(DeskError::InvalidStatusTransition { from, to: status });
        }
        if from == status {
            return Ok(());
        }
        if status == AppointmentStatus::Scheduled && appointment.assigned_staff_id.is_none() {
            return Err(DeskError::Validation(
                "Assign a staff member before scheduling".to_string(),
            ));
        }

        appointment.status = status;
        let message = format!(
            "Appointment for {} marked as {}",
            appointment.customer_name, status
        );

        if status.is_terminal() {
            self.queue.remove_appointment(appointment_id);
        }
        self.activity.record(ActivityKind::Status, message);
        Ok(())
    }

    pub fn delete_appointment(&mut self, appointment_id: Uuid) -> Result<Appointment> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or(DeskError::AppointmentNotFound(appointment_id))?;

        self.queue.remove_appointment(appointment_id);
        let removed = self.appointments.remove(index);
        info!(appointment_id = %appointment_id, "Deleted appointment for {}", removed.customer_name);
        Ok(removed)
    }

    /// Insert a stored appointment as-is, checking only its references.
    ///
    /// Open appointments without staff are queued in insertion order. Closed
    /// ones may name staff who have since been removed.
    pub(crate) fn restore_appointment(&mut self, appointment: Appointment) -> Result<()> {
        if self.get_appointment(appointment.id).is_some() {
            return Err(DeskError::Validation(format!(
                "Appointment {} already exists",
                appointment.id
            )));
        }
        if self.get_service(appointment.service_id).is_none() {
            return Err(DeskError::ServiceNotFound(appointment.service_id));
        }
        // Closed appointments may outlive the staff member who served them.
        if let Some(staff_id) = appointment.assigned_staff_id {
            if self.get_staff(staff_id).is_none() && !appointment.status.is_terminal() {
                return Err(DeskError::StaffNotFound(staff_id));
            }
        }

        if appointment.is_queued() {
            self.queue.enqueue(appointment.id);
        }
        self.appointments.push(appointment);
        Ok(())
    }
}

impl std::fmt::Display for Roster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Roster(staff={}, services={}, appointments={}, queued={})",
            self.staff.len(),
            self.services.len(),
            self.appointments.len(),
            self.queue.len()
        )
    }
}
