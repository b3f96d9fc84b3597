#![allow(dead_code)]

use appointdesk::*;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid test time")
}

pub fn new_year() -> NaiveDate {
    day(2024, 1, 1)
}

pub struct TestDesk {
    pub roster: Roster,
    pub consultation: Uuid,
    pub support: Uuid,
}

impl TestDesk {
    pub fn new() -> Self {
        Self::with_policy(LoadPolicy::CancelledOnly)
    }

    pub fn with_policy(policy: LoadPolicy) -> Self {
        let mut roster = Roster::new(policy);
        let consultation = roster
            .add_service(
                Service::new(
                    "General Consultation".to_string(),
                    ServiceDuration::Half,
                    StaffType::Doctor,
                    None,
                )
                .expect("valid service"),
            )
            .expect("service added");
        let support = roster
            .add_service(
                Service::new(
                    "Quick Support".to_string(),
                    ServiceDuration::Quarter,
                    StaffType::SupportAgent,
                    None,
                )
                .expect("valid service"),
            )
            .expect("service added");

        TestDesk {
            roster,
            consultation,
            support,
        }
    }

    pub fn doctor(&mut self, name: &str, capacity: u32) -> Uuid {
        self.staff(name, StaffType::Doctor, capacity)
    }

    pub fn staff(&mut self, name: &str, kind: StaffType, capacity: u32) -> Uuid {
        self.roster
            .add_staff(Staff::new(name.to_string(), kind, capacity).expect("valid staff"))
            .expect("staff added")
    }

    pub fn book(
        &mut self,
        customer: &str,
        staff_id: Option<Uuid>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Uuid {
        self.roster
            .book_appointment(NewAppointment {
                customer_name: customer.to_string(),
                service_id: self.consultation,
                staff_id,
                date,
                time,
            })
            .expect("appointment booked")
    }

    pub fn queue_item_for(&self, appointment_id: Uuid) -> Uuid {
        self.roster
            .queue()
            .find_by_appointment(appointment_id)
            .map(|item| item.id)
            .expect("appointment is queued")
    }

    pub fn positions(&self) -> Vec<usize> {
        self.roster
            .queue()
            .items()
            .iter()
            .map(|item| item.position)
            .collect()
    }
}
