mod common;

use appointdesk::*;
use assert_matches::assert_matches;
use chrono::Local;
use common::{at, day, new_year, TestDesk};
use uuid::Uuid;

#[test]
fn test_staff_load_counts_active_appointments_on_date() {
    let mut desk = TestDesk::new();
    let riya = desk.doctor("Dr. Riya Sharma", 4);

    desk.book("John Doe", Some(riya), new_year(), at(9, 0));
    let cancelled = desk.book("Jane Smith", Some(riya), new_year(), at(9, 30));
    desk.book("Mike Johnson", Some(riya), new_year(), at(10, 0));
    desk.book("Emily Brown", Some(riya), day(2024, 1, 2), at(9, 0));

    desk.roster
        .set_status(cancelled, AppointmentStatus::Cancelled)
        .expect("cancel");

    let load = desk.roster.staff_load(riya, new_year()).expect("known staff");
    assert_eq!(load, StaffLoad { current: 2, max: 4 });

    let next_day = desk.roster.staff_load(riya, day(2024, 1, 2)).expect("known staff");
    assert_eq!(next_day.current, 1);
}

#[test]
fn test_staff_load_unknown_staff_is_none() {
    let desk = TestDesk::new();
    assert!(desk.roster.staff_load(Uuid::new_v4(), new_year()).is_none());
}

#[test]
fn test_completed_counts_unless_policy_excludes_it() {
    for (policy, expected) in [
        (LoadPolicy::CancelledOnly, 1),
        (LoadPolicy::ExcludeCompleted, 0),
    ] {
        let mut desk = TestDesk::with_policy(policy);
        let riya = desk.doctor("Dr. Riya Sharma", 4);
        let done = desk.book("John Doe", Some(riya), new_year(), at(9, 0));
        desk.roster
            .set_status(done, AppointmentStatus::Completed)
            .expect("complete");

        let load = desk.roster.staff_load(riya, new_year()).expect("known staff");
        assert_eq!(load.current, expected, "policy {:?}", policy);
    }
}

#[test]
fn test_staff_load_today_uses_current_date() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 4);
    let today = Local::now().date_naive();
    desk.book("John Doe", Some(a), today, at(9, 0));
    desk.book("Jane Smith", Some(a), today.succ_opt().expect("tomorrow"), at(9, 0));

    assert_eq!(
        desk.roster.staff_load_today(a),
        Some(StaffLoad { current: 1, max: 4 })
    );
    assert!(desk.roster.staff_load_today(Uuid::new_v4()).is_none());
}

#[test]
fn test_find_conflict_returns_existing_appointment() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    let existing = desk.book("John Doe", Some(a), new_year(), at(9, 0));

    let conflict = desk.roster.find_conflict(a, new_year(), at(9, 0), None);
    assert_eq!(conflict.map(|c| c.id), Some(existing));

    assert!(desk.roster.find_conflict(a, new_year(), at(9, 30), None).is_none());
    assert!(desk.roster.find_conflict(a, day(2024, 1, 2), at(9, 0), None).is_none());
}

#[test]
fn test_find_conflict_honours_exclusion_and_cancellation() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    let b = desk.doctor("Dr. B", 3);
    let existing = desk.book("John Doe", Some(a), new_year(), at(9, 0));

    assert!(desk
        .roster
        .find_conflict(a, new_year(), at(9, 0), Some(existing))
        .is_none());
    assert!(desk.roster.find_conflict(b, new_year(), at(9, 0), None).is_none());

    desk.roster
        .set_status(existing, AppointmentStatus::Cancelled)
        .expect("cancel");
    assert!(desk.roster.find_conflict(a, new_year(), at(9, 0), None).is_none());
}

#[test]
fn test_completed_appointment_holds_its_slot_unless_policy_excludes_it() {
    for (policy, holds_slot) in [
        (LoadPolicy::CancelledOnly, true),
        (LoadPolicy::ExcludeCompleted, false),
    ] {
        let mut desk = TestDesk::with_policy(policy);
        let a = desk.doctor("Dr. A", 3);
        let done = desk.book("John Doe", Some(a), new_year(), at(9, 0));
        desk.roster
            .set_status(done, AppointmentStatus::Completed)
            .expect("complete");

        let conflict = desk.roster.find_conflict(a, new_year(), at(9, 0), None);
        assert_eq!(conflict.map(|c| c.id), holds_slot.then_some(done), "policy {:?}", policy);
    }
}

#[test]
fn test_eligible_staff_matches_type_and_availability() {
    let mut desk = TestDesk::new();
    let first = desk.doctor("Dr. First", 3);
    let on_leave = desk.doctor("Dr. Away", 3);
    desk.staff("Rahul Verma", StaffType::SupportAgent, 8);
    let last = desk.doctor("Dr. Last", 3);

    desk.roster
        .set_availability(on_leave, AvailabilityStatus::OnLeave)
        .expect("on leave");

    let eligible: Vec<Uuid> = desk
        .roster
        .eligible_staff(desk.consultation)
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(eligible, vec![first, last]);

    assert!(desk.roster.eligible_staff(Uuid::new_v4()).is_empty());
}

#[test]
fn test_booking_into_taken_slot_is_a_conflict() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    desk.book("John Doe", Some(a), new_year(), at(9, 0));

    let result = desk.roster.book_appointment(NewAppointment {
        customer_name: "Jane Smith".to_string(),
        service_id: desk.consultation,
        staff_id: Some(a),
        date: new_year(),
        time: at(9, 0),
    });

    assert_matches!(result, Err(DeskError::Conflict { ref staff_name, .. }) if staff_name == "Dr. A");
    assert_eq!(desk.roster.appointments().len(), 1);
    assert_eq!(desk.roster.activity().of_kind(ActivityKind::Conflict).len(), 1);
}

#[test]
fn test_booking_beyond_capacity_is_rejected() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 2);
    desk.book("John Doe", Some(a), new_year(), at(9, 0));
    desk.book("Jane Smith", Some(a), new_year(), at(9, 30));

    let result = desk.roster.book_appointment(NewAppointment {
        customer_name: "Mike Johnson".to_string(),
        service_id: desk.consultation,
        staff_id: Some(a),
        date: new_year(),
        time: at(10, 0),
    });

    assert_matches!(result, Err(DeskError::OverCapacity { current: 2, max: 2, .. }));
}

#[test]
fn test_booking_with_wrong_staff_type_is_rejected() {
    let mut desk = TestDesk::new();
    let agent = desk.staff("Rahul Verma", StaffType::SupportAgent, 8);

    let result = desk.roster.book_appointment(NewAppointment {
        customer_name: "John Doe".to_string(),
        service_id: desk.consultation,
        staff_id: Some(agent),
        date: new_year(),
        time: at(9, 0),
    });

    assert_matches!(result, Err(DeskError::NotEligible { .. }));
}

#[test]
fn test_booking_unknown_service_is_rejected() {
    let mut desk = TestDesk::new();
    let result = desk.roster.book_appointment(NewAppointment {
        customer_name: "John Doe".to_string(),
        service_id: Uuid::new_v4(),
        staff_id: None,
        date: new_year(),
        time: at(9, 0),
    });

    assert_matches!(result, Err(DeskError::ServiceNotFound(_)));
}

#[test]
fn test_booking_without_staff_joins_queue() {
    let mut desk = TestDesk::new();
    let first = desk.book("Thomas White", None, new_year(), at(10, 0));
    let second = desk.book("Jennifer Green", None, new_year(), at(11, 30));

    assert_eq!(desk.positions(), vec![1, 2]);
    let appointment = desk.roster.get_appointment(second).expect("stored");
    assert_eq!(appointment.status, AppointmentStatus::Waiting);
    assert!(appointment.assigned_staff_id.is_none());

    let queued: Vec<Uuid> = desk
        .roster
        .queued_appointments()
        .iter()
        .map(|(_, a)| a.id)
        .collect();
    assert_eq!(queued, vec![first, second]);
}

#[test]
fn test_closing_a_queued_appointment_renumbers_queue() {
    let mut desk = TestDesk::new();
    let first = desk.book("Thomas White", None, new_year(), at(10, 0));
    let second = desk.book("Jennifer Green", None, new_year(), at(11, 30));
    let third = desk.book("Kevin Brown", None, new_year(), at(12, 0));

    desk.roster
        .set_status(second, AppointmentStatus::Cancelled)
        .expect("cancel");

    assert_eq!(desk.positions(), vec![1, 2]);
    let order: Vec<Uuid> = desk
        .roster
        .queue()
        .items()
        .iter()
        .map(|item| item.appointment_id)
        .collect();
    assert_eq!(order, vec![first, third]);
}

#[test]
fn test_deleting_appointment_removes_queue_entry() {
    let mut desk = TestDesk::new();
    let first = desk.book("Thomas White", None, new_year(), at(10, 0));
    desk.book("Jennifer Green", None, new_year(), at(11, 30));

    desk.roster.delete_appointment(first).expect("delete");
    assert_eq!(desk.positions(), vec![1]);
    assert_matches!(
        desk.roster.delete_appointment(first),
        Err(DeskError::AppointmentNotFound(_))
    );
}

#[test]
fn test_terminal_status_cannot_be_reopened() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    let id = desk.book("John Doe", Some(a), new_year(), at(9, 0));

    desk.roster
        .set_status(id, AppointmentStatus::NoShow)
        .expect("no-show");
    assert_matches!(
        desk.roster.set_status(id, AppointmentStatus::Scheduled),
        Err(DeskError::InvalidStatusTransition {
            from: AppointmentStatus::NoShow,
            to: AppointmentStatus::Scheduled,
        })
    );
}

#[test]
fn test_queued_appointment_cannot_be_scheduled_without_staff() {
    let mut desk = TestDesk::new();
    let id = desk.book("Thomas White", None, new_year(), at(10, 0));

    assert_matches!(
        desk.roster.set_status(id, AppointmentStatus::Scheduled),
        Err(DeskError::Validation(_))
    );
    assert_eq!(desk.roster.queue().len(), 1);
}

#[test]
fn test_edit_checks_conflicts_but_not_against_itself() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    let early = desk.book("John Doe", Some(a), new_year(), at(9, 0));
    let late = desk.book("Jane Smith", Some(a), new_year(), at(10, 0));

    desk.roster
        .edit_appointment(
            early,
            AppointmentEdit {
                customer_name: Some("John A. Doe".to_string()),
                time: Some(at(9, 0)),
                ..Default::default()
            },
        )
        .expect("same slot is not a conflict");

    let moved = desk.roster.edit_appointment(
        late,
        AppointmentEdit {
            time: Some(at(9, 0)),
            ..Default::default()
        },
    );
    assert_matches!(moved, Err(DeskError::Conflict { .. }));
    assert_eq!(
        desk.roster.get_appointment(late).map(|a| a.time),
        Some(at(10, 0))
    );

    desk.roster
        .edit_appointment(
            late,
            AppointmentEdit {
                time: Some(at(9, 30)),
                ..Default::default()
            },
        )
        .expect("free slot");
}

#[test]
fn test_edit_keeps_staff_who_went_on_leave() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    let first = desk.book("John Doe", Some(a), new_year(), at(9, 0));
    let second = desk.book("Jane Smith", Some(a), new_year(), at(10, 0));
    desk.roster
        .set_availability(a, AvailabilityStatus::OnLeave)
        .expect("on leave");

    desk.roster
        .edit_appointment(
            first,
            AppointmentEdit {
                time: Some(at(11, 0)),
                ..Default::default()
            },
        )
        .expect("move within the same staff");
    let moved = desk.roster.get_appointment(first).expect("stored");
    assert_eq!(moved.time, at(11, 0));
    assert_eq!(moved.assigned_staff_id, Some(a));

    let clash = desk.roster.edit_appointment(
        second,
        AppointmentEdit {
            time: Some(at(11, 0)),
            ..Default::default()
        },
    );
    assert_matches!(clash, Err(DeskError::Conflict { .. }));
    assert_eq!(desk.roster.activity().of_kind(ActivityKind::Conflict).len(), 1);
}

#[test]
fn test_booking_with_empty_name_fails_before_slot_checks() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    desk.book("John Doe", Some(a), new_year(), at(9, 0));

    let result = desk.roster.book_appointment(NewAppointment {
        customer_name: "   ".to_string(),
        service_id: desk.consultation,
        staff_id: Some(a),
        date: new_year(),
        time: at(9, 0),
    });

    assert_matches!(result, Err(DeskError::Validation(_)));
    assert!(desk.roster.activity().of_kind(ActivityKind::Conflict).is_empty());
    assert_eq!(desk.roster.appointments().len(), 1);
}

#[test]
fn test_service_in_use_cannot_be_removed() {
    let mut desk = TestDesk::new();
    desk.book("Thomas White", None, new_year(), at(10, 0));

    assert_matches!(
        desk.roster.remove_service(desk.consultation),
        Err(DeskError::ServiceInUse { appointments: 1, .. })
    );
    let removed = desk.roster.remove_service(desk.support).expect("unused");
    assert_eq!(removed.name, "Quick Support");
}

#[test]
fn test_removing_staff_requeues_open_appointments() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    let open = desk.book("John Doe", Some(a), new_year(), at(9, 0));
    let done = desk.book("Jane Smith", Some(a), new_year(), at(9, 30));
    desk.roster
        .set_status(done, AppointmentStatus::Completed)
        .expect("complete");

    desk.roster.remove_staff(a).expect("remove");

    let requeued = desk.roster.get_appointment(open).expect("stored");
    assert_eq!(requeued.status, AppointmentStatus::Waiting);
    assert!(requeued.assigned_staff_id.is_none());
    assert_eq!(desk.roster.queue().len(), 1);
    assert_eq!(
        desk.roster.get_appointment(done).and_then(|a| a.assigned_staff_id),
        Some(a)
    );
}

#[test]
fn test_capacity_can_be_lowered_to_zero() {
    let mut desk = TestDesk::new();
    let a = desk.doctor("Dr. A", 3);
    desk.roster
        .update_staff(
            a,
            StaffUpdate {
                daily_capacity: Some(0),
                ..Default::default()
            },
        )
        .expect("update");

    let load = desk.roster.staff_load(a, new_year()).expect("known staff");
    assert!(!load.has_capacity());
    assert_matches!(
        desk.roster.update_staff(
            a,
            StaffUpdate {
                name: Some("  ".to_string()),
                ..Default::default()
            },
        ),
        Err(DeskError::Validation(_))
    );
}
