use chrono::NaiveDate;
use hospital_core::db::open_db_in_memory;
use hospital_core::{
    sqlite_service, AppointmentRepository, DoctorId, NewDoctor, NewPatient, PatientId,
    ServiceError, SqliteAppointmentRepository, SqliteHospitalService,
};
use rusqlite::Connection;

fn seed(service: &SqliteHospitalService<'_>) -> (PatientId, DoctorId) {
    let patient_id = service
        .add_patient(&NewPatient {
            name: "John".to_string(),
            surname: "Smith".to_string(),
            age: 42,
            gender: "male".to_string(),
            contact: "555-0100".to_string(),
        })
        .unwrap();
    let doctor_id = service
        .add_doctor(&NewDoctor {
            name: "Greta".to_string(),
            surname: "House".to_string(),
            specialization: "Cardiology".to_string(),
            contact: "ext 12".to_string(),
        })
        .unwrap();
    (patient_id, doctor_id)
}

fn appointment_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM appointments;", [], |row| row.get(0))
        .unwrap()
}

fn day(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

#[test]
fn booking_valid_date_appends_one_appointment() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);

    let id = service
        .book_appointment(patient_id, doctor_id, "2024-02-20")
        .unwrap();

    let appointments = service.list_appointments().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].id, id);
    assert_eq!(appointments[0].patient_id, patient_id);
    assert_eq!(appointments[0].doctor_id, doctor_id);
    assert_eq!(appointments[0].appointment_date, day("2024-02-20"));
}

#[test]
fn booking_impossible_date_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);
    let before = appointment_count(&conn);

    let err = service
        .book_appointment(patient_id, doctor_id, "2024-02-30")
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidDate(ref text) if text == "2024-02-30"));
    assert!(err.is_recoverable());
    assert_eq!(appointment_count(&conn), before);
}

#[test]
fn booking_malformed_date_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);

    for text in [
        "20-02-2024",
        "2024/02/20",
        "",
        "next monday",
        "24-02-20",
        "-2024-02-20",
        " 2024-02-20",
    ] {
        let err = service
            .book_appointment(patient_id, doctor_id, text)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDate(_)), "accepted `{text}`");
    }
    assert_eq!(appointment_count(&conn), 0);
}

#[test]
fn booking_for_missing_patient_or_doctor_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);

    let err = service
        .book_appointment(patient_id + 100, doctor_id, "2024-02-20")
        .unwrap_err();
    assert!(matches!(err, ServiceError::PatientNotFound(_)));

    let err = service
        .book_appointment(patient_id, doctor_id + 100, "2024-02-20")
        .unwrap_err();
    assert!(matches!(err, ServiceError::DoctorNotFound(_)));

    assert_eq!(appointment_count(&conn), 0);
}

#[test]
fn search_appointments_matches_exact_day_only() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);

    let on_day = service
        .book_appointment(patient_id, doctor_id, "2024-02-20")
        .unwrap();
    service
        .book_appointment(patient_id, doctor_id, "2024-02-21")
        .unwrap();
    let also_on_day = service
        .book_appointment(patient_id, doctor_id, "2024-02-20")
        .unwrap();

    let ids: Vec<i64> = service
        .search_appointments("2024-02-20")
        .unwrap()
        .into_iter()
        .map(|appointment| appointment.id)
        .collect();
    assert_eq!(ids, vec![on_day, also_on_day]);

    assert!(service.search_appointments("2023-01-01").unwrap().is_empty());
    assert!(matches!(
        service.search_appointments("Feb 20").unwrap_err(),
        ServiceError::InvalidDate(_)
    ));
}

#[test]
fn patient_and_doctor_back_references() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (john, greta) = seed(&service);
    let (anna, ivan) = {
        let anna = service
            .add_patient(&NewPatient {
                name: "Anna".to_string(),
                surname: "Berg".to_string(),
                age: 29,
                gender: "female".to_string(),
                contact: "anna@example.org".to_string(),
            })
            .unwrap();
        let ivan = service
            .add_doctor(&NewDoctor {
                name: "Ivan".to_string(),
                surname: "Petrov".to_string(),
                specialization: "Dermatology".to_string(),
                contact: "ext 40".to_string(),
            })
            .unwrap();
        (anna, ivan)
    };

    let first = service.book_appointment(john, greta, "2024-03-01").unwrap();
    let second = service.book_appointment(anna, greta, "2024-03-02").unwrap();
    let third = service.book_appointment(john, ivan, "2024-03-03").unwrap();

    let johns: Vec<i64> = service
        .patient_appointments(john)
        .unwrap()
        .iter()
        .map(|appointment| appointment.id)
        .collect();
    assert_eq!(johns, vec![first, third]);

    let gretas: Vec<i64> = service
        .doctor_appointments(greta)
        .unwrap()
        .iter()
        .map(|appointment| appointment.id)
        .collect();
    assert_eq!(gretas, vec![first, second]);

    assert!(matches!(
        service.patient_appointments(999).unwrap_err(),
        ServiceError::PatientNotFound(999)
    ));
    assert!(matches!(
        service.doctor_appointments(999).unwrap_err(),
        ServiceError::DoctorNotFound(999)
    ));
}

#[test]
fn deleting_patient_with_appointments_is_restricted() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);
    service
        .book_appointment(patient_id, doctor_id, "2024-02-20")
        .unwrap();

    let err = service.delete_patient(patient_id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::PatientHasAppointments { id, count: 1 } if id == patient_id
    ));
    assert!(service.get_patient(patient_id).unwrap().is_some());
    assert_eq!(appointment_count(&conn), 1);
}

#[test]
fn repository_reads_back_single_appointment() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);
    let id = service
        .book_appointment(patient_id, doctor_id, "2024-12-31")
        .unwrap();

    let repo = SqliteAppointmentRepository::new(&conn);
    let loaded = repo.get_appointment(id).unwrap().unwrap();
    assert_eq!(loaded.appointment_date, day("2024-12-31"));
    assert!(repo.get_appointment(id + 1).unwrap().is_none());
    assert_eq!(repo.count_appointments_for_patient(patient_id).unwrap(), 1);

    let stored: String = conn
        .query_row(
            "SELECT appointment_date FROM appointments WHERE id = ?1;",
            [id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "2024-12-31");
}

#[test]
fn appointment_serializes_date_as_iso_text() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn);
    let (patient_id, doctor_id) = seed(&service);
    service
        .book_appointment(patient_id, doctor_id, "2024-02-20")
        .unwrap();

    let appointment = service.list_appointments().unwrap().remove(0);
    let json = serde_json::to_value(appointment).unwrap();
    assert_eq!(json["appointment_date"], "2024-02-20");
}
