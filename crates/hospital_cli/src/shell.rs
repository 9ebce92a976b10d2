//! Interactive menu loop.
//!
//! # Responsibility
//! - Show the seven-entry menu, read one choice per line, dispatch it.
//! - Collect the fixed prompt sequence for each action.
//! - Print record lines and outcome messages in the fixed console format.
//!
//! # Invariants
//! - Only `7` ends the loop normally; end of input at any prompt is fatal.
//! - Bad dates and missing records are reported and the loop continues.
//! - Non-numeric age/id input is fatal and ends the session with an error.

use hospital_core::{
    Appointment, Doctor, NewDoctor, NewPatient, Patient, ServiceError, ServiceResult,
    SqliteHospitalService, APPOINTMENT_DATE_FORMAT,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const MENU: &str = "Hospital Management System
1. Add Patient
2. Add Doctor
3. Book Appointment
4. View Patients
5. View Doctors
6. View Appointments
7. Exit";

pub type ShellResult<T> = Result<T, ShellError>;

/// Errors that end the session.
#[derive(Debug)]
pub enum ShellError {
    Io(io::Error),
    /// Input ended in the middle of a prompt sequence.
    InputClosed { prompt: &'static str },
    /// Age or id text did not parse as a number.
    InvalidNumber { field: &'static str, value: String },
    /// Storage failure surfaced by the service.
    Service(ServiceError),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console i/o failed: {err}"),
            Self::InputClosed { prompt } => {
                write!(f, "input closed while waiting for `{}`", prompt.trim_end())
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "invalid {field}: `{value}` is not a whole number")
            }
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::InputClosed { .. } | Self::InvalidNumber { .. } => None,
        }
    }
}

impl From<io::Error> for ShellError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Menu-driven session over one service, reading from `input` and writing
/// to `output`.
pub struct Shell<'conn, R, W> {
    service: SqliteHospitalService<'conn>,
    input: R,
    output: W,
}

impl<'conn, R: BufRead, W: Write> Shell<'conn, R, W> {
    pub fn new(service: SqliteHospitalService<'conn>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs the loop until the user picks `7` or a fatal error occurs.
    pub fn run(&mut self) -> ShellResult<()> {
        info!("event=shell_start module=cli status=ok");
        loop {
            writeln!(self.output, "{MENU}")?;
            let choice = self.prompt("Enter your choice: ")?;

            match choice.as_str() {
                "1" => self.add_patient()?,
                "2" => self.add_doctor()?,
                "3" => self.book_appointment()?,
                "4" => self.view_patients()?,
                "5" => self.view_doctors()?,
                "6" => self.view_appointments()?,
                "7" => break,
                _ => writeln!(self.output, "Invalid choice, please try again.")?,
            }
        }

        info!("event=shell_exit module=cli status=ok reason=user_exit");
        Ok(())
    }

    fn add_patient(&mut self) -> ShellResult<()> {
        let patient = NewPatient {
            name: self.prompt("Enter patient name: ")?,
            surname: self.prompt("Enter patient surname: ")?,
            age: self.prompt_number("Enter patient age: ", "age")?,
            gender: self.prompt("Enter patient gender: ")?,
            contact: self.prompt("Enter patient contact: ")?,
        };

        let added = self.service.add_patient(&patient);
        if let Some(id) = self.settle(added)? {
            writeln!(self.output, "Patient added successfully (ID: {id}).")?;
        }
        Ok(())
    }

    fn add_doctor(&mut self) -> ShellResult<()> {
        let doctor = NewDoctor {
            name: self.prompt("Enter doctor name: ")?,
            surname: self.prompt("Enter doctor surname: ")?,
            specialization: self.prompt("Enter doctor specialization: ")?,
            contact: self.prompt("Enter doctor contact: ")?,
        };

        let added = self.service.add_doctor(&doctor);
        if let Some(id) = self.settle(added)? {
            writeln!(self.output, "Doctor added successfully (ID: {id}).")?;
        }
        Ok(())
    }

    fn book_appointment(&mut self) -> ShellResult<()> {
        let patient_id: i64 = self.prompt_number("Enter patient ID: ", "patient id")?;
        let doctor_id: i64 = self.prompt_number("Enter doctor ID: ", "doctor id")?;
        let date_text = self.prompt("Enter appointment date (YYYY-MM-DD): ")?;

        let booked = self
            .service
            .book_appointment(patient_id, doctor_id, &date_text);
        if self.settle(booked)?.is_some() {
            writeln!(self.output, "Appointment booked successfully.")?;
        }
        Ok(())
    }

    fn view_patients(&mut self) -> ShellResult<()> {
        let patients = self.service.list_patients().map_err(ShellError::Service)?;
        for patient in &patients {
            writeln!(self.output, "{}", format_patient(patient))?;
        }
        Ok(())
    }

    fn view_doctors(&mut self) -> ShellResult<()> {
        let doctors = self.service.list_doctors().map_err(ShellError::Service)?;
        for doctor in &doctors {
            writeln!(self.output, "{}", format_doctor(doctor))?;
        }
        Ok(())
    }

    fn view_appointments(&mut self) -> ShellResult<()> {
        let appointments = self
            .service
            .list_appointments()
            .map_err(ShellError::Service)?;
        for appointment in &appointments {
            writeln!(self.output, "{}", format_appointment(appointment))?;
        }
        Ok(())
    }

    /// Prints the message for a recoverable failure and yields `None`;
    /// storage failures become fatal.
    fn settle<T>(&mut self, result: ServiceResult<T>) -> ShellResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                writeln!(self.output, "{}", user_message(&err))?;
                Ok(None)
            }
            Err(err) => {
                error!("event=service_call module=cli status=error error={err}");
                Err(ShellError::Service(err))
            }
        }
    }

    fn prompt(&mut self, label: &'static str) -> ShellResult<String> {
        self.read_line(label)?
            .ok_or(ShellError::InputClosed { prompt: label })
    }

    fn prompt_number<T: FromStr>(
        &mut self,
        label: &'static str,
        field: &'static str,
    ) -> ShellResult<T> {
        let raw = self.prompt(label)?;
        raw.trim()
            .parse()
            .map_err(|_| ShellError::InvalidNumber { field, value: raw })
    }

    /// Writes `label`, then reads one line without its terminator.
    ///
    /// Returns `None` at end of input.
    fn read_line(&mut self, label: &str) -> ShellResult<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}

fn user_message(err: &ServiceError) -> String {
    match err {
        ServiceError::InvalidDate(_) => {
            "Invalid date format. Please enter the date in YYYY-MM-DD format.".to_string()
        }
        ServiceError::PatientNotFound(_) => "Patient not found.".to_string(),
        ServiceError::DoctorNotFound(_) => "Doctor not found.".to_string(),
        ServiceError::PatientHasAppointments { count, .. } => {
            format!("Patient has {count} appointment(s) and cannot be deleted.")
        }
        ServiceError::Repo(err) => format!("Storage error: {err}"),
    }
}

pub fn format_patient(patient: &Patient) -> String {
    format!(
        "ID: {}, Name: {}, Surname: {}, Age: {}, Gender: {}, Contact: {}",
        patient.id, patient.name, patient.surname, patient.age, patient.gender, patient.contact
    )
}

pub fn format_doctor(doctor: &Doctor) -> String {
    format!(
        "ID: {}, Name: {}, Surname: {}, Specialization: {}, Contact: {}",
        doctor.id, doctor.name, doctor.surname, doctor.specialization, doctor.contact
    )
}

pub fn format_appointment(appointment: &Appointment) -> String {
    format!(
        "ID: {}, Patient ID: {}, Doctor ID: {}, Date: {}",
        appointment.id,
        appointment.patient_id,
        appointment.doctor_id,
        appointment.appointment_date.format(APPOINTMENT_DATE_FORMAT)
    )
}
