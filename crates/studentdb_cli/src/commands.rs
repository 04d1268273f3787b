//! Command handlers for the list/search screen and the add/edit flow.
//!
//! # Invariants
//! - Handlers write user-facing output to `out` and never touch stdout
//!   directly, so they can run against in-memory buffers.
//! - A failed command returns an error and leaves stored records untouched.

use crate::render::{status_line, student_detail, student_table};
use crate::{AddArgs, Command, EditArgs};
use anyhow::{anyhow, bail, Context};
use chrono::{Local, Months, NaiveDate};
use log::info;
use serde_json::json;
use std::io::{BufRead, Write};
use studentdb_core::{
    SaveOutcome, SqliteStudentRepository, Student, StudentId, StudentService,
    StudentServiceError,
};

type Service = StudentService<SqliteStudentRepository>;

const DEFAULT_AGE_YEARS: u32 = 18;

pub fn execute(
    command: Command,
    service: &Service,
    json: bool,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let students = service.list().context("Error loading students")?;
            print_students(&students, json, out)
        }
        Command::Search { term } => {
            let students = service
                .search(&term)
                .context("Error searching students")?;
            print_students(&students, json, out)
        }
        Command::Show { id } => {
            let student = load_student(service, id)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &student)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", student_detail(&student))?;
            }
            Ok(())
        }
        Command::Add(args) => add_student(service, args, json, out),
        Command::Edit(args) => edit_student(service, args, json, out),
        Command::Delete { id, yes } => delete_student(service, id, yes, out, input),
        Command::CheckNumber { number, exclude } => {
            let taken = service
                .is_student_number_taken(&number, exclude)
                .context("An error occurred")?;
            if json {
                writeln!(
                    out,
                    "{}",
                    json!({ "student_number": number.trim(), "taken": taken })
                )?;
            } else if taken {
                writeln!(out, "Student number `{}` is already taken.", number.trim())?;
            } else {
                writeln!(out, "Student number `{}` is available.", number.trim())?;
            }
            Ok(())
        }
        Command::Version => {
            writeln!(out, "studentdb_core version={}", studentdb_core::core_version())?;
            Ok(())
        }
    }
}

fn print_students(students: &[Student], json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, students)?;
        writeln!(out)?;
        return Ok(());
    }

    if !students.is_empty() {
        writeln!(out, "{}", student_table(students))?;
    }
    writeln!(out, "{}", status_line(students.len()))?;
    Ok(())
}

fn load_student(service: &Service, id: StudentId) -> anyhow::Result<Student> {
    service
        .get(id)
        .context("Error loading student")?
        .ok_or_else(|| anyhow!("Student {id} not found."))
}

fn add_student(
    service: &Service,
    args: AddArgs,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let date_of_birth = args.dob.unwrap_or_else(default_date_of_birth);
    let mut student = Student::new(
        args.number.unwrap_or_default(),
        args.first_name.unwrap_or_default(),
        args.last_name.unwrap_or_default(),
        date_of_birth,
    );
    student.gender = args.gender.unwrap_or_default();
    student.email = args.email.unwrap_or_default();
    student.phone = args.phone.unwrap_or_default();
    student.program = args.program.unwrap_or_default();
    student.year = args.year;
    student.address = args.address.unwrap_or_default();

    let outcome = service.save(&student).map_err(save_failure)?;
    report_saved(service, outcome, "Student added successfully!", json, out)
}

fn edit_student(
    service: &Service,
    args: EditArgs,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut student = load_student(service, args.id)?;

    if let Some(number) = args.number {
        student.student_number = number;
    }
    if let Some(first_name) = args.first_name {
        student.first_name = first_name;
    }
    if let Some(last_name) = args.last_name {
        student.last_name = last_name;
    }
    if let Some(dob) = args.dob {
        student.date_of_birth = dob;
    }
    if let Some(gender) = args.gender {
        student.gender = gender;
    }
    if let Some(email) = args.email {
        student.email = email;
    }
    if let Some(phone) = args.phone {
        student.phone = phone;
    }
    if let Some(program) = args.program {
        student.program = program;
    }
    if let Some(year) = args.year {
        student.year = year;
    }
    if let Some(address) = args.address {
        student.address = address;
    }

    let outcome = service.save(&student).map_err(save_failure)?;
    report_saved(service, outcome, "Student updated successfully!", json, out)
}

fn report_saved(
    service: &Service,
    outcome: SaveOutcome,
    message: &str,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    info!(
        "event=cli_save module=cli status=ok student_id={}",
        outcome.id()
    );
    if json {
        let saved = load_student(service, outcome.id())?;
        serde_json::to_writer_pretty(&mut *out, &saved)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{message} (ID: {})", outcome.id())?;
    }
    Ok(())
}

fn delete_student(
    service: &Service,
    id: StudentId,
    yes: bool,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> anyhow::Result<()> {
    let student = load_student(service, id)?;

    if !yes {
        write!(
            out,
            "Are you sure you want to delete student '{}' (ID: {})? [y/N] ",
            student.full_name(),
            student.student_number
        )?;
        out.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "Delete cancelled.")?;
            return Ok(());
        }
    }

    if !service.delete(id).context("Error deleting student")? {
        bail!("Failed to delete student.");
    }
    writeln!(out, "Student deleted successfully!")?;
    Ok(())
}

/// Turns a save failure into the message shown to the user.
fn save_failure(err: StudentServiceError) -> anyhow::Error {
    match err {
        StudentServiceError::Validation(validation) => {
            let mut message = String::from(studentdb_core::VALIDATION_SUMMARY);
            for field_error in validation.errors() {
                message.push_str(&format!(
                    "\n  {}: {}",
                    field_error.field, field_error.message
                ));
            }
            anyhow!(message)
        }
        StudentServiceError::DuplicateStudentNumber(_) => anyhow!(err.to_string()),
        StudentServiceError::NotFound(id) => anyhow!("Student {id} not found."),
        other => anyhow::Error::new(other).context("An error occurred"),
    }
}

fn default_date_of_birth() -> NaiveDate {
    let today = Local::now().date_naive();
    today
        .checked_sub_months(Months::new(DEFAULT_AGE_YEARS * 12))
        .unwrap_or(today)
}
