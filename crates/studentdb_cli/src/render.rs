//! Text rendering for student listings and detail views.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use studentdb_core::Student;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn student_table(students: &[Student]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "ID",
            "Student Number",
            "Full Name",
            "Date of Birth",
            "Gender",
            "Email",
            "Phone",
            "Program",
            "Year",
        ]);

    for student in students {
        table.add_row(vec![
            student.id.map(|id| id.to_string()).unwrap_or_default(),
            student.student_number.clone(),
            student.full_name(),
            student.date_of_birth.format(DATE_FORMAT).to_string(),
            student.gender.clone(),
            student.email.clone(),
            student.phone.clone(),
            student.program.clone(),
            student.year.to_string(),
        ]);
    }

    table
}

pub fn status_line(count: usize) -> String {
    format!("Total Students: {count}")
}

pub fn student_detail(student: &Student) -> String {
    let id = student.id.map(|id| id.to_string()).unwrap_or_default();
    let fields = [
        ("ID", id),
        ("Student Number", student.student_number.clone()),
        ("First Name", student.first_name.clone()),
        ("Last Name", student.last_name.clone()),
        (
            "Date of Birth",
            student.date_of_birth.format(DATE_FORMAT).to_string(),
        ),
        ("Gender", student.gender.clone()),
        ("Email", student.email.clone()),
        ("Phone", student.phone.clone()),
        ("Program", student.program.clone()),
        ("Year", student.year.to_string()),
        ("Address", student.address.clone()),
    ];

    fields
        .iter()
        .map(|(label, value)| format!("{label:<15} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
