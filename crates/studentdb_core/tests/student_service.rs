use chrono::NaiveDate;
use studentdb_core::{
    SaveOutcome, SqliteStudentRepository, Student, StudentField, StudentService,
    StudentServiceError, VALIDATION_SUMMARY,
};
use tempfile::TempDir;

fn open_service() -> (TempDir, StudentService<SqliteStudentRepository>) {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteStudentRepository::open(dir.path().join("students.db")).unwrap();
    (dir, StudentService::new(repo))
}

fn form_input(number: &str, first: &str, last: &str) -> Student {
    Student::new(
        number,
        first,
        last,
        NaiveDate::from_ymd_opt(2005, 9, 1).unwrap(),
    )
}

#[test]
fn save_without_id_creates_and_trims_input() {
    let (_dir, service) = open_service();

    let mut input = form_input("  S100 ", " Ann ", "Lee");
    input.email = " ann@uni.edu ".to_string();
    let outcome = service.save(&input).unwrap();
    let SaveOutcome::Created(id) = outcome else {
        panic!("expected create, got {outcome:?}");
    };

    let stored = service.get(id).unwrap().unwrap();
    assert_eq!(stored.student_number, "S100");
    assert_eq!(stored.first_name, "Ann");
    assert_eq!(stored.email, "ann@uni.edu");
}

#[test]
fn save_with_id_updates_existing_record() {
    let (_dir, service) = open_service();
    let id = service
        .save(&form_input("S100", "Ann", "Lee"))
        .unwrap()
        .id();

    let mut edited = service.get(id).unwrap().unwrap();
    edited.program = "History".to_string();
    assert_eq!(service.save(&edited).unwrap(), SaveOutcome::Updated(id));
    assert_eq!(service.get(id).unwrap().unwrap().program, "History");
}

#[test]
fn save_reports_every_invalid_field_without_writing() {
    let (_dir, service) = open_service();

    let mut input = form_input("", "", "Lee");
    input.email = "nope".to_string();
    input.year = 0;
    let err = service.save(&input).unwrap_err();

    let StudentServiceError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    for field in [
        StudentField::StudentNumber,
        StudentField::FirstName,
        StudentField::Email,
        StudentField::Year,
    ] {
        assert!(validation.has_field(field), "missing {field}");
    }
    assert!(!validation.has_field(StudentField::LastName));
    assert!(validation.to_string().starts_with(VALIDATION_SUMMARY));
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn save_rejects_number_taken_by_another_record() {
    let (_dir, service) = open_service();
    service.save(&form_input("S100", "Ann", "Lee")).unwrap();

    let err = service.save(&form_input("S100 ", "Bob", "Kim")).unwrap_err();
    assert!(matches!(err, StudentServiceError::DuplicateStudentNumber(ref n) if n == "S100"));
    assert!(err.to_string().contains("Student Number already exists"));
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn save_of_deleted_record_reports_not_found() {
    let (_dir, service) = open_service();
    let id = service
        .save(&form_input("S100", "Ann", "Lee"))
        .unwrap()
        .id();
    let stale = service.get(id).unwrap().unwrap();
    assert!(service.delete(id).unwrap());

    let err = service.save(&stale).unwrap_err();
    assert!(matches!(err, StudentServiceError::NotFound(missing) if missing == id));
}

#[test]
fn blank_search_falls_back_to_list() {
    let (_dir, service) = open_service();
    service.save(&form_input("S1", "Ann", "Lee")).unwrap();
    service.save(&form_input("S2", "Bob", "Kim")).unwrap();

    assert_eq!(service.search("   ").unwrap(), service.list().unwrap());
    assert_eq!(service.search(" kim ").unwrap().len(), 1);
}

#[test]
fn number_check_trims_and_excludes_self() {
    let (_dir, service) = open_service();
    let id = service
        .save(&form_input("S100", "Ann", "Lee"))
        .unwrap()
        .id();

    assert!(service.is_student_number_taken(" S100 ", None).unwrap());
    assert!(!service.is_student_number_taken("S100", Some(id)).unwrap());
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let (_dir, service) = open_service();
    let id = service
        .save(&form_input("S100", "Ann", "Lee"))
        .unwrap()
        .id();

    assert!(service.delete(id).unwrap());
    assert!(!service.delete(id).unwrap());
}
