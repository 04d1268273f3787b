use chrono::NaiveDate;
use studentdb_core::{SqliteStudentRepository, Student, StudentRepository};
use tempfile::TempDir;

fn seeded_repo() -> (TempDir, SqliteStudentRepository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = SqliteStudentRepository::open(dir.path().join("students.db")).unwrap();

    for (number, first, last, email) in [
        ("S100", "Ann", "Lee", "ann.lee@uni.edu"),
        ("S200", "Bob", "Kim", "bob@mail.com"),
        ("X300", "Cara", "Leeds", ""),
        ("S400", "Dan", "O'Neil", "dan_100%@uni.edu"),
    ] {
        let mut student = Student::new(
            number,
            first,
            last,
            NaiveDate::from_ymd_opt(2003, 6, 1).unwrap(),
        );
        student.email = email.to_string();
        student.program = "Physics".to_string();
        repo.create_student(&student).unwrap();
    }

    (dir, repo)
}

fn numbers(students: &[Student]) -> Vec<&str> {
    students
        .iter()
        .map(|student| student.student_number.as_str())
        .collect()
}

#[test]
fn empty_term_matches_every_record_in_name_order() {
    let (_dir, repo) = seeded_repo();
    let all = repo.search_students("").unwrap();
    assert_eq!(numbers(&all), vec!["S200", "S100", "X300", "S400"]);
    assert_eq!(all, repo.list_students().unwrap());
}

#[test]
fn search_matches_number_names_and_email_case_insensitively() {
    let (_dir, repo) = seeded_repo();

    assert_eq!(numbers(&repo.search_students("lee").unwrap()), vec!["S100", "X300"]);
    assert_eq!(numbers(&repo.search_students("x3").unwrap()), vec!["X300"]);
    assert_eq!(numbers(&repo.search_students("CARA").unwrap()), vec!["X300"]);
    assert_eq!(numbers(&repo.search_students("mail.com").unwrap()), vec!["S200"]);
}

#[test]
fn search_does_not_match_other_columns() {
    let (_dir, repo) = seeded_repo();
    assert!(repo.search_students("Physics").unwrap().is_empty());
}

#[test]
fn wildcard_characters_match_literally() {
    let (_dir, repo) = seeded_repo();

    assert_eq!(numbers(&repo.search_students("%").unwrap()), vec!["S400"]);
    assert_eq!(numbers(&repo.search_students("_100").unwrap()), vec!["S400"]);
    assert_eq!(numbers(&repo.search_students("n_1").unwrap()), vec!["S400"]);
}

#[test]
fn search_handles_quotes_in_terms() {
    let (_dir, repo) = seeded_repo();
    assert_eq!(numbers(&repo.search_students("o'neil").unwrap()), vec!["S400"]);
}
