//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/search/get/exists/create/update/delete over `students`.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The schema exists before any operation runs (bootstrapped on open).
//! - Each operation uses its own connection and releases it on return.
//! - Create/update check uniqueness and write inside one immediate
//!   transaction, so concurrent writers cannot both pass the check.
//! - Listings are ordered by `last_name, first_name, id`.

use crate::db::{connect, open_db, DbError};
use crate::model::student::{Student, StudentId};
use crate::model::validation::StudentValidationError;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    student_number,
    first_name,
    last_name,
    date_of_birth,
    gender,
    email,
    phone,
    program,
    year,
    address
FROM students";

const ORDER_BY_NAME_SQL: &str = "ORDER BY last_name, first_name, id";

const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    /// Another record already holds this student number.
    DuplicateStudentNumber(String),
    /// Update was requested for a record that was never created.
    MissingId,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateStudentNumber(number) => {
                write!(f, "student number `{number}` already exists")
            }
            Self::MissingId => write!(f, "student record has no id; create it first"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateStudentNumber(_) | Self::MissingId | Self::InvalidData(_) => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student records.
pub trait StudentRepository {
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn search_students(&self, term: &str) -> RepoResult<Vec<Student>>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn student_number_exists(
        &self,
        student_number: &str,
        exclude_id: Option<StudentId>,
    ) -> RepoResult<bool>;
    fn create_student(&self, student: &Student) -> RepoResult<StudentId>;
    fn update_student(&self, student: &Student) -> RepoResult<bool>;
    fn delete_student(&self, id: StudentId) -> RepoResult<bool>;
}

/// SQLite-backed student repository bound to one database file.
#[derive(Debug, Clone)]
pub struct SqliteStudentRepository {
    db_path: PathBuf,
}

impl SqliteStudentRepository {
    /// Binds the repository to `path`, creating the file and schema if needed.
    ///
    /// # Errors
    /// - Returns `RepoError::Db` when the file cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let db_path = path.as_ref().to_path_buf();
        // Bootstrap connection only; operations open their own.
        drop(open_db(&db_path)?);
        Ok(Self { db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connection(&self) -> RepoResult<Connection> {
        Ok(connect(&self.db_path)?)
    }

    fn query_students(&self, sql: &str, search_pattern: Option<&str>) -> RepoResult<Vec<Student>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = match search_pattern {
            Some(pattern) => stmt.query([pattern])?,
            None => stmt.query([])?,
        };

        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }
}

impl StudentRepository for SqliteStudentRepository {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let students =
            self.query_students(&format!("{STUDENT_SELECT_SQL} {ORDER_BY_NAME_SQL};"), None)?;
        debug!(
            "event=student_list module=repo status=ok count={}",
            students.len()
        );
        Ok(students)
    }

    fn search_students(&self, term: &str) -> RepoResult<Vec<Student>> {
        let pattern = like_contains_pattern(term);
        let students = self.query_students(
            &format!(
                "{STUDENT_SELECT_SQL}
                 WHERE student_number LIKE ?1 ESCAPE '\\'
                    OR first_name LIKE ?1 ESCAPE '\\'
                    OR last_name LIKE ?1 ESCAPE '\\'
                    OR email LIKE ?1 ESCAPE '\\'
                 {ORDER_BY_NAME_SQL};"
            ),
            Some(pattern.as_str()),
        )?;
        debug!(
            "event=student_search module=repo status=ok term_len={} count={}",
            term.chars().count(),
            students.len()
        );
        Ok(students)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn student_number_exists(
        &self,
        student_number: &str,
        exclude_id: Option<StudentId>,
    ) -> RepoResult<bool> {
        let conn = self.connection()?;
        number_taken(&conn, student_number, exclude_id)
    }

    fn create_student(&self, student: &Student) -> RepoResult<StudentId> {
        student.validate()?;

        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if number_taken(&tx, &student.student_number, None)? {
            warn!("event=student_create module=repo status=rejected reason=duplicate_number");
            return Err(RepoError::DuplicateStudentNumber(
                student.student_number.clone(),
            ));
        }

        tx.execute(
            "INSERT INTO students (
                student_number,
                first_name,
                last_name,
                date_of_birth,
                gender,
                email,
                phone,
                program,
                year,
                address
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                student.student_number.as_str(),
                student.first_name.as_str(),
                student.last_name.as_str(),
                format_date_of_birth(student.date_of_birth),
                student.gender.as_str(),
                student.email.as_str(),
                student.phone.as_str(),
                student.program.as_str(),
                student.year,
                student.address.as_str(),
            ],
        )
        .map_err(|err| map_write_error(err, &student.student_number))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!("event=student_create module=repo status=ok student_id={id}");
        Ok(id)
    }

    fn update_student(&self, student: &Student) -> RepoResult<bool> {
        let id = student.id.ok_or(RepoError::MissingId)?;
        student.validate()?;

        let mut conn = self.connection()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if number_taken(&tx, &student.student_number, Some(id))? {
            warn!(
                "event=student_update module=repo status=rejected student_id={id} reason=duplicate_number"
            );
            return Err(RepoError::DuplicateStudentNumber(
                student.student_number.clone(),
            ));
        }

        let changed = tx
            .execute(
                "UPDATE students
                 SET
                    student_number = ?1,
                    first_name = ?2,
                    last_name = ?3,
                    date_of_birth = ?4,
                    gender = ?5,
                    email = ?6,
                    phone = ?7,
                    program = ?8,
                    year = ?9,
                    address = ?10
                 WHERE id = ?11;",
                params![
                    student.student_number.as_str(),
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    format_date_of_birth(student.date_of_birth),
                    student.gender.as_str(),
                    student.email.as_str(),
                    student.phone.as_str(),
                    student.program.as_str(),
                    student.year,
                    student.address.as_str(),
                    id,
                ],
            )
            .map_err(|err| map_write_error(err, &student.student_number))?;
        tx.commit()?;

        info!(
            "event=student_update module=repo status=ok student_id={id} changed={}",
            changed
        );
        Ok(changed > 0)
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<bool> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM students WHERE id = ?1;", [id])?;

        info!(
            "event=student_delete module=repo status=ok student_id={id} changed={}",
            changed
        );
        Ok(changed > 0)
    }
}

fn number_taken(
    conn: &Connection,
    student_number: &str,
    exclude_id: Option<StudentId>,
) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1
             FROM students
             WHERE student_number = ?1
               AND (?2 IS NULL OR id != ?2)
             LIMIT 1;",
            params![student_number, exclude_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;

    let dob_text: String = row.get("date_of_birth")?;
    let date_of_birth = parse_date_of_birth(&dob_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid date `{dob_text}` in students.date_of_birth for id {id}"
        ))
    })?;

    let year = match row.get::<_, Option<i64>>("year")? {
        None => 0,
        Some(value) => u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid year `{value}` in students.year for id {id}"
            ))
        })?,
    };

    Ok(Student {
        id: Some(id),
        student_number: row.get("student_number")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        date_of_birth,
        gender: optional_text(row, "gender")?,
        email: optional_text(row, "email")?,
        phone: optional_text(row, "phone")?,
        program: optional_text(row, "program")?,
        year,
        address: optional_text(row, "address")?,
    })
}

fn optional_text(row: &Row<'_>, column: &str) -> RepoResult<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn format_date_of_birth(date: NaiveDate) -> String {
    date.format(DATE_OF_BIRTH_FORMAT).to_string()
}

fn parse_date_of_birth(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    // Rows written with a time component still carry the date up front.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_OF_BIRTH_FORMAT).ok()
}

/// Builds a `%term%` LIKE pattern that matches `%`, `_` and `\` literally.
fn like_contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn map_write_error(err: rusqlite::Error, student_number: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateStudentNumber(student_number.to_string())
        }
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{like_contains_pattern, parse_date_of_birth};
    use chrono::NaiveDate;

    #[test]
    fn like_pattern_wraps_and_escapes_wildcards() {
        assert_eq!(like_contains_pattern("lee"), "%lee%");
        assert_eq!(like_contains_pattern(""), "%%");
        assert_eq!(like_contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }

    #[test]
    fn date_of_birth_parses_plain_and_timestamped_values() {
        let expected = NaiveDate::from_ymd_opt(2001, 12, 31);
        assert_eq!(parse_date_of_birth("2001-12-31"), expected);
        assert_eq!(parse_date_of_birth("2001-12-31 00:00:00"), expected);
        assert_eq!(parse_date_of_birth("31/12/2001"), None);
        assert_eq!(parse_date_of_birth(""), None);
    }
}
