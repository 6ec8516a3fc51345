//! CSV parsing and row planning for bulk student import.
//!
//! Everything here is pure: the service looks up which emails, student ids
//! and classes already exist, hands them in through [`ImportContext`] or
//! [`UpsertContext`] and gets back a plan that says what to insert, update,
//! skip or report. Rows are numbered from 2 because row 1 is the header.

use std::collections::{HashMap, HashSet};

use csv::{ReaderBuilder, StringRecord, Trim};
use edutrack_core::AppError;
use edutrack_models::students::{initial_student_password, student_email};
use uuid::Uuid;

pub const REQUIRED_COLUMNS: [&str; 3] = ["first_name", "birth_year", "student_id"];

/// Column widths of `students.student_id` and `accounts.first_name`/`last_name`.
pub const MAX_STUDENT_ID_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 100;

/// Same bounds as `CreateStudentDto::birth_year`.
pub const BIRTH_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

/// A data row as it appears in the file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    pub row: usize,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birth_year: String,
    pub student_id: String,
    pub class_id: Option<String>,
    pub college_id: Option<String>,
}

/// A validated row with its derived email and initial password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStudent {
    pub row: usize,
    pub student_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birth_year: i32,
    pub class_id: Option<i32>,
    pub email: String,
    pub password: String,
}

struct Columns {
    first_name: usize,
    birth_year: usize,
    student_id: usize,
    last_name: Option<usize>,
    class_id: Option<usize>,
    college_id: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, AppError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };

        let missing = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| position(c).is_none())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "CSV is missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            first_name: position("first_name").unwrap_or_default(),
            birth_year: position("birth_year").unwrap_or_default(),
            student_id: position("student_id").unwrap_or_default(),
            last_name: position("last_name"),
            class_id: position("class_id"),
            college_id: position("college_id"),
        })
    }

    fn read(&self, row: usize, record: &StringRecord) -> CsvRow {
        let required = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        CsvRow {
            row,
            first_name: required(self.first_name),
            last_name: optional(self.last_name),
            birth_year: required(self.birth_year),
            student_id: required(self.student_id),
            class_id: optional(self.class_id),
            college_id: optional(self.college_id),
        }
    }
}

/// Parses the uploaded file. A missing required column fails the whole
/// upload; a broken record only fails its own row.
pub fn parse_students_csv(content: &str) -> Result<Vec<Result<CsvRow, String>>, AppError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid CSV header: {}", e)))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let rows = reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            let row = idx + 2;
            record
                .map(|r| columns.read(row, &r))
                .map_err(|_| format!("Row {}: Malformed record", row))
        })
        .collect();

    Ok(rows)
}

/// Emails and student ids mentioned in the file, for the existence lookups.
pub fn candidate_keys(rows: &[Result<CsvRow, String>]) -> (Vec<String>, Vec<String>) {
    rows.iter()
        .filter_map(|r| r.as_ref().ok())
        .filter(|r| !r.student_id.is_empty())
        .map(|r| (student_email(&r.student_id), r.student_id.clone()))
        .unzip()
}

/// What the importer's college looks like before the import.
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    pub college_id: Uuid,
    pub known_classes: HashSet<i32>,
    pub existing_emails: HashSet<String>,
    pub existing_student_ids: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct ImportPlan {
    pub prepared: Vec<PreparedStudent>,
    pub duplicates: Vec<String>,
    pub errors: Vec<String>,
}

fn validate_row(
    row: &CsvRow,
    college_id: Uuid,
    known_classes: &HashSet<i32>,
) -> Result<PreparedStudent, String> {
    let n = row.row;

    if row.first_name.is_empty() || row.birth_year.is_empty() || row.student_id.is_empty() {
        return Err(format!(
            "Row {}: Missing required fields (first_name, birth_year, student_id)",
            n
        ));
    }

    let too_long = [
        ("student_id", row.student_id.as_str(), MAX_STUDENT_ID_LEN),
        ("first_name", row.first_name.as_str(), MAX_NAME_LEN),
        ("last_name", row.last_name.as_deref().unwrap_or_default(), MAX_NAME_LEN),
    ]
    .into_iter()
    .find(|(_, value, max)| value.chars().count() > *max);
    if let Some((field, _, max)) = too_long {
        return Err(format!("Row {}: {} exceeds {} characters", n, field, max));
    }

    let birth_year = row
        .birth_year
        .parse::<i32>()
        .map_err(|_| format!("Row {}: Invalid birth_year '{}'", n, row.birth_year))?;
    if !BIRTH_YEAR_RANGE.contains(&birth_year) {
        return Err(format!(
            "Row {}: birth_year {} must be between {} and {}",
            n,
            birth_year,
            BIRTH_YEAR_RANGE.start(),
            BIRTH_YEAR_RANGE.end()
        ));
    }

    let class_id = match &row.class_id {
        None => None,
        Some(raw) => {
            let id = raw
                .parse::<i32>()
                .map_err(|_| format!("Row {}: Invalid class_id '{}'", n, raw))?;
            if !known_classes.contains(&id) {
                return Err(format!("Row {}: Class '{}' does not exist", n, id));
            }
            Some(id)
        }
    };

    if let Some(raw) = &row.college_id {
        let matches = Uuid::parse_str(raw)
            .map(|id| id == college_id)
            .unwrap_or(false);
        if !matches {
            return Err(format!(
                "Row {}: college_id '{}' does not match your college",
                n, raw
            ));
        }
    }

    Ok(PreparedStudent {
        row: n,
        email: student_email(&row.student_id),
        password: initial_student_password(&row.first_name, birth_year),
        student_id: row.student_id.clone(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        birth_year,
        class_id,
    })
}

/// Sorts every row into prepared, duplicate or error.
pub fn plan_import(rows: Vec<Result<CsvRow, String>>, ctx: &ImportContext) -> ImportPlan {
    let mut plan = ImportPlan::default();
    let mut batch_emails = HashSet::new();
    let mut batch_student_ids = HashSet::new();

    for row in rows {
        let student = match row.and_then(|r| validate_row(&r, ctx.college_id, &ctx.known_classes)) {
            Ok(student) => student,
            Err(message) => {
                plan.errors.push(message);
                continue;
            }
        };
        let n = student.row;

        if !batch_emails.insert(student.email.clone()) {
            plan.duplicates.push(format!(
                "Row {}: Duplicate email '{}' within import file",
                n, student.email
            ));
            continue;
        }
        if !batch_student_ids.insert(student.student_id.clone()) {
            plan.duplicates.push(format!(
                "Row {}: Duplicate student_id '{}' within import file",
                n, student.student_id
            ));
            continue;
        }
        if ctx.existing_emails.contains(&student.email) {
            plan.duplicates.push(format!(
                "Row {}: Email '{}' already exists in database",
                n, student.email
            ));
            continue;
        }
        if ctx.existing_student_ids.contains(&student.student_id) {
            plan.duplicates.push(format!(
                "Row {}: Student ID '{}' already exists in database",
                n, student.student_id
            ));
            continue;
        }

        plan.prepared.push(student);
    }

    plan
}

/// A student account that already uses one of the file's emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingStudent {
    pub account_id: Uuid,
    pub college_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct UpsertContext {
    pub college_id: Uuid,
    pub known_classes: HashSet<i32>,
    /// Every account email the file mentions that is already taken.
    pub taken_emails: HashSet<String>,
    /// The subset of `taken_emails` owned by students.
    pub students_by_email: HashMap<String, ExistingStudent>,
    pub existing_student_ids: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct UpsertPlan {
    pub creates: Vec<PreparedStudent>,
    pub updates: Vec<(Uuid, PreparedStudent)>,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Like [`plan_import`], but rows whose student already exists are updated
/// (or skipped when `update_existing` is off) instead of reported.
pub fn plan_upsert(
    rows: Vec<Result<CsvRow, String>>,
    ctx: &UpsertContext,
    update_existing: bool,
) -> UpsertPlan {
    let mut plan = UpsertPlan::default();
    let mut seen = HashSet::new();

    for row in rows {
        let student = match row.and_then(|r| validate_row(&r, ctx.college_id, &ctx.known_classes)) {
            Ok(student) => student,
            Err(message) => {
                plan.errors.push(message);
                continue;
            }
        };
        let n = student.row;

        if !seen.insert(student.email.clone()) {
            plan.skipped += 1;
            continue;
        }

        match ctx.students_by_email.get(&student.email) {
            Some(existing) if existing.college_id != ctx.college_id => {
                plan.errors.push(format!(
                    "Row {}: Student '{}' belongs to another college",
                    n, student.student_id
                ));
            }
            Some(existing) if update_existing => {
                plan.updates.push((existing.account_id, student));
            }
            Some(_) => plan.skipped += 1,
            None if ctx.taken_emails.contains(&student.email) => {
                plan.errors.push(format!(
                    "Row {}: Email '{}' belongs to a non-student account",
                    n, student.email
                ));
            }
            None if ctx.existing_student_ids.contains(&student.student_id) => {
                plan.errors.push(format!(
                    "Row {}: Student ID '{}' already exists in database",
                    n, student.student_id
                ));
            }
            None => plan.creates.push(student),
        }
    }

    plan
}
