use std::collections::{HashMap, HashSet};

use edutrack::modules::students::import::{
    ExistingStudent, ImportContext, UpsertContext, candidate_keys, parse_students_csv,
    plan_import, plan_upsert,
};
use uuid::Uuid;

fn context(college_id: Uuid) -> ImportContext {
    ImportContext {
        college_id,
        known_classes: (1..=12).collect(),
        ..Default::default()
    }
}

#[test]
fn test_parse_valid_csv() {
    let csv = "first_name,last_name,birth_year,student_id,class_id\n\
               Ada,Lovelace,2010,S001,5\n\
               Alan,,2011,S002,\n";
    let rows = parse_students_csv(csv).unwrap();

    assert_eq!(rows.len(), 2);
    let first = rows[0].as_ref().unwrap();
    assert_eq!(first.row, 2);
    assert_eq!(first.first_name, "Ada");
    assert_eq!(first.class_id.as_deref(), Some("5"));

    let second = rows[1].as_ref().unwrap();
    assert_eq!(second.last_name, None);
    assert_eq!(second.class_id, None);
}

#[test]
fn test_parse_header_is_case_insensitive_and_trimmed() {
    let csv = " First_Name , BIRTH_YEAR ,Student_ID\nAda,2010,S001\n";
    let rows = parse_students_csv(csv).unwrap();
    assert_eq!(rows[0].as_ref().unwrap().student_id, "S001");
}

#[test]
fn test_parse_missing_columns() {
    let err = parse_students_csv("first_name,last_name\nAda,Lovelace\n").unwrap_err();
    assert_eq!(err.status.as_u16(), 400);
    assert_eq!(
        err.error.to_string(),
        "CSV is missing required columns: birth_year, student_id"
    );
}

#[test]
fn test_plan_reports_row_errors() {
    let college_id = Uuid::new_v4();
    let csv = format!(
        "first_name,birth_year,student_id,class_id,college_id\n\
         ,2010,S001,,\n\
         Bob,twenty,S002,,\n\
         Cy,2010,S003,x,\n\
         Di,2010,S004,13,\n\
         Ed,2010,S005,,{}\n\
         Fay,2010,S006,3,{}\n",
        Uuid::new_v4(),
        college_id
    );
    let rows = parse_students_csv(&csv).unwrap();
    let plan = plan_import(rows, &context(college_id));

    assert_eq!(plan.errors.len(), 5);
    assert_eq!(
        &plan.errors[..4],
        &[
            "Row 2: Missing required fields (first_name, birth_year, student_id)",
            "Row 3: Invalid birth_year 'twenty'",
            "Row 4: Invalid class_id 'x'",
            "Row 5: Class '13' does not exist",
        ]
    );
    assert!(plan.errors[4].starts_with("Row 6: college_id"));
    assert_eq!(plan.prepared.len(), 1);

    let fay = &plan.prepared[0];
    assert_eq!(fay.email, "s006@college.edu");
    assert_eq!(fay.password, "fay2010");
    assert_eq!(fay.class_id, Some(3));
}

#[test]
fn test_plan_detects_duplicates_in_file_and_database() {
    let college_id = Uuid::new_v4();
    let csv = "first_name,birth_year,student_id\n\
               Ada,2010,S001\n\
               Ada,2010,S001\n\
               Bob,2011,S002\n\
               Cy,2012,S003\n";
    let rows = parse_students_csv(csv).unwrap();

    let mut ctx = context(college_id);
    ctx.existing_emails = HashSet::from(["s002@college.edu".to_string()]);
    ctx.existing_student_ids = HashSet::from(["S003".to_string()]);

    let plan = plan_import(rows, &ctx);

    assert_eq!(plan.prepared.len(), 1);
    assert_eq!(plan.prepared[0].student_id, "S001");
    assert_eq!(
        plan.duplicates,
        vec![
            "Row 3: Duplicate email 's001@college.edu' within import file",
            "Row 4: Email 's002@college.edu' already exists in database",
            "Row 5: Student ID 'S003' already exists in database",
        ]
    );
    assert!(plan.errors.is_empty());
}

#[test]
fn test_candidate_keys() {
    let csv = "first_name,birth_year,student_id\nAda,2010,S001\nBob,2011,\n";
    let rows = parse_students_csv(csv).unwrap();
    let (emails, ids) = candidate_keys(&rows);
    assert_eq!(emails, vec!["s001@college.edu"]);
    assert_eq!(ids, vec!["S001"]);
}

#[test]
fn test_upsert_plan() {
    let college_id = Uuid::new_v4();
    let other_college = Uuid::new_v4();
    let existing_account = Uuid::new_v4();

    let csv = "first_name,birth_year,student_id\n\
               Ada,2010,S001\n\
               Bob,2011,S002\n\
               Cy,2012,S003\n\
               Di,2012,S004\n\
               Ed,2013,S005\n\
               Ada,2010,S001\n";
    let ctx = UpsertContext {
        college_id,
        known_classes: (1..=12).collect(),
        taken_emails: HashSet::from([
            "s001@college.edu".to_string(),
            "s002@college.edu".to_string(),
            "s003@college.edu".to_string(),
        ]),
        students_by_email: HashMap::from([
            (
                "s001@college.edu".to_string(),
                ExistingStudent {
                    account_id: existing_account,
                    college_id,
                },
            ),
            (
                "s002@college.edu".to_string(),
                ExistingStudent {
                    account_id: Uuid::new_v4(),
                    college_id: other_college,
                },
            ),
        ]),
        existing_student_ids: HashSet::from(["S004".to_string()]),
    };

    let plan = plan_upsert(parse_students_csv(csv).unwrap(), &ctx, true);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].0, existing_account);
    assert_eq!(plan.creates.len(), 1);
    assert_eq!(plan.creates[0].student_id, "S005");
    assert_eq!(plan.skipped, 1);
    assert_eq!(plan.errors.len(), 3);
    assert!(plan.errors[0].contains("belongs to another college"));
    assert!(plan.errors[1].contains("non-student account"));
    assert!(plan.errors[2].contains("Student ID 'S004' already exists"));

    let plan = plan_upsert(parse_students_csv(csv).unwrap(), &ctx, false);
    assert!(plan.updates.is_empty());
    assert_eq!(plan.skipped, 2);
}

#[test]
fn test_plan_rejects_values_wider_than_columns() {
    let college_id = Uuid::new_v4();
    let csv = format!(
        "first_name,last_name,birth_year,student_id\n\
         Ada,,2010,{}\n\
         {},,2010,S002\n\
         Cy,{},2010,S003\n\
         Di,,2010,{}\n",
        "X".repeat(51),
        "f".repeat(101),
        "l".repeat(101),
        "Y".repeat(50),
    );
    let rows = parse_students_csv(&csv).unwrap();
    let plan = plan_import(rows, &context(college_id));

    assert_eq!(
        plan.errors,
        vec![
            "Row 2: student_id exceeds 50 characters",
            "Row 3: first_name exceeds 100 characters",
            "Row 4: last_name exceeds 100 characters",
        ]
    );
    assert_eq!(plan.prepared.len(), 1);
    assert_eq!(plan.prepared[0].row, 5);
}

#[test]
fn test_plan_bounds_birth_year() {
    let csv = "first_name,birth_year,student_id\n\
               Ada,0,B001\n\
               Bob,-5,B002\n\
               Cy,99999,B003\n\
               Di,1900,B004\n\
               Ed,2100,B005\n";
    let rows = parse_students_csv(csv).unwrap();
    let plan = plan_import(rows, &context(Uuid::new_v4()));

    assert_eq!(
        plan.errors,
        vec![
            "Row 2: birth_year 0 must be between 1900 and 2100",
            "Row 3: birth_year -5 must be between 1900 and 2100",
            "Row 4: birth_year 99999 must be between 1900 and 2100",
        ]
    );
    assert_eq!(plan.prepared.len(), 2);
}
