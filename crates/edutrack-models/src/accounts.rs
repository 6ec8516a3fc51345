//! The single login identity and its role-specific profile.
//!
//! Every account lives in the `accounts` table. The role decides which
//! profile row (admins, teachers or students) belongs to it, and
//! [`AccountRow::into_account`] folds the joined row into the matching
//! [`Account`] variant.

use chrono::{DateTime, Utc};
use edutrack_core::AppError;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::roles::Role;

/// Columns selected by [`ACCOUNT_SELECT`], in [`AccountRow`] order.
pub const ACCOUNT_SELECT: &str = r#"
    SELECT
        a.id, a.email, a.password, a.role, a.first_name, a.last_name, a.mobile, a.created_at,
        ad.id AS admin_id, ad.college_id AS admin_college_id,
        t.id AS teacher_id, t.college_id AS teacher_college_id, t.subject AS teacher_subject,
        s.id AS student_record_id, s.student_id AS student_code, s.birth_year AS student_birth_year,
        s.college_id AS student_college_id, s.class_id AS student_class_id
    FROM accounts a
    LEFT JOIN admins ad ON ad.account_id = a.id
    LEFT JOIN teachers t ON t.account_id = a.id
    LEFT JOIN students s ON s.account_id = a.id
"#;

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub admin_id: Option<Uuid>,
    pub admin_college_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub teacher_college_id: Option<Uuid>,
    pub teacher_subject: Option<String>,
    pub student_record_id: Option<Uuid>,
    pub student_code: Option<String>,
    pub student_birth_year: Option<i32>,
    pub student_college_id: Option<Uuid>,
    pub student_class_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffProfile {
    Superadmin,
    Admin {
        admin_id: Uuid,
        college_id: Uuid,
    },
    Teacher {
        teacher_id: Uuid,
        college_id: Uuid,
        subject: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile: StaffProfile,
}

#[derive(Debug, Clone)]
pub struct StudentAccount {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student_record_id: Uuid,
    pub student_id: String,
    pub birth_year: i32,
    pub college_id: Uuid,
    pub class_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub enum Account {
    Staff(StaffAccount),
    Student(StudentAccount),
}

impl Account {
    pub fn id(&self) -> Uuid {
        match self {
            Account::Staff(s) => s.id,
            Account::Student(s) => s.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::Staff(s) => &s.email,
            Account::Student(s) => &s.email,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Staff(s) => match s.profile {
                StaffProfile::Superadmin => Role::Superadmin,
                StaffProfile::Admin { .. } => Role::Admin,
                StaffProfile::Teacher { .. } => Role::Teacher,
            },
            Account::Student(_) => Role::Student,
        }
    }

    /// College the account belongs to. `None` only for superadmins.
    pub fn college_id(&self) -> Option<Uuid> {
        match self {
            Account::Staff(s) => match s.profile {
                StaffProfile::Superadmin => None,
                StaffProfile::Admin { college_id, .. } => Some(college_id),
                StaffProfile::Teacher { college_id, .. } => Some(college_id),
            },
            Account::Student(s) => Some(s.college_id),
        }
    }

    pub fn admin_id(&self) -> Option<Uuid> {
        match self {
            Account::Staff(StaffAccount {
                profile: StaffProfile::Admin { admin_id, .. },
                ..
            }) => Some(*admin_id),
            _ => None,
        }
    }

    pub fn teacher_id(&self) -> Option<Uuid> {
        match self {
            Account::Staff(StaffAccount {
                profile: StaffProfile::Teacher { teacher_id, .. },
                ..
            }) => Some(*teacher_id),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        let (first, last) = match self {
            Account::Staff(s) => (&s.first_name, &s.last_name),
            Account::Student(s) => (&s.first_name, &s.last_name),
        };
        match last.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {}", first, last),
            None => first.clone(),
        }
    }
}

impl AccountRow {
    pub fn into_account(self) -> Result<Account, AppError> {
        let (id, role) = (self.id, self.role);
        let missing = |what: &str| {
            AppError::internal_error(format!(
                "Account {} has role {} but no {} profile",
                id, role, what
            ))
        };

        let profile = match self.role {
            Role::Superadmin => StaffProfile::Superadmin,
            Role::Admin => match (self.admin_id, self.admin_college_id) {
                (Some(admin_id), Some(college_id)) => StaffProfile::Admin {
                    admin_id,
                    college_id,
                },
                _ => return Err(missing("admin")),
            },
            Role::Teacher => match (self.teacher_id, self.teacher_college_id) {
                (Some(teacher_id), Some(college_id)) => StaffProfile::Teacher {
                    teacher_id,
                    college_id,
                    subject: self.teacher_subject.clone(),
                },
                _ => return Err(missing("teacher")),
            },
            Role::Student => {
                let (Some(record_id), Some(code), Some(birth_year), Some(college_id)) = (
                    self.student_record_id,
                    self.student_code.clone(),
                    self.student_birth_year,
                    self.student_college_id,
                ) else {
                    return Err(missing("student"));
                };
                return Ok(Account::Student(StudentAccount {
                    id: self.id,
                    email: self.email,
                    first_name: self.first_name,
                    last_name: self.last_name,
                    mobile: self.mobile,
                    created_at: self.created_at,
                    student_record_id: record_id,
                    student_id: code,
                    birth_year,
                    college_id,
                    class_id: self.student_class_id,
                }));
            }
        };

        Ok(Account::Staff(StaffAccount {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            mobile: self.mobile,
            created_at: self.created_at,
            profile,
        }))
    }
}

/// Flat view of an [`Account`] returned by `/auth/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountProfile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub college_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        let mut profile = AccountProfile {
            id: account.id(),
            email: account.email().to_string(),
            role: account.role(),
            first_name: String::new(),
            last_name: None,
            mobile: None,
            college_id: account.college_id(),
            admin_id: account.admin_id(),
            teacher_id: account.teacher_id(),
            subject: None,
            student_id: None,
            birth_year: None,
            class_id: None,
            created_at: Utc::now(),
        };

        match account {
            Account::Staff(s) => {
                profile.first_name = s.first_name.clone();
                profile.last_name = s.last_name.clone();
                profile.mobile = s.mobile.clone();
                profile.created_at = s.created_at;
                if let StaffProfile::Teacher { subject, .. } = &s.profile {
                    profile.subject = subject.clone();
                }
            }
            Account::Student(s) => {
                profile.first_name = s.first_name.clone();
                profile.last_name = s.last_name.clone();
                profile.mobile = s.mobile.clone();
                profile.created_at = s.created_at;
                profile.student_id = Some(s.student_id.clone());
                profile.birth_year = Some(s.birth_year);
                profile.class_id = s.class_id;
            }
        }

        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_row(role: Role) -> AccountRow {
        AccountRow {
            id: Uuid::new_v4(),
            email: "someone@college.edu".to_string(),
            password: "$2b$12$hash".to_string(),
            role,
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            mobile: None,
            created_at: Utc::now(),
            admin_id: None,
            admin_college_id: None,
            teacher_id: None,
            teacher_college_id: None,
            teacher_subject: None,
            student_record_id: None,
            student_code: None,
            student_birth_year: None,
            student_college_id: None,
            student_class_id: None,
        }
    }

    #[test]
    fn test_superadmin_row_needs_no_profile() {
        let account = base_row(Role::Superadmin).into_account().unwrap();
        assert_eq!(account.role(), Role::Superadmin);
        assert_eq!(account.college_id(), None);
        assert_eq!(account.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_admin_row_becomes_admin_profile() {
        let college = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let mut row = base_row(Role::Admin);
        row.admin_id = Some(admin);
        row.admin_college_id = Some(college);

        let account = row.into_account().unwrap();
        assert_eq!(account.role(), Role::Admin);
        assert_eq!(account.admin_id(), Some(admin));
        assert_eq!(account.teacher_id(), None);
        assert_eq!(account.college_id(), Some(college));
    }

    #[test]
    fn test_teacher_row_keeps_subject() {
        let mut row = base_row(Role::Teacher);
        row.teacher_id = Some(Uuid::new_v4());
        row.teacher_college_id = Some(Uuid::new_v4());
        row.teacher_subject = Some("Physics".to_string());

        let account = row.into_account().unwrap();
        match account {
            Account::Staff(StaffAccount {
                profile: StaffProfile::Teacher { ref subject, .. },
                ..
            }) => assert_eq!(subject.as_deref(), Some("Physics")),
            other => panic!("expected teacher, got {:?}", other),
        }
    }

    #[test]
    fn test_student_row_becomes_student_variant() {
        let mut row = base_row(Role::Student);
        row.student_record_id = Some(Uuid::new_v4());
        row.student_code = Some("S-100".to_string());
        row.student_birth_year = Some(2008);
        row.student_college_id = Some(Uuid::new_v4());
        row.student_class_id = Some(9);

        let account = row.into_account().unwrap();
        let profile = AccountProfile::from(&account);
        assert!(matches!(account, Account::Student(_)));
        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.student_id.as_deref(), Some("S-100"));
        assert_eq!(profile.class_id, Some(9));
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        assert!(base_row(Role::Admin).into_account().is_err());
        assert!(base_row(Role::Teacher).into_account().is_err());
        assert!(base_row(Role::Student).into_account().is_err());
    }

    #[test]
    fn test_display_name_without_last_name() {
        let mut row = base_row(Role::Superadmin);
        row.last_name = Some("  ".to_string());
        assert_eq!(row.into_account().unwrap().display_name(), "Ada");
    }
}
