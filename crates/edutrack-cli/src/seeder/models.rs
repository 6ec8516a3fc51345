//! Seeding configuration and the rows the generators produce.

use edutrack_models::Role;
use uuid::Uuid;

/// Appended to every generated college name so `clear-seed` can find them.
pub const SEED_COLLEGE_MARKER: &str = "[seed]";
/// Prefix of every generated student id.
pub const SEED_STUDENT_PREFIX: &str = "SEED-";
/// Domain of every generated staff email.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

pub struct CollegeSeed {
    pub name: String,
}

pub struct AccountSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

pub struct StaffSeed {
    pub account: AccountSeed,
    pub college_id: Uuid,
    /// Only set for teachers.
    pub subject: Option<String>,
}

pub struct StudentSeed {
    pub account: AccountSeed,
    pub college_id: Uuid,
    pub student_id: String,
    pub birth_year: i32,
    pub class_id: Option<i32>,
}

#[derive(Clone)]
pub struct StaffPerCollege {
    pub admins: usize,
    pub teachers: usize,
}

impl Default for StaffPerCollege {
    fn default() -> Self {
        Self {
            admins: 2,
            teachers: 5,
        }
    }
}

#[derive(Clone)]
pub struct SeedConfig {
    pub num_colleges: usize,
    pub staff_per_college: StaffPerCollege,
    pub students_per_college: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_colleges: 5,
            staff_per_college: StaffPerCollege::default(),
            students_per_college: 100,
        }
    }
}

impl SeedConfig {
    pub fn new(num_colleges: usize) -> Self {
        Self {
            num_colleges,
            ..Default::default()
        }
    }

    pub fn with_staff(mut self, staff: StaffPerCollege) -> Self {
        self.staff_per_college = staff;
        self
    }

    pub fn with_students(mut self, students_per_college: usize) -> Self {
        self.students_per_college = students_per_college;
        self
    }

    pub fn total_accounts_per_college(&self) -> usize {
        self.staff_per_college.admins + self.staff_per_college.teachers + self.students_per_college
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_config_totals() {
        let config = SeedConfig::new(3)
            .with_staff(StaffPerCollege {
                admins: 1,
                teachers: 4,
            })
            .with_students(40);
        assert_eq!(config.num_colleges, 3);
        assert_eq!(config.total_accounts_per_college(), 45);
    }
}
