//! Which videos an account may see.
//!
//! Visibility is derived at query time from the account's role and never
//! stored on the video itself:
//!
//! | role       | visible classes                                   | category      |
//! |------------|---------------------------------------------------|---------------|
//! | superadmin | all                                               | any           |
//! | admin      | classes granted through `admin_class_access`      | any           |
//! | teacher    | classes that have students in the teacher's college | the subject |
//! | student    | their own class, or nothing when unassigned       | any           |

use edutrack_core::AppError;
use edutrack_models::Account;
use edutrack_models::accounts::{StaffAccount, StaffProfile};
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::modules::class_access::service::ClassAccessService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibleClasses {
    All,
    Only(Vec<i32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoScope {
    pub classes: VisibleClasses,
    /// Case-insensitive category restriction.
    pub category: Option<String>,
}

impl VideoScope {
    pub fn all() -> Self {
        Self {
            classes: VisibleClasses::All,
            category: None,
        }
    }

    pub fn only(class_ids: Vec<i32>) -> Self {
        Self {
            classes: VisibleClasses::Only(class_ids),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        self
    }

    pub fn allows_class(&self, class_id: i32) -> bool {
        match &self.classes {
            VisibleClasses::All => true,
            VisibleClasses::Only(ids) => ids.contains(&class_id),
        }
    }

    /// True when no video can match, so the query can be skipped.
    pub fn is_empty(&self) -> bool {
        matches!(&self.classes, VisibleClasses::Only(ids) if ids.is_empty())
    }

    /// Class ids for a `class_id = ANY($n)` bind. `None` means unrestricted.
    pub fn class_filter(&self) -> Option<&[i32]> {
        match &self.classes {
            VisibleClasses::All => None,
            VisibleClasses::Only(ids) => Some(ids),
        }
    }
}

#[instrument(skip(db, account), fields(account.id = %account.id(), account.role = %account.role()))]
pub async fn resolve_scope(db: &PgPool, account: &Account) -> Result<VideoScope, AppError> {
    let scope = match account {
        Account::Student(student) => VideoScope::only(student.class_id.into_iter().collect()),
        Account::Staff(StaffAccount { profile, .. }) => match profile {
            StaffProfile::Superadmin => VideoScope::all(),
            StaffProfile::Admin { admin_id, .. } => {
                VideoScope::only(ClassAccessService::granted_class_ids(db, *admin_id).await?)
            }
            StaffProfile::Teacher {
                college_id,
                subject,
                ..
            } => {
                let class_ids = sqlx::query_scalar::<_, i32>(
                    "SELECT DISTINCT class_id FROM students
                     WHERE college_id = $1 AND class_id IS NOT NULL
                     ORDER BY class_id",
                )
                .bind(college_id)
                .fetch_all(db)
                .await?;

                VideoScope::only(class_ids).with_category(subject.as_deref())
            }
        },
    };

    debug!(?scope, "Video scope resolved");
    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_allows_every_class() {
        let scope = VideoScope::all();
        assert!(scope.allows_class(1));
        assert!(scope.allows_class(12));
        assert!(!scope.is_empty());
        assert_eq!(scope.class_filter(), None);
    }

    #[test]
    fn test_only_restricts_classes() {
        let scope = VideoScope::only(vec![3, 4]);
        assert!(scope.allows_class(3));
        assert!(!scope.allows_class(5));
        assert_eq!(scope.class_filter(), Some(&[3, 4][..]));
    }

    #[test]
    fn test_empty_scope() {
        let scope = VideoScope::only(Vec::new());
        assert!(scope.is_empty());
        assert!(!scope.allows_class(1));
    }

    #[test]
    fn test_blank_subject_is_no_category() {
        assert_eq!(VideoScope::all().with_category(Some("  ")).category, None);
        assert_eq!(
            VideoScope::all().with_category(Some(" Math ")).category.as_deref(),
            Some("Math")
        );
    }
}
