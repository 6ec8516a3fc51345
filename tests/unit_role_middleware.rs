use edutrack::edutrack_auth::Claims;
use edutrack::edutrack_models::{Role, authorize_creation};
use edutrack::middleware::auth::AuthUser;
use edutrack::middleware::role::{check_any_role, check_role};

fn create_test_auth_user(role: Role) -> AuthUser {
    let claims = Claims {
        sub: "00000000-0000-0000-0000-000000000000".to_string(),
        email: "test@example.com".to_string(),
        role,
        iss: "auth-backend".to_string(),
        exp: 9999999999,
        iat: 1234567890,
    };
    AuthUser(claims)
}

#[test]
fn test_check_role_exact_match() {
    for role in Role::ALL {
        let auth_user = create_test_auth_user(role);
        assert!(check_role(&auth_user, role).is_ok());
    }
}

#[test]
fn test_check_role_no_match() {
    let auth_user = create_test_auth_user(Role::Student);
    assert!(check_role(&auth_user, Role::Admin).is_err());

    let auth_user = create_test_auth_user(Role::Teacher);
    assert!(check_role(&auth_user, Role::Superadmin).is_err());

    let auth_user = create_test_auth_user(Role::Admin);
    assert!(check_role(&auth_user, Role::Superadmin).is_err());
}

#[test]
fn test_check_any_role_multiple_match() {
    let allowed = [Role::Superadmin, Role::Admin, Role::Teacher];

    for role in allowed {
        assert!(check_any_role(&create_test_auth_user(role), &allowed).is_ok());
    }
    assert!(check_any_role(&create_test_auth_user(Role::Student), &allowed).is_err());
}

#[test]
fn test_check_any_role_empty_list() {
    let auth_user = create_test_auth_user(Role::Superadmin);
    assert!(check_any_role(&auth_user, &[]).is_err());
}

#[test]
fn test_denial_names_roles() {
    let auth_user = create_test_auth_user(Role::Student);
    let err = check_any_role(&auth_user, &[Role::Admin, Role::Teacher]).unwrap_err();

    assert_eq!(err.status.as_u16(), 403);
    let message = err.error.to_string();
    assert!(message.contains("admin"));
    assert!(message.contains("student"));
}

#[test]
fn test_account_id_from_claims() {
    let auth_user = create_test_auth_user(Role::Admin);
    assert!(auth_user.account_id().unwrap().is_nil());

    let mut broken = create_test_auth_user(Role::Admin);
    broken.0.sub = "not-a-uuid".to_string();
    assert_eq!(broken.account_id().unwrap_err().status.as_u16(), 401);
}

#[test]
fn test_creation_hierarchy() {
    assert!(authorize_creation(Role::Superadmin, Role::Admin).is_ok());
    assert!(authorize_creation(Role::Admin, Role::Teacher).is_ok());
    assert!(authorize_creation(Role::Admin, Role::Student).is_ok());
    assert!(authorize_creation(Role::Teacher, Role::Student).is_ok());

    assert!(authorize_creation(Role::Teacher, Role::Teacher).is_err());
    assert!(authorize_creation(Role::Admin, Role::Admin).is_err());
    assert!(authorize_creation(Role::Student, Role::Student).is_err());
    assert!(authorize_creation(Role::Superadmin, Role::Superadmin).is_err());
}
