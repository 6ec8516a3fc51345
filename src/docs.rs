use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use edutrack_core::{PaginationMeta, PaginationParams};
use edutrack_models::Role;
use edutrack_models::accounts::AccountProfile;
use edutrack_models::admins::{Admin, CreateAdminDto, PaginatedAdminsResponse, UpdateAdminDto};
use edutrack_models::auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RefreshTokenRequest, ResetPasswordRequest, TokenResponse,
};
use edutrack_models::classes::{
    AccessibleClass, AdminClassesResponse, Class, GrantAccessDto, GrantAccessResponse,
    RevokeAllResponse,
};
use edutrack_models::colleges::{
    College, CollegeAdminDto, CollegeDetail, CreateCollegeDto, CreateCollegeResponse,
    PaginatedCollegesResponse,
};
use edutrack_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentImportReport,
    StudentUpsertReport, UpdateStudentDto,
};
use edutrack_models::teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, Teacher, UpdateTeacherDto,
};
use edutrack_models::videos::{CreateVideoDto, VideoResponse};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::change_password,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::colleges::controller::create_college,
        crate::modules::colleges::controller::list_colleges,
        crate::modules::colleges::controller::get_college,
        crate::modules::colleges::controller::delete_college,
        crate::modules::admins::controller::create_admin,
        crate::modules::admins::controller::list_admins,
        crate::modules::admins::controller::get_admin,
        crate::modules::admins::controller::update_admin,
        crate::modules::admins::controller::delete_admin,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::list_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::import_students,
        crate::modules::students::controller::import_students_with_update,
        crate::modules::classes::controller::list_classes,
        crate::modules::class_access::controller::grant_access,
        crate::modules::class_access::controller::revoke_access,
        crate::modules::class_access::controller::revoke_all_access,
        crate::modules::class_access::controller::admin_classes,
        crate::modules::class_access::controller::my_classes,
        crate::modules::videos::controller::upload_video,
        crate::modules::videos::controller::list_videos,
        crate::modules::videos::controller::list_class_videos,
        crate::modules::videos::controller::delete_video,
    ),
    components(
        schemas(
            Role,
            AccountProfile,
            LoginRequest,
            TokenResponse,
            RefreshTokenRequest,
            ChangePasswordRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            ErrorResponse,
            College,
            CollegeDetail,
            CollegeAdminDto,
            CreateCollegeDto,
            CreateCollegeResponse,
            PaginatedCollegesResponse,
            Admin,
            CreateAdminDto,
            UpdateAdminDto,
            PaginatedAdminsResponse,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            PaginatedTeachersResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            StudentImportReport,
            StudentUpsertReport,
            Class,
            GrantAccessDto,
            GrantAccessResponse,
            RevokeAllResponse,
            AccessibleClass,
            AdminClassesResponse,
            CreateVideoDto,
            VideoResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token refresh and password management"),
        (name = "Colleges", description = "College management (superadmin)"),
        (name = "Admins", description = "College admin management (superadmin)"),
        (name = "Teachers", description = "Teacher management"),
        (name = "Students", description = "Student management and CSV import"),
        (name = "Classes", description = "The fixed class list"),
        (name = "Class Access", description = "Admin class-access grants"),
        (name = "Videos", description = "Class-scoped YouTube videos")
    ),
    info(
        title = "EduTrack API",
        version = "0.1.0",
        description = "Multi-college learning backend with role-based access control and class-scoped video content.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
