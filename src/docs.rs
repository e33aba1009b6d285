use utoipa::OpenApi;

use crate::modules::students::model::{
    Course, PaginatedStudentsResponse, Student, StudentRequestDto, StudentStatusDto,
};
use crate::utils::errors::ErrorBody;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::update_student_status,
        crate::modules::students::controller::delete_student,
    ),
    components(
        schemas(
            Student,
            Course,
            StudentRequestDto,
            StudentStatusDto,
            PaginatedStudentsResponse,
            PaginationMeta,
            PaginationParams,
            ErrorBody,
        )
    ),
    tags(
        (name = "Students", description = "Student control service")
    ),
    info(
        title = "Matricula API",
        version = "0.1.0",
        description = "Student registry REST API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
