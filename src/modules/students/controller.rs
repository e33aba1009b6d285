use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::students::model::{
    PaginatedStudentsResponse, Student, StudentRequestDto, StudentStatusDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorBody};
use crate::utils::pagination::{PaginationMeta, PaginationParams};
use crate::validator::{ValidatedJson, validation_messages};

#[utoipa::path(
    get,
    path = "/api/students",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated students returned successfully", body = PaginatedStudentsResponse),
        (status = 422, description = "Invalid pagination parameters", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    params.validate().map_err(|errors| {
        AppError::with_errors(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow::anyhow!("Validation failed"),
            validation_messages(&errors),
        )
    })?;

    let limit = params.limit();
    let offset = params.offset();

    let (students, total) = StudentService::find_all(state.store.as_ref(), offset, limit).await?;

    let has_more = offset.saturating_add(limit) < total;
    Ok(Json(PaginatedStudentsResponse {
        data: students,
        meta: PaginationMeta {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student returned successfully", body = Student),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::find_by_id(state.store.as_ref(), id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentRequestDto,
    responses(
        (status = 201, description = "Student created successfully", body = Student,
         headers(("Location" = String, description = "URI of the created student"))),
        (status = 400, description = "Bad request", body = ErrorBody),
        (status = 409, description = "National ID or email already registered", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<StudentRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let student = StudentService::create(state.store.as_ref(), dto).await?;

    let location = format!("/api/students/{}", student.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(student),
    ))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = StudentRequestDto,
    responses(
        (status = 204, description = "Student updated successfully"),
        (status = 400, description = "Bad request", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 409, description = "National ID or email already registered", body = ErrorBody),
        (status = 422, description = "Validation failed", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<StudentRequestDto>,
) -> Result<StatusCode, AppError> {
    StudentService::update(state.store.as_ref(), id, dto).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = StudentStatusDto,
    responses(
        (status = 204, description = "Student status updated successfully"),
        (status = 400, description = "Bad request", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn update_student_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<StudentStatusDto>,
) -> Result<StatusCode, AppError> {
    StudentService::update_status(state.store.as_ref(), id, dto.active).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted successfully"),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StudentService::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
