use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::pagination::PaginationMeta;

/// Course a student can be enrolled in. Closed set, mirrored by the `course`
/// enum type in Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "course", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Course {
    Law,
    Medicine,
    Engineering,
    Architecture,
    ComputerScience,
    Nursing,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub national_id: String,
    pub email: String,
    /// Assigned once at creation, never caller-supplied.
    pub registration_code: String,
    pub course: Course,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and full update. `id` and `registration_code` are
/// never accepted from callers.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StudentRequestDto {
    #[validate(length(min = 1, max = 120, message = "name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 11, message = "national_id must be 1 to 11 characters"))]
    pub national_id: String,
    #[validate(email(message = "The email must be valid"))]
    pub email: String,
    pub course: Course,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentStatusDto {
    pub active: bool,
}

/// Write shape accepted by the store: `id == None` inserts a new row (the
/// store assigns id and timestamps), `Some` replaces the mutable fields of
/// the matched row.
#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub id: Option<Uuid>,
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub registration_code: String,
    pub course: Course,
    pub active: bool,
}

impl StudentRecord {
    /// Record for a brand-new student.
    pub fn create(dto: StudentRequestDto, registration_code: String) -> Self {
        Self {
            id: None,
            name: dto.name,
            national_id: dto.national_id,
            email: dto.email,
            registration_code,
            course: dto.course,
            active: dto.active,
        }
    }

    /// Full replacement of an existing student's mutable fields. `id` and
    /// `registration_code` carry over untouched.
    pub fn replace(existing: &Student, dto: StudentRequestDto) -> Self {
        Self {
            id: Some(existing.id),
            name: dto.name,
            national_id: dto.national_id,
            email: dto.email,
            registration_code: existing.registration_code.clone(),
            course: dto.course,
            active: dto.active,
        }
    }

    /// Status-only change; every other field carries over from `existing`.
    pub fn with_status(existing: &Student, active: bool) -> Self {
        Self {
            id: Some(existing.id),
            name: existing.name.clone(),
            national_id: existing.national_id.clone(),
            email: existing.email.clone(),
            registration_code: existing.registration_code.clone(),
            course: existing.course,
            active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
