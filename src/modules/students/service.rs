use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::students::model::{Student, StudentRecord, StudentRequestDto};
use crate::modules::students::store::{StoreError, StudentStore};
use crate::utils::errors::AppError;
use crate::utils::registration::generate_registration_code;

/// Field a create/update collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    NationalId,
    Email,
}

impl std::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictField::NationalId => write!(f, "National ID"),
            ConflictField::Email => write!(f, "Email"),
        }
    }
}

/// Domain errors of the student lifecycle. Both `NotFound` and `Conflict`
/// are recoverable by the caller; store failures pass through unchanged.
#[derive(Debug, Error)]
pub enum StudentError {
    #[error("Student {0} not found")]
    NotFound(Uuid),

    #[error("{0} already registered in the system")]
    Conflict(ConflictField),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StudentError> for AppError {
    fn from(err: StudentError) -> Self {
        match err {
            StudentError::NotFound(_) => AppError::not_found(err),
            StudentError::Conflict(_) => AppError::conflict(err),
            StudentError::Store(_) => AppError::database(err),
        }
    }
}

pub struct StudentService;

impl StudentService {
    /// Returns the page `[offset, offset + limit)` of the full enumeration,
    /// together with the total record count. Past-the-end offsets yield an
    /// empty page with the total preserved.
    #[instrument(skip(store))]
    pub async fn find_all(
        store: &dyn StudentStore,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Student>, i64), StudentError> {
        let students = store.list_all().await?;
        let total = students.len() as i64;

        let start = offset.min(total);
        let end = offset.saturating_add(limit).min(total);
        let page = students
            .into_iter()
            .skip(start as usize)
            .take((end - start) as usize)
            .collect();

        Ok((page, total))
    }

    #[instrument(skip(store))]
    pub async fn find_by_id(store: &dyn StudentStore, id: Uuid) -> Result<Student, StudentError> {
        store.find_by_id(id).await?.ok_or(StudentError::NotFound(id))
    }

    /// Creates a student. The national-ID check runs before the email check,
    /// so when both collide the national-ID conflict is the one reported.
    #[instrument(skip(store, dto))]
    pub async fn create(
        store: &dyn StudentStore,
        dto: StudentRequestDto,
    ) -> Result<Student, StudentError> {
        Self::ensure_national_id_free(store, &dto.national_id, None).await?;
        Self::ensure_email_free(store, &dto.email, None).await?;

        let record = StudentRecord::create(dto, generate_registration_code());
        Ok(store.save(record).await?)
    }

    /// Full replacement of the mutable fields. A uniqueness match against
    /// the record being updated itself is not a collision.
    #[instrument(skip(store, dto))]
    pub async fn update(
        store: &dyn StudentStore,
        id: Uuid,
        dto: StudentRequestDto,
    ) -> Result<Student, StudentError> {
        let existing = Self::find_by_id(store, id).await?;

        Self::ensure_national_id_free(store, &dto.national_id, Some(id)).await?;
        Self::ensure_email_free(store, &dto.email, Some(id)).await?;

        let record = StudentRecord::replace(&existing, dto);
        Ok(store.save(record).await?)
    }

    /// Flips `active`; every other field is left untouched.
    #[instrument(skip(store))]
    pub async fn update_status(
        store: &dyn StudentStore,
        id: Uuid,
        active: bool,
    ) -> Result<(), StudentError> {
        let existing = Self::find_by_id(store, id).await?;
        store
            .save(StudentRecord::with_status(&existing, active))
            .await?;
        Ok(())
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &dyn StudentStore, id: Uuid) -> Result<(), StudentError> {
        Self::find_by_id(store, id).await?;
        store.delete_by_id(id).await?;
        Ok(())
    }

    async fn ensure_national_id_free(
        store: &dyn StudentStore,
        national_id: &str,
        current: Option<Uuid>,
    ) -> Result<(), StudentError> {
        if let Some(owner) = store.find_by_national_id(national_id).await?
            && current != Some(owner.id)
        {
            return Err(StudentError::Conflict(ConflictField::NationalId));
        }
        Ok(())
    }

    async fn ensure_email_free(
        store: &dyn StudentStore,
        email: &str,
        current: Option<Uuid>,
    ) -> Result<(), StudentError> {
        if let Some(owner) = store.find_by_email(email).await?
            && current != Some(owner.id)
        {
            return Err(StudentError::Conflict(ConflictField::Email));
        }
        Ok(())
    }
}
