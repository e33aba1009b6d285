//! The `StudentStore` trait and its backends.
//!
//! The store is the only component that persists state; the lifecycle
//! service never bypasses it. The running service uses the Postgres backend;
//! the test suite injects the in-memory one.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::students::model::{Student, StudentRecord};

/// Failure at the storage layer, distinct from the domain errors the
/// lifecycle service raises.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected a write that slipped past the service's
    /// pre-checks (two conflicting writes racing). Surfaces as an
    /// infrastructure failure, never as a domain conflict.
    #[error("unique constraint {constraint:?} violated")]
    UniqueViolation { constraint: Option<String> },

    /// A write addressed a row that no longer exists.
    #[error("no student row matched id {0}")]
    MissingRow(Uuid),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Abstraction over student persistence.
///
/// Lookups return `None` for absence; "not found" is never an error at this
/// layer. `list_all` keeps a stable order within a single call, which the
/// lifecycle service relies on when slicing pages.
#[async_trait]
pub trait StudentStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError>;

    async fn find_by_national_id(&self, national_id: &str) -> Result<Option<Student>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError>;

    /// Inserts `record` when `record.id` is `None`, otherwise replaces the
    /// mutable fields of the matched row. The registration code is written
    /// once on insert and never rewritten.
    async fn save(&self, record: StudentRecord) -> Result<Student, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    /// Full enumeration in creation order.
    async fn list_all(&self) -> Result<Vec<Student>, StoreError>;
}

/// Postgres-backed store. The unique indexes on `national_id`, `email` and
/// `registration_code` serialize conflicting writes.
#[derive(Clone, Debug)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(e: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
        {
            return StoreError::UniqueViolation {
                constraint: db_err.constraint().map(str::to_owned),
            };
        }
        StoreError::Database(e)
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, name, national_id, email, registration_code, course, active, created_at, updated_at
               FROM students
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, name, national_id, email, registration_code, course, active, created_at, updated_at
               FROM students
               WHERE national_id = $1"#,
        )
        .bind(national_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, name, national_id, email, registration_code, course, active, created_at, updated_at
               FROM students
               WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn save(&self, record: StudentRecord) -> Result<Student, StoreError> {
        match record.id {
            None => sqlx::query_as::<_, Student>(
                r#"INSERT INTO students (name, national_id, email, registration_code, course, active)
                   VALUES ($1, $2, $3, $4, $5, $6)
                   RETURNING id, name, national_id, email, registration_code, course, active, created_at, updated_at"#,
            )
            .bind(&record.name)
            .bind(&record.national_id)
            .bind(&record.email)
            .bind(&record.registration_code)
            .bind(record.course)
            .bind(record.active)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_write_error),
            Some(id) => sqlx::query_as::<_, Student>(
                r#"UPDATE students
                   SET name = $1, national_id = $2, email = $3, course = $4, active = $5, updated_at = NOW()
                   WHERE id = $6
                   RETURNING id, name, national_id, email, registration_code, course, active, created_at, updated_at"#,
            )
            .bind(&record.name)
            .bind(&record.national_id)
            .bind(&record.email)
            .bind(record.course)
            .bind(record.active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_write_error)?
            .ok_or(StoreError::MissingRow(id)),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MissingRow(id));
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, name, national_id, email, registration_code, course, active, created_at, updated_at
               FROM students
               ORDER BY created_at, id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }
}

/// In-memory store used by the test suite. Mirrors the unique indexes the
/// Postgres schema enforces.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    records: std::sync::RwLock<std::collections::HashMap<Uuid, Student>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn unique_violation(constraint: &str) -> StoreError {
        StoreError::UniqueViolation {
            constraint: Some(constraint.to_string()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        Ok(self
            .records
            .read()
            .expect("student table lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<Student>, StoreError> {
        Ok(self
            .records
            .read()
            .expect("student table lock poisoned")
            .values()
            .find(|s| s.national_id == national_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        Ok(self
            .records
            .read()
            .expect("student table lock poisoned")
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    async fn save(&self, record: StudentRecord) -> Result<Student, StoreError> {
        let mut records = self.records.write().expect("student table lock poisoned");

        for existing in records.values() {
            if record.id == Some(existing.id) {
                continue;
            }
            if existing.national_id == record.national_id {
                return Err(Self::unique_violation("students_national_id_key"));
            }
            if existing.email == record.email {
                return Err(Self::unique_violation("students_email_key"));
            }
            if record.id.is_none() && existing.registration_code == record.registration_code {
                return Err(Self::unique_violation("students_registration_code_key"));
            }
        }

        let now = chrono::Utc::now();
        let student = match record.id {
            None => Student {
                id: Uuid::new_v4(),
                name: record.name,
                national_id: record.national_id,
                email: record.email,
                registration_code: record.registration_code,
                course: record.course,
                active: record.active,
                created_at: now,
                updated_at: now,
            },
            Some(id) => {
                let existing = records.get(&id).ok_or(StoreError::MissingRow(id))?;
                Student {
                    id,
                    name: record.name,
                    national_id: record.national_id,
                    email: record.email,
                    registration_code: existing.registration_code.clone(),
                    course: record.course,
                    active: record.active,
                    created_at: existing.created_at,
                    updated_at: now,
                }
            }
        };

        records.insert(student.id, student.clone());
        Ok(student)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.records
            .write()
            .expect("student table lock poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::MissingRow(id))
    }

    async fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> = self
            .records
            .read()
            .expect("student table lock poisoned")
            .values()
            .cloned()
            .collect();
        students.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::students::model::Course;

    fn record(national_id: &str, email: &str) -> StudentRecord {
        StudentRecord {
            id: None,
            name: "Test".to_string(),
            national_id: national_id.to_string(),
            email: email.to_string(),
            registration_code: crate::utils::registration::generate_registration_code(),
            course: Course::Law,
            active: true,
        }
    }

    #[tokio::test]
    async fn save_assigns_id_and_timestamps_on_insert() {
        let store = MemoryStudentStore::new();

        let student = store
            .save(record("11111111111", "a@test.com"))
            .await
            .unwrap();

        assert!(!student.id.is_nil());
        assert_eq!(student.created_at, student.updated_at);
    }

    #[tokio::test]
    async fn save_enforces_unique_national_id() {
        let store = MemoryStudentStore::new();
        store
            .save(record("11111111111", "a@test.com"))
            .await
            .unwrap();

        let err = store
            .save(record("11111111111", "b@test.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn save_replace_keeps_registration_code_and_created_at() {
        let store = MemoryStudentStore::new();
        let created = store
            .save(record("11111111111", "a@test.com"))
            .await
            .unwrap();

        let mut replacement = record("11111111111", "a@test.com");
        replacement.id = Some(created.id);
        replacement.registration_code = "IGNORED0".to_string();
        replacement.name = "Renamed".to_string();

        let updated = store.save(replacement).await.unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.registration_code, created.registration_code);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn save_replace_of_missing_row_fails() {
        let store = MemoryStudentStore::new();

        let mut replacement = record("11111111111", "a@test.com");
        replacement.id = Some(Uuid::new_v4());

        let err = store.save(replacement).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingRow(_)));
    }

    #[tokio::test]
    async fn list_all_is_in_creation_order() {
        let store = MemoryStudentStore::new();
        let first = store
            .save(record("11111111111", "a@test.com"))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store
            .save(record("22222222222", "b@test.com"))
            .await
            .unwrap();

        let all = store.list_all().await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
