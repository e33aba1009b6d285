use uuid::Uuid;

/// Length of a registration code.
pub const REGISTRATION_CODE_LEN: usize = 8;

/// Generates an opaque registration code: the first eight hex characters of
/// a random UUID, uppercased.
///
/// Uniqueness holds with overwhelming probability; the unique index on the
/// column is the backstop.
pub fn generate_registration_code() -> String {
    Uuid::new_v4().simple().to_string()[..REGISTRATION_CODE_LEN].to_uppercase()
}
