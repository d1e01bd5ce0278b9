pub mod departments;
pub mod employees;

use uuid::Uuid;

/// Path ids that are not UUIDs cannot name a stored record.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
