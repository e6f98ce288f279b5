//! Integration test crate for yamlanno. Tests live in the `[[test]]`
//! targets; this library is intentionally empty.
