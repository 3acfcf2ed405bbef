//! Notification bus integration tests.

mod stream;
