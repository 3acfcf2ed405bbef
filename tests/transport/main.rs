//! Transport integration tests.

mod mapper;
