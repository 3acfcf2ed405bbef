//! Dispatch pipeline integration tests.

mod support;

mod campaigns;
mod validation;
