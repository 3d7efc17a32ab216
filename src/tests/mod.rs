//! Crate-level test suites: controller behaviour against fake transports and
//! property laws for the normalizer.

mod mocks;
mod property;
mod unit;
