#![forbid(unsafe_code)]

pub mod counting_store;
pub mod graphql_test_utils;
