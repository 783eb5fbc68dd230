pub mod gateway;
pub mod graphql;
pub mod operations;
