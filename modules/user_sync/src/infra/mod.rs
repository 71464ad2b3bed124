pub mod firebase;
pub mod graphql;
