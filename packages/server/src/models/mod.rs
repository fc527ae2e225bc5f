pub mod auth;
pub mod files;
pub mod product;
pub mod seed;
pub mod shared;
