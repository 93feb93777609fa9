pub mod item;
pub mod role;
pub mod user;
