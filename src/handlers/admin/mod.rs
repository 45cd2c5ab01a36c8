pub mod artists;
pub mod users;
