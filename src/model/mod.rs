pub mod attendance;
pub mod leave;
pub mod role;
pub mod user;
