mod password;
mod user;
mod username;

pub use password::Password;
pub use user::{NewUser, User, UserId};
pub use username::Username;
