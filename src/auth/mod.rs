mod helpers;
mod middleware;
mod password;
mod token;

pub use middleware::RequireUser;
pub use password::PasswordHasher;
pub use token::{TokenGenerator, parse_token};
