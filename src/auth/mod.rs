pub mod jwt;
pub mod password;
pub mod policy;

pub use jwt::*;
pub use password::*;
pub use policy::*;
