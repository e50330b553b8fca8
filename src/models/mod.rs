pub mod food;
pub mod meal;
pub mod nutrients;
pub mod user;

pub use food::*;
pub use meal::*;
pub use nutrients::*;
pub use user::*;
