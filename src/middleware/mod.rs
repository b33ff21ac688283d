pub mod auth;
pub mod local_date;

pub use auth::AuthUser;
pub use local_date::{LocalDate, LOCAL_DATE_HEADER};
