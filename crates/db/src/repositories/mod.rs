//! Repositories wrapping the `SeaORM` entities.

mod activity_log;
mod administrative_division;
mod auth_user;
mod facility;
mod license;
mod profile;
mod user_role;

pub use activity_log::ActivityLogRepository;
pub use administrative_division::{DivisionFilter, DivisionRepository};
pub use auth_user::AuthUserRepository;
pub use facility::{FacilityFilter, FacilityRepository};
pub use license::{LicenseFilter, LicenseRepository};
pub use profile::ProfileRepository;
pub use user_role::UserRoleRepository;
