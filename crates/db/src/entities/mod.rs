//! `SeaORM` entities.

pub mod activity_log;
pub mod administrative_division;
pub mod auth_user;
pub mod facility;
pub mod license;
pub mod profile;
pub mod user_role;

pub use activity_log::Entity as ActivityLog;
pub use administrative_division::Entity as AdministrativeDivision;
pub use auth_user::Entity as AuthUser;
pub use facility::Entity as Facility;
pub use license::Entity as License;
pub use profile::Entity as Profile;
pub use user_role::Entity as UserRole;
