//! User domain
//!
//! Domain types and traits for the user records that credentials are
//! checked against.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserProfile, UserRole, UserSummary};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_person_id, UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
