//! Value Objects

pub mod account_id;
pub mod account_password;
pub mod account_role;
pub mod display_name;
pub mod email;
pub mod experience_level;
pub mod public_id;

pub use account_id::AccountId;
pub use account_password::{AccountPassword, RawPassword};
pub use account_role::AccountRole;
pub use display_name::DisplayName;
pub use email::Email;
pub use experience_level::ExperienceLevel;
pub use public_id::PublicId;
