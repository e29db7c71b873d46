// Data-access and outbound services

pub mod accounts;
pub mod email;
pub mod plans;

pub use accounts::AccountService;
pub use email::{EmailError, Mailer};
pub use plans::PlanService;
