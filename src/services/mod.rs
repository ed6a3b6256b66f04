pub mod mailer;
pub mod outcome;
pub mod provisioner;

pub use mailer::Mailer;
pub use provisioner::{ProvisionOutcome, Provisioner};
