pub mod applicant;
pub mod loaders;
pub mod tier;

pub use applicant::ApplicantRecord;
pub use loaders::{load_applicants, RowOutcome, SkipReason};
pub use tier::Tier;
