pub mod applicant_flow;

pub use applicant_flow::{ApplicantFlow, FlowResult};
