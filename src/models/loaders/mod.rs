pub mod csv_loader;

pub use csv_loader::{load_applicants, load_applicants_from_reader, RowOutcome, SkipReason};
