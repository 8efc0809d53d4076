pub mod assess;
pub mod list_assessments;
pub mod show_profile;

pub use assess::{assess_path, AssessOptions};
pub use list_assessments::list_assessments;
pub use show_profile::show_profile;
