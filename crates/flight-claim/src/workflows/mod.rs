pub mod airports;
pub mod eligibility;
