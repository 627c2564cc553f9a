pub mod assessments;
pub mod audit;
pub mod health;
pub mod organization;
pub mod reports;
pub mod skills;
