pub mod contact;
pub mod validation;
