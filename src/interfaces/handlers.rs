pub mod contact;
pub mod cors;
