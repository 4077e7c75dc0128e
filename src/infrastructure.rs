pub mod email;
pub mod kv;
pub mod utils;
