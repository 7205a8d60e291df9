#![forbid(unsafe_code)]

mod store;
mod uploads;

pub use store::*;
pub use uploads::{UploadDir, safe_basename};
