pub mod site;

pub use crate::domain::ports::{ConfigProvider, Page, Storage};
pub use crate::utils::error::Result;
