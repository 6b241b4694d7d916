pub mod interact;
pub mod manager;

pub use manager::{browser_available, find_browser_executable, BrowserSession};
