pub mod helper;
pub mod html_table;
pub mod renderer;
pub mod rework;
pub mod task_scraper;

#[cfg(feature = "browser")]
pub use renderer::ChromeRenderer;
pub use renderer::HttpRenderer;
pub use task_scraper::Scraper;
