//! Configuration module

mod site;

pub use site::CodeThemeConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
