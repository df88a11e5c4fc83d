use crate::models::series::Category;

/// Configuration constants for the application
pub struct Config;

impl Config {
    /// Read reports from the gateway instead of the bundled sample data
    pub const USE_LIVE_DATA: bool = false;

    /// Enable automatic data refresh polling (live data only)
    pub const ENABLE_AUTO_REFRESH: bool = true;

    /// Polling interval in milliseconds (10 minutes = 600,000ms)
    pub const POLLING_INTERVAL_MS: u32 = 600_000;

    /// Attempts per request while the gateway answers 429
    pub const MAX_RETRY_ATTEMPTS: u32 = 3;

    /// Category shown on first render
    pub const DEFAULT_CATEGORY: &'static str = "oil";

    /// Whether a metric seen for the first time starts switched on
    pub const NEW_METRIC_ACTIVE: bool = true;

    /// Delay before redrawing the chart after a resize
    pub const RESIZE_DEBOUNCE_MS: u32 = 150;

    /// Live category catalogue: (id, label, chart title)
    pub const CATEGORIES: &'static [(&'static str, &'static str, &'static str)] = &[
        ("oil", "Oil & Gas", "Oil & Gas Emission Trends"),
        ("electric", "Electric", "Electric Sector Emission Trends"),
        ("other", "Other Services", "Other Services Emission Trends"),
    ];

    pub const RECOMMENDATIONS: &'static [&'static str] = &[
        "Reduce CO₂ emissions by implementing cleaner energy sources.",
        "Increase energy efficiency through modern technology upgrades.",
        "Monitor and optimize industrial processes for lower environmental impact.",
        "Encourage adoption of renewable energy across sectors.",
    ];

    pub fn categories() -> Vec<Category> {
        Self::CATEGORIES
            .iter()
            .map(|(id, label, title)| Category::new(*id, *label).with_title(*title))
            .collect()
    }
}
