mod settings;

pub use self::settings::{
    FreshnessSettings, PriceFeedSettings, PriceSource, RefreshSettings, ServerSettings, Settings,
    WindowSettings,
};
