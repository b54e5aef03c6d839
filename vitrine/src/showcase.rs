//! Route table and precache list shipped with the business showcase template.

use vitrine_backend::Expiration;
use vitrine_core::PartitionLabel;

use crate::route::{CacheRoute, RoutePattern, RouteTable, Strategy};

const DAY: u64 = 24 * 60 * 60;

/// Partition holding precached and long-lived static assets.
pub const STATIC_CACHE: PartitionLabel = PartitionLabel::new_static("businesspro-static-v1.0.0");
/// Partition holding API responses.
pub const DYNAMIC_CACHE: PartitionLabel = PartitionLabel::new_static("businesspro-dynamic-v1.0.0");
/// Partition holding third-party web fonts.
pub const FONTS_CACHE: PartitionLabel = PartitionLabel::new_static("fonts-cache");

/// Assets fetched and stored when the worker installs, relative to its scope.
pub const PRECACHE_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./css/main.css",
    "./css/themes.css",
    "./css/animations.css",
    "./js/app.js",
    "./js/utils.js",
    "./js/themeManager.js",
    "./js/animations.js",
    "./js/components/header.js",
    "./js/components/hero.js",
    "./js/components/services.js",
    "./js/components/footer.js",
    "./manifest.json",
];

/// Partitions kept when the worker activates.
pub fn current_caches() -> Vec<PartitionLabel> {
    vec![STATIC_CACHE, DYNAMIC_CACHE, FONTS_CACHE]
}

/// The showcase routing table.
///
/// Images come before the `.css|.js` rule and fonts after it, so a font
/// stylesheet URL ending in `.css` is handled as a stylesheet.
pub fn routes() -> Result<RouteTable, regex::Error> {
    Ok(RouteTable::new(vec![
        CacheRoute::new(
            RoutePattern::url(r"(?i)\.(?:png|jpg|jpeg|svg|gif|webp|ico)$")?,
            Strategy::CacheFirst,
            STATIC_CACHE,
            Expiration::new(100, 30 * DAY),
        ),
        CacheRoute::new(
            RoutePattern::url(r"(?i)\.(?:css|js)$")?,
            Strategy::StaleWhileRevalidate,
            STATIC_CACHE,
            Expiration::new(50, 7 * DAY),
        ),
        CacheRoute::new(
            RoutePattern::url(r"^https://fonts\.")?,
            Strategy::CacheFirst,
            FONTS_CACHE,
            Expiration::new(30, 365 * DAY),
        ),
        CacheRoute::new(
            RoutePattern::url(r"/api/")?,
            Strategy::NetworkFirst,
            DYNAMIC_CACHE,
            Expiration::new(50, 5 * 60),
        ),
    ]))
}
