//! Invite deep-link resolution for the app landing page.
//!
//! Pure functions only: given a visitor's user agent and an invite code,
//! decide where the page should send them. Rendering and the redirect timers
//! stay in the UI.

pub const APP_SCHEME: &str = "readinggoals://";
pub const ANDROID_PACKAGE: &str = "app.readinggoals.android";
pub const APP_STORE_ID: &str = "6451234987";

/// Delay before the automatic redirect fires, so the visitor briefly sees
/// the "opening the app" state.
pub const REDIRECT_DELAY_MS: u64 = 1_000;
/// How long iOS gets to open the app before falling back to the App Store.
pub const IOS_STORE_FALLBACK_MS: u64 = 1_500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Desktop,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Chrome intent URL that opens the app or bounces to Play.
    AndroidIntent(String),
    /// Custom-scheme link, plus the store URL the page falls back to after
    /// [`IOS_STORE_FALLBACK_MS`].
    IosDeepLink {
        deep_link: String,
        store_fallback: String,
    },
    /// Desktop visitors just get the store links.
    Store { play: String, app_store: String },
}

pub fn app_store_url() -> String {
    format!("https://apps.apple.com/app/id{APP_STORE_ID}")
}

pub fn play_store_url() -> String {
    format!("https://play.google.com/store/apps/details?id={ANDROID_PACKAGE}")
}

pub fn deep_link(code: &str) -> String {
    format!("{APP_SCHEME}invite/{code}")
}

pub fn android_intent_url(code: &str) -> String {
    let scheme = APP_SCHEME.trim_end_matches("://");
    format!("intent://invite/{code}#Intent;scheme={scheme};package={ANDROID_PACKAGE};end")
}

/// Classify the visitor. Android matching is case-insensitive; the iOS
/// device tokens are exact, with the IE11 "MSStream" spoof excluded.
pub fn detect_platform(user_agent: &str) -> Platform {
    if user_agent.to_lowercase().contains("android") {
        return Platform::Android;
    }
    let ios_device = ["iPad", "iPhone", "iPod"]
        .iter()
        .any(|d| user_agent.contains(d));
    if ios_device && !user_agent.contains("MSStream") {
        return Platform::Ios;
    }
    Platform::Desktop
}

pub fn invite_redirect(user_agent: &str, code: &str) -> RedirectTarget {
    match detect_platform(user_agent) {
        Platform::Android => RedirectTarget::AndroidIntent(android_intent_url(code)),
        Platform::Ios => RedirectTarget::IosDeepLink {
            deep_link: deep_link(code),
            store_fallback: app_store_url(),
        },
        Platform::Desktop => RedirectTarget::Store {
            play: play_store_url(),
            app_store: app_store_url(),
        },
    }
}
