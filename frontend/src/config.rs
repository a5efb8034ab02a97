
#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

pub const SAVE_PROFILE_PATH: &str = "/api/save_profile";
pub const CHECK_USERNAME_PATH: &str = "/api/check_telegram_user";

/// Requests still pending after this are reported as network failures.
pub const SUBMIT_TIMEOUT_MS: u32 = 15_000;

/// Used when the backend does not hand out a personal deep link.
pub const BOT_LINK: &str = "https://t.me/RunTrainerBot";

pub const REDIRECT_DELAY_MS: u32 = 3_000;
