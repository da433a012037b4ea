use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    /// Base URL of the hosted backend, e.g. https://xyz.supabase.co
    pub backend_url: String,
    pub backend_api_key: String,

    /// Timeout applied to every remote call (gateway and auth provider).
    pub http_timeout_secs: u64,

    /// When true, the two fixed demo credential pairs are accepted without
    /// contacting the auth provider. Never enable in a real deployment.
    pub demo_mode: bool,

    /// Local file the session store persists {user, isAuthenticated} to.
    pub session_file: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let demo_mode = env::var("DEMO_MODE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        // Demo deployments run entirely in memory and never dial out, so
        // the backend settings are only mandatory outside demo mode.
        let (backend_url, backend_api_key) = if demo_mode {
            (
                env::var("BACKEND_URL").unwrap_or_default(),
                env::var("BACKEND_API_KEY").unwrap_or_default(),
            )
        } else {
            (
                env::var("BACKEND_URL").expect("BACKEND_URL must be set"),
                env::var("BACKEND_API_KEY").expect("BACKEND_API_KEY must be set"),
            )
        };

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            backend_url,
            backend_api_key,

            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),

            demo_mode,

            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| ".hrm-session.json".to_string()),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
