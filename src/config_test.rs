use super::*;

/// # Safety
/// Env mutation; each test touching these vars holds `ENV_LOCK`.
unsafe fn clear_client_env() {
    unsafe {
        std::env::remove_var("ENCENAPE_API_URL");
        std::env::remove_var("ENCENAPE_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("ENCENAPE_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("ENCENAPE_LOGIN_PATH");
        std::env::remove_var("ENCENAPE_SESSION_FILE");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_client_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.api_base(), "http://localhost:8080/api");
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_client_env();
        std::env::set_var("ENCENAPE_API_URL", "https://ingressos.example.test/");
        std::env::set_var("ENCENAPE_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("ENCENAPE_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("ENCENAPE_LOGIN_PATH", "/entrar");
        std::env::set_var("ENCENAPE_SESSION_FILE", "/tmp/s.json");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.api_url, "https://ingressos.example.test");
    assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    assert_eq!(cfg.connect_timeout, Duration::from_secs(2));
    assert_eq!(cfg.login_path, "/entrar");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/s.json"));

    unsafe { clear_client_env() };
}

#[test]
fn from_env_rejects_non_numeric_timeout() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_client_env();
        std::env::set_var("ENCENAPE_REQUEST_TIMEOUT_SECS", "soon");
    }

    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("ENCENAPE_REQUEST_TIMEOUT_SECS"));

    unsafe { clear_client_env() };
}

#[test]
fn for_url_trims_trailing_slash() {
    let cfg = ClientConfig::for_url("http://127.0.0.1:1234/");
    assert_eq!(cfg.api_base(), "http://127.0.0.1:1234/api");
}
