pub const APP_NAME: &str = "morchy-api";

const fn unwrap_or_cargo_version(opt: Option<&'static str>) -> &'static str {
    match opt {
        Some(val) => val,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Release tag injected at build time through `APP_TAG`, falling back to the crate version.
pub const VERSION: &str = unwrap_or_cargo_version(option_env!("APP_TAG"));
