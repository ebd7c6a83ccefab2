use std::env::{self, VarError};

const HELP: &str = include_str!("./cli-help.txt");

/// Variables that are safe to echo back. Secrets and access tokens are deliberately absent.
const PUBLIC_ENVS: [&str; 9] = [
    "RUST_LOG",
    "VSYNC_HOST",
    "VSYNC_PORT",
    "VSYNC_DATABASE_URL",
    "VSYNC_SHOPIFY_SHOP",
    "VSYNC_SHOPIFY_API_VERSION",
    "VSYNC_SHOPIFY_HMAC_CHECKS",
    "VSYNC_SHOPIFY_REQUEST_TIMEOUT",
    "VSYNC_SHOPIFY_BASE_URL",
];

/// The server takes no arguments. If any are given, print the help text and the current environment and return
/// `true` so that the caller can exit instead of starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().nth(1).is_none() {
        return false;
    }
    println!("\n{HELP}\n");
    println!("Current environment values (EXCLUDING variables that contain secrets):");
    for line in environment_report(|name| env::var(name)) {
        println!("{line}");
    }
    true
}

fn environment_report<F>(lookup: F) -> Vec<String>
where F: Fn(&str) -> Result<String, VarError> {
    PUBLIC_ENVS
        .iter()
        .map(|&name| {
            let val = match lookup(name) {
                Ok(s) => s,
                Err(VarError::NotPresent) => "Not set".into(),
                Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
            };
            format!("  {name:<35} {val:<15}")
        })
        .collect()
}
