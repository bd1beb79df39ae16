use std::env::{self, VarError};

/// Non-secret settings. Their values are printed as-is.
const PUBLIC_ENVS: [&str; 10] = [
    "RUST_LOG",
    "DEPOT_HOST",
    "DEPOT_PORT",
    "DEPOT_DATABASE_URL",
    "DEPOT_MAX_CONNECTIONS",
    "DEPOT_STORE_TIMEOUT_SECS",
    "DEPOT_USE_X_FORWARDED_FOR",
    "DEPOT_SEED_OFFERS",
    "DEPOT_ADMIN_USERNAME",
    "DEPOT_ADMIN_EMAIL",
];

/// Settings that hold secrets. Only whether they are set is printed.
const SECRET_ENVS: [&str; 2] = ["DEPOT_JWT_SECRET", "DEPOT_ADMIN_PASSWORD"];

/// The server takes no arguments. Passing any prints the help text and the current configuration, and the caller
/// should exit instead of starting the server.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{}\n", include_str!("./cli-help.txt"));
    print_environment();
    true
}

fn print_environment() {
    println!("Current environment:");
    for name in PUBLIC_ENVS {
        let value = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {value}");
    }
    for name in SECRET_ENVS {
        let value = if env::var_os(name).is_some() { "Set (hidden)" } else { "Not set" };
        println!("  {name:<35} {value}");
    }
}
