use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use zeroize::Zeroizing;
use akrotopi_backend::auth::password::hash_password;

/// Reads the admin password from stdin and prints the argon2id hash to put
/// in `APP_ADMIN_PASSWORD_HASH`.
fn main() -> anyhow::Result<()> {
    eprint!("Admin password: ");
    io::stderr().flush().ok();

    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    println!("{}", hash);
    Ok(())
}
