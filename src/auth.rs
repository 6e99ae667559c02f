use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "ARGONIZE_PASSWORD";

/// Reads the password to hash or verify.
///
/// Sources, in order: the `ARGONIZE_PASSWORD` environment variable, one line
/// of piped stdin, then an interactive prompt.
pub fn read_password(prompt: &str) -> Result<Zeroizing<String>> {
    //  ARGONIZE_PASSWORD="supersecret" argonize hash
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        let pw = Zeroizing::new(pw);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    //  printf "%s" "$SECRET" | argonize verify '$argon2id$...'
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password(prompt)?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No password provided")
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
