use colored::*;

use crate::terminal::print::{self, GLOBAL_KEY_WIDTH};
use probr_common::config::Config;
use probr_common::probe::ENDPOINT_PLACEHOLDER;

const KEYS: &[&str] = &["Probe", "Resolved", "Arguments", "Port", "Environment"];

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    let width: usize = KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
    GLOBAL_KEY_WIDTH.set(width);

    let spec = &cfg.probe;
    print::aligned_line("Probe", spec.program.display().to_string());

    match spec.resolve() {
        Ok(path) => print::aligned_line("Resolved", path.display().to_string().green()),
        Err(e) => print::aligned_line("Resolved", e.to_string().red()),
    }

    let example: String = format!("<host>:{}", cfg.port);
    let args: String = spec
        .args
        .iter()
        .map(|arg| arg.replace(ENDPOINT_PLACEHOLDER, &example))
        .collect::<Vec<String>>()
        .join(" ");
    print::aligned_line("Arguments", args);
    print::aligned_line("Port", cfg.port.to_string());

    let env: String = if spec.env.is_empty() {
        "inherited".to_string()
    } else {
        spec.env
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<String>>()
            .join(", ")
    };
    print::aligned_line("Environment", env);

    print::end_of_program();
    Ok(())
}
