// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Interactive upload of assembled artifacts to an attached device.
//!
//! Boundary glue around an external programming tool; skipped entirely when
//! the tool is absent. Upload failure never changes the exit status of a
//! successful assembly.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::Command;

use super::output::OutputPaths;

pub(super) const API_KEY_ENV: &str = "SF_API_KEY";

pub(super) fn offer_upload(tool: &Path, outputs: &OutputPaths) {
    if !tool.is_file() {
        return;
    }

    print!("Upload to device? ");
    let _ = io::stdout().flush();
    let Some(reply) = read_prompt_line() else {
        return;
    };
    let reply = reply.to_ascii_lowercase();
    if reply != "y" && reply != "yes" {
        return;
    }

    let api_key = match env::var(API_KEY_ENV) {
        Ok(key) => key,
        Err(_) => {
            print!("Enter your API key: ");
            let _ = io::stdout().flush();
            let Some(key) = read_prompt_line() else {
                return;
            };
            key
        }
    };

    print!("Uploading...");
    let _ = io::stdout().flush();
    let result = Command::new(tool)
        .arg("write")
        .arg(&outputs.json)
        .arg(&outputs.bss)
        .arg(&outputs.data)
        .env(API_KEY_ENV, api_key)
        .output();
    match result {
        Ok(output) if output.status.success() => println!("Done!"),
        Ok(output) => println!("Fail: {}", String::from_utf8_lossy(&output.stderr)),
        Err(err) => println!("Fail: {err}"),
    }
}

fn read_prompt_line() -> Option<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    Some(line.trim().to_string())
}
