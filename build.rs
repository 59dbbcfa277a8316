//! Build script for the MP3 sync CLI.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory during the build, so a ready-to-edit example sits where
//! the application looks for its `.env` file.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let source = manifest_dir.join(".env.example");
    if !source.exists() {
        println!("cargo:warning=.env.example not found, skipping template copy");
        return;
    }

    let Some(mut target) = dirs::data_local_dir() else {
        return;
    };
    target.push("mp3ify");
    if fs::create_dir_all(&target).is_err() {
        return;
    }
    target.push(".env.example");

    if let Err(e) = fs::copy(&source, &target) {
        println!("cargo:warning=could not copy .env.example: {e}");
    }
}
