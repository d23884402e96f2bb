//! Build automation tasks for Dot Connect 3D
//!
//! Usage:
//!   cargo xtask build-web         # Build WASM for web deployment
//!   cargo xtask package-itch      # Create zip for itch.io upload
//!   cargo xtask package-native    # Native release binary plus assets

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

const BINARY: &str = "dot-connect-3d";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Dot Connect 3D")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM for web deployment
    BuildWeb {
        /// Mark as dev build (adds DEV to the page title)
        #[arg(long)]
        dev: bool,
    },
    /// Create zip file ready for itch.io upload
    PackageItch,
    /// Build a native release with its assets
    PackageNative {
        /// Target platform: windows, macos, linux
        #[arg(long)]
        platform: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb { dev } => build_web(dev),
        Commands::PackageItch => package_itch(),
        Commands::PackageNative { platform } => package_native(platform),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live inside the workspace")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {}...", url);
    run_cmd(
        Command::new("curl")
            .args(["-L", "-o"])
            .arg(dest)
            .arg(url),
    )
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Start from an empty directory
fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Build WASM for web deployment
fn build_web(dev: bool) -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist/web");

    println!("Building WASM...");
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown"]),
    )?;

    recreate_dir(&dist)?;

    println!("Copying files to dist/web...");
    let wasm = format!("{}.wasm", BINARY);
    std::fs::copy(
        root.join("target/wasm32-unknown-unknown/release").join(&wasm),
        dist.join(&wasm),
    )
    .with_context(|| format!("Missing {}", wasm))?;
    std::fs::copy(root.join("web/index.html"), dist.join("index.html"))?;

    // Download macroquad JS bundle
    let mq_js = dist.join("mq_js_bundle.js");
    if !mq_js.exists() {
        download_file(
            "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js",
            &mq_js,
        )?;
    }

    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))?;

    if dev {
        println!("Applying DEV build modifications...");
        let index_path = dist.join("index.html");
        let index = std::fs::read_to_string(&index_path)?;
        let index = index.replace("<title>Dot Connect 3D", "<title>[DEV] Dot Connect 3D");
        std::fs::write(&index_path, index)?;
    }

    println!("Web build complete: dist/web/");
    Ok(())
}

/// Create zip for itch.io
fn package_itch() -> Result<()> {
    build_web(false)?;

    let dist = project_root()?.join("dist");
    let zip_name = format!("{}-itch.zip", BINARY);
    let zip_path = dist.join(&zip_name);

    if zip_path.exists() {
        std::fs::remove_file(&zip_path)?;
    }

    println!("Creating itch.io zip...");
    run_cmd(
        Command::new("zip")
            .current_dir(dist.join("web"))
            .arg("-r")
            .arg(format!("../{}", zip_name))
            .arg("."),
    )?;

    println!("itch.io package ready: dist/{}", zip_name);
    Ok(())
}

/// Native release build
fn package_native(platform: Option<String>) -> Result<()> {
    let root = project_root()?;
    let platform = platform.unwrap_or_else(|| {
        if cfg!(target_os = "windows") {
            "windows".to_string()
        } else if cfg!(target_os = "macos") {
            "macos".to_string()
        } else {
            "linux".to_string()
        }
    });

    let dist = root.join(format!("dist/native/{}", platform));

    println!("Building native release for {}...", platform);
    recreate_dir(&dist)?;

    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release"]),
    )?;

    let binary_name = if platform == "windows" {
        format!("{}.exe", BINARY)
    } else {
        BINARY.to_string()
    };

    std::fs::copy(
        root.join("target/release").join(&binary_name),
        dist.join(&binary_name),
    )?;

    copy_dir_recursive(&root.join("assets"), &dist.join("assets"))?;

    println!("Native build complete: dist/native/{}/", platform);
    Ok(())
}
