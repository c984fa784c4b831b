use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let Some(cmd) = args.next() else {
        print_usage();
        return Err("missing command".to_string());
    };

    match cmd.as_str() {
        "precommit" => {
            let mut full = false;
            for arg in args {
                match arg.as_str() {
                    "--full" => full = true,
                    "--ci" => {}
                    _ => return Err(format!("unknown precommit flag: {arg}")),
                }
            }
            precommit(full)
        }
        "install-hooks" => install_hooks(),
        "inspect" => {
            let input = args
                .next()
                .ok_or_else(|| "inspect needs a hex-encoded buffer".to_string())?;
            inspect(&input)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            Err(format!("unknown command: {cmd}"))
        }
    }
}

fn print_usage() {
    eprintln!("xtask commands:");
    eprintln!("  precommit [--full] [--ci]");
    eprintln!("  install-hooks");
    eprintln!("  inspect <hex>");
}

fn repo_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap_or(manifest).to_path_buf()
}

fn precommit(full: bool) -> Result<(), String> {
    let root = repo_root();
    let mut steps: Vec<Vec<&str>> = vec![
        vec!["cargo", "fmt", "--all", "--", "--check"],
        vec![
            "cargo",
            "clippy",
            "-p",
            "geomserde-core",
            "-p",
            "geomserde-geo",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        vec!["cargo", "test", "--workspace"],
    ];

    if full {
        // property tests get more cases in release mode
        steps.extend([
            vec!["cargo", "doc", "--workspace", "--no-deps"],
            vec![
                "cargo",
                "test",
                "--release",
                "-p",
                "geomserde-core",
                "--test",
                "properties",
            ],
        ]);
    }

    for step in steps {
        let envs: &[(&str, &str)] = if step.contains(&"--release") {
            &[("PROPTEST_CASES", "4096")]
        } else {
            &[]
        };
        run_step(&root, &step, envs)?;
    }
    Ok(())
}

fn run_step(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<(), String> {
    let (bin, rest) = args
        .split_first()
        .ok_or_else(|| "empty command step".to_string())?;
    eprintln!("+ {}", args.join(" "));

    let status = Command::new(bin)
        .args(rest)
        .current_dir(cwd)
        .envs(envs.iter().copied())
        .status()
        .map_err(io_err)?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("command failed: {}", args.join(" ")))
    }
}

fn install_hooks() -> Result<(), String> {
    let root = repo_root();
    let hook_path = root.join(".git/hooks/pre-commit");
    let script = format!(
        "#!/usr/bin/env sh\nset -eu\ncd \"{}\"\ncargo run --quiet -p xtask -- precommit\n",
        root.display()
    );

    if let Some(parent) = hook_path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&hook_path, script).map_err(io_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path).map_err(io_err)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms).map_err(io_err)?;
    }

    println!("installed pre-commit hook at {}", hook_path.display());
    Ok(())
}

/// Print the node header and summary of a hex-encoded geomserde buffer.
fn inspect(input: &str) -> Result<(), String> {
    let buf = parse_hex(input)?;
    let header = geomserde_core::wire::parse_node_header(&buf).map_err(|e| e.to_string())?;
    println!(
        "header: {} {} empty={}",
        header.kind.name(),
        header.dimension(),
        header.is_empty
    );

    let (value, consumed) = geomserde_core::decode(&buf).map_err(|e| e.to_string())?;
    println!("coordinates: {}", value.num_coords());
    println!("consumed: {consumed} of {} bytes", buf.len());
    Ok(())
}

fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|e| format!("bad hex input: {e}"))
}

fn io_err(e: io::Error) -> String {
    e.to_string()
}
