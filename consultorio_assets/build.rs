use std::{
    fs::{DirEntry, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=assets");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    let out_path = out_dir.join("assets.rs");

    let mut out = File::create(&out_path)?;
    emit_dir(&mut out, &assets)?;

    println!("cargo::rustc-env=ASSETS={}", out_path.display());
    Ok(())
}

fn emit_dir(out: &mut File, dir: &Path) -> io::Result<()> {
    let mut entries = dir.read_dir()?.collect::<io::Result<Vec<DirEntry>>>()?;
    entries.sort_by_key(DirEntry::file_name);

    for entry in entries {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if entry.file_type()?.is_dir() {
            writeln!(out, "pub mod {} {{", to_snake_case(&name))?;
            emit_dir(out, &path)?;
            writeln!(out, "}}")?;
        } else if std::fs::read_to_string(&path).is_ok() {
            writeln!(
                out,
                "pub const {}: &str = ::core::include_str!({path:?});",
                to_snake_case(&name).to_uppercase(),
            )?;
        } else {
            writeln!(
                out,
                "pub const {}: &[u8] = ::core::include_bytes!({path:?});",
                to_snake_case(&name).to_uppercase(),
            )?;
        }
    }

    Ok(())
}

fn to_snake_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
