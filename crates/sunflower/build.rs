use std::fs;
use std::path::{Path, PathBuf};

const SCRIPT: &str = "Lua/Application.lua";

/// Places the default script at `<target>/<profile>/Lua/Application.lua`, next
/// to the built executable, so `cargo run` finds it without an argument.
fn main() {
    println!("cargo:rerun-if-changed={SCRIPT}");

    // OUT_DIR is target/<profile>/build/<package>-<hash>/out.
    let Some(profile_dir) = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .and_then(|out| out.ancestors().nth(3).map(Path::to_path_buf))
    else {
        println!("cargo:warning=could not locate the target directory; {SCRIPT} not copied");
        return;
    };

    let dest = profile_dir.join(SCRIPT);
    let copied = dest
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::copy(SCRIPT, &dest));

    if let Err(err) = copied {
        println!("cargo:warning=failed to copy {SCRIPT} to {}: {err}", dest.display());
    }
}
