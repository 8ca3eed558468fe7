fn main() {
    let git_output = std::process::Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .ok();
    let git_dir = git_output.as_ref().and_then(|output| {
        std::str::from_utf8(&output.stdout)
            .ok()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    });

    // Rebuild when HEAD moves so the embedded version stays current.
    if let Some(git_dir) = git_dir {
        let head = std::path::Path::new(git_dir).join("HEAD");
        if head.exists() {
            println!("cargo:rerun-if-changed={}", head.display());
        }
    }

    let describe = std::process::Command::new("git")
        .args(["describe", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success());
    let git_info = describe
        .as_ref()
        .and_then(|output| std::str::from_utf8(&output.stdout).ok().map(str::trim))
        .filter(|s| !s.is_empty());

    if let Some(git_info) = git_info {
        println!("cargo:rustc-env=_GIT_INFO={git_info}");
    }
}
