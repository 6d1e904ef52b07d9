//! Host platform detection in Go's naming scheme.
//!
//! The catalog labels artifacts with `GOOS`/`GOARCH` values, which differ
//! from Rust's `std::env::consts` names for several targets.

use std::env::consts::{ARCH, OS};

/// Translate a Rust operating system name into Go's `GOOS` name.
///
/// Names without a known translation are returned unchanged.
///
/// # Examples
///
/// ```
/// use goinstall::platform::go_os;
///
/// assert_eq!(go_os("macos"), "darwin");
/// assert_eq!(go_os("linux"), "linux");
/// ```
#[must_use]
pub fn go_os(rust_os: &str) -> &str {
    match rust_os {
        "macos" => "darwin",
        other => other,
    }
}

/// Translate a Rust architecture name into Go's `GOARCH` name.
///
/// Names without a known translation are returned unchanged.
#[must_use]
pub fn go_arch(rust_arch: &str) -> &str {
    match rust_arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "arm" => "armv6l",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

/// Return the host operating system in Go naming.
#[must_use]
pub fn host_os() -> String {
    go_os(OS).to_owned()
}

/// Return the host architecture in Go naming.
#[must_use]
pub fn host_arch() -> String {
    if ARCH == "powerpc64" && cfg!(target_endian = "little") {
        return "ppc64le".to_owned();
    }
    go_arch(ARCH).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::darwin("macos", "darwin")]
    #[case::linux("linux", "linux")]
    #[case::windows("windows", "windows")]
    #[case::freebsd("freebsd", "freebsd")]
    fn maps_operating_systems(#[case] rust_os: &str, #[case] expected: &str) {
        assert_eq!(go_os(rust_os), expected);
    }

    #[rstest]
    #[case::amd64("x86_64", "amd64")]
    #[case::arm64("aarch64", "arm64")]
    #[case::i386("x86", "386")]
    #[case::armv6l("arm", "armv6l")]
    #[case::ppc64("powerpc64", "ppc64")]
    #[case::s390x("s390x", "s390x")]
    #[case::riscv64("riscv64", "riscv64")]
    #[case::loong64("loongarch64", "loong64")]
    fn maps_architectures(#[case] rust_arch: &str, #[case] expected: &str) {
        assert_eq!(go_arch(rust_arch), expected);
    }

    #[test]
    fn host_values_use_go_names() {
        assert_ne!(host_os(), "macos");
        assert_ne!(host_arch(), "x86_64");
        assert_ne!(host_arch(), "aarch64");
    }
}
