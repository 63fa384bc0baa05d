/// System package managers the installer script knows how to drive.
///
/// Variants are listed in probe order: the script picks the first one whose
/// probe command is on `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Apk,
    Brew,
}

impl PackageManager {
    pub const ALL: [PackageManager; 6] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Yum,
        PackageManager::Pacman,
        PackageManager::Apk,
        PackageManager::Brew,
    ];

    /// Value assigned to `$PM` in the script.
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Apk => "apk",
            PackageManager::Brew => "brew",
        }
    }

    /// Executable looked up with `command -v`.
    pub fn probe(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            other => other.name(),
        }
    }

    /// Lines run to install compilers, git, pkg-config, OpenSSL headers and cmake.
    /// A line ending in `\` continues on the next one.
    pub fn install_commands(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Apt => &[
                "sudo apt-get update -y",
                "sudo apt-get install -y --no-install-recommends \\",
                "  build-essential curl ca-certificates git pkg-config libssl-dev cmake",
            ],
            PackageManager::Dnf => {
                &["sudo dnf install -y @development-tools curl git pkgconfig openssl-devel cmake"]
            }
            PackageManager::Yum => &[
                "sudo yum groupinstall -y \"Development Tools\"",
                "sudo yum install -y curl git pkgconfig openssl-devel cmake",
            ],
            PackageManager::Pacman => {
                &["sudo pacman -Sy --noconfirm base-devel curl git pkgconf openssl cmake"]
            }
            PackageManager::Apk => {
                &["sudo apk add --no-cache build-base curl git pkgconf openssl-dev cmake"]
            }
            PackageManager::Brew => &[
                "brew update",
                "brew install curl git pkg-config openssl@3 cmake",
            ],
        }
    }

    /// `if`/`elif` branch that selects this package manager.
    fn detection_branch(&self, first: bool) -> String {
        format!(
            "{} command -v {} >/dev/null 2>&1; then\n  PM=\"{}\"",
            if first { "if" } else { "elif" },
            self.probe(),
            self.name()
        )
    }

    /// `case` arm for `install_pkgs`.
    fn case_arm(&self) -> String {
        let mut arm = format!("    {})\n", self.name());
        for line in self.install_commands() {
            arm.push_str("      ");
            arm.push_str(line);
            arm.push('\n');
        }
        arm.push_str("      ;;");
        arm
    }
}

/// The probe chain, without the trailing `else`/`fi`.
pub fn render_detection() -> String {
    PackageManager::ALL
        .iter()
        .enumerate()
        .map(|(i, pm)| pm.detection_branch(i == 0))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `case` arm per package manager, without the fallback arm.
pub fn render_install_arms() -> String {
    PackageManager::ALL
        .iter()
        .map(PackageManager::case_arm)
        .collect::<Vec<_>>()
        .join("\n")
}
