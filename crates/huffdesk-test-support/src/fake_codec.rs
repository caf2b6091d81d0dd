//! Shell scripts that honour the codec's command line.
//!
//! Every script records its argv, one argument per line, next to itself with an `.args`
//! suffix so tests can assert on exact argument vectors.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::output::{DECODE_REPORT, ENCODE_REPORT};

/// Behaviour of a fake codec executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCodec {
    /// Write the expected output and print the canned report for the mode.
    Succeed,
    /// Print the canned report and exit 0 without writing any output.
    SucceedWithoutOutput,
    /// Print `stdout`/`stderr` and exit with `code`.
    Fail {
        /// Exit code.
        code: i32,
        /// Text printed to stdout.
        stdout: String,
        /// Text printed to stderr.
        stderr: String,
    },
    /// Print `stdout`, then block far longer than any test timeout.
    Hang {
        /// Text printed before blocking.
        stdout: String,
    },
    /// Print `stdout` and exit 0 while a background `sleep` keeps both pipes open.
    Linger {
        /// Text printed before exiting.
        stdout: String,
    },
}

impl FakeCodec {
    /// Write this behaviour as an executable script named `name` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be written or made executable.
    pub fn install(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, self.script())
            .with_context(|| format!("failed to write fake codec {}", path.display()))?;
        make_executable(&path)?;
        Ok(path)
    }

    fn script(&self) -> String {
        let prelude = "#!/bin/sh\nprintf '%s\\n' \"$@\" > \"$0.args\"\n";
        let body = match self {
            Self::Succeed => format!(
                "case \"$1\" in\n\
                 -e)\n  printf 'HUFF' > \"$5\" || exit 3\n  cat <<'REPORT'\n{ENCODE_REPORT}REPORT\n  ;;\n\
                 -d)\n  mkdir -p \"$5\" || exit 3\n  printf 'alpha' > \"$5/a.txt\"\n  printf 'beta!' > \"$5/b.txt\"\n  cat <<'REPORT'\n{DECODE_REPORT}REPORT\n  ;;\n\
                 *)\n  echo \"unknown mode $1\" >&2\n  exit 2\n  ;;\n\
                 esac\n"
            ),
            Self::SucceedWithoutOutput => format!(
                "if [ \"$1\" = -e ]; then\ncat <<'REPORT'\n{ENCODE_REPORT}REPORT\nelse\ncat <<'REPORT'\n{DECODE_REPORT}REPORT\nfi\n"
            ),
            Self::Fail {
                code,
                stdout,
                stderr,
            } => format!(
                "cat <<'STDOUT'\n{stdout}\nSTDOUT\ncat >&2 <<'STDERR'\n{stderr}\nSTDERR\nexit {code}\n"
            ),
            Self::Hang { stdout } => {
                format!("cat <<'STDOUT'\n{stdout}\nSTDOUT\nexec sleep 30\n")
            }
            Self::Linger { stdout } => {
                format!("cat <<'STDOUT'\n{stdout}\nSTDOUT\nsleep 20 &\nexit 0\n")
            }
        };
        format!("{prelude}{body}")
    }
}

/// Arguments recorded by the last run of the fake codec at `script`.
///
/// # Errors
///
/// Returns an error if the script has not run yet.
pub fn recorded_args(script: &Path) -> Result<Vec<String>> {
    let mut record = script.as_os_str().to_owned();
    record.push(".args");
    let text = fs::read_to_string(&record)
        .with_context(|| format!("no argument record next to {}", script.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
        .with_context(|| format!("failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
