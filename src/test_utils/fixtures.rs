use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Isolated directory to publish from.
pub struct WorkDirFixture {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl Default for WorkDirFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkDirFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().to_path_buf();
        println!("[FIXTURE] Created work dir: {path:?}");
        Self { temp_dir, path }
    }

    /// Create a file with content, relative to the work dir.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Pretend the directory is already a git working copy.
    pub fn mark_as_repo(&self) {
        std::fs::create_dir_all(self.path.join(".git")).expect("Failed to create .git");
    }
}

/// A stand-in `git` executable that records each invocation.
///
/// Every call appends its arguments to `calls.log`. Pushes also record the
/// credential-related environment to `push-env.log`. `status` prints the
/// configured porcelain text, and any invocation whose arguments start with
/// the configured prefix exits 1 with a message on stderr.
#[cfg(unix)]
pub struct FakeGit {
    pub temp_dir: TempDir,
    pub script: PathBuf,
    log: PathBuf,
    env_log: PathBuf,
    status_output: String,
    fail_prefix: Option<String>,
}

#[cfg(unix)]
impl Default for FakeGit {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl FakeGit {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let fake = Self {
            script: root.join("git"),
            log: root.join("calls.log"),
            env_log: root.join("push-env.log"),
            temp_dir,
            status_output: "A  README.md\n".to_string(),
            fail_prefix: None,
        };
        fake.install();
        fake
    }

    /// Porcelain text printed by `status`.
    #[must_use]
    pub fn with_status(mut self, output: &str) -> Self {
        self.status_output = output.to_string();
        self.install();
        self
    }

    /// Fail every invocation whose arguments start with `prefix`.
    #[must_use]
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.fail_prefix = Some(prefix.to_string());
        self.install();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.script
    }

    /// Argument lines of every invocation so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.log)
    }

    /// Environment captured by each push.
    #[must_use]
    pub fn push_env(&self) -> Vec<String> {
        read_lines(&self.env_log)
    }

    fn install(&self) {
        use std::os::unix::fs::PermissionsExt;

        let fail_block = self.fail_prefix.as_ref().map_or_else(String::new, |prefix| {
            format!(
                "case \"$*\" in\n  '{prefix}'*) echo \"fatal: simulated failure of $*\" >&2; exit 1 ;;\nesac\n"
            )
        });
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$*\" >> '{log}'\n\
             if [ \"$1\" = \"push\" ]; then\n\
             \x20 printf 'GIT_CONFIG_KEY_0=%s GIT_CONFIG_VALUE_0=%s GIT_TERMINAL_PROMPT=%s\\n' \
             \"${{GIT_CONFIG_KEY_0:-}}\" \"${{GIT_CONFIG_VALUE_0:-}}\" \"${{GIT_TERMINAL_PROMPT:-}}\" >> '{env_log}'\n\
             fi\n\
             {fail_block}\
             if [ \"$1\" = \"status\" ]; then\n\
             \x20 printf '%s' '{status}'\n\
             fi\n\
             exit 0\n",
            log = self.log.display(),
            env_log = self.env_log.display(),
            status = self.status_output,
        );
        std::fs::write(&self.script, script).expect("Failed to write fake git");
        let mut perms = std::fs::metadata(&self.script)
            .expect("Failed to stat fake git")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&self.script, perms).expect("Failed to chmod fake git");
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
