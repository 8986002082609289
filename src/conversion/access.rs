//! Directory access gating.
//!
//! Every scan asks for read access and every batch asks for read-write
//! access before touching the directory. Two strategies exist; one is picked
//! at startup by [`probe_gate`] and used for the rest of the session.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use console::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

impl AccessMode {
    fn describe(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::ReadWrite => "read and write",
        }
    }
}

/// Gate consulted before any scan or write touches the directory.
///
/// Returns only a boolean; the caller owns user-visible messaging when
/// access is refused.
pub trait AccessGate {
    fn ensure(&mut self, dir: &Path, mode: AccessMode) -> bool;
}

/// Compat fallback for sessions without an interactive capability:
/// access is treated as implicitly granted.
pub struct ImplicitGate;

impl AccessGate for ImplicitGate {
    fn ensure(&mut self, _dir: &Path, _mode: AccessMode) -> bool {
        true
    }
}

/// Terminal-backed gate.
///
/// Session decisions are remembered: a grant short-circuits later checks and
/// a denial is sticky, never re-prompted. OS-level state is consulted fresh
/// on the first check per (directory, mode) since it can change outside the
/// program's control.
pub struct InteractiveGate {
    term: Term,
    decisions: HashMap<(PathBuf, AccessMode), bool>,
}

impl InteractiveGate {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            decisions: HashMap::new(),
        }
    }

    /// Hard OS-level answer for `mode`, or `None` when the user must decide.
    fn os_state(dir: &Path, mode: AccessMode) -> Option<bool> {
        match mode {
            AccessMode::Read => fs::read_dir(dir).is_err().then_some(false),
            AccessMode::ReadWrite => match fs::metadata(dir) {
                Ok(meta) if meta.permissions().readonly() => Some(false),
                Ok(_) => None,
                Err(_) => Some(false),
            },
        }
    }

    fn prompt(&self, dir: &Path, mode: AccessMode) -> bool {
        let question = format!(
            "Allow {} access to {}? [y/N] ",
            mode.describe(),
            dir.display()
        );
        if self.term.write_str(&question).is_err() {
            return false;
        }
        match self.term.read_line() {
            Ok(answer) => matches!(answer.trim(), "y" | "Y" | "yes" | "YES"),
            Err(_) => false,
        }
    }
}

impl Default for InteractiveGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessGate for InteractiveGate {
    fn ensure(&mut self, dir: &Path, mode: AccessMode) -> bool {
        let key = (dir.to_path_buf(), mode);
        if let Some(&granted) = self.decisions.get(&key) {
            return granted;
        }
        let granted = match Self::os_state(dir, mode) {
            Some(state) => state,
            None => self.prompt(dir, mode),
        };
        self.decisions.insert(key, granted);
        granted
    }
}

/// Select the gate strategy once at startup.
///
/// Unattended sessions (piped stdin/stdout) and explicit `--yes` runs get
/// the implicit grant; an attended terminal gets the interactive gate.
pub fn probe_gate(assume_granted: bool) -> Box<dyn AccessGate> {
    if assume_granted || !console::user_attended() {
        Box::new(ImplicitGate)
    } else {
        Box::new(InteractiveGate::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_implicit_gate_grants_everything() {
        let dir = tempdir().unwrap();
        let mut gate = ImplicitGate;
        assert!(gate.ensure(dir.path(), AccessMode::Read));
        assert!(gate.ensure(dir.path(), AccessMode::ReadWrite));
    }

    #[test]
    fn test_probe_gate_assume_granted() {
        let dir = tempdir().unwrap();
        let mut gate = probe_gate(true);
        assert!(gate.ensure(dir.path(), AccessMode::ReadWrite));
    }

    #[test]
    fn test_missing_directory_is_denied() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone");
        let mut gate = InteractiveGate::new();
        assert!(!gate.ensure(&gone, AccessMode::Read));
        assert!(!gate.ensure(&gone, AccessMode::ReadWrite));
    }

    #[cfg(unix)]
    #[test]
    fn test_denial_is_sticky_for_the_session() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let mut perms = fs::metadata(dir.path()).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(dir.path(), perms).unwrap();

        let mut gate = InteractiveGate::new();
        assert!(!gate.ensure(dir.path(), AccessMode::ReadWrite));

        // Restore write permission; the session decision must not change.
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
        assert!(!gate.ensure(dir.path(), AccessMode::ReadWrite));
    }
}
