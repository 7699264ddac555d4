#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch HOME with its own XDG data dir and a working directory for sources.
pub struct Sandbox {
    _td: TempDir,
    pub home: PathBuf,
    pub data_home: PathBuf,
    pub work: PathBuf,
    pub config: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let td = tempfile::tempdir().unwrap();
        let base = fs::canonicalize(td.path()).unwrap();
        let home = base.join("home");
        let data_home = base.join("data");
        let work = base.join("work");
        for d in [&home, &data_home, &work] {
            fs::create_dir_all(d).unwrap();
        }
        Self {
            config: base.join("config.xml"),
            _td: td,
            home,
            data_home,
            work,
        }
    }

    pub fn files_dir(&self) -> PathBuf {
        self.data_home.join("Trash").join("files")
    }

    pub fn info_dir(&self) -> PathBuf {
        self.data_home.join("Trash").join("info")
    }

    /// The binary with HOME/XDG/config pointed into the sandbox and cwd = work.
    pub fn trash(&self, strategy: Option<&str>) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("trash"));
        cmd.current_dir(&self.work)
            .env("HOME", &self.home)
            .env("XDG_DATA_HOME", &self.data_home)
            .env("TRASH_CONFIG", &self.config)
            .env_remove("TRASH_STRATEGY");
        if let Some(s) = strategy {
            cmd.env("TRASH_STRATEGY", s);
        }
        cmd
    }

    pub fn write(&self, name: impl AsRef<Path>, bytes: &[u8]) -> PathBuf {
        let p = self.work.join(name);
        fs::write(&p, bytes).unwrap();
        p
    }
}

/// Deterministic pseudo-random bytes.
pub fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed.wrapping_mul(2_654_435_761).max(1);
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            (x & 0xff) as u8
        })
        .collect()
}

pub fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("spawn trash binary")
}

pub fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}
