mod common;

use common::{noise, run, stderr, Sandbox};
use std::fs;

#[test]
fn unknown_strategy_fails_and_leaves_the_file() {
    let sb = Sandbox::new();
    let contents = noise(300, 42);
    let src = sb.write("precious.dat", &contents);

    let out = run(sb.trash(Some("nonexistent_strategy")).args(["-v", "--", "precious.dat"]));

    assert!(!out.status.success());
    assert_eq!(fs::read(&src).unwrap(), contents);
    assert!(!sb.data_home.join("Trash").exists());
    let err = stderr(&out);
    assert!(err.contains("unknown trash strategy 'nonexistent_strategy'"), "{err}");
}

#[test]
fn strategy_names_are_case_sensitive() {
    let sb = Sandbox::new();
    let src = sb.write("f", b"f");
    let out = run(sb.trash(None).args(["--strategy", "FreeDesktop", "f"]));
    assert!(!out.status.success());
    assert!(src.exists());
}

#[test]
fn missing_adapter_program_fails_cleanly() {
    let sb = Sandbox::new();
    let src = sb.write("f", b"f");
    let out = run(sb
        .trash(Some("gio"))
        .env("PATH", sb.work.join("empty-bin"))
        .arg("f"));
    assert!(!out.status.success());
    assert!(src.exists());
    assert!(stderr(&out).contains("not installed"), "{}", stderr(&out));
}
