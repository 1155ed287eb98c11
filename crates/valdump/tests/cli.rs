//! Runs the `valdump` binary.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::process::Command;

use pretty_assertions::assert_eq;

fn valdump(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_valdump"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run valdump")
}

#[test]
fn list_prints_every_demo() {
    let output = valdump(&["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in ["people", "shared-points", "recursive-slice", "zero-sized"] {
        assert!(stdout.contains(name), "{stdout}");
    }
}

#[test]
fn people_demo() {
    let output = valdump(&["people", "--no-meta"]);
    assert!(output.status.success());
    let expected = "[]*main.Person => [
   0 => &1 {
      ⯀ Name   string       => \"Alice\"
      ⯀ Age    int          => 44
      ⯀ Loves  *main.Person => ↩︎ &2
   }
   1 => &2 {
      ⯀ Name   string       => \"Bob\"
      ⯀ Age    int          => 23
      ⯀ Loves  *main.Person => ↩︎ &3
   }
   2 => {
      ⯀ Name   string       => \"Joe\"
      ⯀ Age    int          => 54
      ⯀ Loves  *main.Person => ↩︎ &3
   }
   3 => &3 {
      ⯀ Name   string       => \"Penny\"
      ⯀ Age    int          => 21
      ⯀ Loves  *main.Person => ↩︎ &1
   }
]
";
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn unknown_demo_fails_with_usage() {
    let output = valdump(&["nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("error: unknown demo `nope`"), "{stderr}");
    assert!(stderr.contains("Usage: valdump"), "{stderr}");
}
