//! End-to-end tests of the `jpms` binary against project descriptions on
//! disk.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn span(line: u32, column: u32, length: u32) -> Value {
    json!({ "line": line, "column": column, "length": length })
}

fn java_base() -> Value {
    json!({
        "origin": "module-path",
        "declaration": { "name": "java.base", "exports": [{ "package": "java.lang" }] },
        "units": [{
            "path": "java.base/java/lang/Object.java",
            "package": "java.lang",
            "types": [{ "name": "Object" }]
        }]
    })
}

fn library(name: &str) -> Value {
    json!({
        "declaration": {
            "name": name,
            "exports": [{ "package": "p", "span": span(2, 5, 9) }]
        },
        "units": [{
            "path": format!("{name}/p/X.java"),
            "package": "p",
            "types": [{ "name": "X" }]
        }]
    })
}

fn client(requires: &[&str]) -> Value {
    let requires: Vec<Value> = requires
        .iter()
        .enumerate()
        .map(|(i, m)| json!({ "module": m, "span": span(i as u32 + 2, 5, 9 + m.len() as u32) }))
        .collect();
    json!({
        "declaration": { "name": "mod.a", "requires": requires },
        "units": [{
            "path": "mod.a/a/A.java",
            "package": "a",
            "types": [{ "name": "A" }],
            "references": [{ "type": "p.X", "span": span(2, 8, 3) }],
            "source": "package a;\nimport p.X;\npublic class A {}\n"
        }]
    })
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn new(modules: Vec<Value>) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let project = json!({ "modules": modules });
        fs::write(
            dir.path().join("project.json"),
            serde_json::to_string_pretty(&project).expect("serializes"),
        )
        .expect("write project");
        Self { dir }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn jpms(&self) -> Command {
        let mut cmd = Command::cargo_bin("jpms").expect("binary builds");
        cmd.current_dir(self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--no-color");
        cmd
    }
}

#[test]
fn split_package_is_reported_in_batch_format() {
    let project = Project::new(vec![
        java_base(),
        library("mod.one"),
        library("mod.two"),
        client(&["mod.one", "mod.two"]),
    ]);

    project
        .jpms()
        .args(["check", "project.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "----------\n1. ERROR in mod.a/module-info.java (at line 2)\n\
             The package p is accessible from more than one module: mod.one, mod.two\n",
        ))
        .stdout(predicate::str::contains(
            "3. ERROR in mod.a/a/A.java (at line 2)\n\timport p.X;\n\t       ^^^\n",
        ))
        .stdout(predicate::str::ends_with("----------\n3 problems (3 errors)\n"));
}

#[test]
fn clean_project_succeeds() {
    let project = Project::new(vec![java_base(), library("mod.one"), client(&["mod.one"])]);

    project
        .jpms()
        .args(["check", "project.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no problems"));
}

#[test]
fn json_report() {
    let project = Project::new(vec![
        java_base(),
        library("mod.one"),
        library("mod.two"),
        client(&["mod.one", "mod.two"]),
    ]);

    let output = project
        .jpms()
        .args(["check", "project.json", "--format", "json"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["errors"], 3);
    assert_eq!(report["diagnostics"][2]["code"], "package-conflict");
    assert_eq!(report["diagnostics"][2]["path"], "mod.a/a/A.java");
}

#[test]
fn add_reads_from_config_file() {
    // mod.a reads mod.one only through the configured --add-reads.
    let project = Project::new(vec![java_base(), library("mod.one"), client(&[])]);
    fs::write(project.file("jpms.toml"), "add-reads = [\"mod.a=mod.one\"]\n")
        .expect("write config");

    project
        .jpms()
        .args(["check", "project.json"])
        .assert()
        .success();

    project
        .jpms()
        .args(["check", "project.json", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn unreadable_type_without_add_reads() {
    let project = Project::new(vec![java_base(), library("mod.one"), client(&[])]);

    project
        .jpms()
        .args(["check", "project.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "The type p.X cannot be resolved: package p is declared in module mod.one, \
             but module mod.a does not read it",
        ));
}

#[test]
fn fatal_configuration_errors() {
    let project = Project::new(vec![java_base(), client(&["mod.missing"])]);

    project
        .jpms()
        .args(["check", "project.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "mod.missing cannot be resolved to a module",
        ));

    project
        .jpms()
        .args(["check", "project.json", "--source", "11", "--release", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("option -source is not supported"));

    project
        .jpms()
        .args(["check", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn graph_as_dot() {
    let project = Project::new(vec![java_base(), library("mod.one"), client(&["mod.one"])]);

    project
        .jpms()
        .args(["graph", "project.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph ModuleGraph {"))
        .stdout(predicate::str::contains("\"mod.a\" -> \"mod.one\";"));
}

#[test]
fn attribute_round_trip() {
    let project = Project::new(vec![java_base(), library("mod.one"), client(&["mod.one"])]);

    project
        .jpms()
        .args([
            "attribute",
            "encode",
            "project.json",
            "mod.a",
            "-o",
            "mod.a.bin",
            "--module-version",
            "2.1",
        ])
        .assert()
        .success();
    assert!(project.file("mod.a.bin").exists());

    let output = project
        .jpms()
        .args(["attribute", "decode", "mod.a.bin"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    let decl: Value = serde_json::from_slice(&output.stdout).expect("declaration json");
    assert_eq!(decl["name"], "mod.a");
    assert_eq!(decl["version"], "2.1");
    assert_eq!(decl["requires"][0]["module"], "mod.one");

    project
        .jpms()
        .args(["attribute", "encode", "project.json", "mod.zz", "-o", "x.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module mod.zz is not in the module graph"));
}
