use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn tmp_dir(name: &str) -> PathBuf {
    let mut base = std::env::temp_dir();
    base.push(format!("ontosheet-cli-{}-{}", name, std::process::id()));
    if base.exists() {
        let _ = fs::remove_dir_all(&base);
    }
    fs::create_dir_all(&base).unwrap();
    base
}

fn ontosheet(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ontosheet"))
        .current_dir(root)
        .env("ONTOSHEET_DIR", root)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run ontosheet")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn init(name: &str, extra: &[&str]) -> PathBuf {
    let root = tmp_dir(name);
    let mut args = vec!["init", "--label", "Pet Ontology"];
    args.extend_from_slice(extra);
    let out = ontosheet(&root, &args);
    assert!(
        out.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    root
}

#[test]
fn commands_fail_outside_workspace() {
    let root = tmp_dir("noworkspace");
    let out = Command::new(env!("CARGO_BIN_EXE_ontosheet"))
        .current_dir(&root)
        .env_remove("ONTOSHEET_DIR")
        .args(["rows", "list"])
        .output()
        .expect("run rows list");
    assert!(!out.status.success(), "expected failure outside workspace");
}

#[test]
fn init_creates_workspace_files() {
    let root = init("init", &["--example"]);
    let dir = root.join(".ontosheet");
    assert!(dir.join("config.json").exists());
    assert!(dir.join("settings.json").exists());
    assert!(dir.join("session.json").exists());

    let out = ontosheet(&root, &["status"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Rows: 5 (4 non-empty)"), "{}", text);
    assert!(text.contains("Ontology: http://example.org/PetOntology"), "{}", text);
}

#[test]
fn discovery_from_subdirectory() {
    let root = init("discover", &[]);
    let nested = root.join("sub").join("dir");
    fs::create_dir_all(&nested).unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_ontosheet"))
        .current_dir(&nested)
        .env_remove("ONTOSHEET_DIR")
        .arg("status")
        .output()
        .expect("run status");
    assert!(
        out.status.success(),
        "status failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn import_then_export_ntriples() {
    let root = init("import", &[]);
    let csv = root.join("terms.csv");
    fs::write(
        &csv,
        "iri,label,type,definition,subclass of,is defined by\n\
         ex:Dog,Dog,Class,A canine.,ex:Animal,ex:PetOntology\n",
    )
    .unwrap();

    let out = ontosheet(&root, &["import", "terms.csv", "--mode", "append"]);
    assert!(
        out.status.success(),
        "import failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(stdout(&out).contains("1 rows added (1 total"));

    let out = ontosheet(&root, &["export", "--format", "nt", "--output", "out.nt"]);
    assert!(out.status.success());
    let nt = fs::read_to_string(root.join("out.nt")).unwrap();
    assert!(nt.contains(
        "<http://example.org/Dog> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://example.org/Animal> ."
    ));
    assert!(nt.contains(
        "<http://example.org/PetOntology> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Ontology> ."
    ));
}

#[test]
fn invalid_rows_block_import() {
    let root = init("invalid", &["--example"]);
    let csv = root.join("bad.csv");
    fs::write(&csv, "ex:Gadget,Gadget,Widget\n").unwrap();
    let out = ontosheet(&root, &["import", "bad.csv", "--no-header", "--mode", "replace"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid Element Type"));

    let out = ontosheet(&root, &["status"]);
    assert!(stdout(&out).contains("Rows: 5"));
}

#[test]
fn invalid_insert_mode_is_rejected() {
    let root = init("mode", &[]);
    fs::write(root.join("t.csv"), "ex:A,A,Class\n").unwrap();
    let out = ontosheet(&root, &["import", "t.csv", "--mode", "overwrite"]);
    assert!(!out.status.success());
}

#[test]
fn unsupported_import_extension() {
    let root = init("ext", &[]);
    fs::write(root.join("onto.ttl"), "@prefix ex: <http://example.org/> .\n").unwrap();
    let out = ontosheet(&root, &["import", "onto.ttl"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unsupported file extension"));
}

#[test]
fn detect_reports_format() {
    let root = tmp_dir("detect");
    let out = ontosheet(&root, &["detect", "Sheet.XLSX"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "spreadsheet");
    let out = ontosheet(&root, &["detect", "noext"]);
    assert_eq!(stdout(&out).trim(), "unsupported");
}

#[test]
fn prefixes_and_predicates_persist() {
    let root = init("prefix", &[]);
    let out = ontosheet(&root, &["prefix", "add", "pets", "http://example.org/pets#"]);
    assert!(out.status.success());
    let out = ontosheet(&root, &["predicate", "add", "pets:color"]);
    assert!(out.status.success());
    let out = ontosheet(&root, &["predicate", "add", "pets:color"]);
    assert!(!out.status.success());

    fs::write(
        root.join("pets.csv"),
        "pets:Rex,Rex,NamedIndividual,,,,brown\n",
    )
    .unwrap();
    let out = ontosheet(&root, &["import", "pets.csv", "--no-header"]);
    assert!(
        out.status.success(),
        "import failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let out = ontosheet(&root, &["export", "--format", "nt"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains(
        "<http://example.org/pets#Rex> <http://example.org/pets#color> \"brown\" ."
    ));

    let out = ontosheet(&root, &["prefix", "list"]);
    assert!(stdout(&out).contains("pets: http://example.org/pets#"));
}

#[test]
fn imports_and_fill_defined_by() {
    let root = init("imports", &["--example"]);
    let out = ontosheet(&root, &["imports", "add", "http://example.org/base"]);
    assert!(out.status.success());
    fs::write(root.join("notrdf.txt"), "hello").unwrap();
    let out = ontosheet(&root, &["imports", "load", "http://example.org/base", "notrdf.txt"]);
    assert!(!out.status.success());
    let out = ontosheet(&root, &["imports", "list"]);
    assert!(stdout(&out).contains("http://example.org/base (not loaded)"));

    let out = ontosheet(&root, &["rows", "fill-defined-by"]);
    assert!(out.status.success());
    // only the blank example row is missing a value
    assert!(stdout(&out).contains("Set isDefinedBy on 1 row(s)"));
}
