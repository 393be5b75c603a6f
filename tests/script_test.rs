use hugo_preproc::error::Error;
use hugo_preproc::script::value::{HostList, HostValue};
use hugo_preproc::script::{Bindings, ScriptEngine};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

fn run_all(script: &str, items: &[&str]) -> Result<(), Error> {
    ScriptEngine::new().run_all(script, &paths(items))
}

#[test]
fn test_host_list_concatenation() {
    let script = r#"
        let both = files + files;
        if both.len() != 4 { throw "expected 4, got " + both.len(); }
        if both[2] != "a" { throw "bad order"; }
    "#;
    run_all(script, &["a", "b"]).unwrap();
}

#[test]
fn test_host_list_indexing() {
    let script = r#"
        if files[0] != "a" || files[1] != "b" { throw "index read"; }
        if files["b"] != 1 { throw "value lookup"; }
        if files["zzz"] != () { throw "missing value lookup"; }
        let copy = files;
        copy[0] = "z";
        if copy[0] != "z" { throw "index write"; }
        if files[0] != "a" { throw "copy shares storage"; }
    "#;
    run_all(script, &["a", "b"]).unwrap();
}

#[test]
fn test_host_list_index_out_of_bounds() {
    let err = run_all("let x = files[5];", &["a"]).unwrap_err();
    assert!(err.to_string().contains("out of bounds"));
}

#[test]
fn test_host_list_position_call() {
    let script = r#"
        if files.position("c") != 2 { throw "position"; }
        if files.position("nope") != () { throw "missing position"; }
    "#;
    run_all(script, &["a", "b", "c"]).unwrap();
}

#[test]
fn test_host_list_equality_is_order_sensitive() {
    let script = r#"
        let same = files;
        if !(same == files) { throw "reflexive"; }
        let swapped = files;
        swapped[0] = files[1];
        swapped[1] = files[0];
        if swapped == files { throw "order ignored"; }
        if !(swapped != files) { throw "inequality"; }
    "#;
    run_all(script, &["a", "b"]).unwrap();
}

#[test]
fn test_host_list_truthiness() {
    run_all(r#"if !files { throw "non-empty list is falsy"; }"#, &["a"]).unwrap();
    run_all(r#"if !(!files) { throw "empty list is truthy"; }"#, &[]).unwrap();
}

#[test]
fn test_host_list_iteration() {
    let script = r#"
        let seen = "";
        for (value, position) in files {
            seen += `${position}=${value};`;
        }
        if seen != "0=a;1=b;" { throw seen; }
        let pairs = files.pairs();
        if pairs[1][0] != 1 || pairs[1][1] != "b" { throw "pairs"; }
    "#;
    run_all(script, &["a", "b"]).unwrap();
}

#[test]
fn test_each_binds_file_and_declares_files() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.txt");
    let b = temp_dir.path().join("b.txt");
    let script = r#"
        import "fs" as fs;
        if files != () { throw "files bound in each mode"; }
        fs::write(file + ".seen", file);
    "#;

    ScriptEngine::new().run_each(script, &[a.clone(), b.clone()]).unwrap();

    let a_out = format!("{}.seen", a.display());
    let b_out = format!("{}.seen", b.display());
    assert_eq!(fs::read_to_string(a_out).unwrap(), a.display().to_string());
    assert_eq!(fs::read_to_string(b_out).unwrap(), b.display().to_string());
}

#[test]
fn test_each_stops_at_first_failure() {
    let temp_dir = TempDir::new().unwrap();
    let files: Vec<_> = ["a", "b", "c"].iter().map(|n| temp_dir.path().join(n)).collect();
    let script = r#"
        import "fs" as fs;
        if file.ends_with("b") { throw "boom"; }
        fs::write(file + ".done", "");
    "#;

    let err = ScriptEngine::new().run_each(script, &files).unwrap_err();

    assert!(err.to_string().contains("boom"));
    assert!(temp_dir.path().join("a.done").exists());
    assert!(!temp_dir.path().join("c.done").exists());
}

#[test]
fn test_each_does_not_share_state() {
    let script = r#"
        let counter = 0;
        counter += 1;
        if counter != 1 { throw "state leaked"; }
    "#;
    ScriptEngine::new().run_each(script, &paths(&["a", "b", "c"])).unwrap();
}

#[test]
fn test_undeclared_variable_is_compile_error() {
    let err = run_all("print(nope);", &[]).unwrap_err();
    assert!(matches!(err, Error::ScriptParseError(_)));
}

#[test]
fn test_syntax_error() {
    let err = run_all("let = ;", &[]).unwrap_err();
    assert!(matches!(err, Error::ScriptParseError(_)));
}

#[test]
fn test_runtime_error() {
    let err = run_all(r#"throw "failed on purpose";"#, &[]).unwrap_err();
    assert!(matches!(err, Error::ScriptError(ref msg) if msg.contains("failed on purpose")));
}

#[test]
fn test_standard_modules() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("one.yaml"), "").unwrap();
    fs::write(temp_dir.path().join("two.md"), "").unwrap();
    let out = temp_dir.path().join("out/list.txt");

    let script = format!(
        r#"
        import "fs" as fs;
        import "os" as os;
        import "path" as path;
        import "log" as log;

        let found = fs::glob("{root}", "*.yaml");
        if found.len() != 1 {{ throw "glob"; }}
        if path::base(found[0]) != "one.yaml" {{ throw "base"; }}
        if path::ext(found[0]) != "yaml" {{ throw "ext"; }}
        if path::stem(found[0]) != "one" {{ throw "stem"; }}
        if os::output("echo hi") != "hi\n" {{ throw "output"; }}
        log::trace("writing list");
        log::info("writing list");
        debug("writing list");
        fs::write("{out}", path::join("a", "b"));
        if !fs::exists("{out}") {{ throw "exists"; }}
        if fs::read("{out}") != "a/b" {{ throw "read"; }}
        "#,
        root = temp_dir.path().display(),
        out = out.display(),
    );

    ScriptEngine::new().run_all(&script, &[]).unwrap();
    assert_eq!(fs::read_to_string(out).unwrap(), "a/b");
}

#[test]
fn test_os_exec_failure() {
    let err = run_all(r#"import "os" as os; os::exec("exit 3");"#, &[]).unwrap_err();
    assert!(err.to_string().contains("exit 3"));
}

#[test]
fn test_unknown_module() {
    assert!(run_all(r#"import "net" as net;"#, &[]).is_err());
}

#[test]
fn test_git_binding() {
    let engine = ScriptEngine::new();
    let script = engine
        .compile(r#"if git.message != "hello" || file != "out.md" { throw "git binding"; }"#)
        .unwrap();
    let bindings = Bindings {
        file: HostValue::from("out.md"),
        git: Some(serde_json::json!({ "message": "hello" })),
        ..Default::default()
    };

    engine.run(&script, bindings).unwrap();
}

#[test]
fn test_compiled_script_runs_with_host_list() {
    let engine = ScriptEngine::new();
    let script = engine.compile("if files.len() != 2 { throw \"len\"; }").unwrap();
    let files = HostList::new(vec!["x".to_string(), "y".to_string()]);

    engine.run(&script, Bindings { files: files.into(), ..Default::default() }).unwrap();
}
