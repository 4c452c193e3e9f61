use std::fs;
use std::path::{Path, PathBuf};

use cmdfig::{Args, Cmdfig, CmdfigError, Command, RootValues, RunError, Value};
use serde::Serialize;
use tempfile::TempDir;

fn noop(_: &cmdfig::Conf<'_>, _: &[String]) -> Result<(), RunError> {
    Ok(())
}

fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn testapp(dir: &Path) -> Cmdfig {
    Cmdfig::builder("testapp", "Starts music store web application.")
        .default_config_file(dir.join("config.toml"))
        .key("port", 8080, "Listen port")
        .run(noop)
        .build_with_env(vec![])
        .unwrap()
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn port_walkthrough() {
    let dir = TempDir::new().unwrap();
    let mut app = testapp(dir.path());

    app.execute_with_env(["--port=1234"], vec![]).unwrap();
    assert_eq!(app.root_config().get_int("port"), 1234);

    app.execute_with_env(Vec::<String>::new(), env(&[("TESTAPP_PORT", "3000")]))
        .unwrap();
    assert_eq!(app.root_config().get_int("port"), 3000);

    write(dir.path(), "config.toml", "[testapp]\nport = 9999\n");
    app.execute_with_env(Vec::<String>::new(), vec![]).unwrap();
    assert_eq!(app.root_config().get_int("port"), 9999);

    write(dir.path(), "config.toml", "[testapp]\n");
    app.execute_with_env(Vec::<String>::new(), vec![]).unwrap();
    assert_eq!(app.root_config().get_int("port"), 8080);
}

#[test]
fn precedence_over_every_source_combination() {
    for mask in 0..8u8 {
        let (flag, var, file) = (mask & 1 != 0, mask & 2 != 0, mask & 4 != 0);
        let dir = TempDir::new().unwrap();
        if file {
            write(dir.path(), "config.toml", "[testapp]\nport = 9999\n");
        }
        let mut app = testapp(dir.path());

        let args: Vec<&str> = if flag { vec!["--port=1234"] } else { vec![] };
        let vars = if var {
            env(&[("TESTAPP_PORT", "3000")])
        } else {
            vec![]
        };
        app.execute_with_env(args, vars).unwrap();

        let expected = if flag {
            1234
        } else if var {
            3000
        } else if file {
            9999
        } else {
            8080
        };
        assert_eq!(
            app.root_config().get_int("port"),
            expected,
            "flag={flag} env={var} file={file}"
        );
    }
}

fn grpc_app(dir: &Path) -> Cmdfig {
    Cmdfig::builder("testapp", "")
        .default_config_file(dir.join("config.toml"))
        .key("port", 8080, "Root port")
        .run(noop)
        .args(Args::Any)
        .command(Command::new("grpc", "", noop).key("port", 5432, "gRPC port"))
        .build_with_env(vec![])
        .unwrap()
}

#[test]
fn root_and_command_keys_are_isolated() {
    let dir = TempDir::new().unwrap();
    let mut app = grpc_app(dir.path());
    app.execute_with_env(["grpc", "--port=1"], env(&[("TESTAPP_PORT", "2")]))
        .unwrap();
    assert_eq!(app.config("grpc").get_int("port"), 1);
    assert_eq!(app.root_config().get_int("port"), 2);

    app.root_config().set("port", 3).unwrap();
    assert_eq!(app.config("grpc").get_int("port"), 1);
    assert_eq!(app.root_config().get_int("port"), 3);
}

#[test]
fn command_declaration_shadows_root_declaration() {
    let dir = TempDir::new().unwrap();
    let mut app = grpc_app(dir.path());
    app.execute_with_env(["grpc"], vec![]).unwrap();
    assert_eq!(app.config("grpc").get_int("port"), 5432);
    assert_eq!(app.root_config().get_int("port"), 8080);

    let keys = app.registry().keys(&cmdfig::Scope::command("grpc")).unwrap();
    assert_eq!(keys["port"].description, "gRPC port");
}

#[test]
fn ambiguous_routing_yields_no_instance() {
    let result = Cmdfig::builder("musicstore", "")
        .run(noop)
        .command(Command::new("grpc", "", noop))
        .build_with_env(vec![]);
    let err = result.unwrap_err();
    assert!(matches!(err, CmdfigError::AmbiguousRouting { .. }));
    assert!(err.to_string().contains("musicstore"));
}

#[derive(Serialize)]
struct Ohmy {}

#[test]
fn unsupported_default_yields_no_instance() {
    let err = Cmdfig::builder("musicstore", "")
        .key("port", Ohmy {}, "Listen port")
        .run(noop)
        .build_with_env(vec![])
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("port"));
    assert!(message.contains("Ohmy"));
}

#[test]
fn missing_default_config_is_fine() {
    let dir = TempDir::new().unwrap();
    let mut app = testapp(dir.path());
    app.execute_with_env(Vec::<String>::new(), vec![]).unwrap();
    assert_eq!(app.root_config().get("port"), Some(Value::Int(8080)));
}

#[test]
fn malformed_default_config_falls_back() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "config.toml", "[testapp\nport = ");
    let mut app = testapp(dir.path());
    app.execute_with_env(Vec::<String>::new(), env(&[("TESTAPP_PORT", "3000")]))
        .unwrap();
    assert_eq!(app.root_config().get_int("port"), 3000);
    app.execute_with_env(Vec::<String>::new(), vec![]).unwrap();
    assert_eq!(app.root_config().get_int("port"), 8080);
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let mut app = testapp(dir.path());
    let missing = dir.path().join("missing.toml");
    let flag = format!("--config={}", missing.display());
    assert!(app.execute_with_env([flag], vec![]).is_err());

    let path = missing.display().to_string();
    let result = app.execute_with_env(
        Vec::<String>::new(),
        env(&[("TESTAPP_CONFIG", path.as_str())]),
    );
    assert!(matches!(result, Err(CmdfigError::IoError { .. })));
}

#[test]
fn config_flag_beats_config_env() {
    let dir = TempDir::new().unwrap();
    let from_flag = write(dir.path(), "flag.toml", "[testapp]\nport = 1111\n");
    let from_env = write(dir.path(), "env.toml", "[testapp]\nport = 2222\n");
    let mut app = testapp(dir.path());

    let flag = format!("--config={}", from_flag.display());
    let path = from_env.display().to_string();
    app.execute_with_env([flag], env(&[("TESTAPP_CONFIG", path.as_str())]))
        .unwrap();
    assert_eq!(app.root_config().get_int("port"), 1111);
    assert_eq!(app.config_file_used(), Some(from_flag.as_path()));
}

#[test]
fn root_all_values_modes() {
    let body = "[testapp]\nport = 1\n[testapp.grpc]\nport = 2\n";

    let dir = TempDir::new().unwrap();
    write(dir.path(), "config.toml", body);
    let mut app = grpc_app(dir.path());
    app.execute_with_env(Vec::<String>::new(), vec![]).unwrap();
    let nested = app.root_config().all_values();
    assert_eq!(nested["port"].as_integer(), Some(1));
    assert_eq!(nested["grpc"]["port"].as_integer(), Some(2));

    let mut app = Cmdfig::builder("testapp", "")
        .default_config_file(dir.path().join("config.toml"))
        .key("port", 8080, "")
        .root_values(RootValues::KeysOnly)
        .command(Command::new("grpc", "", noop).key("port", 5432, ""))
        .build_with_env(vec![])
        .unwrap();
    app.execute_with_env(["grpc"], vec![]).unwrap();
    let keys_only = app.root_config().all_values();
    assert_eq!(keys_only["port"].as_integer(), Some(1));
    assert!(!keys_only.contains_key("grpc"));
}
