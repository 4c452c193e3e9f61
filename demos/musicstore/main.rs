//! # musicstore demo application
//!
//! A pretend music store server with two services. It does not serve
//! anything; each command prints the configuration it would start with.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example musicstore -- grpc
//! cargo run --example musicstore -- ana
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                |
//! |------------------------|-------------------------------------------------------------------|
//! | Declared defaults      | `cargo run --example musicstore -- grpc`                          |
//! | Command flags          | `cargo run --example musicstore -- grpc --port=1234`              |
//! | Bare bool flag         | `cargo run --example musicstore -- httpgw --cpuprofile`           |
//! | Command env var        | `MUSICSTORE_GRPC_PORT=3000 cargo run --example musicstore -- grpc` |
//! | Root key per command   | `MUSICSTORE_HTTPGW_CPUPROFILE=true cargo run --example musicstore -- httpgw` |
//! | Config file            | Put `[musicstore.grpc]` / `port = 9999` in `config.toml`          |
//! | Config file selection  | `--config other.toml` or `MUSICSTORE_CONFIG=other.toml`           |
//! | Root runnable + args   | `cargo run --example musicstore -- ana`                           |
//! | All values as JSON     | `cargo run --example musicstore -- dump`                          |
//! | Log events             | `RUST_LOG=cmdfig=debug cargo run --example musicstore -- grpc`    |

use std::process::ExitCode;

use cmdfig::{Args, Cmdfig, CmdfigError, Command, Conf, RunError};
use tracing_subscriber::EnvFilter;

fn greet(conf: &Conf<'_>, args: &[String]) -> Result<(), RunError> {
    let name = args.first().map(String::as_str).unwrap_or("stranger");
    println!("{}, {name}!", conf.get_string("greeting"));
    Ok(())
}

fn grpc(conf: &Conf<'_>, _args: &[String]) -> Result<(), RunError> {
    println!(
        "gRPC service on :{} using {} (profiling: {})",
        conf.get_int("port"),
        conf.get_string("dbUri"),
        conf.get_bool("cpuprofile")
    );
    Ok(())
}

fn httpgw(conf: &Conf<'_>, _args: &[String]) -> Result<(), RunError> {
    println!(
        "HTTP gateway on :{} forwarding to {} (profiling: {})",
        conf.get_int("port"),
        conf.get_string("grpcUri"),
        conf.get_bool("cpuprofile")
    );
    Ok(())
}

fn dump(conf: &Conf<'_>, _args: &[String]) -> Result<(), RunError> {
    let json = serde_json::to_string_pretty(&conf.all_values())?;
    println!("{json}");
    Ok(())
}

fn make_app() -> Result<Cmdfig, CmdfigError> {
    Cmdfig::builder("musicstore <your-name>", "Starts music store web application.")
        .key("cpuprofile", false, "Starts CPU profiler if set to true.")
        .key("greeting", "Hello", "How to greet visitors.")
        .run(greet)
        .args(Args::Exact(1))
        .command(
            Command::new("grpc", "Starts gRPC service.", grpc)
                .key("port", 8080, "Service listen port.")
                .key("dbUri", "boltdb:db/my.db", "Db Uri")
                .args(Args::None),
        )
        .command(
            Command::new("httpgw", "Starts Http GW.", httpgw)
                .key("port", 8080, "Http GW listen port.")
                .key("grpcUri", "http://localhost:5432", "Grpc service Uri.")
                .args(Args::None),
        )
        .command(Command::new("dump", "Prints the root configuration as JSON.", dump).args(Args::None))
        .build()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = make_app().and_then(|mut app| app.execute(std::env::args_os().skip(1)));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CmdfigError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
