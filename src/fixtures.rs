#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use crate::builder::CmdfigBuilder;
    use crate::command::Command;
    use crate::conf::Conf;
    use crate::error::RunError;
    use crate::registry::KeySet;
    use crate::types::{KeySpec, Value};
    use crate::Cmdfig;

    pub fn key(name: &str, default: impl Into<Value>, description: &str) -> KeySpec {
        KeySpec {
            name: name.to_string(),
            default: default.into(),
            description: description.to_string(),
        }
    }

    pub fn keyset(keys: Vec<KeySpec>) -> KeySet {
        keys.into_iter().map(|k| (k.name.clone(), k)).collect()
    }

    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn noop(_: &Conf<'_>, _: &[String]) -> Result<(), RunError> {
        Ok(())
    }

    /// Records the positional arguments of every call.
    #[derive(Clone, Default)]
    pub struct Recorder(Rc<RefCell<Vec<Vec<String>>>>);

    impl Recorder {
        pub fn runnable(&self) -> impl Fn(&Conf<'_>, &[String]) -> Result<(), RunError> + 'static {
            let calls = self.0.clone();
            move |_, args| {
                calls.borrow_mut().push(args.to_vec());
                Ok(())
            }
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.0.borrow().clone()
        }

        pub fn last(&self) -> Option<Vec<String>> {
            self.0.borrow().last().cloned()
        }
    }

    /// Root-only app: `port`, `cpuprofile` and `dbUri` on the root command.
    pub fn single_app(config_dir: &Path) -> CmdfigBuilder {
        Cmdfig::builder("testapp", "Starts music store web application.")
            .default_config_file(config_dir.join("config.toml"))
            .key("port", 8080, "Listen port")
            .key("cpuprofile", false, "Starts CPU profiler if set to true.")
            .key("dbUri", "boltdb:db/my.db", "DB Uri")
            .run(noop)
    }

    /// Subcommands only: shared `cpuprofile`, `grpc` and `httpgw` with their own keys.
    pub fn multi_app(config_dir: &Path) -> CmdfigBuilder {
        Cmdfig::builder("testapp", "Starts music store web application.")
            .default_config_file(config_dir.join("config.toml"))
            .key("cpuprofile", false, "Starts CPU profiler if set to true.")
            .command(
                Command::new("grpc", "Starts gRPC service.", noop)
                    .key("port", 8080, "Service listen port.")
                    .key("dbUri", "boltdb:db/my.db", "Db Uri"),
            )
            .command(
                Command::new("httpgw", "Starts Http GW.", noop)
                    .key("port", 8080, "Http GW listen port.")
                    .key("grpcUri", "http://localhost:5432", "Grpc service Uri."),
            )
    }

    #[test]
    fn keyset_indexes_by_name() {
        let keys = keyset(vec![key("port", 8080, ""), key("dbUri", "x", "")]);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys["port"].default, Value::Int(8080));
    }
}
