//! Rules for positional arguments.

use std::fmt;
use std::sync::Arc;

type Check = dyn Fn(&[String]) -> Result<(), String> + Send + Sync;

/// A rule positional arguments must satisfy before a runnable is invoked.
///
/// Declaring a rule on the root command is what makes a root runnable
/// compatible with subcommands.
#[derive(Clone)]
pub enum Args {
    /// Anything goes.
    Any,
    /// No positional arguments at all.
    None,
    Exact(usize),
    Minimum(usize),
    Maximum(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
    Custom(Arc<Check>),
}

impl Args {
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&[String]) -> Result<(), String> + Send + Sync + 'static,
    {
        Args::Custom(Arc::new(check))
    }

    pub fn check(&self, args: &[String]) -> Result<(), String> {
        let n = args.len();
        match self {
            Args::Any => Ok(()),
            Args::None if n > 0 => Err(format!("accepts no arguments, received {n}")),
            Args::Exact(want) if n != *want => {
                Err(format!("accepts {want} arg(s), received {n}"))
            }
            Args::Minimum(min) if n < *min => Err(format!(
                "requires at least {min} arg(s), only received {n}"
            )),
            Args::Maximum(max) if n > *max => {
                Err(format!("accepts at most {max} arg(s), received {n}"))
            }
            Args::Range(min, max) if n < *min || n > *max => Err(format!(
                "accepts between {min} and {max} arg(s), received {n}"
            )),
            Args::Custom(check) => (**check)(args),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Args::Any => f.write_str("Any"),
            Args::None => f.write_str("None"),
            Args::Exact(n) => write!(f, "Exact({n})"),
            Args::Minimum(n) => write!(f, "Minimum({n})"),
            Args::Maximum(n) => write!(f, "Maximum({n})"),
            Args::Range(min, max) => write!(f, "Range({min}, {max})"),
            Args::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
