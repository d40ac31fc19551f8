use std::path::PathBuf;

use classlink::{ClassSource, ResolvePolicy};

pub const USAGE: &str = "usage: classdump [--dump-constant-pool] [--skip-unresolvable] \
                         [--verbose] <path> [--class <binary-name>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub source: ClassSource,
    pub dump_constant_pool: bool,
    pub resolve_policy: ResolvePolicy,
    pub verbose: bool,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
        let mut path = None;
        let mut class_name = None;
        let mut dump_constant_pool = false;
        let mut resolve_policy = ResolvePolicy::Strict;
        let mut verbose = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dump-constant-pool" => dump_constant_pool = true,
                "--skip-unresolvable" => resolve_policy = ResolvePolicy::SkipUnresolvable,
                "-v" | "--verbose" => verbose = true,
                "--class" => {
                    let name = args.next().ok_or("--class needs a class name")?;
                    class_name = Some(name);
                }
                flag if flag.starts_with('-') => return Err(format!("unknown option `{flag}`")),
                _ if path.is_some() => return Err(format!("unexpected argument `{arg}`")),
                _ => path = Some(PathBuf::from(arg)),
            }
        }

        let path = path.ok_or("missing input path")?;
        let source = match class_name {
            Some(class_name) => ClassSource::Archive { path, class_name },
            None => ClassSource::File(path),
        };

        Ok(Args {
            source,
            dump_constant_pool,
            resolve_policy,
            verbose,
        })
    }
}
