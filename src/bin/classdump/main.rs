use std::process::ExitCode;

use classlink::{ClassFile, ParseOptions, ResolutionCache, resolve_all_with};
use tracing::Level;

mod args;

use args::{Args, USAGE};

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> classlink::Result<()> {
    let class = args.source.load(&ParseOptions::default())?;

    if args.dump_constant_pool {
        for (index, entry) in class.constant_pool.iter() {
            eprintln!("{:>5} = {entry}", format!("#{index}"));
        }
    }

    let cache = resolve_all_with(&class.constant_pool, args.resolve_policy)?;
    print_summary(&class, &cache)
}

fn print_summary(class: &ClassFile, cache: &ResolutionCache) -> classlink::Result<()> {
    println!("class {}", class.class_name()?);
    println!("  version: {}.{}", class.major_version, class.minor_version);
    println!("  flags: {:?}", class.access_flags);
    if let Some(super_class) = class.super_class_name()? {
        println!("  extends: {super_class}");
    }
    for interface in class.interface_names()? {
        println!("  implements: {interface}");
    }
    if let Some(source_file) = class.source_file()? {
        println!("  source: {source_file}");
    }
    println!("  fields: {}", class.fields.len());
    println!("  methods: {}", class.methods.len());
    println!(
        "  resolved references: {} ({} classes)",
        cache.len(),
        cache.classes_resolved()
    );
    for (index, reference) in cache.iter() {
        println!("    #{index}: {reference}");
    }
    Ok(())
}
