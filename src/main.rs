#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
extern crate loggerv;
#[macro_use]
extern crate error_chain;
extern crate serde_json;

extern crate rendercat;

use rendercat::*;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::process;

fn result_exit<T>(name: &str, x: Result<T>) {
    let _ = x.map_err(|e| {
        error!("{} error: {}", name, e);
        debug!("{}: {:?}", name, e); // in the off-chance that Debug is useful
        process::exit(1);
    });
    process::exit(0);
}
fn conditional_exit<T>(x: Result<T>) -> T {
    x.unwrap_or_else(|e| {
        error!("error: {}", e);
        debug!("{:?}", e);
        process::exit(1);
    })
}

fn build_cli() -> App<'static, 'static> {
    App::new("rendercat")
        .version(crate_version!())
        .setting(AppSettings::VersionlessSubcommands)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::DeriveDisplayOrder)
        .global_settings(&[AppSettings::ColoredHelp])
        .about("Validate render blueprints before the platform does")
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .global(true)
            .help("Increase verbosity"))
        .arg(Arg::with_name("debug")
            .short("d")
            .long("debug")
            .global(true)
            .help("Adds line numbers to log statements"))
        .arg(Arg::with_name("file")
            .short("f")
            .long("file")
            .takes_value(true)
            .global(true)
            .env("RENDERCAT_MANIFEST")
            .default_value("render.yaml")
            .help("Blueprint file to read"))
        .subcommand(SubCommand::with_name("validate")
            .about("Validate every service in the blueprint"))
        .subcommand(SubCommand::with_name("render")
            .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Output file to save to"))
            .about("Print the canonical form of the blueprint"))
        .subcommand(SubCommand::with_name("secrets")
            .arg(Arg::with_name("service")
                .help("Service name (defaults to the only service)"))
            .arg(Arg::with_name("missing")
                .long("missing")
                .help("Only list secrets missing from the current environment"))
            .about("List the secrets an operator must supply"))
        .subcommand(SubCommand::with_name("env")
            .arg(Arg::with_name("service")
                .help("Service name (defaults to the only service)"))
            .arg(Arg::with_name("json")
                .long("json")
                .help("Output json"))
            .about("Resolve the injected environment and the bot configuration it yields"))
}

fn main() {
    let args = build_cli().get_matches();

    // by default, always show INFO messages for now (+1)
    loggerv::Logger::new()
        .verbosity(args.occurrences_of("verbose") + 1)
        .module_path(true)
        .line_numbers(args.is_present("debug"))
        .init()
        .unwrap();

    let file = args.value_of("file").unwrap().to_string();
    let name = args.subcommand_name().unwrap();

    if args.subcommand_matches("validate").is_some() {
        result_exit(name, validate(&file))
    }
    if let Some(a) = args.subcommand_matches("render") {
        let output = a.value_of("output").map(String::from);
        result_exit(name, render_blueprint(&file, output, &mut io::stdout()))
    }
    if let Some(a) = args.subcommand_matches("secrets") {
        let bp = conditional_exit(Blueprint::load(&file));
        let svc = conditional_exit(pick(&bp, a));
        result_exit(name, secrets(svc, &ProcessEnv, a.is_present("missing"), &mut io::stdout()))
    }
    if let Some(a) = args.subcommand_matches("env") {
        let bp = conditional_exit(Blueprint::load(&file));
        let svc = conditional_exit(pick(&bp, a));
        result_exit(name, resolve(svc, &ProcessEnv, a.is_present("json"), &mut io::stdout()))
    }

    unreachable!("Subcommand valid, but not implemented");
}

fn validate(file: &str) -> Result<()> {
    let bp = Blueprint::load(file)?;
    for svc in &bp.services {
        info!("validated {} ({}, {} plan)", svc.name, svc.kind, svc.plan);
        svc.print()?; // print it if sufficient verbosity
    }
    Ok(())
}

fn render_blueprint<W: Write>(file: &str, output: Option<String>, out: &mut W) -> Result<()> {
    let encoded = Blueprint::load(file)?.render()?;
    if let Some(o) = output {
        fs::write(&o, &encoded)?;
        info!("Wrote blueprint to {}", o);
    } else {
        write!(out, "{}", encoded)?;
    }
    Ok(())
}

/// Select the named service, or the only one
fn pick<'a>(bp: &'a Blueprint, a: &ArgMatches) -> Result<&'a ServiceDescriptor> {
    match a.value_of("service") {
        Some(name) => bp.service(name).ok_or_else(|| format!("No service {} in blueprint", name).into()),
        None if bp.services.len() == 1 => Ok(&bp.services[0]),
        None => Err(format!("Blueprint has {} services, specify one", bp.services.len()).into()),
    }
}

/// List secret keys, failing when `missing_only` finds any unset
fn secrets<S: SecretStore, W: Write>(svc: &ServiceDescriptor, store: &S, missing_only: bool, out: &mut W) -> Result<()> {
    if !missing_only {
        for k in svc.secret_keys() {
            writeln!(out, "{}", k)?;
        }
        return Ok(());
    }
    let missing = svc.missing_secrets(store);
    for k in &missing {
        writeln!(out, "{}", k)?;
    }
    if !missing.is_empty() {
        bail!(ErrorKind::MissingSecrets(missing));
    }
    Ok(())
}

fn resolve<S: SecretStore, W: Write>(svc: &ServiceDescriptor, store: &S, json: bool, out: &mut W) -> Result<()> {
    let env = svc.resolve_env(store)?;
    let conf = BotConfig::from_vars(&env)?;

    let mut shown = BTreeMap::new();
    for e in &svc.envVars {
        let v = if e.is_secret() { "<secret>".to_string() } else { env[&e.key].clone() };
        shown.insert(e.key.clone(), v);
    }
    if json {
        let summary = serde_json::json!({
            "service": svc.name,
            "env": shown,
            "port": conf.port,
            "debug": conf.debug,
            "webhook": conf.webhook_endpoint(),
            "healthCheck": svc.healthCheckPath,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        for (k, v) in &shown {
            writeln!(out, "{}={}", k, v)?;
        }
        match conf.webhook_endpoint() {
            Some(w) => info!("Telegram updates go to {}", w),
            None => warn!("WEBHOOK_URL not provided, webhook not set"),
        }
    }
    Ok(())
}
