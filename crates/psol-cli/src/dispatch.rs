use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use psol_foundry::FoundryConfig;
use psol_prefix::{format_remapping, resolve_prefix, ResolutionRequest};
use psol_runtime::{load_remappings, resolve_forge, ForgeWrapper};
use serde_json::json;
use tracing::debug;

use crate::cli::{
    CommandGroupCli, DetectPrefixArgs, FoundryOutput, ForgeWrapArgs, ParseFoundryArgs,
};

/// Run one subcommand and return the process exit code.
pub fn dispatch_command(group: &CommandGroupCli) -> Result<i32> {
    match group {
        CommandGroupCli::DetectPrefix(args) => detect_prefix(args),
        CommandGroupCli::ForgeWrap(args) => forge_wrap(args),
        CommandGroupCli::ParseFoundry(args) => parse_foundry(args),
    }
}

fn detect_prefix(args: &DetectPrefixArgs) -> Result<i32> {
    let request = ResolutionRequest::new(&args.package, &args.name);
    let resolved =
        resolve_prefix(&args.zip, &request).wrap_err("failed to detect import prefix")?;
    let remapping = format_remapping(&resolved.prefix, &args.out_dir, &args.name);
    if args.json {
        let payload = json!({
            "prefix": resolved.prefix,
            "source": resolved.source,
            "remapping": remapping,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{remapping}");
    }
    Ok(0)
}

fn forge_wrap(args: &ForgeWrapArgs) -> Result<i32> {
    let remappings = args
        .remapping_file
        .as_deref()
        .map(load_remappings)
        .unwrap_or_default();
    debug!(count = remappings.len(), "loaded remappings");

    let forge = resolve_forge(&args.forge).map_err(|err| eyre!("{err:#}"))?;
    let wrapper = ForgeWrapper::new(remappings).with_deps_package(args.deps_package.clone());
    let outcome = wrapper
        .run(&forge, &args.args)
        .map_err(|err| eyre!("{err:#}"))?;

    print!("{}", outcome.stdout);
    eprint!("{}", outcome.display_stderr());
    Ok(outcome.exit_code)
}

fn parse_foundry(args: &ParseFoundryArgs) -> Result<i32> {
    let config = FoundryConfig::from_path(&args.file).wrap_err("failed to parse foundry.toml")?;
    let profile = args.profile.as_str();

    match args.output {
        FoundryOutput::Json => println!("{}", config.to_json()?),
        FoundryOutput::SolcVersion => {
            if let Some(version) = config.solc_version(profile) {
                println!("{version}");
            }
        }
        FoundryOutput::Remappings => {
            for remapping in config.remappings(profile) {
                println!("{remapping}");
            }
        }
        FoundryOutput::Optimizer => {
            let (enabled, runs) = config.optimizer(profile);
            if enabled {
                println!("true {runs}");
            } else {
                println!("false 0");
            }
        }
        FoundryOutput::EvmVersion => {
            if let Some(version) = config.evm_version(profile) {
                println!("{version}");
            }
        }
    }
    Ok(0)
}
