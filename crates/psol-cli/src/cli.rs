use std::path::PathBuf;

use clap::{builder::NonEmptyStringValueParser, ArgAction, Args, Parser, Subcommand, ValueEnum};
use psol_runtime::DEFAULT_DEPS_PACKAGE;

pub const PSOL_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\n{all-args}\n";

pub const PSOL_BEFORE_HELP: &str = concat!(
    "please_sol ",
    env!("CARGO_PKG_VERSION"),
    " – parsing helpers for the Solidity build rules\n\n",
    "\x1b[1;36mCommands\x1b[0m\n",
    "  detect-prefix    Auto-detect a library's import prefix from its package.json.\n",
    "  forge-wrap       Run forge and add hints to failing error output.\n",
    "  parse-foundry    Extract settings from a foundry.toml.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "please_sol",
    author,
    version,
    disable_help_subcommand = true,
    before_help = PSOL_BEFORE_HELP,
    help_template = PSOL_HELP_TEMPLATE
)]
pub struct PsolCli {
    #[arg(
        short,
        long,
        help = "Only log errors (tool output on stdout is unaffected)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging on stderr (-vvv reaches trace); PSOL_LOG overrides",
        global = true
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(
        name = "detect-prefix",
        about = "Detect import prefix from a Solidity library's package.json",
        override_usage = "please_sol detect-prefix --zip <ZIP> --package <DIR> --name <NAME> --out_dir <DIR>"
    )]
    DetectPrefix(DetectPrefixArgs),
    #[command(
        name = "forge-wrap",
        about = "Run forge with enhanced error messages",
        override_usage = "please_sol forge-wrap [--forge <FORGE>] [--remapping-file <FILE>] [--] [ARG...]"
    )]
    ForgeWrap(ForgeWrapArgs),
    #[command(
        name = "parse-foundry",
        about = "Parse foundry.toml and extract configuration",
        override_usage = "please_sol parse-foundry --file <FILE> [--profile <NAME>] [--output <FORMAT>]"
    )]
    ParseFoundry(ParseFoundryArgs),
}

#[derive(Args, Debug)]
pub struct DetectPrefixArgs {
    #[arg(
        short = 'z',
        long = "zip",
        value_name = "ZIP",
        help = "Path to the zip file containing the Solidity library"
    )]
    pub zip: PathBuf,
    #[arg(
        short = 'p',
        long = "package",
        value_name = "DIR",
        help = "The package directory within the repository"
    )]
    pub package: String,
    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        value_parser = NonEmptyStringValueParser::new(),
        help = "The name of the sol_get target (fallback prefix)"
    )]
    pub name: String,
    #[arg(
        short = 'o',
        long = "out_dir",
        value_name = "DIR",
        help = "The output directory (package path)"
    )]
    pub out_dir: String,
    #[arg(long, help = "Print {prefix,source,remapping} as JSON instead of the remapping line")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ForgeWrapArgs {
    #[arg(
        short = 'f',
        long = "forge",
        value_name = "FORGE",
        env = "PSOL_FORGE",
        default_value = "forge",
        help = "Path to the forge binary, or a name to look up on PATH"
    )]
    pub forge: String,
    #[arg(
        short = 'r',
        long = "remapping-file",
        value_name = "FILE",
        env = "PSOL_REMAPPING_FILE",
        help = "Path to file containing remappings (one per line)"
    )]
    pub remapping_file: Option<PathBuf>,
    #[arg(
        long = "deps-package",
        value_name = "LABEL",
        env = "PSOL_DEPS_PACKAGE",
        default_value = DEFAULT_DEPS_PACKAGE,
        help = "Package label used when suggesting dependencies"
    )]
    pub deps_package: String,
    #[arg(
        value_name = "ARG",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Arguments to pass to forge"
    )]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ParseFoundryArgs {
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help = "Path to foundry.toml file"
    )]
    pub file: PathBuf,
    #[arg(
        short = 'p',
        long = "profile",
        value_name = "NAME",
        default_value = psol_foundry::DEFAULT_PROFILE,
        help = "Profile to extract"
    )]
    pub profile: String,
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t = FoundryOutput::Json,
        help = "Output format"
    )]
    pub output: FoundryOutput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FoundryOutput {
    Json,
    SolcVersion,
    Remappings,
    Optimizer,
    EvmVersion,
}
