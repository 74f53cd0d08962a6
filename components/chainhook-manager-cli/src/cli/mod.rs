use std::process;
use std::str::FromStr;

use chainhook_manager_client::registry::{ChainhookRegistry, ChainhookRegistryClient};
use chainhook_manager_client::stacks_node::ContractInterfaceResolver;
use chainhook_manager_client::utils::Context;
use chainhook_manager_client::{try_error, try_info};
use chainhook_manager_types::{
    ChainhookDefinition, ChainhookPagination, HookAction, StacksNetwork,
};
use clap::{Args, Parser, Subcommand};
use hiro_system_kit::slog;

use crate::config::Config;
use crate::service;

#[derive(Parser, Debug)]
#[command(
    name = "chainhook-manager",
    version,
    about = "Declare, list and delete Stacks chainhook subscriptions",
    long_about = None
)]
struct Opts {
    #[command(subcommand)]
    command: Command,
    /// Load configuration from a toml file
    #[arg(long = "config-path", global = true)]
    config_path: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage chainhook registrations
    #[command(subcommand)]
    Hooks(HooksCommand),
    /// Inspect deployed contracts
    #[command(subcommand)]
    Contracts(ContractsCommand),
    /// Run the HTTP facade consumed by the web UI
    #[command(subcommand)]
    Service(ServiceCommand),
}

#[derive(Subcommand, Debug)]
enum HooksCommand {
    /// Validate a chainhook definition file and submit it to the registry
    Register(RegisterHookArgs),
    /// List registered chainhooks
    List(ListHooksArgs),
    /// Display one registered chainhook
    Get(HookUuidArgs),
    /// Delete a registered chainhook
    Delete(HookUuidArgs),
}

#[derive(Args, Debug)]
struct RegisterHookArgs {
    /// Path to a chainhook definition (json)
    definition_path: String,
    /// Redirect the hook's action to this webhook instead of the one in the
    /// definition file (falls back to WEBHOOK_URL when set)
    #[arg(long)]
    webhook_url: Option<String>,
}

#[derive(Args, Debug)]
struct ListHooksArgs {
    #[arg(long, default_value_t = 0)]
    offset: i64,
    #[arg(long, default_value_t = 60)]
    limit: i64,
}

#[derive(Args, Debug)]
struct HookUuidArgs {
    uuid: String,
}

#[derive(Subcommand, Debug)]
enum ContractsCommand {
    /// Resolve the functions callable on a deployed contract
    Interface(ContractInterfaceArgs),
}

#[derive(Args, Debug)]
struct ContractInterfaceArgs {
    /// Fully qualified contract identifier (address.contract-name)
    contract_id: String,
    /// Network hosting the contract (defaults to the configured network)
    #[arg(long)]
    network: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ServiceCommand {
    /// Start the service
    Start(StartServiceArgs),
}

#[derive(Args, Debug)]
struct StartServiceArgs {
    /// Override the listening port
    #[arg(long)]
    port: Option<u16>,
}

pub fn main(ctx: Context) {
    let opts = Opts::parse();
    if let Err(e) = handle_command(opts, &ctx) {
        try_error!(ctx, "{}", e);
        process::exit(1);
    }
}

fn handle_command(opts: Opts, ctx: &Context) -> Result<(), String> {
    let config = Config::resolve(opts.config_path.as_deref())?;
    match opts.command {
        Command::Hooks(HooksCommand::Register(args)) => {
            let mut definition = load_definition(&args.definition_path)?;
            if let Some(url) = args.webhook_url.clone().or_else(|| config.webhook_url.clone()) {
                definition.action = HookAction::HttpPost { url };
                definition
                    .validate()
                    .map_err(|errors| errors.join("\n"))?;
            }
            let registry = registry_client(&config)?;
            let registered = hiro_system_kit::nestable_block_on(registry.register(&definition))
                .map_err(|e| e.to_string())?;
            try_info!(
                ctx,
                "Chainhook '{}' registered (uuid: {})",
                registered.definition.name,
                registered.uuid
            );
            println!("{}", registered.uuid);
            Ok(())
        }
        Command::Hooks(HooksCommand::List(args)) => {
            let registry = registry_client(&config)?;
            let page = ChainhookPagination::new(args.offset, args.limit);
            let chainhooks = hiro_system_kit::nestable_block_on(registry.list(&page))
                .map_err(|e| e.to_string())?;
            try_info!(ctx, "{} chainhook(s) returned", chainhooks.len());
            println!(
                "{}",
                serde_json::to_string_pretty(&chainhooks).map_err(|e| e.to_string())?
            );
            Ok(())
        }
        Command::Hooks(HooksCommand::Get(args)) => {
            let registry = registry_client(&config)?;
            let chainhook = hiro_system_kit::nestable_block_on(registry.get(&args.uuid))
                .map_err(|e| e.to_string())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&chainhook).map_err(|e| e.to_string())?
            );
            Ok(())
        }
        Command::Hooks(HooksCommand::Delete(args)) => {
            let registry = registry_client(&config)?;
            hiro_system_kit::nestable_block_on(registry.delete(&args.uuid))
                .map_err(|e| e.to_string())?;
            try_info!(ctx, "Chainhook {} deleted", args.uuid);
            Ok(())
        }
        Command::Contracts(ContractsCommand::Interface(args)) => {
            let (principal, contract_name) = split_contract_id(&args.contract_id)?;
            let network = match &args.network {
                Some(value) => StacksNetwork::from_str(value)
                    .map_err(|_| format!("unsupported stacks network '{}'", value))?,
                None => config.network,
            };
            let rpc = config.stacks_node_rpc();
            let functions = hiro_system_kit::nestable_block_on(rpc.resolve_callable_functions(
                &network,
                principal,
                contract_name,
            ))
            .map_err(|e| e.to_string())?;
            if functions.is_empty() {
                try_info!(
                    ctx,
                    "Contract {} exposes no callable functions",
                    args.contract_id
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&functions).map_err(|e| e.to_string())?
            );
            Ok(())
        }
        Command::Service(ServiceCommand::Start(args)) => {
            let mut config = config;
            if let Some(port) = args.port {
                config.port = port;
            }
            hiro_system_kit::nestable_block_on(service::start_service(&config, ctx))
        }
    }
}

fn registry_client(config: &Config) -> Result<ChainhookRegistryClient, String> {
    ChainhookRegistryClient::new(&config.registry_base_url, &config.api_key)
        .map_err(|e| e.to_string())
}

fn load_definition(path: &str) -> Result<ChainhookDefinition, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("unable to read definition file {}: {}", path, e))?;
    parse_definition(&content).map_err(|e| format!("invalid definition file {}: {}", path, e))
}

fn parse_definition(content: &str) -> Result<ChainhookDefinition, String> {
    let definition: ChainhookDefinition =
        serde_json::from_str(content).map_err(|e| e.to_string())?;
    definition.validate().map_err(|errors| errors.join("\n"))?;
    Ok(definition)
}

fn split_contract_id(contract_id: &str) -> Result<(&str, &str), String> {
    match contract_id.split_once('.') {
        Some((principal, contract_name)) if !principal.is_empty() && !contract_name.is_empty() => {
            Ok((principal, contract_name))
        }
        _ => Err(format!(
            "invalid contract identifier '{}': expected address.contract-name",
            contract_id
        )),
    }
}
