// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cucm_provision::axl::{build_envelope, AxlClient, AxlOperations};
use cucm_provision::cli::{load_profile, selected_plan, Cli, Command, SiteArgs};
use cucm_provision::config::{axl_version_from_env, Config};
use cucm_provision::models::{AppUser, Site, SiteProfile};
use cucm_provision::services::{
    preview_step, Plan, ProvisionOptions, ProvisionReport, SiteProvisioner, StepStatus,
};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = cli.overrides();

    // Offline commands
    match &cli.command {
        Command::Plan { only } => {
            print_plan(&selected_plan(only.as_deref())?);
            return Ok(());
        }
        Command::Site(args) if !cli.command.needs_connection() => {
            return dry_run(args, &axl_version_from_env());
        }
        _ => {}
    }

    let config = Config::from_env_with(&overrides).context("Failed to load configuration")?;

    info!("🚀 Starting CUCM provisioner");
    info!("Environment: {}", config.environment);
    info!(
        "AXL endpoint: {} (schema {})",
        config.endpoint(),
        config.axl_version
    );
    if !config.verify_tls {
        warn!("⚠️  TLS certificate verification disabled");
    }

    let client = Arc::new(AxlClient::from_config(&config).context("Failed to create AXL client")?);

    match cli.command {
        Command::Version => {
            let version = client
                .get_ccm_version()
                .await
                .context("getCCMVersion failed")?;
            info!("✅ Connected to CUCM {}", version);
            println!("{}", version);
        }

        Command::AppUser {
            userid,
            user_password,
            presence_group,
        } => {
            let presence_group =
                presence_group.unwrap_or_else(|| SiteProfile::default().app_user.presence_group);
            let user = AppUser::new(&userid, &user_password, &presence_group);

            match client.add_app_user(&user).await {
                Ok(created) => println!("{}", created.raw),
                Err(e) => error!("❌ Error: addAppUser: {}: {}", userid, e),
            }
        }

        Command::Site(args) => {
            let site = args.site()?;
            let plan = selected_plan(args.only.as_deref())?;
            let profile = load_profile(args.profile.as_ref())?;

            let provisioner = SiteProvisioner::new(client.clone(), profile).with_options(
                ProvisionOptions {
                    halt_on_fault: args.halt_on_fault,
                },
            );
            let report = provisioner.provision(&site, &plan).await?;
            print_report(&report, args.json)?;
        }

        command => {
            if let Some((step, object, srst_ip)) = command.single_object() {
                let site = Site::new(&object.name, srst_ip, None)?;
                let profile = load_profile(object.profile.as_ref())?;

                let provisioner = SiteProvisioner::new(client.clone(), profile);
                let report = provisioner.provision(&site, &Plan::for_steps(&[step])).await?;
                print_report(&report, false)?;
            }
        }
    }

    info!("AXL requests sent: {}", client.request_count());

    Ok(())
}

fn print_plan(plan: &Plan) {
    for (i, step) in plan.steps.iter().enumerate() {
        let after: Vec<&str> = step.dependencies().iter().map(|d| d.name()).collect();
        println!(
            "{:>2}. {:<26} {:<18} after: {}",
            i + 1,
            step.name(),
            step.operation(),
            if after.is_empty() {
                "-".to_string()
            } else {
                after.join(", ")
            }
        );
    }

    if !plan.assumed_existing.is_empty() {
        let assumed: Vec<&str> = plan.assumed_existing.iter().map(|s| s.name()).collect();
        println!("assumed to exist: {}", assumed.join(", "));
    }
}

fn dry_run(args: &SiteArgs, version: &str) -> Result<()> {
    let site = args.site()?;
    let plan = selected_plan(args.only.as_deref())?;
    let profile = load_profile(args.profile.as_ref())?;
    plan.check_inputs(&site)?;

    info!("Dry run for site {}: nothing will be sent", site.name);
    print_plan(&plan);

    for step in &plan.steps {
        for request in preview_step(&site, &profile, *step)? {
            println!("\n<!-- {} {} -->", step, request.operation);
            println!("{}", build_envelope(version, &request)?);
        }
    }

    Ok(())
}

fn print_report(report: &ProvisionReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for outcome in &report.outcomes {
        if outcome.status == StepStatus::Completed {
            if let Some(response) = &outcome.response {
                println!("{}", response);
            }
        }
    }

    Ok(())
}
