// src/cli.rs
use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::error::ProvisionError;
use crate::models::{Site, SiteProfile};
use crate::services::{parse_steps, Plan, ProvisionStep};

#[derive(Parser, Debug)]
#[command(name = "cucm-provision")]
#[command(version, about = "Provision branch sites on Cisco Unified CM over AXL")]
pub struct Cli {
    /// CUCM publisher host (overrides CUCM_ADDRESS)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// AXL user (overrides AXL_USERNAME)
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// AXL password (overrides AXL_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Log full SOAP envelopes at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision every object a branch site needs
    Site(SiteArgs),

    /// Print the ordered steps and what each one depends on
    Plan {
        /// Comma separated steps, e.g. `location,region,srst`
        #[arg(long)]
        only: Option<String>,
    },

    /// Create an application user
    AppUser {
        #[arg(long)]
        userid: String,
        /// Password for the new user (`--password` is the AXL login)
        #[arg(long = "user-password")]
        user_password: String,
        #[arg(long)]
        presence_group: Option<String>,
    },

    /// Print the active CUCM version (connectivity check)
    Version,

    /// Create the site location
    Location(ObjectArgs),

    /// Create the site region
    Region(ObjectArgs),

    /// Create the site SRST reference
    Srst {
        #[command(flatten)]
        object: ObjectArgs,
        #[arg(long)]
        srst_ip: IpAddr,
    },

    /// Create the site device pool
    DevicePool(ObjectArgs),

    /// Create the site route group
    RouteGroup(ObjectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Site name; object names are derived from it
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub srst_ip: IpAddr,

    /// Defaults to the SRST address
    #[arg(long)]
    pub gateway_ip: Option<IpAddr>,

    /// JSON file overriding the site standards
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Comma separated subset of steps
    #[arg(long)]
    pub only: Option<String>,

    /// Stop after the first fault
    #[arg(long)]
    pub halt_on_fault: bool,

    /// Print the plan and request envelopes without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON instead of the raw responses
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ObjectArgs {
    /// Site name
    #[arg(long)]
    pub name: String,

    /// JSON file overriding the site standards
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            cucm_address: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            debug_envelopes: self.debug,
        }
    }
}

impl Command {
    /// Whether the command talks to CUCM.
    pub fn needs_connection(&self) -> bool {
        match self {
            Command::Plan { .. } => false,
            Command::Site(args) => !args.dry_run,
            _ => true,
        }
    }

    /// Step, arguments and SRST address of a single-object command.
    pub fn single_object(&self) -> Option<(ProvisionStep, &ObjectArgs, Option<IpAddr>)> {
        match self {
            Command::Location(args) => Some((ProvisionStep::Location, args, None)),
            Command::Region(args) => Some((ProvisionStep::Region, args, None)),
            Command::Srst { object, srst_ip } => Some((ProvisionStep::Srst, object, Some(*srst_ip))),
            Command::DevicePool(args) => Some((ProvisionStep::DevicePool, args, None)),
            Command::RouteGroup(args) => Some((ProvisionStep::RouteGroup, args, None)),
            _ => None,
        }
    }
}

impl SiteArgs {
    pub fn site(&self) -> Result<Site, ProvisionError> {
        Site::new(&self.name, Some(self.srst_ip), self.gateway_ip)
    }
}

/// Plan for `--only`, or every step when absent.
pub fn selected_plan(only: Option<&str>) -> Result<Plan, ProvisionError> {
    match only {
        Some(list) => {
            let steps = parse_steps(list)?;
            if steps.is_empty() {
                return Err(ProvisionError::InvalidRequest("--only selects no steps".to_string()));
            }
            Ok(Plan::for_steps(&steps))
        }
        None => Ok(Plan::full()),
    }
}

pub fn load_profile(path: Option<&PathBuf>) -> Result<SiteProfile, ProvisionError> {
    match path {
        Some(path) => SiteProfile::from_file(path),
        None => Ok(SiteProfile::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site_command() {
        let cli = Cli::try_parse_from([
            "cucm-provision",
            "--host",
            "10.10.20.1",
            "site",
            "--name",
            "Ottawa",
            "--srst-ip",
            "10.1.1.1",
            "--only",
            "location,srst",
            "--halt-on-fault",
        ])
        .unwrap();

        assert_eq!(cli.overrides().cucm_address.as_deref(), Some("10.10.20.1"));
        assert!(cli.command.needs_connection());

        let Command::Site(args) = cli.command else {
            panic!("expected site command");
        };
        assert!(args.halt_on_fault);
        assert!(!args.dry_run);
        assert_eq!(args.site().unwrap().gateway_ip().unwrap().to_string(), "10.1.1.1");

        let plan = selected_plan(args.only.as_deref()).unwrap();
        assert_eq!(plan.steps, vec![ProvisionStep::Location, ProvisionStep::Srst]);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cucm-provision", "version", "--debug", "--username", "admin"])
            .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.overrides().username.as_deref(), Some("admin"));
    }

    #[test]
    fn test_dry_run_and_plan_stay_offline() {
        let dry = Cli::try_parse_from([
            "cucm-provision",
            "site",
            "--name",
            "Ottawa",
            "--srst-ip",
            "10.1.1.1",
            "--dry-run",
        ])
        .unwrap();
        assert!(!dry.command.needs_connection());

        let plan = Cli::try_parse_from(["cucm-provision", "plan"]).unwrap();
        assert!(!plan.command.needs_connection());
    }

    #[test]
    fn test_single_object_commands() {
        let cli = Cli::try_parse_from([
            "cucm-provision",
            "srst",
            "--name",
            "Ottawa",
            "--srst-ip",
            "10.1.1.1",
        ])
        .unwrap();
        let (step, args, ip) = cli.command.single_object().unwrap();
        assert_eq!(step, ProvisionStep::Srst);
        assert_eq!(args.name, "Ottawa");
        assert!(ip.is_some());

        let cli = Cli::try_parse_from(["cucm-provision", "route-group", "--name", "Ottawa"]).unwrap();
        assert_eq!(
            cli.command.single_object().map(|(s, _, _)| s),
            Some(ProvisionStep::RouteGroup)
        );
    }

    #[test]
    fn test_app_user_password_is_separate_from_login() {
        let cli = Cli::try_parse_from([
            "cucm-provision",
            "--password",
            "axl-secret",
            "app-user",
            "--userid",
            "jabber-svc",
            "--user-password",
            "user-secret",
        ])
        .unwrap();

        assert_eq!(cli.overrides().password.as_deref(), Some("axl-secret"));
        match cli.command {
            Command::AppUser {
                userid,
                user_password,
                presence_group,
            } => {
                assert_eq!(userid, "jabber-svc");
                assert_eq!(user_password, "user-secret");
                assert!(presence_group.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["cucm-provision", "srst", "--name", "Ottawa"]).is_err());
        assert!(Cli::try_parse_from([
            "cucm-provision",
            "site",
            "--name",
            "Ottawa",
            "--srst-ip",
            "not-an-ip"
        ])
        .is_err());
        assert!(matches!(
            selected_plan(Some("location,voicemail")),
            Err(ProvisionError::UnknownStep(_))
        ));
        assert!(selected_plan(Some(" , ")).is_err());
    }
}
