use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Run the enrich + generate pipeline for every prospect in a JSON
    /// file, leaving pending-approval sessions behind.
    RunProspects { prospects_path: PathBuf },
    /// Approve and send one previously generated session.
    Approve { prospect_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: PathBuf,
    pub command: CliCommand,
}

const USAGE: &str = "usage: outreach [--config <path>] (--prospects <file.json> | --approve <prospect_id>)";

pub fn parse_args() -> Result<CliArgs> {
    parse_from(env::args().skip(1))
}

fn parse_from(args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut args = args;
    let mut config_path = None;
    let mut prospects_path = None;
    let mut prospect_id = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--prospects" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --prospects"))?;
                prospects_path = Some(PathBuf::from(value));
            }
            "--approve" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --approve"))?;
                prospect_id = Some(value);
            }
            other => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
        }
    }

    let command = match (prospects_path, prospect_id) {
        (Some(prospects_path), None) => CliCommand::RunProspects { prospects_path },
        (None, Some(prospect_id)) => CliCommand::Approve { prospect_id },
        (Some(_), Some(_)) => {
            return Err(anyhow!("--prospects and --approve are mutually exclusive. {USAGE}"));
        }
        (None, None) => return Err(anyhow!(USAGE)),
    };

    Ok(CliArgs {
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./outreach.jsonc")),
        command,
    })
}
