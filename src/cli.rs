use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "reelgrid", version, about = "Responsive portfolio video grid planner")]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/reelgrid/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the grid plan for a viewport
    Plan {
        #[arg(long)]
        width: u32,
        /// Treat the device as touch-capable
        #[arg(long)]
        touch: bool,
        #[arg(long)]
        json: bool,
    },
    /// Replay an interaction script against the grid
    Simulate {
        /// Initial viewport width
        #[arg(long, default_value_t = 1200)]
        width: u32,
        /// Initial touch capability
        #[arg(long)]
        touch: bool,
        /// Steps: resize:<W>, touch:on|off, view, enter:<i>, leave:<i>, tap:<i>,
        /// catalog:<id,id,..>, settle
        #[arg(long = "step", value_name = "STEP")]
        steps: Vec<Step>,
        /// Really open tapped videos instead of only logging them
        #[arg(long)]
        open: bool,
        #[arg(long)]
        json: bool,
    },
    /// List the configured catalog
    Catalog,
}

/// One scripted input for `simulate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Resize(u32),
    Touch(bool),
    View,
    Enter(usize),
    Leave(usize),
    Tap(usize),
    /// Replace the catalog with these ids, in order.
    Catalog(Vec<String>),
    Settle,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepParseError {
    #[error("unknown step `{0}`")]
    Unknown(String),
    #[error("step `{0}` needs an argument")]
    MissingArgument(String),
    #[error("invalid argument `{arg}` for step `{step}`")]
    InvalidArgument { step: String, arg: String },
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        let invalid = |arg: &str| StepParseError::InvalidArgument {
            step: name.to_string(),
            arg: arg.to_string(),
        };
        let required = || arg.ok_or_else(|| StepParseError::MissingArgument(name.to_string()));

        match name {
            "view" => Ok(Self::View),
            "settle" => Ok(Self::Settle),
            "resize" => {
                let arg = required()?;
                arg.parse().map(Self::Resize).map_err(|_| invalid(arg))
            }
            "touch" => match required()? {
                "on" => Ok(Self::Touch(true)),
                "off" => Ok(Self::Touch(false)),
                other => Err(invalid(other)),
            },
            "catalog" => {
                let ids: Vec<String> = required()?
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect();
                Ok(Self::Catalog(ids))
            }
            "enter" | "leave" | "tap" => {
                let arg = required()?;
                let index: usize = arg.parse().map_err(|_| invalid(arg))?;
                Ok(match name {
                    "enter" => Self::Enter(index),
                    "leave" => Self::Leave(index),
                    _ => Self::Tap(index),
                })
            }
            _ => Err(StepParseError::Unknown(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!("resize:600".parse(), Ok(Step::Resize(600)));
        assert_eq!("touch:on".parse(), Ok(Step::Touch(true)));
        assert_eq!("touch:off".parse(), Ok(Step::Touch(false)));
        assert_eq!("view".parse(), Ok(Step::View));
        assert_eq!("enter:2".parse(), Ok(Step::Enter(2)));
        assert_eq!("leave: 2".parse(), Ok(Step::Leave(2)));
        assert_eq!("tap:0".parse(), Ok(Step::Tap(0)));
        assert_eq!("settle".parse(), Ok(Step::Settle));
        assert_eq!(
            "catalog:a, b,c".parse(),
            Ok(Step::Catalog(vec!["a".into(), "b".into(), "c".into()]))
        );
        assert_eq!("catalog:".parse(), Ok(Step::Catalog(Vec::new())));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "jump".parse::<Step>(),
            Err(StepParseError::Unknown("jump".into()))
        );
        assert_eq!(
            "resize".parse::<Step>(),
            Err(StepParseError::MissingArgument("resize".into()))
        );
        assert_eq!(
            "enter:x".parse::<Step>(),
            Err(StepParseError::InvalidArgument {
                step: "enter".into(),
                arg: "x".into()
            })
        );
        assert!("touch:maybe".parse::<Step>().is_err());
    }

    #[test]
    fn test_cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "reelgrid",
            "simulate",
            "--width",
            "900",
            "--step",
            "view",
            "--step",
            "enter:1",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Simulate { width, steps, .. } => {
                assert_eq!(width, 900);
                assert_eq!(steps, vec![Step::View, Step::Enter(1)]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_bad_step() {
        assert!(Cli::try_parse_from(["reelgrid", "simulate", "--step", "fly"]).is_err());
    }
}
