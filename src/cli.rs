//! Command line handling for the sunrise binary
use std::str::FromStr;

use crate::config::RampConfig;
use crate::defaults;
use crate::ramp::RampError;

pub const HELP: &str = "\
Alarm Help Menu

Option        Description
-s <steps>    Total number of steps for the light ramp-up
-t <time>     Duration time in seconds for each step (-l also works)
-g <gpio>     The GPIO number attached to the lights
-d            Will print debug messages
-h            Prints this help menu
";

/// What the command line asked for
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(RampConfig),
    /// Show the help banner and don't run. Holds any options that weren't understood.
    Help { unrecognized: Vec<String> },
}

/// Parses the arguments, not including the program name.
///
/// Options start with `-` or `/` and only their first letter counts, in any case.
pub fn parse_args<I>(args: I) -> Result<Command, RampError>
where
    I: IntoIterator<Item = String>,
{
    let mut steps = defaults::num_steps();
    let mut gpio = defaults::gpio();
    let mut duration = defaults::step_duration_secs();
    let mut debug = false;
    let mut help = false;
    let mut unrecognized = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut chars = arg.chars();
        if !matches!(chars.next(), Some('-') | Some('/')) {
            continue;
        }

        match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('S') => steps = value(&mut args, &arg)?,
            Some('G') => gpio = value(&mut args, &arg)?,
            Some('D') => debug = true,
            Some('L') | Some('T') => duration = value(&mut args, &arg)?,
            Some('H') => help = true,
            _ => {
                unrecognized.push(arg.clone());
                help = true;
            }
        }
    }

    if help {
        return Ok(Command::Help { unrecognized });
    }

    Ok(Command::Run(RampConfig::new(steps, duration, gpio, debug)?))
}

fn value<T, I>(args: &mut I, flag: &str) -> Result<T, RampError>
where
    T: FromStr,
    I: Iterator<Item = String>,
{
    let raw = args
        .next()
        .ok_or_else(|| RampError::Configuration(format!("{flag} needs a value")))?;
    raw.trim()
        .parse()
        .map_err(|_| RampError::Configuration(format!("`{raw}` is not a valid value for {flag}")))
}
