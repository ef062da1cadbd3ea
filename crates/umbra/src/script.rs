//! Line-oriented movement scripts
//!
//! One command per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! walk 10      # forward, in world units
//! turn -90     # degrees, positive turns right
//! wait 2.5     # time-units
//! light torch  # drop a lit light at the player's feet
//! douse        # put out the last light lit
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use strum::IntoEnumIterator;
use umbra_core::light::LightType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Walk(f32),
    /// Radians
    Turn(f32),
    Wait(f32),
    Light(LightType),
    Douse,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;
        let arg = words.next();
        if let Some(extra) = words.next() {
            bail!("unexpected argument '{}'", extra);
        }

        let command = match verb.to_ascii_lowercase().as_str() {
            "walk" => Command::Walk(number(verb, arg)?),
            "turn" => Command::Turn(number(verb, arg)?.to_radians()),
            "wait" => {
                let seconds = number(verb, arg)?;
                if seconds < 0.0 {
                    bail!("wait needs a non-negative duration");
                }
                Command::Wait(seconds)
            }
            "light" => {
                let name = arg.ok_or_else(|| anyhow!("light needs a light type"))?;
                Command::Light(light_type(name)?)
            }
            "douse" => {
                if arg.is_some() {
                    bail!("douse takes no argument");
                }
                Command::Douse
            }
            other => bail!("unknown command '{}'", other),
        };
        Ok(command)
    }
}

fn number(verb: &str, arg: Option<&str>) -> Result<f32> {
    let raw = arg.ok_or_else(|| anyhow!("{} needs a number", verb))?;
    let value: f32 = raw
        .parse()
        .with_context(|| format!("{} argument '{}' is not a number", verb, raw))?;
    if !value.is_finite() {
        bail!("{} argument must be finite", verb);
    }
    Ok(value)
}

fn light_type(name: &str) -> Result<LightType> {
    LightType::iter()
        .find(|kind| kind.to_string().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            let known: Vec<String> = LightType::iter()
                .map(|k| k.to_string().to_lowercase())
                .collect();
            anyhow!("unknown light '{}' (expected one of: {})", name, known.join(", "))
        })
}

/// Parse a whole script.
pub fn parse_script(text: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let command = Command::parse(line).with_context(|| format!("line {}", index + 1))?;
        commands.push(command);
    }
    Ok(commands)
}

pub fn load_script(path: &Path) -> Result<Vec<Command>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse_script(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let script = "\
# opening
walk 4
turn 90   # face east
wait 1.5

light Torch
douse
";
        let commands = parse_script(script).expect("valid script");
        assert_eq!(commands.len(), 5);
        assert_eq!(commands[0], Command::Walk(4.0));
        assert!(matches!(commands[1], Command::Turn(r) if (r - std::f32::consts::FRAC_PI_2).abs() < 1e-6));
        assert_eq!(commands[2], Command::Wait(1.5));
        assert_eq!(commands[3], Command::Light(LightType::Torch));
        assert_eq!(commands[4], Command::Douse);
    }

    #[test]
    fn test_errors_name_the_line() {
        let err = parse_script("walk 1\nfly 3\n").expect_err("unknown verb");
        let message = format!("{:#}", err);
        assert!(message.contains("line 2"));
        assert!(message.contains("fly"));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Command::parse("walk").is_err());
        assert!(Command::parse("walk far").is_err());
        assert!(Command::parse("wait -1").is_err());
        assert!(Command::parse("light sun").is_err());
        assert!(Command::parse("douse now").is_err());
        assert!(Command::parse("turn 10 20").is_err());
    }
}
