//! Shell command parsing.

use anyhow::{Context, Result, anyhow, bail};

use bitflip_engine::{AppearanceChange, ColourSlot, UserId};
use bitflip_types::{
    BorderStyle, BorderThickness, Colour, FillStyle, RawAppearance, ShadowStyle, StripeDirection,
    StripeThickness,
};

pub const HELP: &str = "\
commands:
  flip                              toggle the bit
  fill <solid|gradient|stripes|pattern>
  fill-colour <primary|secondary> <#rrggbb>
  stripe-direction <horizontal|vertical|diagonal>
  stripe-thickness <thin|medium|thick>
  border <none|solid|pattern>
  border-thickness <none|thin|medium|thick>
  border-colour <primary|secondary> <#rrggbb>
  shadow <none|soft|hard|grounded>
  shadow-colour <#rrggbb>
  replace <json>                    replace the whole appearance
  show                              print the current profile view
  resync                            reload the stored profile
  sign-in <user> | sign-out
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Flip,
    Change(AppearanceChange),
    Show,
    Resync,
    SignIn(UserId),
    SignOut,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match name {
            "" => return Ok(None),
            "flip" => Self::Flip,
            "show" => Self::Show,
            "resync" => Self::Resync,
            "sign-out" => Self::SignOut,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "sign-in" => Self::SignIn(UserId::new(single(&args, name)?)?),
            "fill" => Self::Change(AppearanceChange::FillStyle(keyword(
                &args,
                name,
                FillStyle::parse,
            )?)),
            "fill-colour" | "fill-color" => {
                let (slot, colour) = slot_and_colour(&args, name)?;
                Self::Change(AppearanceChange::FillColour(slot, colour))
            }
            "stripe-direction" => Self::Change(AppearanceChange::FillStripeDirection(keyword(
                &args,
                name,
                StripeDirection::parse,
            )?)),
            "stripe-thickness" => Self::Change(AppearanceChange::FillStripeThickness(keyword(
                &args,
                name,
                StripeThickness::parse,
            )?)),
            "border" => Self::Change(AppearanceChange::BorderStyle(keyword(
                &args,
                name,
                BorderStyle::parse,
            )?)),
            "border-thickness" => Self::Change(AppearanceChange::BorderThickness(keyword(
                &args,
                name,
                BorderThickness::parse,
            )?)),
            "border-colour" | "border-color" => {
                let (slot, colour) = slot_and_colour(&args, name)?;
                Self::Change(AppearanceChange::BorderColour(slot, colour))
            }
            "shadow" => Self::Change(AppearanceChange::ShadowStyle(keyword(
                &args,
                name,
                ShadowStyle::parse,
            )?)),
            "shadow-colour" | "shadow-color" => Self::Change(AppearanceChange::ShadowColour(
                Colour::parse(single(&args, name)?)?,
            )),
            "replace" => {
                let raw: RawAppearance = serde_json::from_str(rest)
                    .with_context(|| format!("{name}: expected appearance JSON"))?;
                Self::Change(AppearanceChange::Replace(raw))
            }
            other => bail!("unknown command `{other}` (try `help`)"),
        };
        Ok(Some(command))
    }
}

fn single<'a>(args: &[&'a str], name: &str) -> Result<&'a str> {
    match args {
        [value] => Ok(*value),
        _ => bail!("{name}: expected exactly one argument"),
    }
}

fn keyword<T>(args: &[&str], name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    let raw = single(args, name)?;
    parse(raw).ok_or_else(|| anyhow!("{name}: unknown value `{raw}`"))
}

fn slot_and_colour(args: &[&str], name: &str) -> Result<(ColourSlot, Colour)> {
    let [slot, colour] = args else {
        bail!("{name}: expected <primary|secondary> <#rrggbb>");
    };
    let slot = match *slot {
        "primary" => ColourSlot::Primary,
        "secondary" => ColourSlot::Secondary,
        other => bail!("{name}: unknown slot `{other}`"),
    };
    Ok((slot, Colour::parse(colour)?))
}
