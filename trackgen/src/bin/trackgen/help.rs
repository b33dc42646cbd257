//! Long-help decoration: per-command examples, the environment appendix, and clap styles.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Color as ClapColor, Style};
use clap::{ColorChoice, Command};
use colored::control::ShouldColorize;
use colored::{Color, Colorize};

use crate::commands::{generate, inspect};
use crate::theme::{GLYPHS, PALETTE};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

const COMMAND_EXAMPLES: &[(&str, &[ExampleGroup])] = &[("generate", generate::EXAMPLES), ("inspect", inspect::EXAMPLES)];

const ENVIRONMENT: &[(&str, &str)] = &[("RUST_LOG", "Log filter, overrides --verbose and --quiet")];

const CONFIG_TIP: &str = "Settings can live in trackgen.toml next to Cargo.toml under [generate].";

pub struct HelpPainter {
    color: bool,
}

impl HelpPainter {
    pub fn detect() -> Self {
        Self {
            color: ShouldColorize::from_env().should_colorize(),
        }
    }

    /// Attach styles, the appendix and every subcommand's examples.
    pub fn decorate(&self, command: Command) -> Command {
        let mut command = command
            .color(if self.color { ColorChoice::Auto } else { ColorChoice::Never })
            .styles(styles())
            .after_long_help(self.appendix());
        for (name, groups) in COMMAND_EXAMPLES {
            let examples = self.examples(groups);
            command = command.mut_subcommand(name, |subcommand| subcommand.after_long_help(examples));
        }
        command
    }

    fn examples(&self, groups: &[ExampleGroup]) -> String {
        let mut sections = Vec::with_capacity(groups.len());
        for group in groups {
            let mut lines = vec![format!("  {}", self.paint(group.title, PALETTE.title, true))];
            lines.extend(group.commands.iter().map(|command| {
                format!(
                    "    {} {}",
                    self.paint(GLYPHS.arrow, PALETTE.command, false),
                    self.paint(command, PALETTE.command, false)
                )
            }));
            sections.push(lines.join("\n"));
        }
        format!("{}\n{}\n", self.paint("Examples:", PALETTE.section, true), sections.join("\n\n"))
    }

    fn appendix(&self) -> String {
        let variables: Vec<String> = ENVIRONMENT
            .iter()
            .map(|(key, description)| {
                format!(
                    "  {}  {}",
                    self.paint(key, PALETTE.env_key, true),
                    self.paint(description, PALETTE.env_text, false)
                )
            })
            .collect();
        format!(
            "{}\n{}\n\n{} {}\n",
            self.paint("Environment Variables:", PALETTE.section, true),
            variables.join("\n"),
            self.paint("Tip:", PALETTE.section, true),
            self.paint(CONFIG_TIP, PALETTE.command, false)
        )
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        match (self.color, bold) {
            (false, _) => text.to_string(),
            (true, true) => text.color(color).bold().to_string(),
            (true, false) => text.color(color).to_string(),
        }
    }
}

fn styles() -> Styles {
    let style = |color: Color| Style::new().fg_color(Some(ClapColor::Ansi(ansi(color))));
    Styles::styled()
        .usage(style(PALETTE.title).bold())
        .header(style(PALETTE.section).bold())
        .literal(style(PALETTE.command))
        .placeholder(style(PALETTE.dim))
        .valid(style(PALETTE.written))
        .invalid(style(PALETTE.warning))
        .error(style(PALETTE.failure).bold())
}

fn ansi(color: Color) -> AnsiColor {
    match color {
        Color::Red => AnsiColor::Red,
        Color::Green => AnsiColor::Green,
        Color::Yellow => AnsiColor::Yellow,
        Color::Blue => AnsiColor::Blue,
        Color::Magenta => AnsiColor::Magenta,
        Color::Cyan => AnsiColor::Cyan,
        Color::BrightBlack => AnsiColor::BrightBlack,
        Color::BrightBlue => AnsiColor::BrightBlue,
        Color::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    }
}
