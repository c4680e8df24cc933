//! Command-line interface definitions.

use clap::{ArgGroup, ColorChoice, Command, Parser};
use clap_complete::{Generator, Shell};
use std::io::Write;
use std::path::PathBuf;
use url::Url;

use crate::config::{DEFAULT_THEME, Features};
use crate::output::Format;

/// Default port of the live preview server
pub const DEFAULT_PORT: u16 = 8080;

/// Markdown to html with themes, math, diagrams and a live preview
#[derive(Parser, Debug, Clone)]
#[command(name = "marky", version, about, long_about = None)]
#[command(group(ArgGroup::new("input").args(["path", "string"])))]
#[command(group(ArgGroup::new("destination").args(["out", "stdout"])))]
#[command(group(ArgGroup::new("mode").args(["watch", "live", "follow"])))]
#[command(group(
    ArgGroup::new("info")
        .args(["themes", "where_config", "generator"])
        .conflicts_with_all(["input", "destination", "mode"])
))]
pub struct Cli {
    /// Read input from file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: Option<PathBuf>,

    /// Read input from string
    #[arg(long)]
    pub string: Option<String>,

    /// Theme to use
    #[arg(short, long, default_value = DEFAULT_THEME)]
    pub theme: String,

    /// Output file
    #[arg(short = 'o', long, visible_alias = "output", value_hint = clap::ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    /// Output to stdout
    #[arg(long)]
    pub stdout: bool,

    /// Enable syntax highlighting
    #[arg(short = 'H', long)]
    pub highlight: bool,

    /// Enable math rendering
    #[arg(short = 'M', long)]
    pub math: bool,

    /// Enable mermaid diagram rendering
    #[arg(short = 'D', long)]
    pub diagrams: bool,

    /// Enable all extra renderers
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Render math, diagrams and highlighting ahead of time instead of in the browser
    #[arg(short = 'R', long)]
    pub prerender: bool,

    /// Re-render the output file on save
    #[arg(short, long)]
    pub watch: bool,

    /// Live preview in the browser
    #[arg(short, long)]
    pub live: bool,

    /// Port of the live server
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Open the output in the default app
    #[arg(short = 'O', long)]
    pub open: bool,

    /// Save the document as PDF using a headless chromium
    #[arg(short, long)]
    pub pdf: bool,

    /// Mirror a running live server into the output file
    #[arg(long, value_name = "URL", value_hint = clap::ValueHint::Url)]
    pub follow: Option<Url>,

    /// List available themes
    #[arg(long)]
    pub themes: bool,

    /// Print config path
    #[arg(long)]
    pub where_config: bool,

    /// Print shell completions
    #[arg(long = "completion", value_enum, value_name = "SHELL")]
    pub generator: Option<Shell>,

    /// Enable verbose output for debugging
    #[arg(long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    pub const fn features(&self) -> Features {
        Features {
            highlight: self.all || self.highlight,
            math: self.all || self.math,
            diagrams: self.all || self.diagrams,
        }
    }

    pub fn format(&self) -> Format {
        match (&self.out, self.pdf) {
            (_, true) => Format::Pdf,
            (Some(out), false) => Format::from_path(out),
            (None, false) => Format::Html,
        }
    }

    /// `--out`, else the input path with the format's extension, else
    /// `out.<ext>` in the working directory.
    pub fn output_path(&self) -> PathBuf {
        let extension = self.format().extension();
        if let Some(out) = &self.out {
            out.clone()
        } else if let Some(path) = &self.path {
            path.with_extension(extension)
        } else {
            PathBuf::from("out").with_extension(extension)
        }
    }
}

/// Write the completion script for `cmd` to `out`.
pub fn print_completions<G: Generator>(generator: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_owned();
    clap_complete::generate(generator, cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("marky").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["notes.md"]);
        assert_eq!(cli.theme, DEFAULT_THEME);
        assert_eq!(cli.port, DEFAULT_PORT);
        assert_eq!(cli.features(), Features::default());
        assert_eq!(cli.format(), Format::Html);
    }

    #[test]
    fn test_all_enables_every_feature() {
        assert_eq!(parse(&["-A", "a.md"]).features(), Features::all());
        let cli = parse(&["-H", "-M", "a.md"]);
        assert!(cli.features().highlight && cli.features().math);
        assert!(!cli.features().diagrams);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(parse(&["docs/a.md"]).output_path(), PathBuf::from("docs/a.html"));
        assert_eq!(parse(&["-p", "docs/a.md"]).output_path(), PathBuf::from("docs/a.pdf"));
        assert_eq!(parse(&["--string", "# x"]).output_path(), PathBuf::from("out.html"));
        assert_eq!(parse(&["-o", "b.html", "a.md"]).output_path(), PathBuf::from("b.html"));
    }

    #[test]
    fn test_pdf_from_output_extension() {
        assert_eq!(parse(&["-o", "b.pdf", "a.md"]).format(), Format::Pdf);
    }

    #[test]
    fn test_conflicts() {
        let fails = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("marky").chain(args.iter().copied())).is_err()
        };
        assert!(fails(&["a.md", "--string", "x"]));
        assert!(fails(&["a.md", "-o", "b.html", "--stdout"]));
        assert!(fails(&["a.md", "-w", "-l"]));
        assert!(fails(&["a.md", "--themes"]));
        assert!(!fails(&["--themes"]));
    }

    #[test]
    fn test_follow_url() {
        let cli = parse(&["--follow", "http://localhost:8080/", "-o", "mirror.html"]);
        assert_eq!(cli.follow.unwrap().port(), Some(8080));
    }

    #[test]
    fn test_completion_shell() {
        assert_eq!(parse(&["--completion", "zsh"]).generator, Some(Shell::Zsh));
        assert_eq!(parse(&["notes.md"]).generator, None);
        assert!(Cli::try_parse_from(["marky", "--completion", "tcsh"]).is_err());
        assert!(Cli::try_parse_from(["marky", "--completion", "bash", "a.md"]).is_err());
    }

    #[test]
    fn test_print_completions() {
        let mut out = Vec::new();
        print_completions(Shell::Bash, &mut Cli::command(), &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("marky"));
        assert!(script.contains("--where-config"));
    }
}
