//! One-shot rendering and the pieces every mode shares.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use humansize::{DECIMAL, format_size};

use super::Cli;
use crate::config::{RenderConfig, Themes, paths};
use crate::document::Document;
use crate::output::{self, OutputOptions, Target};
use crate::preview::{Capabilities, native};
use crate::{debug, log};

/// Theme and features selected on the command line.
pub fn render_config(cli: &Cli) -> Result<RenderConfig> {
    let themes = Themes::load(&paths::config_dir())?;
    let theme = themes.find(&cli.theme)?;
    let theme_css = theme.resolve()?;

    let features = cli.features();
    debug!("config"; "theme {}, features {:?}", theme.name, features);

    Ok(RenderConfig {
        theme_css,
        features,
        prerender: cli.prerender,
        live: false,
    })
}

/// Output target and format, with native capabilities when pre-rendering.
pub fn output_options(cli: &Cli, config: RenderConfig) -> OutputOptions {
    let target = if cli.stdout {
        Target::Stdout
    } else {
        Target::File(cli.output_path())
    };
    let mut options = OutputOptions {
        target,
        format: cli.format(),
        config,
        capabilities: Capabilities::none(),
    };
    if options.prerenders() {
        options.capabilities = native::detect(options.config.features);
        debug!("render"; "native capabilities: {}", options.capabilities.summary());
    }
    options
}

/// Where the markdown comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Path,
    String,
}

/// Piped stdin wins over `PATH`, which wins over `--string`.
pub fn input_source(cli: &Cli, stdin_piped: bool) -> Option<InputSource> {
    if stdin_piped {
        Some(InputSource::Stdin)
    } else if cli.path.is_some() {
        Some(InputSource::Path)
    } else if cli.string.is_some() {
        Some(InputSource::String)
    } else {
        None
    }
}

pub fn read_input(cli: &Cli) -> Result<String> {
    let stdin = std::io::stdin();
    match input_source(cli, !stdin.is_terminal()) {
        Some(InputSource::Stdin) => read_stdin(stdin),
        Some(InputSource::Path) => match &cli.path {
            Some(path) => read_path(path),
            None => bail!("no input path"),
        },
        Some(InputSource::String) => Ok(cli.string.clone().unwrap_or_default()),
        None => bail!("no input is given, see --help"),
    }
}

fn read_stdin(mut stdin: std::io::Stdin) -> Result<String> {
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok(text)
}

fn read_path(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Render once and write the result.
pub fn render_once(cli: &Cli, config: RenderConfig) -> Result<()> {
    let started = Instant::now();
    let document = Document::new(read_input(cli)?);
    let options = output_options(cli, config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;
    let bytes = runtime.block_on(output::write(&document, &options))?;
    let elapsed = started.elapsed().as_millis();

    match &options.target {
        Target::Stdout => log!("render"; "took {}ms", elapsed),
        Target::File(path) => {
            log!("render"; "wrote {} to {} in {}ms", format_size(bytes, DECIMAL), path.display(), elapsed);
            if cli.open {
                output::open(&path.display().to_string())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("marky").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_input_precedence() {
        let path = parse(&["a.md"]);
        assert_eq!(input_source(&path, true), Some(InputSource::Stdin));
        assert_eq!(input_source(&path, false), Some(InputSource::Path));

        let string = parse(&["--string", "# x"]);
        assert_eq!(input_source(&string, false), Some(InputSource::String));

        assert_eq!(input_source(&parse(&[]), false), None);
    }

    #[test]
    fn test_output_options_stdout() {
        let cli = parse(&["--stdout", "a.md"]);
        let options = output_options(&cli, RenderConfig::default());
        assert_eq!(options.target, Target::Stdout);
        assert!(options.capabilities.math.is_none());
    }

    #[test]
    fn test_output_options_prerender_detects_math() {
        let cli = parse(&["-M", "-R", "a.md"]);
        let config = RenderConfig {
            features: cli.features(),
            prerender: cli.prerender,
            ..RenderConfig::default()
        };
        let options = output_options(&cli, config);
        assert_eq!(options.target, Target::File("a.html".into()));
        assert!(options.capabilities.math.is_some());
    }
}
