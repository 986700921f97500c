use std::io::{Read, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use deepmerge_codec::{decode_record, encode_record, Format};
use deepmerge_core::{Merger, Policy, PolicyOverrides};
use deepmerge_functions::Provider;
use deepmerge_types::Record;
use tracing::{debug, warn};

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Merge(args) => cmd_merge(&config, args, cli.verbose, out),
        Command::Policy(args) => cmd_policy(&config, args, out),
        Command::Functions => cmd_functions(out),
    }
}

/// Layer, later winning: defaults, config `[policy]`, each `--options`
/// document, then flags.
fn resolve_policy(config: &CliConfig, flags: &PolicyFlags) -> anyhow::Result<Policy> {
    let mut layers = vec![config.policy];
    for (i, doc) in flags.options.iter().enumerate() {
        let record = decode_record(Format::Yaml, doc)
            .with_context(|| format!("--options argument {}", i + 1))?;
        let overrides = PolicyOverrides::from_record(&record)
            .with_context(|| format!("--options argument {}", i + 1))?;
        layers.push(overrides);
    }
    layers.push(flags.overrides());
    Ok(Policy::resolve(&layers))
}

fn output_format(config: &CliConfig, flag: Option<FormatArg>) -> Format {
    flag.map(Format::from)
        .or(config.output_format)
        .unwrap_or_default()
}

/// Read one input; `-` is stdin. The format comes from the flag, then the
/// file extension, then falls back to YAML, which also accepts JSON.
fn read_input(path: &Path, flag: Option<FormatArg>) -> anyhow::Result<(Format, String)> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        text
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    let format = flag
        .map(Format::from)
        .or_else(|| Format::from_path(path))
        .unwrap_or_else(|| {
            debug!(path = %path.display(), "no format for extension, assuming YAML");
            Format::Yaml
        });
    Ok((format, text))
}

fn cmd_merge(
    config: &CliConfig,
    args: MergeArgs,
    verbose: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let stdin_inputs = args.files.iter().filter(|p| p.as_path() == Path::new("-")).count();
    if stdin_inputs > 1 {
        anyhow::bail!("standard input ('-') given {stdin_inputs} times; it can be read only once");
    }
    let policy = resolve_policy(config, &args.policy)?;
    let mut merger = Merger::new(policy);
    for (i, path) in args.files.iter().enumerate() {
        let (format, text) = read_input(path, args.input_format)?;
        let record = decode_record(format, &text).with_context(|| {
            format!("merging argument {} ({})", i + 1, path.display())
        })?;
        if record.is_empty() {
            warn!(path = %path.display(), "document is empty");
        }
        merger.push(&record);
    }

    let stats = merger.stats();
    let merged = merger.finish();
    let format = output_format(config, args.output_format);
    let text = encode_record(format, &merged)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?
        }
        None => out.write_all(text.as_bytes())?,
    }

    if verbose {
        eprintln!(
            "{} Merged {} documents ({} empty) into {} keys",
            "✓".green().bold(),
            stats.folded.to_string().bold(),
            stats.empty,
            merged.len(),
        );
    }
    Ok(())
}

fn cmd_policy(config: &CliConfig, args: PolicyArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let policy = resolve_policy(config, &args.policy)?;
    let record: Record = policy.to_record();
    let text = encode_record(output_format(config, args.output_format), &record)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

fn cmd_functions(out: &mut impl Write) -> anyhow::Result<()> {
    let provider = Provider::default();
    for def in provider.definitions() {
        writeln!(out, "{}  {}", def.name.bold(), def.summary)?;
    }
    Ok(())
}
