//! readio — 书籍旁白命令行工具：脚本分块、语音目录查看、语音合成与推荐
//!
//! Usage:
//!   readio chunk <file> [--max N]                          Show how a script is chunked
//!   readio voices [--config <path>] [--remote]             List voice styles
//!   readio synthesize <file> [--style S] [--mode M] [--providers P,..] [--out DIR]
//!   readio recommend <label>... [--style S] [--providers P,..] [--out DIR]

use anyhow::{anyhow, bail, Context};
use readio::books::OpenLibraryClient;
use readio::llm::ChatClient;
use readio::tts::{registry_from_settings, PollyProvider};
use readio::{
    chunker, AudioOutput, NarrationPipeline, ProviderId, Settings, SpeechSynthesizer,
    SynthesisResult, VoiceCatalog,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "chunk" => cmd_chunk(&args[2..]),
        "voices" => cmd_voices(&args[2..]).await,
        "synthesize" => cmd_synthesize(&args[2..]).await,
        "recommend" => cmd_recommend(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"readio — 书籍推荐旁白命令行工具

USAGE:
    readio <COMMAND> [OPTIONS]

COMMANDS:
    chunk <file> [--max N]                  Split a script into synthesis chunks
    voices [--config <path>]                List voice styles and their voices
    voices --remote [--language L] [--engine E]
                                            List voices Amazon Polly offers
    synthesize <file> [--style S] [--mode fallback|segments] [--providers P,..] [--out DIR]
                                            Synthesize a script
    recommend <label>... [--style S] [--providers P,..] [--out DIR]
                                            Recommend a book and narrate it
    version                                 Show version information
    help                                    Show this help message

ENVIRONMENT:
    READIO_VOICE_CONFIG         Voice catalog YAML (default: builtin)
    READIO_TTS_TIMEOUT_SECS     Per-provider call timeout
    READIO_MAX_CHUNK_LENGTH     Chunk length bound for segmented synthesis
    PLAYHT_API_KEY              Enables the PlayHT provider
    ELEVENLABS_API_KEY          Enables the ElevenLabs provider
    AWS_REGION                  Region for Amazon Polly
    LLAMA4_API_KEY              Key for the chat-completions endpoint
    RUST_LOG                    Log filter (default: info)"#
    );
}

fn cmd_version() {
    println!("readio {}", env!("CARGO_PKG_VERSION"));
}

/// Value following `--name`, if present.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if arg.starts_with("--") {
            skip = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

fn read_script(args: &[String]) -> anyhow::Result<String> {
    let file = positionals(args)
        .first()
        .copied()
        .ok_or_else(|| anyhow!("missing script file"))?;
    let text = if file == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading stdin")?
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {file}"))?
    };
    Ok(text)
}

fn cmd_chunk(args: &[String]) -> anyhow::Result<()> {
    let script = read_script(args)?;
    let max = match flag_value(args, "--max") {
        Some(v) => v.parse().with_context(|| format!("invalid --max value '{v}'"))?,
        None => Settings::from_env().synthesis.max_chunk_length,
    };
    let chunks = chunker::chunk(&script, max);
    println!("{} chunk(s), bound {max}", chunks.len());
    for (i, c) in chunks.iter().enumerate() {
        println!("  [{i:>3}] ({:>3} chars) {c}", c.chars().count());
    }
    Ok(())
}

fn load_catalog(args: &[String]) -> anyhow::Result<VoiceCatalog> {
    let catalog = match flag_value(args, "--config") {
        Some(path) => VoiceCatalog::from_path(path)?,
        None => VoiceCatalog::from_env()?,
    };
    Ok(catalog)
}

async fn cmd_voices(args: &[String]) -> anyhow::Result<()> {
    if has_flag(args, "--remote") {
        return cmd_remote_voices(args).await;
    }
    let catalog = load_catalog(args)?;
    let order: Vec<&str> = catalog.providers().iter().map(|p| p.as_str()).collect();
    println!("Fallback order:   {}", order.join(" → "));
    println!("Segment provider: {}", catalog.segment_provider());
    println!("Default style:    {}", catalog.default_style());
    println!();
    for (name, style) in catalog.styles() {
        let marker = if name == catalog.default_style() { " (default)" } else { "" };
        match &style.display_name {
            Some(display) => println!("{name}{marker} — {display}"),
            None => println!("{name}{marker}"),
        }
        if let Some(desc) = &style.description {
            println!("    {desc}");
        }
        for (provider, voice) in &style.voices {
            let engine = voice.engine.as_deref().unwrap_or("-");
            println!("    {:<11} {:<28} engine={engine}", provider.as_str(), voice.voice_id.as_str());
        }
    }
    Ok(())
}

async fn cmd_remote_voices(args: &[String]) -> anyhow::Result<()> {
    let language = flag_value(args, "--language").unwrap_or("en-US");
    let engine = flag_value(args, "--engine").unwrap_or("neural");
    let settings = Settings::from_env();
    let polly = PollyProvider::from_region(settings.aws_region.clone()).await;
    let voices = polly.available_voices(language, engine).await?;

    println!("{} Polly voice(s) for {language} on {engine}", voices.len());
    for voice in &voices {
        println!(
            "    {:<12} {:<7} {:<8} engines={}",
            voice.id,
            voice.gender.as_deref().unwrap_or("-"),
            voice.language_code.as_deref().unwrap_or("-"),
            voice.supported_engines.join(",")
        );
    }
    Ok(())
}

/// Providers named by `--providers playht,polly`, if given.
fn provider_filter(args: &[String]) -> anyhow::Result<Option<Vec<ProviderId>>> {
    let Some(list) = flag_value(args, "--providers") else {
        return Ok(None);
    };
    let ids = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<ProviderId>)
        .collect::<readio::Result<Vec<_>>>()?;
    if ids.is_empty() {
        bail!("--providers needs at least one provider");
    }
    Ok(Some(ids))
}

async fn build_synthesizer(args: &[String], settings: &Settings) -> anyhow::Result<SpeechSynthesizer> {
    let registry = registry_from_settings(settings).await?;
    let mut available = registry.ids();
    if let Some(wanted) = provider_filter(args)? {
        available.retain(|id| wanted.contains(id));
    }
    let catalog = load_catalog(args)?.retain_providers(&available)?;
    let synthesizer = SpeechSynthesizer::new(Arc::new(catalog), registry, settings.synthesis.clone())?;
    Ok(synthesizer)
}

async fn cmd_synthesize(args: &[String]) -> anyhow::Result<()> {
    let script = read_script(args)?;
    let settings = Settings::from_env();
    let synthesizer = build_synthesizer(args, &settings).await?;
    let style = flag_value(args, "--style");

    let result = match flag_value(args, "--mode").unwrap_or("fallback") {
        "fallback" => synthesizer.synthesize(script.trim(), style).await,
        "segments" => synthesizer.synthesize_segments(&script, style).await,
        other => bail!("unknown mode '{other}' (expected fallback or segments)"),
    };
    report(&result, flag_value(args, "--out").map(PathBuf::from))
}

async fn cmd_recommend(args: &[String]) -> anyhow::Result<()> {
    let labels: Vec<String> = positionals(args).into_iter().map(str::to_string).collect();
    let settings = Settings::from_env();
    let synthesizer = Arc::new(build_synthesizer(args, &settings).await?);

    let mut chat = ChatClient::builder().http_config(settings.http.clone());
    if let Some(base) = &settings.llm_base_url {
        chat = chat.base_url(base.clone());
    }
    if let Some(key) = &settings.llm_api_key {
        chat = chat.api_key(key.clone());
    }
    if let Some(model) = &settings.llm_model {
        chat = chat.model(model.clone());
    }
    let books = OpenLibraryClient::builder()
        .http_config(settings.http.clone())
        .build()?;

    let pipeline = NarrationPipeline::new(Arc::new(books), Arc::new(chat.build()?), synthesizer);
    let outcome = pipeline.run(&labels, flag_value(args, "--style")).await?;

    println!("Recommendation: {}", outcome.recommendation);
    println!("Script:         {}", outcome.script);
    println!("Candidates:     {}", outcome.candidate_count);
    println!();
    report(&outcome.synthesis, flag_value(args, "--out").map(PathBuf::from))
}

/// Print the result; with `out`, write byte segments to files instead of inlining them.
fn report(result: &SynthesisResult, out: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(dir) = out {
        std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        for segment in &result.segments {
            match &segment.audio {
                AudioOutput::Bytes { data, format } => {
                    let path = segment_path(&dir, segment.index, format.extension());
                    std::fs::write(&path, data)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("segment {} → {}", segment.index, path.display());
                }
                AudioOutput::Url { url } => println!("segment {} → {url}", segment.index),
            }
        }
        println!(
            "success={} provider={} total={:.1}s",
            result.success,
            result
                .provider_used
                .map(|p| p.as_str())
                .unwrap_or("none"),
            result.total_duration_seconds
        );
        if let Some(err) = &result.error {
            println!("error: {} {}", err.kind, err.message.as_deref().unwrap_or(""));
        }
    } else {
        println!("{}", serde_json::to_string_pretty(result)?);
    }
    if !result.success {
        bail!("synthesis failed");
    }
    Ok(())
}

fn segment_path(dir: &Path, index: usize, extension: &str) -> PathBuf {
    dir.join(format!("segment_{index:03}.{extension}"))
}
