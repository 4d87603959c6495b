// Entry point for the keygrind CLI
// Every command except decode needs a grind session, so I open one here,
// hand it to the workflow, and let it shut the backend down when it drops
use clap::Parser;
use keygrind::workflow::{
    decode_file, encode_file, grind_hash, grind_stamp, parse_hash_targets, parse_stamp_payload,
    run_grind_stream, stamp_chunk_bytes, stream_mask_bits,
};
use keygrind::{
    CancelToken, CandidateGenerator, Command, CpuSearcher, GrindConfig, GrindEngine, GrindError,
    Opt, Result,
};
use log::{error, warn, LevelFilter};
use std::io;
use std::process;

// Conventional status for a process stopped by SIGINT
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    let opt = Opt::parse();

    // Logs go to stderr; stdout is reserved for result lines
    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder().filter_level(level).init();

    match run_command(opt) {
        Ok(()) => {}
        Err(GrindError::Cancelled) => {
            warn!("Interrupted");
            process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            error!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run_command(opt: Opt) -> Result<()> {
    let config = opt.grind_config();
    match opt.command {
        Command::Encode { file } => {
            let mut engine = start_engine(&config)?;
            encode_file(&mut engine, &file)?;
            engine.finish();
        }
        Command::Decode { base_file } => {
            decode_file(&base_file)?;
        }
        Command::GrindStream { bits } => {
            let bits = stream_mask_bits(bits);
            let mut engine = start_engine(&config)?;
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            let summary = run_grind_stream(&mut engine, bits, stdin.lock(), &mut stdout)?;
            engine.finish();
            if summary.cancelled {
                return Err(GrindError::Cancelled);
            }
        }
        Command::GrindHash { hex } => {
            // Reject bad input before touching entropy or the backend
            let targets = parse_hash_targets(&hex)?;
            let mut engine = start_engine(&config)?;
            grind_hash(&mut engine, &targets, &mut io::stdout().lock())?;
            engine.finish();
        }
        Command::Stamp { payload, bits } => {
            stamp_chunk_bytes(bits)?;
            let payload = parse_stamp_payload(&payload)?;
            let mut engine = start_engine(&config)?;
            grind_stamp(&mut engine, &payload, bits, &mut io::stdout().lock())?;
            engine.finish();
        }
    }
    Ok(())
}

// Seed first, then build the table and bring the backend up.
// Ctrl+C during a grind stops it between batches; Ctrl+C while idle, or a
// second one, exits right away.
fn start_engine(config: &GrindConfig) -> Result<GrindEngine<CpuSearcher>> {
    let generator = CandidateGenerator::from_os_entropy()?;
    let engine = GrindEngine::start(
        CpuSearcher::with_threads(config.worker_threads),
        generator,
        config,
    )?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if handler_token.interrupt() {
            warn!("Stopping after the current batch, Ctrl+C again to quit now");
        } else {
            warn!("Interrupted");
            process::exit(EXIT_INTERRUPTED);
        }
    }) {
        warn!("Could not install Ctrl+C handler: {e}");
    }
    Ok(engine.with_cancel_token(cancel))
}
