use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use laserdmx_core::modes::{
    Feature, Gallery, HorizontalMovement, LampMode, Laser, ModeInfo, ModeRequest, PatternRotation,
    PatternSize, PatternZoom, VerticalMovement,
};
use laserdmx_core::{
    ChannelArray, ChannelError, ChannelState, EncodeError, MemoryTransport, PacketError, PortInfo,
    SerialTransport, Session, SessionError, Transport, TransportError, available_ports,
    build_packet, find_dmx_port, parse_packet,
};
use serde::Serialize;
use tracing::{debug, info};

mod logging;
mod script;
mod settings;

const EXAMPLES: &str = "Examples:\n  laserdmx ports\n  laserdmx modes pattern_zoom\n  laserdmx set lamp_mode dynamic_sound\n  laserdmx set pattern_zoom zoom_in --laser 2 --value 145 --dry-run\n  laserdmx apply show.toml --port /dev/ttyUSB0\n  laserdmx decode 00640000";

#[derive(Parser, Debug)]
#[command(name = "laserdmx")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LASERDMX_BUILD_COMMIT"),
    " ",
    env!("LASERDMX_BUILD_DATE"),
    ")"
))]
#[command(
    about = "Drive a two-laser DMX512 projector over a USB-DMX serial interface.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List serial ports and mark the one auto-detection would pick.
    Ports {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// List features, their channels and mode ranges.
    Modes {
        /// Only show this feature
        feature: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one feature and send the resulting packet.
    ///
    /// Channels the feature does not touch come from --state or
    /// --state-file, and are zero otherwise.
    #[command(
        after_help = "Examples:\n  laserdmx set strobe on\n  laserdmx set pattern_select --laser 2 --value 12\n  laserdmx set node_expansion --value 40 --delay 10\n  laserdmx set gallery animation --dry-run\n  laserdmx set strobe on --state-file show.hex"
    )]
    Set {
        /// Feature name (see `laserdmx modes`)
        feature: String,

        /// Mode name; omitted for raw-valued features
        mode: Option<String>,

        /// Laser (1 or 2) for duplicated features
        #[arg(long, default_value = "1", value_parser = parse_laser)]
        laser: Laser,

        /// Explicit value inside the mode's range, or the raw value
        #[arg(long)]
        value: Option<u16>,

        /// Delay written by node_expansion while gradual drawing is dynamic
        #[arg(long)]
        delay: Option<u16>,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run the `[[step]]` entries of a TOML script in one session.
    Apply {
        /// Path to the script
        script: PathBuf,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Switch the lamp off; other channels keep the starting state.
    Blackout {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Zero every channel and send.
    Reset {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode a hex-encoded packet and print its channel values.
    Decode {
        /// Packet bytes as hex, start code included
        hex: String,

        /// Print the channel values as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play the demonstration sequence.
    Demo {
        /// Pause between steps in milliseconds
        #[arg(long, default_value_t = 1_000)]
        step_delay_ms: u64,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct ConnectionArgs {
    /// Serial port; auto-detected when omitted
    #[arg(long)]
    port: Option<String>,

    /// Session settings (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of channels in the array (1..=512)
    #[arg(long)]
    channels: Option<usize>,

    /// Send to memory instead of a port and print the final packet as hex
    #[arg(long)]
    dry_run: bool,

    /// Start from this packet (hex, start code included) instead of zeros
    #[arg(long, value_name = "HEX", conflicts_with = "state_file")]
    state: Option<String>,

    /// Start from the packet saved in this file, if any, and save the final
    /// packet back to it
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the JSON state report to stdout
    #[arg(long)]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "stdout")]
    pretty: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Ports { json } => cmd_ports(json),
        Commands::Modes { feature, json } => cmd_modes(feature.as_deref(), json),
        Commands::Set {
            feature,
            mode,
            laser,
            value,
            delay,
            connection,
            output,
        } => cmd_set(
            &feature,
            mode.as_deref(),
            laser,
            value,
            delay,
            &connection,
            &output,
        ),
        Commands::Apply {
            script,
            connection,
            output,
        } => cmd_apply(&script, &connection, &output),
        Commands::Blackout { connection, output } => cmd_blackout(&connection, &output),
        Commands::Reset { connection, output } => cmd_reset(&connection, &output),
        Commands::Decode { hex, json } => cmd_decode(&hex, json),
        Commands::Demo {
            step_delay_ms,
            connection,
            output,
        } => cmd_demo(step_delay_ms, &connection, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        self.message = format!("{prefix}: {}", self.message);
        self
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<EncodeError> for CliError {
    fn from(err: EncodeError) -> Self {
        let hint = encode_hint(&err);
        CliError::new(err.to_string(), hint)
    }
}

impl From<ChannelError> for CliError {
    fn from(err: ChannelError) -> Self {
        let hint = channel_hint(&err);
        CliError::new(err.to_string(), hint)
    }
}

impl From<TransportError> for CliError {
    fn from(err: TransportError) -> Self {
        let hint = transport_hint(&err);
        CliError::new(err.to_string(), hint)
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Channel(err) => err.into(),
            SessionError::Encode(err) => err.into(),
            SessionError::Transport(err) => err.into(),
        }
    }
}

impl From<PacketError> for CliError {
    fn from(err: PacketError) -> Self {
        let hint = match err {
            PacketError::InvalidStartCode { .. } => {
                Some("DMX512 level packets start with 00".to_string())
            }
            PacketError::TooShort { .. } => {
                Some("pass the start code followed by at least one channel".to_string())
            }
            PacketError::TooLong { .. } => Some("a universe carries at most 512 channels".to_string()),
        };
        CliError::new(err.to_string(), hint)
    }
}

fn encode_hint(err: &EncodeError) -> Option<String> {
    match err {
        EncodeError::UnknownMode { feature, .. } => {
            Some(format!("run 'laserdmx modes {feature}' to list its modes"))
        }
        EncodeError::UnknownFeature { .. } => {
            Some("run 'laserdmx modes' to list features".to_string())
        }
        EncodeError::ValueOutOfRange { lo, hi, .. } => {
            Some(format!("pass a --value between {lo} and {hi}"))
        }
        EncodeError::MissingRequiredValue { feature, what, .. } => Some(match *what {
            "mode" => format!("name a mode; run 'laserdmx modes {feature}' to list them"),
            what if what.starts_with("delay") => "pass --delay".to_string(),
            _ => "pass --value".to_string(),
        }),
        EncodeError::PreconditionNotMet { channel, .. } => Some(format!(
            "set channel {channel} to a non-zero value first (node_expansion)"
        )),
        EncodeError::Channel(err) => channel_hint(err),
    }
}

fn channel_hint(err: &ChannelError) -> Option<String> {
    match err {
        ChannelError::OutOfRange {
            value: Some(value), ..
        } if *value > 255 => Some("channel values are 0..=255".to_string()),
        ChannelError::OutOfRange { channels, .. } => Some(format!(
            "channels are 1..={channels}; raise --channels to address more"
        )),
        ChannelError::InvalidChannelCount { .. } => {
            Some("use --channels between 1 and 512".to_string())
        }
    }
}

fn transport_hint(err: &TransportError) -> Option<String> {
    match err {
        TransportError::NoPortFound => Some(
            "connect the USB-DMX interface or pass --port; 'laserdmx ports' lists candidates"
                .to_string(),
        ),
        TransportError::Open { .. } => {
            Some("check the port name and that no other program holds it".to_string())
        }
        TransportError::Discovery(_) => Some("pass --port explicitly".to_string()),
        TransportError::Io(_) | TransportError::Closed => {
            Some("check the interface is still connected".to_string())
        }
    }
}

fn parse_laser(value: &str) -> Result<Laser, String> {
    let number: u8 = value
        .parse()
        .map_err(|_| format!("invalid laser '{value}': must be 1 or 2"))?;
    Laser::try_from(number)
}

type CliSession = Session<Box<dyn Transport>>;

fn open_session(connection: &ConnectionArgs) -> Result<CliSession, CliError> {
    let mut config = settings::load(connection.config.as_deref())?;
    if let Some(port) = &connection.port {
        config.serial.port = Some(port.clone());
    }
    if let Some(channels) = connection.channels {
        config.channels = channels;
    }
    debug!(?config, "session settings");

    let state = match starting_state(connection)? {
        Some(snapshot) => {
            if let Some(channels) = connection.channels.filter(|c| *c != snapshot.len()) {
                return Err(CliError::new(
                    format!(
                        "starting state has {} channels but --channels is {channels}",
                        snapshot.len()
                    ),
                    Some("drop --channels or pass a state of matching length".to_string()),
                ));
            }
            ChannelState::from_snapshot(snapshot)?
        }
        None => ChannelState::new(config.channels)?,
    };
    let transport: Box<dyn Transport> = if connection.dry_run {
        Box::new(MemoryTransport::new())
    } else {
        Box::new(SerialTransport::open(&config.serial)?)
    };
    info!(transport = transport.name(), channels = state.len(), "session opened");
    Ok(Session::with_state(state, transport))
}

fn starting_state(connection: &ConnectionArgs) -> Result<Option<ChannelArray>, CliError> {
    if let Some(hex) = &connection.state {
        return decode_packet(hex).map(Some);
    }
    let Some(path) = connection.state_file.as_deref() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no saved state, starting from zero");
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    decode_packet(&text)
        .map(Some)
        .map_err(|err| err.prefixed(&format!("state file {}", path.display())))
}

fn decode_packet(hex: &str) -> Result<ChannelArray, CliError> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let packet = HEXLOWER_PERMISSIVE.decode(digits.as_bytes()).map_err(|err| {
        CliError::new(
            format!("invalid hex packet: {err}"),
            Some("pass an even number of hex digits, e.g. 00640000".to_string()),
        )
    })?;
    Ok(parse_packet(&packet)?)
}

/// Print what the session ended with, close it, then save it when asked.
fn finish(
    mut session: CliSession,
    connection: &ConnectionArgs,
    output: &OutputArgs,
    summary: &str,
) -> Result<(), CliError> {
    if output.stdout {
        let report = session.report();
        println!("{}", to_json(&report, output.pretty)?);
    } else if connection.dry_run {
        let packet = build_packet(&session.state().snapshot());
        println!("{}", HEXLOWER.encode(&packet));
    }
    session.close()?;
    if let Some(path) = connection.state_file.as_deref() {
        let packet = build_packet(&session.state().snapshot());
        fs::write(path, format!("{}\n", HEXLOWER.encode(&packet)))
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;
    }
    if !output.quiet {
        eprintln!("OK: {summary}");
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

#[derive(Serialize)]
struct PortListing {
    ports: Vec<PortInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detected: Option<String>,
}

fn cmd_ports(json: bool) -> Result<(), CliError> {
    let ports = available_ports()?;
    let detected = find_dmx_port(&ports).map(|port| port.name.clone());

    if json {
        println!("{}", to_json(&PortListing { ports, detected }, false)?);
        return Ok(());
    }
    if ports.is_empty() {
        eprintln!("no serial ports found");
        return Ok(());
    }
    for port in &ports {
        let marker = if detected.as_deref() == Some(port.name.as_str()) {
            "  (auto)"
        } else {
            ""
        };
        match &port.description {
            Some(description) => {
                println!("{}  {}  {}{}", port.name, port.kind, description, marker)
            }
            None => println!("{}  {}{}", port.name, port.kind, marker),
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct FeatureListing {
    feature: &'static str,
    channels: Vec<u16>,
    modes: Vec<ModeInfo>,
}

impl FeatureListing {
    fn new(feature: Feature) -> Self {
        let binding = feature.binding();
        let channels = if binding.is_per_laser() {
            vec![binding.channel(Laser::One), binding.channel(Laser::Two)]
        } else {
            vec![binding.channel(Laser::One)]
        };
        Self {
            feature: feature.token(),
            channels,
            modes: feature.modes(),
        }
    }
}

fn cmd_modes(feature: Option<&str>, json: bool) -> Result<(), CliError> {
    let listings = match feature {
        Some(name) => vec![FeatureListing::new(name.parse::<Feature>()?)],
        None => Feature::ALL.iter().copied().map(FeatureListing::new).collect(),
    };

    if json {
        println!("{}", to_json(&listings, false)?);
        return Ok(());
    }
    for listing in &listings {
        let channels = listing
            .channels
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join("/");
        println!("{} (channel {})", listing.feature, channels);
        if feature.is_none() {
            continue;
        }
        if listing.modes.is_empty() {
            println!("  raw value 0..=255");
        }
        for mode in &listing.modes {
            println!("  {:<24} {}..={}", mode.mode, mode.lo, mode.hi);
        }
    }
    Ok(())
}

fn cmd_set(
    feature: &str,
    mode: Option<&str>,
    laser: Laser,
    value: Option<u16>,
    delay: Option<u16>,
    connection: &ConnectionArgs,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let feature: Feature = feature.parse()?;
    let request = ModeRequest {
        feature,
        laser,
        mode,
        value,
        delay,
    };

    let mut session = open_session(connection)?;
    let write = session.apply_request(&request)?;
    let summary = format!("{feature} -> channel {} = {}", write.channel, write.value);
    finish(session, connection, output, &summary)
}

fn cmd_apply(
    path: &std::path::Path,
    connection: &ConnectionArgs,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let script = script::load(path)?;
    if script.steps.is_empty() {
        return Err(CliError::new(
            format!("script has no steps: {}", path.display()),
            Some("add one or more [[step]] tables".to_string()),
        ));
    }

    let mut session = open_session(connection)?;
    for (index, step) in script.steps.iter().enumerate() {
        let label = format!("step {}", index + 1);
        let request = step
            .request()
            .map_err(|err| CliError::from(err).prefixed(&label))?;
        let write = session
            .apply_request(&request)
            .map_err(|err| CliError::from(err).prefixed(&label))?;
        debug!(step = index + 1, channel = write.channel, value = write.value, "step applied");
        if let Some(pause) = step.pause_ms {
            thread::sleep(Duration::from_millis(pause));
        }
    }
    let summary = format!("{} steps applied from {}", script.steps.len(), path.display());
    finish(session, connection, output, &summary)
}

fn cmd_blackout(connection: &ConnectionArgs, output: &OutputArgs) -> Result<(), CliError> {
    let mut session = open_session(connection)?;
    session.blackout()?;
    finish(session, connection, output, "lamp off")
}

fn cmd_reset(connection: &ConnectionArgs, output: &OutputArgs) -> Result<(), CliError> {
    let mut session = open_session(connection)?;
    session.reset_all_channels()?;
    finish(session, connection, output, "all channels zeroed")
}

fn cmd_decode(hex: &str, json: bool) -> Result<(), CliError> {
    let channels = decode_packet(hex)?;

    if json {
        println!("{}", to_json(&channels, false)?);
        return Ok(());
    }
    println!("{} channels", channels.len());
    for (index, value) in channels.as_bytes().iter().enumerate() {
        if *value != 0 {
            println!("  channel {:>3} = {}", index + 1, value);
        }
    }
    Ok(())
}

fn cmd_demo(
    step_delay_ms: u64,
    connection: &ConnectionArgs,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let mut session = open_session(connection)?;
    let pause = Duration::from_millis(step_delay_ms);

    let steps: [(&str, fn(&mut CliSession) -> Result<(), SessionError>); 8] = [
        ("lamp dynamic_sound", |s| {
            s.set_lamp_mode(LampMode::DynamicSound, None).map(drop)
        }),
        ("animation gallery", |s| {
            s.select_gallery(Gallery::Animation).map(drop)
        }),
        ("pattern 5", |s| s.select_pattern(Laser::One, 5).map(drop)),
        ("crossing size 175", |s| {
            s.set_pattern_size(Laser::One, PatternSize::Crossing, Some(175))
                .map(drop)
        }),
        ("zoom in", |s| {
            s.set_pattern_zoom(Laser::One, PatternZoom::ZoomIn, None)
                .map(drop)
        }),
        ("dynamic inversion", |s| {
            s.set_pattern_rotation(Laser::One, PatternRotation::DynamicInversion, None)
                .map(drop)
        }),
        ("left shift", |s| {
            s.set_horizontal_movement(Laser::One, HorizontalMovement::LeftShift, None)
                .map(drop)
        }),
        ("move up", |s| {
            s.set_vertical_movement(Laser::One, VerticalMovement::MoveUp, None)
                .map(drop)
        }),
    ];

    for (index, (label, step)) in steps.iter().enumerate() {
        if index > 0 && !pause.is_zero() {
            thread::sleep(pause);
        }
        info!(step = index + 1, "{label}");
        step(&mut session).map_err(|err| CliError::from(err).prefixed(label))?;
    }
    finish(session, connection, output, "demo sequence sent")
}
