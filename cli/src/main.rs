use clap::{Parser, Subcommand, ValueEnum};
use hound::WavSpec;
use ledwave_core::{
    silence, AnimationFrame, MessageAssembler, ModemConfig, ModulationVariant, Modulator,
    ProtocolVersion, TextFrame,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledwave")]
#[command(about = "Encode LED badge content into a playable audio signal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Protocol generation of the receiving badge (1 or 2)
    #[arg(long, global = true, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=2))]
    protocol: u8,

    /// Modulation scheme
    #[arg(long, global = true, value_enum, default_value = "amplitude")]
    modulation: Modulation,

    /// Output sample rate in Hz (unsupported rates fall back to 48000)
    #[arg(long, global = true, default_value = "48000")]
    sample_rate: u32,

    /// Disable Hamming parity expansion
    #[arg(long, global = true)]
    no_parity: bool,

    /// Milliseconds of silence before and after the signal
    #[arg(long, global = true, default_value = "0")]
    gap_ms: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Modulation {
    /// Rail-to-rail amplitude-polarity bursts
    Amplitude,
    /// Sine-enveloped tone bursts
    Tone,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode scrolling text messages to a WAV file
    Text {
        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// One or more messages, each becoming its own frame
        #[arg(value_name = "MESSAGE", required = true)]
        messages: Vec<String>,

        /// Scroll speed (0-15)
        #[arg(short, long, default_value = "13")]
        speed: u8,

        /// Delay between repetitions (0-15)
        #[arg(short, long, default_value = "0")]
        delay: u8,

        /// Scroll direction (0 or 1)
        #[arg(long, default_value = "0")]
        direction: u8,
    },

    /// Encode a raw animation bitmap to a WAV file
    Animation {
        /// Raw bitmap file, 8 bytes per display step
        #[arg(value_name = "INPUT.BIN")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Playback speed (0-15)
        #[arg(short, long, default_value = "13")]
        speed: u8,

        /// Delay between repetitions (0-15)
        #[arg(short, long, default_value = "0")]
        delay: u8,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let version = match cli.protocol {
        1 => ProtocolVersion::V1,
        _ => ProtocolVersion::V2,
    };
    let variant = match cli.modulation {
        Modulation::Amplitude => ModulationVariant::AmplitudePolarity,
        Modulation::Tone => ModulationVariant::ToneBurst,
    };
    let config = ModemConfig::new(variant, cli.sample_rate, !cli.no_parity);

    let mut assembler = MessageAssembler::new(version);
    match &cli.command {
        Commands::Text {
            messages,
            speed,
            delay,
            direction,
            ..
        } => {
            for message in messages {
                assembler.add_frame(TextFrame::new(
                    message.as_bytes().to_vec(),
                    *speed,
                    *delay,
                    *direction,
                )?);
            }
        }
        Commands::Animation {
            input,
            speed,
            delay,
            ..
        } => {
            let bitmap = std::fs::read(input)?;
            log::info!("read {} bitmap bytes from {}", bitmap.len(), input.display());
            assembler.add_frame(AnimationFrame::new(bitmap, *speed, *delay)?);
        }
    }

    let message = assembler.assemble();
    println!(
        "Assembled {} frame(s) into {} message bytes",
        assembler.frame_count(),
        message.len()
    );

    let mut modulator = Modulator::new(config);
    let gap = silence(config.sample_rate() as usize * cli.gap_ms as usize / 1000);

    let mut samples = gap.clone();
    samples.extend(modulator.encode(&message));
    samples.extend(gap);
    println!(
        "Modulated to {} samples ({:.2} s at {} Hz)",
        samples.len(),
        samples.len() as f64 / config.sample_rate() as f64,
        config.sample_rate()
    );

    let output = match &cli.command {
        Commands::Text { output, .. } => output,
        Commands::Animation { output, .. } => output,
    };
    write_wav(output, &samples, config.sample_rate())?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// Write mono 8-bit unsigned PCM. Hound speaks signed 8-bit and offsets
/// by 128 in the container, so shift our unsigned samples down first.
fn write_wav(path: &PathBuf, samples: &[u8], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample((sample as i16 - 128) as i8)?;
    }
    writer.finalize()
}
