use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use bytes::{Bytes, BytesMut};
use bytesio::bytes_writer::BytesWriter;
use clap::Parser;
use transmuxer::{AudioSample, Demuxer, EsFrame, EsSink, VideoSample};

mod logging;

/// Inspect, demux, and mux FLV containers.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the header, tag summary, and onMetaData values of an FLV file
    #[arg(short = 'i', long = "info", value_name = "FILE")]
    info: Option<PathBuf>,

    /// Demux an FLV file into a `.h264` Annex-B stream and a `.aac` ADTS stream
    #[arg(short = 'd', long = "demux", value_name = "FILE")]
    demux: Option<PathBuf>,

    /// Mux elementary streams into an FLV file: either `video audio out.flv`
    /// or a single `video,audio` pair (the output name is then derived)
    #[arg(short = 'm', long = "mux", value_name = "PATH", num_args = 1..=3)]
    mux: Option<Vec<PathBuf>>,

    /// `tracing` env-filter directive controlling log verbosity
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init(&cli.log_level) {
        eprintln!("failed to initialize logging: {err:#}");
        std::process::exit(1);
    }

    if let Err(err) = run(&cli) {
        tracing::error!(%err, "flv-media failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let provided = [cli.info.is_some(), cli.demux.is_some(), cli.mux.is_some()]
        .into_iter()
        .filter(|set| *set)
        .count();
    if provided != 1 {
        bail!("expected exactly one of -i, -d, or -m");
    }

    if let Some(path) = &cli.info {
        return cmd_info(path);
    }
    if let Some(path) = &cli.demux {
        return cmd_demux(path);
    }
    if let Some(values) = &cli.mux {
        let (video, audio, out) = resolve_mux_inputs(values)?;
        return cmd_mux(&video, &audio, &out);
    }

    unreachable!("exactly one of -i/-d/-m was just confirmed present");
}

fn cmd_info(path: &Path) -> Result<()> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut cursor = Cursor::new(Bytes::from(raw));
    let parsed = flv::Flv::demux(&mut cursor).context("failed to parse flv file")?;

    println!("file: {}", path.display());
    println!("version: {}", parsed.header.version);
    println!("has_video: {}", parsed.header.has_video);
    println!("has_audio: {}", parsed.header.has_audio);
    println!("tags: {}", parsed.tags.len());

    let (mut video, mut audio, mut script, mut unknown) = (0usize, 0usize, 0usize, 0usize);
    for tag in &parsed.tags {
        match &tag.data {
            flv::FlvTagData::Video { .. } => video += 1,
            flv::FlvTagData::Audio { .. } => audio += 1,
            flv::FlvTagData::Script { .. } => script += 1,
            flv::FlvTagData::Unknown { .. } => unknown += 1,
        }
    }
    println!("  video: {video}, audio: {audio}, script: {script}, unknown: {unknown}");

    for tag in &parsed.tags {
        if let flv::FlvTagData::Script { name, values } = &tag.data {
            println!("script \"{name}\" @ {}ms:", tag.timestamp);
            for value in values {
                println!("  {value:#?}");
            }
        }
    }

    Ok(())
}

fn cmd_demux(path: &Path) -> Result<()> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut cursor = Cursor::new(Bytes::from(raw));

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let unix_ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let video_path = PathBuf::from(format!("{stem}-{unix_ts}.h264"));
    let audio_path = PathBuf::from(format!("{stem}-{unix_ts}.aac"));

    let mut sink = FileSink::new(video_path.clone(), audio_path.clone());
    Demuxer::new().demux(&mut cursor, &mut sink).context("failed to demux flv file")?;

    println!("wrote {} and {}", video_path.display(), audio_path.display());
    Ok(())
}

fn resolve_mux_inputs(values: &[PathBuf]) -> Result<(PathBuf, PathBuf, PathBuf)> {
    match values {
        [combined] => {
            let combined = combined.to_string_lossy();
            let mut parts = combined.splitn(2, ',');
            let video = parts.next().filter(|s| !s.is_empty());
            let audio = parts.next().filter(|s| !s.is_empty());
            let (video, audio) = match (video, audio) {
                (Some(video), Some(audio)) => (PathBuf::from(video), PathBuf::from(audio)),
                _ => bail!("-m with a single argument expects a comma-separated \"video,audio\" pair"),
            };
            let stem = video.file_stem().and_then(|s| s.to_str()).unwrap_or("mux");
            Ok((video, audio, PathBuf::from(format!("{stem}.flv"))))
        }
        [video, audio, out] => Ok((video.clone(), audio.clone(), out.clone())),
        _ => bail!("-m expects either \"video,audio\" or \"video audio out.flv\""),
    }
}

fn cmd_mux(video_path: &Path, audio_path: &Path, out_path: &Path) -> Result<()> {
    let video_raw = Bytes::from(
        fs::read(video_path).with_context(|| format!("failed to read {}", video_path.display()))?,
    );
    let audio_raw = Bytes::from(
        fs::read(audio_path).with_context(|| format!("failed to read {}", audio_path.display()))?,
    );

    let video_samples = group_video_samples(&video_raw);
    let audio_samples = group_audio_samples(audio_raw)?;

    let mut writer = BytesWriter::default();
    transmuxer::mux(&video_samples, &audio_samples, &mut writer)
        .context("failed to mux elementary streams into flv")?;

    fs::write(out_path, writer.dispose())
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    println!(
        "wrote {} ({} video samples, {} audio samples)",
        out_path.display(),
        video_samples.len(),
        audio_samples.len()
    );
    Ok(())
}

/// Splits an Annex-B stream into per-access-unit samples: a new sample
/// closes every time a slice NALU (type 1 or 5) is appended, so any
/// leading SPS/PPS/AUD NALUs stay grouped with the slice they precede. Raw
/// elementary streams carry no timing, so samples are stamped 40ms apart
/// (25fps); a real source would carry its own presentation timestamps.
fn group_video_samples(data: &Bytes) -> Vec<VideoSample> {
    let nalus = h264::nalus_from_annex_b(data);
    let mut samples = Vec::new();
    let mut current: Vec<Bytes> = Vec::new();
    let mut timestamp = 0i32;

    for nalu in nalus {
        let nal_unit_type = nalu.first().map(|byte| byte & 0x1F).unwrap_or(0);
        current.push(nalu);

        if matches!(nal_unit_type, 1 | 5) {
            let is_key_frame = current
                .iter()
                .any(|nalu| nalu.first().map(|byte| byte & 0x1F) == Some(5));
            samples.push(VideoSample {
                timestamp,
                is_key_frame,
                annex_b: encode_annex_b(&current),
            });
            current = Vec::new();
            timestamp += 40;
        }
    }

    samples
}

fn encode_annex_b(nalus: &[Bytes]) -> Bytes {
    let mut out = BytesMut::new();
    for nalu in nalus {
        out.extend_from_slice(&[0, 0, 0, 1]);
        out.extend_from_slice(nalu);
    }
    out.freeze()
}

/// Splits a `.aac` file of back-to-back ADTS frames into raw access units,
/// stamping each one `1024 / sample_rate` seconds after the last — the
/// standard AAC frame duration, since ADTS itself carries no timestamps.
fn group_audio_samples(data: Bytes) -> Result<Vec<AudioSample>> {
    let frames = transmuxer::split_adts_stream(data).context("failed to parse adts stream")?;

    let mut samples = Vec::with_capacity(frames.len());
    let mut timestamp = 0i32;
    for (sample_rate_hz, channels, body) in frames {
        samples.push(AudioSample {
            timestamp,
            sample_rate_hz,
            channels,
            body,
        });
        timestamp += (1024 * 1000 / sample_rate_hz.max(1)) as i32;
    }

    Ok(samples)
}

/// Appends demuxed elementary streams to two files, opened lazily so a
/// source with only one media type doesn't leave a stray empty sibling.
struct FileSink {
    video_path: PathBuf,
    audio_path: PathBuf,
    video_file: Option<File>,
    audio_file: Option<File>,
}

impl FileSink {
    fn new(video_path: PathBuf, audio_path: PathBuf) -> Self {
        Self {
            video_path,
            audio_path,
            video_file: None,
            audio_file: None,
        }
    }

    fn video_file(&mut self) -> std::io::Result<&mut File> {
        if self.video_file.is_none() {
            self.video_file = Some(File::create(&self.video_path)?);
        }
        Ok(self.video_file.as_mut().expect("just created"))
    }

    fn audio_file(&mut self) -> std::io::Result<&mut File> {
        if self.audio_file.is_none() {
            self.audio_file = Some(File::create(&self.audio_path)?);
        }
        Ok(self.audio_file.as_mut().expect("just created"))
    }
}

impl EsSink for FileSink {
    fn on_video(&mut self, frame: EsFrame) {
        let path = self.video_path.clone();
        if let Err(err) = self.video_file().and_then(|file| file.write_all(&frame.data)) {
            tracing::error!(%err, path = %path.display(), "failed to write video frame");
        }
    }

    fn on_audio(&mut self, frame: EsFrame) {
        let path = self.audio_path.clone();
        if let Err(err) = self.audio_file().and_then(|file| file.write_all(&frame.data)) {
            tracing::error!(%err, path = %path.display(), "failed to write audio frame");
        }
    }

    fn on_script(&mut self, name: String, values: Vec<amf0::Amf0Value>) {
        tracing::info!(name, ?values, "script tag");
    }

    fn on_video_flush(&mut self) {
        tracing::debug!("end of video sequence");
    }
}
